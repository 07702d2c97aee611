//! Seam-aware triangle stripification.
//!
//! The pipeline runs in two passes over a loaded [`TexturedMesh`]:
//!
//! - **Building**: [`build_strips`] greedily partitions the faces into
//!   strips of edge-adjacent triangles, never stepping across a texture
//!   seam ([`seam::is_seam`]).
//! - **Linearizing**: [`linearize`] turns each strip into the index sequence
//!   of a triangle-strip draw, inserting repeated indices where the winding
//!   has to be flipped.
//!
//! Seams themselves are resolved earlier, while loading: see
//! [`duplication`].
//!
//! # Example
//!
//! ```
//! use stripify::model::{MeshData, TexturedMesh};
//! use stripify::strip::{stripify, StripOptions};
//! use stripify::Progress;
//! use nalgebra::Point3;
//!
//! let data = MeshData::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2], [1, 3, 2]],
//! );
//! let model = TexturedMesh::from_data(data).unwrap();
//!
//! let (strips, out) = stripify(&model, &StripOptions::default(), &Progress::none()).unwrap();
//! assert_eq!(strips.len(), 1);
//! assert_eq!(out.indices.len(), 4);
//! ```

pub mod adjacency;
pub mod builder;
pub mod duplication;
pub mod linearize;
pub mod seam;

pub use adjacency::MeshAdjacency;
pub use builder::build_strips;
pub use linearize::{linearize, triangle_list, DrawRange, StripIndices};

use crate::error::{Result, StripError};
use crate::mesh::FaceId;
use crate::model::TexturedMesh;
use crate::progress::Progress;

/// Default upper bound on faces per strip.
pub const DEFAULT_MAX_STRIP_LENGTH: usize = 500;

/// Options for strip generation.
#[derive(Debug, Clone)]
pub struct StripOptions {
    /// Emit triangle strips. When false, callers draw a plain triangle list.
    pub stripify: bool,

    /// Maximum number of faces in one strip. Must be at least 1.
    pub max_strip_length: usize,

    /// Build strips for each connected component on the rayon pool.
    pub parallel: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            stripify: true,
            max_strip_length: DEFAULT_MAX_STRIP_LENGTH,
            parallel: false,
        }
    }
}

impl StripOptions {
    /// Create options with the specified strip length bound.
    pub fn with_max_strip_length(mut self, max_strip_length: usize) -> Self {
        self.max_strip_length = max_strip_length;
        self
    }

    /// Create options that enable or disable strip output.
    pub fn with_stripify(mut self, stripify: bool) -> Self {
        self.stripify = stripify;
        self
    }

    /// Create options with parallel execution enabled or disabled.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that the options can drive a build.
    pub fn validate(&self) -> Result<()> {
        if self.max_strip_length == 0 {
            return Err(StripError::invalid_param(
                "max_strip_length",
                self.max_strip_length,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// An ordered run of faces, each sharing an edge with the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    faces: Vec<FaceId>,
}

impl Strip {
    /// Wrap an ordered face list.
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self { faces }
    }

    /// The faces, in strip order.
    #[inline]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Number of faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether the strip has no faces. Built strips never do.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// The strips covering a mesh, in build order.
#[derive(Debug, Clone, Default)]
pub struct StripSet {
    strips: Vec<Strip>,
}

impl StripSet {
    /// Wrap a list of strips.
    pub fn new(strips: Vec<Strip>) -> Self {
        Self { strips }
    }

    /// Number of strips.
    #[inline]
    pub fn len(&self) -> usize {
        self.strips.len()
    }

    /// Whether there are no strips.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    /// The strips, in build order.
    #[inline]
    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    /// Iterate over the strips.
    pub fn iter(&self) -> std::slice::Iter<'_, Strip> {
        self.strips.iter()
    }

    /// Total faces across all strips.
    pub fn num_faces(&self) -> usize {
        self.strips.iter().map(Strip::len).sum()
    }

    /// Number of single-face strips.
    pub fn singletons(&self) -> usize {
        self.strips.iter().filter(|s| s.len() == 1).count()
    }

    /// Length of the longest strip (0 when empty).
    pub fn longest(&self) -> usize {
        self.strips.iter().map(Strip::len).max().unwrap_or(0)
    }

    /// Mean faces per strip (0 when empty).
    pub fn average_length(&self) -> f64 {
        if self.strips.is_empty() {
            return 0.0;
        }
        self.num_faces() as f64 / self.strips.len() as f64
    }

    /// Unwrap into the strip list.
    pub fn into_strips(self) -> Vec<Strip> {
        self.strips
    }
}

impl<'a> IntoIterator for &'a StripSet {
    type Item = &'a Strip;
    type IntoIter = std::slice::Iter<'a, Strip>;

    fn into_iter(self) -> Self::IntoIter {
        self.strips.iter()
    }
}

/// Build strips and linearize them in one call.
pub fn stripify(
    model: &TexturedMesh,
    options: &StripOptions,
    progress: &Progress,
) -> Result<(StripSet, StripIndices)> {
    let strips = build_strips(model, options, progress)?;
    let indices = linearize(model, &strips)?;
    Ok((strips, indices))
}

//! # Stripify
//!
//! Seam-aware triangle strip generation for indexed triangle meshes.
//!
//! Stripify takes the triangles an importer produced, resolves texture seams
//! by duplicating vertices that are used with more than one texture
//! coordinate, and then partitions the faces into triangle strips that never
//! cross a seam. The result is a vertex buffer, an index buffer and one draw
//! range per strip.
//!
//! ## Features
//!
//! - **Half-edge adjacency**: O(1) "face across this edge" queries with type-safe indices
//! - **Seam handling**: per-corner texture coordinates with deduplicated vertex copies
//! - **Greedy stripification**: lowest-degree-first face selection with a strip length bound
//! - **Parallel mode**: independent mesh islands stripified on the rayon pool
//! - **GPU-ready output**: `bytemuck`-castable vertices and `u32` indices
//!
//! ## Quick Start
//!
//! ```
//! use stripify::prelude::*;
//! use nalgebra::{Point2, Point3};
//!
//! // A unit quad made of two triangles.
//! let data = MeshData::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2], [2, 1, 3]],
//! )
//! .with_tex_coords(
//!     vec![
//!         Point2::new(0.0, 0.0),
//!         Point2::new(1.0, 0.0),
//!         Point2::new(0.0, 1.0),
//!         Point2::new(1.0, 1.0),
//!     ],
//!     vec![[0, 1, 2], [2, 1, 3]],
//! );
//!
//! let model = TexturedMesh::from_data(data).unwrap();
//! let buffers = build_render_buffers(&model, &StripOptions::default(), &Progress::none()).unwrap();
//!
//! assert_eq!(buffers.topology, Topology::TriangleStrip);
//! assert_eq!(buffers.draws.len(), 1);
//! assert_eq!(buffers.indices, vec![0, 1, 2, 3]);
//! ```
//!
//! ## Step by Step
//!
//! The pipeline can also be driven one pass at a time:
//!
//! ```
//! use stripify::prelude::*;
//! use nalgebra::Point3;
//!
//! # let data = MeshData::new(
//! #     vec![
//! #         Point3::new(0.0, 0.0, 0.0),
//! #         Point3::new(1.0, 0.0, 0.0),
//! #         Point3::new(0.0, 1.0, 0.0),
//! #     ],
//! #     vec![[0, 1, 2]],
//! # );
//! let model = TexturedMesh::from_data(data).unwrap();
//!
//! let options = StripOptions::default().with_max_strip_length(64);
//! let strips = build_strips(&model, &options, &Progress::none()).unwrap();
//! let out = linearize(&model, &strips).unwrap();
//!
//! for (strip, range) in strips.iter().zip(&out.ranges) {
//!     println!("{} faces -> {} indices", strip.len(), range.count);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mesh;
pub mod model;
pub mod progress;
pub mod render;
pub mod strip;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use stripify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, StripError};
    pub use crate::mesh::{build_from_triangles, FaceId, HalfEdgeMesh, VertexId};
    pub use crate::model::{FaceCorners, MeshData, TexturedMesh};
    pub use crate::progress::Progress;
    pub use crate::render::{build_render_buffers, RenderBuffers, RenderVertex, Topology};
    pub use crate::strip::{
        build_strips, linearize, stripify, triangle_list, DrawRange, Strip, StripIndices,
        StripOptions, StripSet,
    };
}

pub use progress::Progress;

// Re-export nalgebra types for convenience
pub use nalgebra;

//! Strip linearization.
//!
//! Turns each face strip into the index sequence of a `TriangleStrip` draw.
//! The first face contributes three indices; every later face contributes
//! the one vertex it does not share with its predecessor. When that would
//! put the next shared edge on the wrong side, the vertex common to the
//! faces before and after is repeated first, producing a degenerate
//! triangle that flips the winding back. Each repeat is a *swap*.

use crate::error::{Result, StripError};
use crate::model::TexturedMesh;

use super::adjacency::MeshAdjacency;
use super::{Strip, StripSet};

/// A contiguous run of the index buffer drawn as one primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawRange {
    /// Offset of the first index.
    pub start: u32,
    /// Number of indices.
    pub count: u32,
}

/// The concatenated index sequences of a strip set.
#[derive(Debug, Clone, Default)]
pub struct StripIndices {
    /// All strips' indices, back to back.
    pub indices: Vec<u32>,
    /// One range per strip, in strip order.
    pub ranges: Vec<DrawRange>,
    /// Repeated indices inserted across all strips.
    pub swaps: usize,
}

/// The first slot of `a` whose vertex is not among `b`'s.
fn standalone_slot(a: &[u32; 3], b: &[u32; 3]) -> Option<usize> {
    a.iter().position(|v| !b.contains(v))
}

/// The vertex of `a` not shared with `b`.
fn other_vertex(a: &[u32; 3], b: &[u32; 3]) -> Option<u32> {
    a.iter().copied().find(|v| !b.contains(v))
}

/// The first vertex of `a` shared with `b`.
fn common_vertex(a: &[u32; 3], b: &[u32; 3]) -> Option<u32> {
    a.iter().copied().find(|v| b.contains(v))
}

/// Append the indices of one strip, returning its swap count.
///
/// Nothing is appended when the strip turns out to be broken.
fn linearize_strip(
    adjacency: &MeshAdjacency<'_>,
    strip: &Strip,
    strip_index: usize,
    out: &mut Vec<u32>,
) -> Result<usize> {
    let faces: Vec<[u32; 3]> = strip.faces().iter().map(|&f| adjacency.vertices(f)).collect();
    let broken = |position: usize| StripError::BrokenStrip {
        strip: strip_index,
        position,
    };

    match faces.as_slice() {
        [] => return Err(broken(0)),
        [only] => {
            out.extend_from_slice(only);
            return Ok(0);
        }
        _ => {}
    }

    let mut emitted = Vec::with_capacity(faces.len() + 2);
    let mut swaps = 0;

    let first = &faces[0];
    let j = standalone_slot(first, &faces[1]).ok_or_else(|| broken(0))?;
    emitted.extend([first[j], first[(j + 1) % 3], first[(j + 2) % 3]]);

    for i in 1..faces.len() {
        let other = other_vertex(&faces[i], &faces[i - 1]).ok_or_else(|| broken(i))?;

        if i + 1 < faces.len() {
            let common = common_vertex(&faces[i - 1], &faces[i + 1]).ok_or_else(|| broken(i))?;
            if emitted.last() != Some(&common) {
                emitted.push(common);
                swaps += 1;
            }
        }
        emitted.push(other);
    }

    debug_assert_eq!(emitted.len(), faces.len() + 2 + swaps);
    out.extend_from_slice(&emitted);
    Ok(swaps)
}

/// Linearize every strip into one index buffer with a draw range per strip.
///
/// A strip of `L` faces with `s` swaps occupies `L + 2 + s` indices, or
/// exactly 3 when `L == 1`.
///
/// # Errors
///
/// [`StripError::BrokenStrip`] if a strip is empty or consecutive faces of a
/// strip do not share the vertices needed to stitch them. No partial output
/// is returned.
///
/// # Example
///
/// ```
/// use stripify::model::{MeshData, TexturedMesh};
/// use stripify::strip::{build_strips, linearize, StripOptions};
/// use stripify::Progress;
/// use nalgebra::Point3;
///
/// let data = MeshData::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2], [1, 2, 3]],
/// );
/// let model = TexturedMesh::from_data(data).unwrap();
/// let strips = build_strips(&model, &StripOptions::default(), &Progress::none()).unwrap();
///
/// let out = linearize(&model, &strips).unwrap();
/// assert_eq!(out.indices, vec![0, 1, 2, 3]);
/// assert_eq!(out.ranges[0].count, 4);
/// ```
pub fn linearize(model: &TexturedMesh, strips: &StripSet) -> Result<StripIndices> {
    let adjacency = MeshAdjacency::new(model);

    // A strip of L faces needs at most 2L indices, or 3 when L == 1.
    let mut indices = Vec::new();
    indices
        .try_reserve(2 * strips.num_faces() + strips.len())
        .map_err(|_| StripError::OutOfMemory {
            what: "strip indices",
        })?;
    let mut ranges = Vec::new();
    ranges
        .try_reserve(strips.len())
        .map_err(|_| StripError::OutOfMemory { what: "draw ranges" })?;

    let mut swaps = 0;
    for (strip_index, strip) in strips.iter().enumerate() {
        let start = indices.len();
        swaps += linearize_strip(&adjacency, strip, strip_index, &mut indices)?;
        ranges.push(DrawRange {
            start: start as u32,
            count: (indices.len() - start) as u32,
        });
    }

    log::debug!(
        "linearized {} strips into {} indices ({} swaps)",
        ranges.len(),
        indices.len(),
        swaps
    );

    Ok(StripIndices {
        indices,
        ranges,
        swaps,
    })
}

/// Every face as an independent triangle, three indices each.
pub fn triangle_list(model: &TexturedMesh) -> Result<Vec<u32>> {
    let mut indices = Vec::new();
    indices
        .try_reserve(model.num_faces() * 3)
        .map_err(|_| StripError::OutOfMemory {
            what: "triangle indices",
        })?;
    for f in model.mesh().face_ids() {
        indices.extend_from_slice(&model.corners(f).vertices);
    }
    Ok(indices)
}

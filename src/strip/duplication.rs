//! Vertex duplication for texture seams.
//!
//! A vertex shared by faces that disagree on its texture coordinate cannot be
//! a single entry in the vertex buffer. The first texture coordinate a vertex
//! is seen with keeps the original slot; every other distinct coordinate gets
//! one extra slot appended after the original vertices, and every face corner
//! using that (vertex, coordinate) pair is redirected to it.

use std::collections::HashMap;

use crate::mesh::VertexId;
use crate::model::FaceCorners;

/// An extra vertex slot: a copy of `vertex` carrying texture coordinate `tex_coord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duplication {
    /// The original vertex whose position and normal are copied.
    pub vertex: VertexId,
    /// The texture-coordinate index the copy carries.
    pub tex_coord: u32,
}

/// Assigns deduplicated extra vertex slots during loading.
///
/// Slot numbers depend only on the order faces are recorded in, so
/// recording the same faces in the same order always yields the same slots.
#[derive(Debug, Clone)]
pub struct DuplicationTracker {
    /// Texture coordinate each original vertex was first claimed with.
    first_tex_coord: Vec<Option<u32>>,
    /// Duplicates in creation order; record `i` lives at slot `base + i`.
    records: Vec<Duplication>,
    lookup: HashMap<(VertexId, u32), usize>,
}

impl DuplicationTracker {
    /// Create a tracker for a mesh with `base_vertex_count` original vertices.
    pub fn new(base_vertex_count: usize) -> Self {
        Self {
            first_tex_coord: vec![None; base_vertex_count],
            records: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Number of original vertices.
    #[inline]
    pub fn base_vertex_count(&self) -> usize {
        self.first_tex_coord.len()
    }

    /// Resolve the vertex slot for `vertex` used with `tex_coord`.
    ///
    /// Returns the original index when the vertex is unclaimed (claiming it)
    /// or already claimed with the same coordinate, and a duplicate slot
    /// otherwise.
    pub fn resolve(&mut self, vertex: VertexId, tex_coord: u32) -> u32 {
        let claimed = &mut self.first_tex_coord[vertex.index()];
        match *claimed {
            None => {
                *claimed = Some(tex_coord);
                vertex.raw()
            }
            Some(first) if first == tex_coord => vertex.raw(),
            Some(_) => {
                let base = self.first_tex_coord.len();
                let records = &mut self.records;
                let record = *self.lookup.entry((vertex, tex_coord)).or_insert_with(|| {
                    records.push(Duplication { vertex, tex_coord });
                    records.len() - 1
                });
                (base + record) as u32
            }
        }
    }

    /// Record all three corners of a face, rewriting its vertex indices in
    /// place where a duplicate is needed.
    ///
    /// The corners must still hold original vertex indices.
    pub fn record_face(&mut self, corners: &mut FaceCorners) {
        for slot in 0..3 {
            let vertex = VertexId::new(corners.vertices[slot] as usize);
            corners.vertices[slot] = self.resolve(vertex, corners.tex_coords[slot]);
        }
    }

    /// The duplicates created so far, in slot order.
    #[inline]
    pub fn records(&self) -> &[Duplication] {
        &self.records
    }

    /// Original vertices plus duplicates.
    #[inline]
    pub fn expanded_vertex_count(&self) -> usize {
        self.base_vertex_count() + self.records.len()
    }

    /// Consume the tracker, keeping only the duplicate list.
    pub fn into_records(self) -> Vec<Duplication> {
        self.records
    }
}

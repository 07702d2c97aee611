//! Adjacency queries used by the strip builder and linearizer.

use crate::mesh::FaceId;
use crate::model::TexturedMesh;

/// Read-only view answering the three questions stripification asks of a
/// mesh: which faces lie across a face's edges, which vertex slots a face
/// uses, and which texture coordinate each corner carries.
///
/// Neighbours come from the geometric topology; vertex slots come from the
/// seam-resolved corners. The two may disagree where a vertex was duplicated.
#[derive(Debug, Clone, Copy)]
pub struct MeshAdjacency<'a> {
    model: &'a TexturedMesh,
}

impl<'a> MeshAdjacency<'a> {
    /// Create a view over a loaded model.
    pub fn new(model: &'a TexturedMesh) -> Self {
        Self { model }
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.model.num_faces()
    }

    /// Whether texture seams need to be respected.
    #[inline]
    pub fn is_textured(&self) -> bool {
        self.model.is_textured()
    }

    /// Faces across the three edges of `f`, in edge-slot order.
    #[inline]
    pub fn neighbors(&self, f: FaceId) -> [Option<FaceId>; 3] {
        self.model.mesh().face_neighbors(f)
    }

    /// Vertex slots of `f`, in stored corner order.
    #[inline]
    pub fn vertices(&self, f: FaceId) -> [u32; 3] {
        self.model.corners(f).vertices
    }

    /// Texture-coordinate index of corner `corner` of `f`.
    #[inline]
    pub fn tex_coord(&self, f: FaceId, corner: usize) -> u32 {
        self.model.corners(f).tex_coords[corner]
    }
}

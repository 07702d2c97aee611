//! Texture seam classification.
//!
//! Two faces across a shared edge normally share two vertex slots. When one
//! side had a shared vertex moved to a duplicate slot, the faces share fewer
//! slots and cannot be stitched into one strip without corrupting UVs.

use crate::mesh::FaceId;

use super::adjacency::MeshAdjacency;

/// Count the slots of `a` whose vertex appears nowhere in `b`.
#[inline]
pub fn unmatched_corners(a: &[u32; 3], b: &[u32; 3]) -> usize {
    a.iter().filter(|v| !b.contains(v)).count()
}

/// Whether `a` and `b` must not be consecutive in a strip.
///
/// Always `false` for untextured meshes.
pub fn is_seam(adjacency: &MeshAdjacency<'_>, a: FaceId, b: FaceId) -> bool {
    if !adjacency.is_textured() {
        return false;
    }
    unmatched_corners(&adjacency.vertices(a), &adjacency.vertices(b)) > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MeshData, TexturedMesh};
    use nalgebra::{Point2, Point3};

    fn square(tex: [[usize; 3]; 2], textured: bool) -> TexturedMesh {
        let mut data = MeshData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [1, 3, 2]],
        );
        if textured {
            data = data.with_tex_coords(vec![Point2::new(0.0, 0.0); 6], tex.to_vec());
        }
        TexturedMesh::from_data(data).unwrap()
    }

    #[test]
    fn test_unmatched_corners() {
        assert_eq!(unmatched_corners(&[0, 1, 2], &[1, 3, 2]), 1);
        assert_eq!(unmatched_corners(&[0, 1, 2], &[1, 3, 5]), 2);
        assert_eq!(unmatched_corners(&[0, 1, 2], &[2, 0, 1]), 0);
        assert_eq!(unmatched_corners(&[0, 1, 2], &[3, 4, 5]), 3);
    }

    #[test]
    fn test_shared_uvs_are_not_a_seam() {
        let model = square([[0, 1, 2], [1, 3, 2]], true);
        let adjacency = MeshAdjacency::new(&model);
        assert!(!is_seam(&adjacency, FaceId::new(0), FaceId::new(1)));
    }

    #[test]
    fn test_one_split_shared_vertex_is_a_seam() {
        // Only vertex 2 is duplicated: the faces still share vertex 1 but
        // face 0 now has two unmatched slots.
        let model = square([[0, 1, 2], [1, 3, 4]], true);
        let adjacency = MeshAdjacency::new(&model);
        assert!(is_seam(&adjacency, FaceId::new(0), FaceId::new(1)));
    }

    #[test]
    fn test_split_edge_is_a_seam() {
        let model = square([[0, 1, 2], [5, 3, 4]], true);
        let adjacency = MeshAdjacency::new(&model);
        assert!(is_seam(&adjacency, FaceId::new(0), FaceId::new(1)));
        assert!(is_seam(&adjacency, FaceId::new(1), FaceId::new(0)));
    }

    #[test]
    fn test_untextured_never_seams() {
        let model = square([[0, 0, 0], [0, 0, 0]], false);
        let adjacency = MeshAdjacency::new(&model);
        assert!(!is_seam(&adjacency, FaceId::new(0), FaceId::new(1)));
    }
}

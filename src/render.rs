//! GPU-ready buffers for a stripified mesh.
//!
//! The vertex buffer holds one entry per expanded vertex slot: the original
//! vertices followed by the seam duplicates. Indices either describe one
//! triangle-strip draw per strip or a single triangle-list draw.

use bytemuck::{Pod, Zeroable};

use crate::error::{Result, StripError};
use crate::mesh::VertexId;
use crate::model::TexturedMesh;
use crate::progress::Progress;
use crate::strip::{build_strips, linearize, triangle_list, DrawRange, StripOptions, StripSet};

/// Interleaved vertex with position, normal and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    /// Position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// Texture coordinates, with `t` flipped for a top-left origin.
    pub uv: [f32; 2],
}

/// How the index buffer is to be assembled into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Three indices per triangle.
    TriangleList,
    /// Each draw range is one strip.
    TriangleStrip,
}

/// Vertex and index buffers plus the draw calls over them.
#[derive(Debug, Clone)]
pub struct RenderBuffers {
    /// One vertex per expanded slot.
    pub vertices: Vec<RenderVertex>,
    /// Index buffer.
    pub indices: Vec<u32>,
    /// Primitive assembly for every draw.
    pub topology: Topology,
    /// Draw calls, in order.
    pub draws: Vec<DrawRange>,
    /// The strips behind the draws (empty for a triangle list).
    pub strips: StripSet,
    /// Repeated indices inserted by the linearizer.
    pub swaps: usize,
}

impl RenderBuffers {
    /// The vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Fill the expanded vertex buffer.
fn build_vertices(model: &TexturedMesh) -> Result<Vec<RenderVertex>> {
    let count = model.expanded_vertex_count();
    let mut vertices = Vec::new();
    vertices
        .try_reserve_exact(count)
        .map_err(|_| StripError::OutOfMemory {
            what: "vertex buffer",
        })?;

    let mesh = model.mesh();
    let normals = model.normals();
    let vertex = |index: usize| {
        let p = mesh.position(VertexId::new(index));
        let n = normals[index];
        RenderVertex {
            position: [p.x as f32, p.y as f32, p.z as f32],
            normal: [n.x as f32, n.y as f32, n.z as f32],
            uv: [0.0; 2],
        }
    };

    vertices.extend((0..model.num_vertices()).map(vertex));
    vertices.extend(model.duplications().iter().map(|d| vertex(d.vertex.index())));

    if model.is_textured() {
        let tex_coords = model.tex_coords();
        for f in mesh.face_ids() {
            let corners = model.corners(f);
            for (&slot, &tex) in corners.vertices.iter().zip(&corners.tex_coords) {
                let t = tex_coords[tex as usize];
                vertices[slot as usize].uv = [t.x as f32, 1.0 - t.y as f32];
            }
        }
    }

    Ok(vertices)
}

/// Build everything needed to draw `model`.
///
/// With `options.stripify` the faces are stripified and drawn as one strip
/// per draw range; otherwise a single triangle-list draw covers all faces.
///
/// # Example
///
/// ```
/// use stripify::model::{MeshData, TexturedMesh};
/// use stripify::render::{build_render_buffers, Topology};
/// use stripify::strip::StripOptions;
/// use stripify::Progress;
/// use nalgebra::Point3;
///
/// let data = MeshData::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// let model = TexturedMesh::from_data(data).unwrap();
///
/// let buffers = build_render_buffers(&model, &StripOptions::default(), &Progress::none()).unwrap();
/// assert_eq!(buffers.topology, Topology::TriangleStrip);
/// assert_eq!(buffers.indices, vec![0, 1, 2]);
/// assert_eq!(buffers.vertices.len(), 3);
/// ```
pub fn build_render_buffers(
    model: &TexturedMesh,
    options: &StripOptions,
    progress: &Progress,
) -> Result<RenderBuffers> {
    options.validate()?;
    let vertices = build_vertices(model)?;

    let buffers = if options.stripify {
        let strips = build_strips(model, options, progress)?;
        let out = linearize(model, &strips)?;
        RenderBuffers {
            vertices,
            indices: out.indices,
            topology: Topology::TriangleStrip,
            draws: out.ranges,
            strips,
            swaps: out.swaps,
        }
    } else {
        let indices = triangle_list(model)?;
        let draws = if indices.is_empty() {
            Vec::new()
        } else {
            vec![DrawRange {
                start: 0,
                count: indices.len() as u32,
            }]
        };
        RenderBuffers {
            vertices,
            indices,
            topology: Topology::TriangleList,
            draws,
            strips: StripSet::default(),
            swaps: 0,
        }
    };

    log::info!(
        "render buffers: {} vertices, {} indices, {} draws ({:?})",
        buffers.vertices.len(),
        buffers.indices.len(),
        buffers.draws.len(),
        buffers.topology
    );
    Ok(buffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MeshData;
    use nalgebra::{Point2, Point3};

    fn quad(textured: bool) -> TexturedMesh {
        let mut data = MeshData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [2, 1, 3]],
        );
        if textured {
            // Vertex 2 carries UV 2 in face 0 and UV 4 in face 1.
            data = data.with_tex_coords(
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(1.0, 0.0),
                    Point2::new(0.0, 1.0),
                    Point2::new(1.0, 1.0),
                    Point2::new(0.25, 0.75),
                ],
                vec![[0, 1, 2], [4, 1, 3]],
            );
        }
        TexturedMesh::from_data(data).unwrap()
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<RenderVertex>(), 32);
    }

    #[test]
    fn test_strip_buffers() {
        let model = quad(false);
        let buffers =
            build_render_buffers(&model, &StripOptions::default(), &Progress::none()).unwrap();

        assert_eq!(buffers.topology, Topology::TriangleStrip);
        assert_eq!(buffers.draws, vec![DrawRange { start: 0, count: 4 }]);
        assert_eq!(buffers.vertices.len(), 4);
        assert_eq!(buffers.index_bytes().len(), 16);
        assert_eq!(buffers.vertex_bytes().len(), 4 * 32);
        assert_eq!(buffers.strips.len(), 1);
    }

    #[test]
    fn test_triangle_list_buffers() {
        let model = quad(false);
        let options = StripOptions::default().with_stripify(false);
        let buffers = build_render_buffers(&model, &options, &Progress::none()).unwrap();

        assert_eq!(buffers.topology, Topology::TriangleList);
        assert_eq!(buffers.indices, vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(buffers.draws, vec![DrawRange { start: 0, count: 6 }]);
        assert!(buffers.strips.is_empty());
    }

    #[test]
    fn test_duplicate_slot_copies_position_and_flips_uv() {
        let model = quad(true);
        let buffers =
            build_render_buffers(&model, &StripOptions::default(), &Progress::none()).unwrap();

        assert_eq!(buffers.vertices.len(), 5);
        let original = buffers.vertices[2];
        let duplicate = buffers.vertices[4];
        assert_eq!(original.position, duplicate.position);
        assert_eq!(original.normal, duplicate.normal);
        assert_eq!(original.uv, [0.0, 0.0]);
        assert_eq!(duplicate.uv, [0.25, 0.25]);
    }

    #[test]
    fn test_seamed_quad_draws_two_strips() {
        let model = quad(true);
        let buffers =
            build_render_buffers(&model, &StripOptions::default(), &Progress::none()).unwrap();

        assert_eq!(buffers.draws.len(), 2);
        assert_eq!(buffers.indices, vec![0, 1, 2, 4, 1, 3]);
    }

    #[test]
    fn test_empty_mesh() {
        let model = TexturedMesh::from_data(MeshData::default()).unwrap();
        for stripify in [true, false] {
            let options = StripOptions::default().with_stripify(stripify);
            let buffers = build_render_buffers(&model, &options, &Progress::none()).unwrap();
            assert!(buffers.vertices.is_empty());
            assert!(buffers.indices.is_empty());
            assert!(buffers.draws.is_empty());
        }
    }
}

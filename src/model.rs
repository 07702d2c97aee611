//! Loaded mesh models.
//!
//! [`MeshData`] is what an importer hands over: positions, optional normals,
//! optional texture coordinates and per-face index triples. Loading it into a
//! [`TexturedMesh`] builds the half-edge topology from the geometric vertex
//! indices and then resolves texture seams, so each face corner ends up
//! pointing at a vertex slot that carries exactly one texture coordinate.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{Result, StripError};
use crate::mesh::{build_from_triangles, check_index_range, FaceId, HalfEdgeMesh};
use crate::strip::duplication::{Duplication, DuplicationTracker};

/// Raw triangle data as produced by a model importer.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Per-vertex normals. Computed from the faces when absent.
    pub normals: Option<Vec<Vector3<f64>>>,
    /// Texture coordinates, referenced by `face_tex_coords`.
    pub tex_coords: Option<Vec<Point2<f64>>>,
    /// Vertex indices of each triangle.
    pub faces: Vec<[usize; 3]>,
    /// Texture-coordinate indices of each triangle corner.
    pub face_tex_coords: Option<Vec<[usize; 3]>>,
}

impl MeshData {
    /// Create untextured mesh data from positions and triangles.
    pub fn new(positions: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            positions,
            faces,
            ..Self::default()
        }
    }

    /// Attach texture coordinates and the per-corner indices into them.
    pub fn with_tex_coords(
        mut self,
        tex_coords: Vec<Point2<f64>>,
        face_tex_coords: Vec<[usize; 3]>,
    ) -> Self {
        self.tex_coords = Some(tex_coords);
        self.face_tex_coords = Some(face_tex_coords);
        self
    }

    /// Attach per-vertex normals.
    pub fn with_normals(mut self, normals: Vec<Vector3<f64>>) -> Self {
        self.normals = Some(normals);
        self
    }
}

/// The render-side indices of one triangle.
///
/// `vertices` starts out as the geometric vertex indices and is rewritten to
/// duplicate slots where the corner's texture coordinate requires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorners {
    /// Vertex slot of each corner (original or duplicate).
    pub vertices: [u32; 3],
    /// Texture-coordinate index of each corner (zero when untextured).
    pub tex_coords: [u32; 3],
}

/// A triangle mesh ready for stripification.
#[derive(Debug, Clone)]
pub struct TexturedMesh {
    mesh: HalfEdgeMesh,
    normals: Vec<Vector3<f64>>,
    tex_coords: Vec<Point2<f64>>,
    corners: Vec<FaceCorners>,
    duplications: Vec<Duplication>,
}

impl TexturedMesh {
    /// Load importer data, building adjacency and resolving texture seams.
    ///
    /// # Example
    ///
    /// ```
    /// use stripify::model::{MeshData, TexturedMesh};
    /// use nalgebra::{Point2, Point3};
    ///
    /// let data = MeshData::new(
    ///     vec![
    ///         Point3::new(0.0, 0.0, 0.0),
    ///         Point3::new(1.0, 0.0, 0.0),
    ///         Point3::new(0.0, 1.0, 0.0),
    ///         Point3::new(1.0, 1.0, 0.0),
    ///     ],
    ///     vec![[0, 1, 2], [2, 1, 3]],
    /// )
    /// .with_tex_coords(
    ///     vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0),
    ///          Point2::new(1.0, 1.0), Point2::new(0.5, 1.0)],
    ///     vec![[0, 1, 2], [4, 1, 3]],
    /// );
    ///
    /// let model = TexturedMesh::from_data(data).unwrap();
    /// // Vertex 2 is used with two different texture coordinates.
    /// assert_eq!(model.duplications().len(), 1);
    /// assert_eq!(model.expanded_vertex_count(), 5);
    /// ```
    pub fn from_data(data: MeshData) -> Result<Self> {
        let MeshData {
            positions,
            normals,
            tex_coords,
            faces,
            face_tex_coords,
        } = data;

        let mesh = build_from_triangles(&positions, &faces)?;

        let normals = match normals {
            Some(normals) if normals.len() != positions.len() => {
                return Err(StripError::InvalidState(format!(
                    "{} normals for {} vertices",
                    normals.len(),
                    positions.len()
                )));
            }
            Some(normals) => normals,
            None => mesh.vertex_normals(),
        };

        let tex_coords = tex_coords.unwrap_or_default();
        check_index_range("tex_coords", tex_coords.len())?;
        let textured = !tex_coords.is_empty();

        let mut corners: Vec<FaceCorners> = faces
            .iter()
            .map(|face| FaceCorners {
                vertices: face.map(|v| v as u32),
                tex_coords: [0; 3],
            })
            .collect();

        let mut tracker = DuplicationTracker::new(positions.len());
        if textured {
            let face_tex_coords = face_tex_coords.ok_or_else(|| {
                StripError::InvalidState("texture coordinates without face texture indices".into())
            })?;
            if face_tex_coords.len() != faces.len() {
                return Err(StripError::InvalidState(format!(
                    "{} face texture triples for {} faces",
                    face_tex_coords.len(),
                    faces.len()
                )));
            }

            for (fi, (corner, tex)) in corners.iter_mut().zip(&face_tex_coords).enumerate() {
                if let Some(&bad) = tex.iter().find(|&&t| t >= tex_coords.len()) {
                    return Err(StripError::InvalidTexCoordIndex {
                        face: fi,
                        tex_coord: bad,
                    });
                }
                corner.tex_coords = tex.map(|t| t as u32);
                tracker.record_face(corner);
            }
        }
        let duplications = tracker.into_records();
        check_index_range("expanded vertices", positions.len() + duplications.len())?;

        log::info!(
            "loaded mesh: {} vertices, {} faces, {} duplicated vertices{}",
            mesh.num_vertices(),
            mesh.num_faces(),
            duplications.len(),
            if textured { "" } else { " (untextured)" }
        );

        Ok(Self {
            mesh,
            normals,
            tex_coords,
            corners,
            duplications,
        })
    }

    /// The half-edge topology (built from the geometric vertex indices).
    #[inline]
    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.mesh.num_faces()
    }

    /// Number of original vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.mesh.num_vertices()
    }

    /// Whether the mesh carries texture coordinates.
    #[inline]
    pub fn is_textured(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    /// The render-side corners of a face.
    #[inline]
    pub fn corners(&self, f: FaceId) -> &FaceCorners {
        &self.corners[f.index()]
    }

    /// Per-vertex normals of the original vertices.
    #[inline]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Texture coordinates (empty when untextured).
    #[inline]
    pub fn tex_coords(&self) -> &[Point2<f64>] {
        &self.tex_coords
    }

    /// Duplicate vertex slots, in slot order after the original vertices.
    #[inline]
    pub fn duplications(&self) -> &[Duplication] {
        &self.duplications
    }

    /// Size of the vertex buffer: originals plus duplicates.
    #[inline]
    pub fn expanded_vertex_count(&self) -> usize {
        self.num_vertices() + self.duplications.len()
    }
}

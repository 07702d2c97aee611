//! Half-edge mesh data structure.
//!
//! Each triangle owns three half-edges, linked in a cycle by `next`. A
//! half-edge knows the vertex it leaves and, when the edge is shared with
//! another triangle, its **twin** on that triangle. Walking `twin` from each
//! of a face's half-edges yields the faces across its three edges, which is
//! the only adjacency the strip builder needs.
//!
//! # Boundary Handling
//!
//! Boundary edges have no twin (`None`). Unlike a full DCEL we do not
//! materialize boundary half-edges or boundary loops.

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, HalfEdgeId, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex, if any face uses it.
    pub halfedge: Option<HalfEdgeId>,
}

impl Vertex {
    /// Create a new isolated vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: None,
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge originates from.
    pub origin: VertexId,

    /// The opposite half-edge on the neighbouring face.
    /// `None` on boundary (or non-manifold) edges.
    pub twin: Option<HalfEdgeId>,

    /// The next half-edge around the face.
    pub next: HalfEdgeId,

    /// The face this half-edge belongs to.
    pub face: FaceId,
}

impl HalfEdge {
    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.twin.is_none()
    }
}

/// A triangular face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// The first half-edge of this face (the edge from corner 0 to corner 1).
    pub halfedge: HalfEdgeId,
}

/// A half-edge mesh data structure for triangle meshes.
///
/// Topology is fixed once built: the stripification pass only reads it.
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex>,

    /// All half-edges in the mesh, three per face, in face order.
    pub(crate) halfedges: Vec<HalfEdge>,

    /// All faces in the mesh.
    pub(crate) faces: Vec<Face>,
}

impl HalfEdgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_faces * 3),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge, if the edge is shared.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> Option<HalfEdgeId> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.origin(self.next(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// Get the three half-edges of a face, in corner order.
    ///
    /// Slot `i` is the edge leaving corner `i`.
    pub fn face_halfedges(&self, f: FaceId) -> [HalfEdgeId; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [he0, he1, he2]
    }

    /// Get the three vertices of a triangular face.
    pub fn face_triangle(&self, f: FaceId) -> [VertexId; 3] {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Get the face across edge `slot` (0..3) of `f`, or `None` on a boundary.
    #[inline]
    pub fn face_neighbor(&self, f: FaceId, slot: usize) -> Option<FaceId> {
        let he = self.face_halfedges(f)[slot];
        self.twin(he).map(|twin| self.face_of(twin))
    }

    /// Get the faces across all three edges of `f`, in slot order.
    pub fn face_neighbors(&self, f: FaceId) -> [Option<FaceId>; 3] {
        self.face_halfedges(f)
            .map(|he| self.twin(he).map(|twin| self.face_of(twin)))
    }

    /// Count the half-edges without a twin: boundary edges plus every
    /// half-edge on a non-manifold edge.
    pub fn num_boundary_edges(&self) -> usize {
        self.halfedges.iter().filter(|he| he.is_boundary()).count()
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    // ==================== Geometry ====================

    /// Compute the area-weighted (unnormalized) normal of a face.
    pub fn face_area_normal(&self, f: FaceId) -> Vector3<f64> {
        let [v0, v1, v2] = self.face_triangle(f);
        let p0 = self.position(v0);
        let e1 = self.position(v1) - p0;
        let e2 = self.position(v2) - p0;
        e1.cross(&e2)
    }

    /// Compute a normal per vertex as the normalized, area-weighted sum of
    /// incident face normals. Unused vertices get a zero normal.
    pub fn vertex_normals(&self) -> Vec<Vector3<f64>> {
        let mut normals = vec![Vector3::zeros(); self.num_vertices()];
        for f in self.face_ids() {
            let n = self.face_area_normal(f);
            for v in self.face_triangle(f) {
                normals[v.index()] += n;
            }
        }
        for n in &mut normals {
            if let Some(unit) = n.try_normalize(f64::EPSILON) {
                *n = unit;
            }
        }
        normals
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        for (i, v) in self.vertices.iter().enumerate() {
            if let Some(he) = v.halfedge {
                if self.origin(he).index() != i {
                    return false;
                }
            }
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            let id = HalfEdgeId::new(i);

            if let Some(twin) = he.twin {
                let opposite = self.halfedge(twin);
                if opposite.twin != Some(id) {
                    return false;
                }
                // Twins lie on the same edge, in either direction.
                let mut ends = [he.origin, self.dest(id)];
                let mut twin_ends = [opposite.origin, self.dest(twin)];
                ends.sort_unstable();
                twin_ends.sort_unstable();
                if ends != twin_ends || opposite.face == he.face {
                    return false;
                }
            }

            if self.next(self.next(self.next(id))) != id {
                return false;
            }
        }

        self.faces
            .iter()
            .enumerate()
            .all(|(i, f)| self.face_of(f.halfedge).index() == i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    fn quad() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = HalfEdgeMesh::new();
        let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));

        assert_eq!(mesh.num_vertices(), 2);
        assert_eq!(v0.index(), 0);
        assert_eq!(v1.index(), 1);
        assert!(mesh.vertex(v0).halfedge.is_none());
    }

    #[test]
    fn test_face_neighbors() {
        let mesh = quad();
        let f0 = FaceId::new(0);
        let f1 = FaceId::new(1);

        // Face 0 = (0, 1, 2): only its third edge (2 -> 0) is shared.
        assert_eq!(mesh.face_neighbors(f0), [None, None, Some(f1)]);
        // Face 1 = (0, 2, 3): its first edge (0 -> 2) is shared.
        assert_eq!(mesh.face_neighbors(f1), [Some(f0), None, None]);
        assert_eq!(mesh.face_neighbor(f1, 0), Some(f0));
    }

    #[test]
    fn test_face_triangle_preserves_corner_order() {
        let mesh = quad();
        let tri = mesh.face_triangle(FaceId::new(1));
        assert_eq!(tri, [VertexId::new(0), VertexId::new(2), VertexId::new(3)]);
    }

    #[test]
    fn test_vertex_normals() {
        let mesh = quad();
        for n in mesh.vertex_normals() {
            assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_boundary_edges() {
        let mesh = quad();
        assert_eq!(mesh.num_boundary_edges(), 4);
        assert!(!mesh.halfedge(HalfEdgeId::new(2)).is_boundary());
    }
}

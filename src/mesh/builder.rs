//! Mesh construction utilities.
//!
//! This module builds half-edge meshes from face-vertex lists, the form in
//! which importers hand over triangle data.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh};
use super::index::{check_index_range, FaceId, HalfEdgeId, VertexId};
use crate::error::{StripError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// An empty face list produces a mesh with vertices but no faces; that is a
/// valid (if useless) input for stripification.
///
/// Faces are paired across an edge when exactly two faces use it, whichever
/// direction each of them runs it in. An edge shared by three or more faces
/// is non-manifold: every face on it is left without a neighbour across it,
/// as if the edge were on the boundary.
///
/// Vertex and half-edge counts must fit the `u32` index types; larger
/// inputs are rejected with [`StripError::InvalidParameter`].
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Example
/// ```
/// use stripify::mesh::{build_from_triangles, FaceId};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
///     Point3::new(1.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2], [1, 3, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.face_neighbor(FaceId::new(0), 1), Some(FaceId::new(1)));
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<HalfEdgeMesh> {
    check_index_range("vertices", vertices.len())?;
    check_index_range("half-edges", faces.len().saturating_mul(3))?;

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(StripError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(StripError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());

    let vertex_ids: Vec<VertexId> = vertices.iter().map(|&pos| mesh.add_vertex(pos)).collect();

    // Undirected edge (lo, hi) -> the half-edges running along it.
    let mut edge_map: HashMap<(usize, usize), Vec<HalfEdgeId>> =
        HashMap::with_capacity(faces.len() * 3);

    // First pass: create half-edges and faces
    for (fi, face) in faces.iter().enumerate() {
        let face_id = FaceId::new(fi);
        let base = mesh.num_halfedges();
        mesh.faces.push(Face {
            halfedge: HalfEdgeId::new(base),
        });

        for corner in 0..3 {
            let from = face[corner];
            let to = face[(corner + 1) % 3];
            let he = HalfEdgeId::new(base + corner);

            mesh.halfedges.push(HalfEdge {
                origin: vertex_ids[from],
                twin: None,
                next: HalfEdgeId::new(base + (corner + 1) % 3),
                face: face_id,
            });
            mesh.vertices[from].halfedge = Some(he);

            edge_map
                .entry((from.min(to), from.max(to)))
                .or_default()
                .push(he);
        }
    }

    // Second pass: link twins
    for (&(lo, hi), halfedges) in &edge_map {
        match halfedges.as_slice() {
            &[a, b] => {
                mesh.halfedges[a.index()].twin = Some(b);
                mesh.halfedges[b.index()].twin = Some(a);
            }
            [_] => {}
            _ => log::warn!(
                "non-manifold edge ({}, {}) shared by {} faces: leaving it unpaired",
                lo,
                hi,
                halfedges.len()
            ),
        }
    }

    Ok(mesh)
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex(mesh: &HalfEdgeMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| mesh.face_triangle(f).map(|v| v.index()))
        .collect();

    (vertices, faces)
}

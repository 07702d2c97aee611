//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation the strip builder
//! queries for face adjacency.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], an arena of vertices, half-edges and
//! faces addressed by integer index. Adjacency across an edge is a twin lookup,
//! so "which face lies across edge `i` of face `f`" is O(1).
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! ```
//! use stripify::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.is_valid());
//! ```

mod builder;
mod halfedge;
mod index;

pub use builder::{build_from_triangles, to_face_vertex};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{check_index_range, FaceId, HalfEdgeId, VertexId, MAX_INDEX_COUNT};

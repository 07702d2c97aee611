//! Procedural test meshes with texture coordinates.

use std::f64::consts::TAU;

use nalgebra::{Point2, Point3};

use stripify::model::MeshData;

/// A `size` x `size` quad grid in the XY plane, two triangles per quad.
///
/// With `seam_column = Some(c)` the quads right of column `c` use a second
/// UV chart, so the vertices on column `c` are textured twice.
pub fn grid(size: usize, seam_column: Option<usize>) -> MeshData {
    let n = size + 1;
    let scale = size.max(1) as f64;

    let mut positions = Vec::with_capacity(n * n);
    let mut tex_coords = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            positions.push(Point3::new(i as f64, j as f64, 0.0));
            tex_coords.push(Point2::new(i as f64 / scale, j as f64 / scale));
        }
    }

    // Second chart covering columns seam..=size.
    let seam = seam_column.filter(|&c| c > 0 && c < size);
    let chart_base = tex_coords.len();
    if let Some(c) = seam {
        for j in 0..n {
            for i in c..n {
                tex_coords.push(Point2::new((i - c) as f64 / scale, j as f64 / scale));
            }
        }
    }
    let tex_index = |i: usize, j: usize, right: bool| match seam {
        Some(c) if right => chart_base + j * (n - c) + (i - c),
        _ => j * n + i,
    };

    let mut faces = Vec::with_capacity(size * size * 2);
    let mut face_tex_coords = Vec::with_capacity(size * size * 2);
    for j in 0..size {
        for i in 0..size {
            let right = seam.is_some_and(|c| i >= c);
            let v = |di: usize, dj: usize| (j + dj) * n + i + di;
            let t = |di: usize, dj: usize| tex_index(i + di, j + dj, right);

            faces.push([v(0, 0), v(1, 0), v(1, 1)]);
            face_tex_coords.push([t(0, 0), t(1, 0), t(1, 1)]);
            faces.push([v(0, 0), v(1, 1), v(0, 1)]);
            face_tex_coords.push([t(0, 0), t(1, 1), t(0, 1)]);
        }
    }

    MeshData::new(positions, faces).with_tex_coords(tex_coords, face_tex_coords)
}

/// An open cylinder of `segments` around and `rings` along the axis.
///
/// The UV chart wraps once, so the first column of vertices carries both
/// `u = 0` and `u = 1`.
pub fn tube(segments: usize, rings: usize) -> MeshData {
    let mut positions = Vec::with_capacity(segments * (rings + 1));
    let mut tex_coords = Vec::with_capacity((segments + 1) * (rings + 1));

    for r in 0..=rings {
        let z = r as f64 / rings.max(1) as f64;
        for s in 0..segments {
            let angle = TAU * s as f64 / segments as f64;
            positions.push(Point3::new(angle.cos(), angle.sin(), z));
        }
        for s in 0..=segments {
            tex_coords.push(Point2::new(s as f64 / segments as f64, z));
        }
    }

    let v = |s: usize, r: usize| r * segments + s % segments;
    let t = |s: usize, r: usize| r * (segments + 1) + s;

    let mut faces = Vec::with_capacity(segments * rings * 2);
    let mut face_tex_coords = Vec::with_capacity(segments * rings * 2);
    for r in 0..rings {
        for s in 0..segments {
            faces.push([v(s, r), v(s + 1, r), v(s + 1, r + 1)]);
            face_tex_coords.push([t(s, r), t(s + 1, r), t(s + 1, r + 1)]);
            faces.push([v(s, r), v(s + 1, r + 1), v(s, r + 1)]);
            face_tex_coords.push([t(s, r), t(s + 1, r + 1), t(s, r + 1)]);
        }
    }

    MeshData::new(positions, faces).with_tex_coords(tex_coords, face_tex_coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stripify::model::TexturedMesh;

    #[test]
    fn test_grid_without_seam_has_no_duplicates() {
        let model = TexturedMesh::from_data(grid(4, None)).unwrap();
        assert_eq!(model.num_faces(), 32);
        assert!(model.duplications().is_empty());
    }

    #[test]
    fn test_grid_seam_duplicates_one_column() {
        let model = TexturedMesh::from_data(grid(4, Some(2))).unwrap();
        assert_eq!(model.duplications().len(), 5);
    }

    #[test]
    fn test_tube_wrap_seam() {
        let model = TexturedMesh::from_data(tube(8, 3)).unwrap();
        assert_eq!(model.num_vertices(), 8 * 4);
        assert_eq!(model.duplications().len(), 4);
        assert_eq!(model.mesh().num_boundary_edges(), 16);
    }
}

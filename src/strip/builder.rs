//! Greedy strip construction.
//!
//! Every face starts free with degree 3. A strip is seeded at the free face
//! of lowest degree and grown one neighbour at a time: consuming a face
//! lowers the degree of each face across its edges, and the strip continues
//! into the free, non-seam neighbour of lowest degree, taking a degree-0
//! neighbour immediately since nothing else could ever reach it.
//!
//! The initial degree is 3 for every face, boundary or not. Only consumption
//! lowers it.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::error::{Result, StripError};
use crate::mesh::FaceId;
use crate::model::TexturedMesh;
use crate::progress::Progress;

use super::adjacency::MeshAdjacency;
use super::seam::is_seam;
use super::{Strip, StripOptions, StripSet};

/// Degree every face starts with: one open slot per edge.
const INITIAL_DEGREE: u8 = 3;

/// Free faces bucketed by degree.
///
/// Each bucket is ordered by slot, so the lowest-degree face with the lowest
/// index is always the first entry of the first non-empty bucket.
#[derive(Debug)]
struct FreeFaceQueue {
    buckets: [BTreeSet<u32>; INITIAL_DEGREE as usize + 1],
}

impl FreeFaceQueue {
    fn new(len: usize) -> Self {
        let mut buckets: [BTreeSet<u32>; INITIAL_DEGREE as usize + 1] = Default::default();
        buckets[INITIAL_DEGREE as usize] = (0..len as u32).collect();
        Self { buckets }
    }

    fn first(&self) -> Option<u32> {
        self.buckets.iter().find_map(|bucket| bucket.first().copied())
    }

    fn remove(&mut self, slot: u32, degree: u8) {
        self.buckets[degree as usize].remove(&slot);
    }

    fn lower(&mut self, slot: u32, from: u8) {
        if self.buckets[from as usize].remove(&slot) {
            self.buckets[from as usize - 1].insert(slot);
        }
    }
}

/// Builds strips over one set of faces closed under adjacency.
///
/// Faces are addressed by their slot in `faces`; `slots` maps a global face
/// index back to that slot.
struct StripBuilder<'a> {
    adjacency: MeshAdjacency<'a>,
    faces: &'a [FaceId],
    slots: &'a [u32],
    free: Vec<bool>,
    degree: Vec<u8>,
    queue: FreeFaceQueue,
    max_strip_length: usize,
}

impl<'a> StripBuilder<'a> {
    fn new(
        adjacency: MeshAdjacency<'a>,
        faces: &'a [FaceId],
        slots: &'a [u32],
        max_strip_length: usize,
    ) -> Self {
        Self {
            adjacency,
            faces,
            slots,
            free: vec![true; faces.len()],
            degree: vec![INITIAL_DEGREE; faces.len()],
            queue: FreeFaceQueue::new(faces.len()),
            max_strip_length,
        }
    }

    #[inline]
    fn slot(&self, f: FaceId) -> usize {
        self.slots[f.index()] as usize
    }

    #[inline]
    fn degree_of(&self, f: FaceId) -> u8 {
        self.degree[self.slot(f)]
    }

    #[inline]
    fn is_free(&self, f: FaceId) -> bool {
        self.free[self.slot(f)]
    }

    /// The free face with the smallest degree, lowest index first.
    fn free_face(&self) -> Option<FaceId> {
        self.queue.first().map(|slot| self.faces[slot as usize])
    }

    fn consume(&mut self, f: FaceId) {
        let slot = self.slot(f);
        self.free[slot] = false;
        self.queue.remove(slot as u32, self.degree[slot]);

        for neighbor in self.adjacency.neighbors(f).into_iter().flatten() {
            let n = self.slot(neighbor);
            let d = self.degree[n];
            debug_assert!(d > 0, "degree of {:?} would drop below zero", neighbor);
            if d == 0 {
                continue;
            }
            if self.free[n] {
                self.queue.lower(n as u32, d);
            }
            self.degree[n] = d - 1;
        }
    }

    /// Pick the face to continue the strip with after `current`.
    fn next_face(&self, current: FaceId) -> Option<FaceId> {
        // A face whose own slots are all closed does not continue.
        if self.degree_of(current) == 0 {
            return None;
        }

        let mut selected: Option<FaceId> = None;
        for neighbor in self.adjacency.neighbors(current).into_iter().flatten() {
            if !self.is_free(neighbor) || is_seam(&self.adjacency, current, neighbor) {
                continue;
            }
            let degree = self.degree_of(neighbor);
            if degree == 0 {
                return Some(neighbor);
            }
            match selected {
                Some(best) if self.degree_of(best) <= degree => {}
                _ => selected = Some(neighbor),
            }
        }
        selected
    }

    fn grow(&mut self, seed: FaceId) -> Strip {
        let mut faces = Vec::new();
        let mut current = Some(seed);

        while let Some(face) = current {
            if faces.len() >= self.max_strip_length {
                break;
            }
            faces.push(face);
            self.consume(face);
            current = self.next_face(face);
        }

        Strip::new(faces)
    }

    fn run(mut self, consumed: &AtomicUsize, total: usize, progress: &Progress) -> Vec<Strip> {
        let mut strips = Vec::new();
        while let Some(seed) = self.free_face() {
            let strip = self.grow(seed);
            let done = consumed.fetch_add(strip.len(), Ordering::Relaxed) + strip.len();
            progress.report(done, total, "Building strips");
            strips.push(strip);
        }
        strips
    }
}

/// Group faces into edge-connected components.
///
/// Components are ordered by their lowest face index and list their faces in
/// ascending order. Also returns each face's slot within its component.
fn connected_components(adjacency: &MeshAdjacency<'_>) -> (Vec<Vec<FaceId>>, Vec<u32>) {
    const UNVISITED: u32 = u32::MAX;

    let n = adjacency.num_faces();
    let mut component_of = vec![UNVISITED; n];
    let mut components: Vec<Vec<FaceId>> = Vec::new();

    for start in 0..n {
        if component_of[start] != UNVISITED {
            continue;
        }
        let id = components.len() as u32;
        let mut members = vec![FaceId::new(start)];
        component_of[start] = id;

        let mut cursor = 0;
        while cursor < members.len() {
            let f = members[cursor];
            cursor += 1;
            for neighbor in adjacency.neighbors(f).into_iter().flatten() {
                if component_of[neighbor.index()] == UNVISITED {
                    component_of[neighbor.index()] = id;
                    members.push(neighbor);
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    let mut slots = vec![0u32; n];
    for members in &components {
        for (slot, f) in members.iter().enumerate() {
            slots[f.index()] = slot as u32;
        }
    }

    (components, slots)
}

/// Partition every face of `model` into strips.
///
/// Each face ends up in exactly one strip, and every strip holds between 1
/// and `options.max_strip_length` faces. With `options.parallel` the faces
/// are split into edge-connected components that are stripified on the rayon
/// pool; each component yields the same strips as a sequential run, and the
/// output lists them component by component.
///
/// # Example
///
/// ```
/// use stripify::model::{MeshData, TexturedMesh};
/// use stripify::strip::{build_strips, StripOptions};
/// use stripify::Progress;
/// use nalgebra::Point3;
///
/// let data = MeshData::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2], [1, 3, 2]],
/// );
/// let model = TexturedMesh::from_data(data).unwrap();
///
/// let strips = build_strips(&model, &StripOptions::default(), &Progress::none()).unwrap();
/// assert_eq!(strips.len(), 1);
/// assert_eq!(strips.num_faces(), 2);
/// ```
pub fn build_strips(
    model: &TexturedMesh,
    options: &StripOptions,
    progress: &Progress,
) -> Result<StripSet> {
    options.validate()?;

    let adjacency = MeshAdjacency::new(model);
    let total = adjacency.num_faces();
    let consumed = AtomicUsize::new(0);

    let strips: Vec<Strip> = if options.parallel {
        let (components, slots) = connected_components(&adjacency);
        log::debug!("stripifying {} components in parallel", components.len());

        components
            .par_iter()
            .map(|faces| {
                StripBuilder::new(adjacency, faces, &slots, options.max_strip_length).run(
                    &consumed,
                    total,
                    progress,
                )
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    } else {
        let faces: Vec<FaceId> = (0..total).map(FaceId::new).collect();
        let slots: Vec<u32> = (0..total as u32).collect();
        StripBuilder::new(adjacency, &faces, &slots, options.max_strip_length).run(
            &consumed,
            total,
            progress,
        )
    };

    if consumed.load(Ordering::Relaxed) != total {
        return Err(StripError::InvalidState(format!(
            "strips cover {} of {} faces",
            consumed.load(Ordering::Relaxed),
            total
        )));
    }

    let set = StripSet::new(strips);
    log::info!(
        "{} strips created ({} faces, {} single-triangle strips)",
        set.len(),
        set.num_faces(),
        set.singletons()
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MeshData;
    use nalgebra::{Point2, Point3};

    fn model(positions: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> TexturedMesh {
        TexturedMesh::from_data(MeshData::new(positions, faces)).unwrap()
    }

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        (
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [2, 1, 3]],
        )
    }

    /// A `rows` x `cols` grid of quads, each split into two triangles.
    fn grid(rows: usize, cols: usize) -> TexturedMesh {
        let mut positions = Vec::new();
        for j in 0..=rows {
            for i in 0..=cols {
                positions.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for j in 0..rows {
            for i in 0..cols {
                let v00 = j * (cols + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + cols + 1;
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        model(positions, faces)
    }

    /// A `size` x `size` textured grid whose quads from column `seam` on
    /// use a second UV chart, so every edge on that column is a seam.
    fn charted_grid(size: usize, seam: usize) -> TexturedMesh {
        let n = size + 1;
        let mut positions = Vec::new();
        let mut tex_coords = Vec::new();
        for j in 0..n {
            for i in 0..n {
                positions.push(Point3::new(i as f64, j as f64, 0.0));
                tex_coords.push(Point2::new(i as f64, j as f64));
            }
        }
        // Second chart: same layout, shifted past the first.
        let chart = tex_coords.len();
        for j in 0..n {
            for i in 0..n {
                tex_coords.push(Point2::new(i as f64 + 0.5, j as f64));
            }
        }

        let mut faces = Vec::new();
        let mut face_tex_coords = Vec::new();
        for j in 0..size {
            for i in 0..size {
                let v00 = j * n + i;
                let v10 = v00 + 1;
                let v01 = v00 + n;
                let v11 = v01 + 1;
                let offset = if i >= seam { chart } else { 0 };
                for face in [[v00, v10, v11], [v00, v11, v01]] {
                    faces.push(face);
                    face_tex_coords.push(face.map(|v| v + offset));
                }
            }
        }

        let data = MeshData::new(positions, faces).with_tex_coords(tex_coords, face_tex_coords);
        TexturedMesh::from_data(data).unwrap()
    }

    fn sequential() -> StripOptions {
        StripOptions::default().sequential()
    }

    fn assert_partition(set: &StripSet, num_faces: usize) {
        let mut seen = vec![0usize; num_faces];
        for strip in set.iter() {
            for f in strip.faces() {
                seen[f.index()] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1), "coverage: {:?}", seen);
    }

    #[test]
    fn test_single_triangle() {
        let (positions, _) = two_triangles();
        let model = model(positions, vec![[0, 1, 2]]);
        let set = build_strips(&model, &sequential(), &Progress::none()).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.strips()[0].faces(), &[FaceId::new(0)]);
    }

    #[test]
    fn test_two_triangles_form_one_strip() {
        let (positions, faces) = two_triangles();
        let model = model(positions, faces);
        let set = build_strips(&model, &sequential(), &Progress::none()).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.strips()[0].faces(), &[FaceId::new(0), FaceId::new(1)]);
    }

    #[test]
    fn test_seam_splits_strip() {
        let (positions, faces) = two_triangles();
        // Both shared vertices (1 and 2) change UV across the edge.
        let data = MeshData::new(positions, faces)
            .with_tex_coords(vec![Point2::new(0.0, 0.0); 6], vec![[0, 1, 2], [5, 4, 3]]);
        let model = TexturedMesh::from_data(data).unwrap();
        let set = build_strips(&model, &sequential(), &Progress::none()).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn test_strips_never_cross_a_seam_column() {
        let (size, seam) = (6, 3);
        let model = charted_grid(size, seam);
        let adjacency = MeshAdjacency::new(&model);
        assert_eq!(model.duplications().len(), size + 1);

        // The seam column really does separate the two charts.
        let crossing = model.mesh().face_ids().any(|f| {
            adjacency
                .neighbors(f)
                .into_iter()
                .flatten()
                .any(|g| is_seam(&adjacency, f, g))
        });
        assert!(crossing);

        let right_side = |f: FaceId| (f.index() / 2) % size >= seam;
        for options in [
            sequential(),
            sequential().with_max_strip_length(4),
            StripOptions::default().with_parallel(true),
        ] {
            let set = build_strips(&model, &options, &Progress::none()).unwrap();
            assert_partition(&set, model.num_faces());
            assert!(set.len() > 1);

            for strip in set.iter() {
                for pair in strip.faces().windows(2) {
                    assert!(!is_seam(&adjacency, pair[0], pair[1]), "{:?} crosses a seam", pair);
                }
                let side = right_side(strip.faces()[0]);
                assert!(strip.faces().iter().all(|&f| right_side(f) == side));
            }

            let out = crate::strip::linearize(&model, &set).unwrap();
            assert_eq!(out.ranges.len(), set.len());
        }
    }

    #[test]
    fn test_empty_mesh() {
        let model = model(Vec::new(), Vec::new());
        let set = build_strips(&model, &sequential(), &Progress::none()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_zero_max_length_rejected() {
        let (positions, faces) = two_triangles();
        let model = model(positions, faces);
        let options = StripOptions::default().with_max_strip_length(0);
        assert!(matches!(
            build_strips(&model, &options, &Progress::none()),
            Err(StripError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_grid_partition_and_length_bound() {
        let model = grid(6, 7);
        for max in [1, 2, 5, 500] {
            let options = sequential().with_max_strip_length(max);
            let set = build_strips(&model, &options, &Progress::none()).unwrap();

            assert_partition(&set, model.num_faces());
            assert!(set.iter().all(|s| (1..=max).contains(&s.len())));
        }
    }

    #[test]
    fn test_max_length_one_gives_singletons() {
        let model = grid(2, 2);
        let options = sequential().with_max_strip_length(1);
        let set = build_strips(&model, &options, &Progress::none()).unwrap();
        assert_eq!(set.len(), model.num_faces());
        assert_eq!(set.singletons(), model.num_faces());
    }

    #[test]
    fn test_consecutive_faces_are_adjacent() {
        let model = grid(5, 5);
        let set = build_strips(&model, &sequential(), &Progress::none()).unwrap();
        for strip in set.iter() {
            for pair in strip.faces().windows(2) {
                let neighbors = model.mesh().face_neighbors(pair[0]);
                assert!(neighbors.contains(&Some(pair[1])), "{:?} not adjacent", pair);
            }
        }
    }

    #[test]
    fn test_degrees_stay_bounded_and_never_increase() {
        let model = grid(4, 4);
        let adjacency = MeshAdjacency::new(&model);
        let faces: Vec<FaceId> = model.mesh().face_ids().collect();
        let slots: Vec<u32> = (0..faces.len() as u32).collect();
        let mut builder = StripBuilder::new(adjacency, &faces, &slots, 500);

        let mut previous = builder.degree.clone();
        while let Some(seed) = builder.free_face() {
            builder.grow(seed);
            for (before, after) in previous.iter().zip(&builder.degree) {
                assert!(*after <= INITIAL_DEGREE);
                assert!(after <= before);
            }
            previous = builder.degree.clone();
        }
        assert!(builder.free.iter().all(|free| !free));
    }

    #[test]
    fn test_seed_prefers_lowest_degree_then_lowest_index() {
        let model = grid(2, 2);
        let adjacency = MeshAdjacency::new(&model);
        let faces: Vec<FaceId> = model.mesh().face_ids().collect();
        let slots: Vec<u32> = (0..faces.len() as u32).collect();
        let mut builder = StripBuilder::new(adjacency, &faces, &slots, 1);

        // All degrees equal: the first face wins.
        assert_eq!(builder.free_face(), Some(FaceId::new(0)));

        builder.grow(FaceId::new(0));
        // Neighbours of face 0 dropped to degree 2; the lowest-indexed one is next.
        let lowest = model
            .mesh()
            .face_neighbors(FaceId::new(0))
            .into_iter()
            .flatten()
            .min();
        assert_eq!(builder.free_face(), lowest);
    }

    #[test]
    fn test_parallel_matches_sequential_per_component() {
        // Two disjoint grids side by side.
        let a = grid(3, 4);
        let (mut positions, mut faces) = crate::mesh::to_face_vertex(a.mesh());
        let offset = positions.len();
        let (more_positions, more_faces) = crate::mesh::to_face_vertex(grid(2, 3).mesh());
        positions.extend(more_positions.iter().map(|p| p + nalgebra::Vector3::new(10.0, 0.0, 0.0)));
        faces.extend(more_faces.iter().map(|f| f.map(|v| v + offset)));
        let model = model(positions, faces);

        let seq = build_strips(&model, &sequential(), &Progress::none()).unwrap();
        let par = build_strips(
            &model,
            &StripOptions::default().with_parallel(true),
            &Progress::none(),
        )
        .unwrap();

        assert_partition(&par, model.num_faces());
        let mut seq_strips: Vec<_> = seq.iter().map(|s| s.faces().to_vec()).collect();
        let mut par_strips: Vec<_> = par.iter().map(|s| s.faces().to_vec()).collect();
        seq_strips.sort();
        par_strips.sort();
        assert_eq!(seq_strips, par_strips);
    }

    #[test]
    fn test_progress_reaches_total() {
        let model = grid(3, 3);
        let last = std::sync::Arc::new(AtomicUsize::new(0));
        let sink = std::sync::Arc::clone(&last);
        let progress = Progress::new(move |current, _, _| {
            sink.fetch_max(current, Ordering::Relaxed);
        });

        build_strips(&model, &sequential(), &progress).unwrap();
        assert_eq!(last.load(Ordering::Relaxed), model.num_faces());
    }
}

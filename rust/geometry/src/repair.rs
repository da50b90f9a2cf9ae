// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh repair
//!
//! Brings a non-manifold mesh close enough to a closed, outward-oriented
//! solid for the boolean engines to accept it. The passes run in a fixed
//! order: hole filling (T-junction cracks are stitched first), duplicate-face
//! removal, degenerate-face removal, vertex merging and normal fixing.

use crate::mesh::Mesh;
use crate::triangulation::triangulate_loop;
use nalgebra::Point3;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::{debug, warn};

type VertexKey = (i64, i64, i64);

/// Crack stitching stops after this many passes even if splits remain
const MAX_STITCH_PASSES: usize = 8;

/// Tunables for [`repair_with`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepairParams {
    /// Vertices closer than this are considered the same point
    pub weld_epsilon: f64,
    /// Faces with less area than this are dropped
    pub degenerate_area: f64,
    /// Boundary loops longer than this are left open
    pub max_hole_edges: usize,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            weld_epsilon: 1e-6,
            degenerate_area: 1e-12,
            max_hole_edges: 1024,
        }
    }
}

/// What a repair run changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Faces split to close T-junction cracks
    pub cracks_stitched: usize,
    pub holes_filled: usize,
    pub duplicate_faces_removed: usize,
    pub degenerate_faces_removed: usize,
    pub vertices_merged: usize,
    pub faces_flipped: usize,
    /// Whether the result is a closed, consistently oriented manifold
    pub watertight: bool,
}

impl RepairReport {
    pub fn had_changes(&self) -> bool {
        self.cracks_stitched > 0
            || self.holes_filled > 0
            || self.duplicate_faces_removed > 0
            || self.degenerate_faces_removed > 0
            || self.vertices_merged > 0
            || self.faces_flipped > 0
    }
}

/// Repair a mesh with default parameters
pub fn repair(mesh: Mesh) -> (Mesh, RepairReport) {
    repair_with(mesh, &RepairParams::default())
}

/// Repair a mesh
///
/// Takes ownership and hands back the repaired mesh; callers that must keep
/// the input clone it first. Never fails: a repair that does not converge
/// reports `watertight: false`.
pub fn repair_with(mut mesh: Mesh, params: &RepairParams) -> (Mesh, RepairReport) {
    let mut report = RepairReport {
        cracks_stitched: stitch_cracks(&mut mesh, params),
        holes_filled: fill_holes(&mut mesh, params),
        duplicate_faces_removed: remove_duplicate_faces(&mut mesh, params.weld_epsilon),
        degenerate_faces_removed: remove_degenerate_faces(&mut mesh, params.degenerate_area),
        vertices_merged: merge_vertices(&mut mesh, params.weld_epsilon),
        faces_flipped: fix_normals(&mut mesh),
        watertight: false,
    };
    report.watertight = mesh.is_watertight();

    if report.watertight {
        debug!(?report, "Mesh repair converged");
    } else {
        warn!(
            cracks_stitched = report.cracks_stitched,
            holes_filled = report.holes_filled,
            vertices_merged = report.vertices_merged,
            "Mesh repair did not produce a watertight mesh"
        );
    }

    (mesh, report)
}

#[inline]
fn quantize(p: &Point3<f64>, cell: f64) -> VertexKey {
    (
        (p.x / cell).round() as i64,
        (p.y / cell).round() as i64,
        (p.z / cell).round() as i64,
    )
}

/// Map every vertex to the first vertex sharing its quantized position
fn canonical_indices(mesh: &Mesh, cell: f64) -> Vec<u32> {
    let mut first: FxHashMap<VertexKey, u32> = FxHashMap::default();
    mesh.vertices()
        .enumerate()
        .map(|(i, p)| *first.entry(quantize(&p, cell)).or_insert(i as u32))
        .collect()
}

/// Split faces whose boundary edge passes through other boundary vertices
///
/// Boolean output often leaves T-junctions: one side of a seam is a single
/// long edge, the other a chain of shorter ones, so neither side finds its
/// partner. Each such face becomes a fan over the chain. Indices are first
/// rewritten to position-welded vertices, and faces below the degenerate area
/// are treated as already gone. Returns the number of faces split.
pub fn stitch_cracks(mesh: &mut Mesh, params: &RepairParams) -> usize {
    if mesh.is_empty() {
        return 0;
    }

    let epsilon = params.weld_epsilon;
    let canon = canonical_indices(mesh, epsilon);
    for index in mesh.indices.iter_mut() {
        *index = canon[*index as usize];
    }

    let mut split = 0;
    for _ in 0..MAX_STITCH_PASSES {
        let pass = split_boundary_edges(mesh, epsilon, params.degenerate_area);
        if pass == 0 {
            break;
        }
        split += pass;
    }

    if split > 0 {
        debug!(faces_split = split, "Stitched T-junction cracks");
    }
    split
}

/// One stitching pass; each face splits at most one edge
fn split_boundary_edges(mesh: &mut Mesh, epsilon: f64, min_area: f64) -> usize {
    let live: Vec<bool> = mesh
        .indices
        .chunks_exact(3)
        .zip(mesh.triangles())
        .map(|(t, tri)| {
            t[0] != t[1] && t[1] != t[2] && t[0] != t[2] && !tri.is_degenerate(min_area)
        })
        .collect();

    let mut uses: FxHashMap<(u32, u32), u32> = FxHashMap::default();
    for (tri, _) in mesh.indices.chunks_exact(3).zip(&live).filter(|(_, &l)| l) {
        let [a, b, c] = [tri[0], tri[1], tri[2]];
        for (u, v) in [(a, b), (b, c), (c, a)] {
            *uses.entry((u.min(v), u.max(v))).or_insert(0) += 1;
        }
    }

    // Boundary vertices sorted by x for range lookups
    let rim_ids: FxHashSet<u32> = uses
        .iter()
        .filter(|(_, &n)| n == 1)
        .flat_map(|(&(u, v), _)| [u, v])
        .collect();
    if rim_ids.is_empty() {
        return 0;
    }
    let mut rim: Vec<(f64, u32)> = rim_ids
        .into_iter()
        .map(|i| (mesh.vertex(i as usize).x, i))
        .collect();
    rim.sort_by(|a, b| a.0.total_cmp(&b.0));

    let is_boundary = |u: u32, v: u32| uses.get(&(u.min(v), u.max(v))) == Some(&1);

    let mut indices = Vec::with_capacity(mesh.indices.len());
    let mut split = 0;
    for (tri, &alive) in mesh.indices.chunks_exact(3).zip(&live) {
        let tri = [tri[0], tri[1], tri[2]];
        let fan = if alive {
            split_face(mesh, tri, &rim, &is_boundary, epsilon)
        } else {
            None
        };
        match fan {
            Some(fan) => {
                indices.extend(fan);
                split += 1;
            }
            None => indices.extend_from_slice(&tri),
        }
    }

    mesh.indices = indices;
    split
}

/// Fan of faces replacing `tri`, if one of its boundary edges carries vertices
fn split_face(
    mesh: &Mesh,
    tri: [u32; 3],
    rim: &[(f64, u32)],
    is_boundary: &impl Fn(u32, u32) -> bool,
    epsilon: f64,
) -> Option<Vec<u32>> {
    for k in 0..3 {
        let (a, b, c) = (tri[k], tri[(k + 1) % 3], tri[(k + 2) % 3]);
        if !is_boundary(a, b) {
            continue;
        }

        let chain = vertices_on_edge(mesh, a, b, c, rim, epsilon);
        if chain.is_empty() {
            continue;
        }

        let mut fan = Vec::with_capacity((chain.len() + 1) * 3);
        let mut prev = a;
        for v in chain.into_iter().chain(std::iter::once(b)) {
            fan.extend_from_slice(&[prev, v, c]);
            prev = v;
        }
        return Some(fan);
    }

    None
}

/// Rim vertices strictly inside segment `a`-`b`, ordered from `a`
fn vertices_on_edge(
    mesh: &Mesh,
    a: u32,
    b: u32,
    c: u32,
    rim: &[(f64, u32)],
    epsilon: f64,
) -> SmallVec<[u32; 4]> {
    let pa = mesh.vertex(a as usize);
    let pb = mesh.vertex(b as usize);
    let d = pb - pa;
    let length = d.norm();
    if length <= 2.0 * epsilon {
        return SmallVec::new();
    }

    let lo = pa.x.min(pb.x) - epsilon;
    let hi = pa.x.max(pb.x) + epsilon;
    let start = rim.partition_point(|&(x, _)| x < lo);

    let mut hits: SmallVec<[(f64, u32); 4]> = rim[start..]
        .iter()
        .take_while(|&&(x, _)| x <= hi)
        .filter(|&&(_, v)| v != a && v != b && v != c)
        .filter_map(|&(_, v)| {
            let p = mesh.vertex(v as usize);
            let along = (p - pa).dot(&d) / length;
            if along <= epsilon || along >= length - epsilon {
                return None;
            }
            let off = (pa + d * (along / length) - p).norm();
            (off < epsilon).then_some((along, v))
        })
        .collect();

    hits.sort_by(|x, y| x.0.total_cmp(&y.0));
    hits.into_iter().map(|(_, v)| v).collect()
}

/// Close boundary loops with ear-clipped patches
///
/// Boundaries are found on position-welded edges so a triangle soup with
/// duplicated vertices is not mistaken for one big hole. Returns the number
/// of loops closed.
pub fn fill_holes(mesh: &mut Mesh, params: &RepairParams) -> usize {
    if mesh.is_empty() {
        return 0;
    }

    let canon = canonical_indices(mesh, params.weld_epsilon);

    // Undirected edge -> (use count, orientation of first use)
    let mut edges: FxHashMap<(u32, u32), (u32, (u32, u32))> = FxHashMap::default();
    let mut order: Vec<(u32, u32)> = Vec::new();
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| canon[i as usize]);
        if a == b || b == c || a == c {
            continue;
        }
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let key = (u.min(v), u.max(v));
            let entry = edges.entry(key).or_insert_with(|| {
                order.push(key);
                (0, (u, v))
            });
            entry.0 += 1;
        }
    }

    // Boundary half-edges, walked in face direction
    let mut next: FxHashMap<u32, u32> = FxHashMap::default();
    let mut starts: Vec<u32> = Vec::new();
    for key in &order {
        if let Some(&(1, (u, v))) = edges.get(key) {
            next.entry(u).or_insert(v);
            starts.push(u);
        }
    }

    if starts.is_empty() {
        return 0;
    }
    debug!(boundary_edges = starts.len(), "Detected open boundary");

    let mut visited: FxHashSet<u32> = FxHashSet::default();
    let mut filled = 0;

    for start in starts {
        if visited.contains(&start) {
            continue;
        }

        let mut boundary = Vec::new();
        let mut current = start;
        let closed = loop {
            visited.insert(current);
            boundary.push(current);
            if boundary.len() > params.max_hole_edges {
                break false;
            }
            match next.get(&current) {
                Some(&n) if n == start => break true,
                Some(&n) if !visited.contains(&n) => current = n,
                _ => break false,
            }
        };

        if !closed || boundary.len() < 3 {
            debug!(vertices = boundary.len(), "Skipping open or oversized boundary");
            continue;
        }

        // Patch must run against the boundary's face direction
        boundary.reverse();
        let points: Vec<Point3<f64>> = boundary.iter().map(|&i| mesh.vertex(i as usize)).collect();

        match triangulate_loop(&points) {
            Ok(triangles) => {
                for [a, b, c] in triangles {
                    mesh.add_triangle(boundary[a], boundary[b], boundary[c]);
                }
                filled += 1;
            }
            Err(e) => warn!(error = %e, vertices = boundary.len(), "Could not fill hole"),
        }
    }

    filled
}

/// Remove faces that repeat another face's vertex positions
///
/// Returns the number of faces removed.
pub fn remove_duplicate_faces(mesh: &mut Mesh, epsilon: f64) -> usize {
    let canon = canonical_indices(mesh, epsilon);
    let before = mesh.triangle_count();

    let mut seen: FxHashSet<[u32; 3]> = FxHashSet::default();
    let mut kept = Vec::with_capacity(mesh.indices.len());
    for tri in mesh.indices.chunks_exact(3) {
        let mut key = [tri[0], tri[1], tri[2]].map(|i| canon[i as usize]);
        key.sort_unstable();
        if seen.insert(key) {
            kept.extend_from_slice(tri);
        }
    }

    mesh.indices = kept;
    before - mesh.triangle_count()
}

/// Remove faces with (near) zero area
///
/// Returns the number of faces removed.
pub fn remove_degenerate_faces(mesh: &mut Mesh, min_area: f64) -> usize {
    let before = mesh.triangle_count();
    let keep: Vec<bool> = mesh.triangles().map(|t| !t.is_degenerate(min_area)).collect();

    let mut kept = Vec::with_capacity(mesh.indices.len());
    for (tri, keep) in mesh.indices.chunks_exact(3).zip(keep) {
        if keep {
            kept.extend_from_slice(tri);
        }
    }

    mesh.indices = kept;
    before - mesh.triangle_count()
}

/// Weld vertices closer than `epsilon` and drop unreferenced ones
///
/// Uses a spatial hash with a 3x3x3 neighbourhood search. Faces collapsed by
/// welding are removed. Returns the number of vertices merged away.
pub fn merge_vertices(mesh: &mut Mesh, epsilon: f64) -> usize {
    let count = mesh.vertex_count();
    if count == 0 {
        return 0;
    }

    let cell_size = epsilon * 2.0;
    let cell_of = |p: &Point3<f64>| {
        (
            (p.x / cell_size).floor() as i64,
            (p.y / cell_size).floor() as i64,
            (p.z / cell_size).floor() as i64,
        )
    };

    let mut spatial_hash: FxHashMap<VertexKey, SmallVec<[u32; 4]>> = FxHashMap::default();
    for (idx, p) in mesh.vertices().enumerate() {
        spatial_hash.entry(cell_of(&p)).or_default().push(idx as u32);
    }

    let mut remap: Vec<u32> = (0..count as u32).collect();
    for idx in 0..count {
        if remap[idx] != idx as u32 {
            continue;
        }
        let p = mesh.vertex(idx);
        let cell = cell_of(&p);

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = spatial_hash.get(&(cell.0 + dx, cell.1 + dy, cell.2 + dz))
                    else {
                        continue;
                    };
                    for &other in candidates {
                        let o = other as usize;
                        if o <= idx || remap[o] != other {
                            continue;
                        }
                        if (mesh.vertex(o) - p).norm() < epsilon {
                            remap[o] = idx as u32;
                        }
                    }
                }
            }
        }
    }

    for index in mesh.indices.iter_mut() {
        *index = remap[*index as usize];
    }

    let mut kept = Vec::with_capacity(mesh.indices.len());
    for tri in mesh.indices.chunks_exact(3) {
        if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
            kept.extend_from_slice(tri);
        }
    }
    mesh.indices = kept;

    compact(mesh);
    count - mesh.vertex_count()
}

/// Drop vertices no face references, preserving order
fn compact(mesh: &mut Mesh) {
    let mut new_index = vec![u32::MAX; mesh.vertex_count()];
    let mut positions = Vec::with_capacity(mesh.positions.len());
    let mut next = 0u32;

    for index in mesh.indices.iter_mut() {
        let old = *index as usize;
        if new_index[old] == u32::MAX {
            new_index[old] = next;
            next += 1;
            positions.extend_from_slice(&mesh.positions[old * 3..old * 3 + 3]);
        }
        *index = new_index[old];
    }

    mesh.positions = positions;
}

/// Make winding consistent across each connected component, then orient
/// every closed component outward (positive signed volume)
///
/// Open components keep the orientation of their seed face; their signed
/// volume says nothing about which side is out.
/// Expects welded vertices. Returns the number of faces whose winding changed.
pub fn fix_normals(mesh: &mut Mesh) -> usize {
    let face_count = mesh.triangle_count();
    if face_count == 0 {
        return 0;
    }

    let mut faces: Vec<[u32; 3]> = mesh
        .indices
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect();

    let mut edge_faces: FxHashMap<(u32, u32), SmallVec<[usize; 2]>> = FxHashMap::default();
    for (f, tri) in faces.iter().enumerate() {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            edge_faces.entry((a.min(b), a.max(b))).or_default().push(f);
        }
    }

    let has_directed = |tri: &[u32; 3], a: u32, b: u32| {
        (tri[0] == a && tri[1] == b) || (tri[1] == a && tri[2] == b) || (tri[2] == a && tri[0] == b)
    };

    let mut flipped = vec![false; face_count];
    let mut component = vec![usize::MAX; face_count];
    let mut closed: Vec<bool> = Vec::new();
    let mut components = 0;

    for seed in 0..face_count {
        if component[seed] != usize::MAX {
            continue;
        }
        component[seed] = components;
        closed.push(true);
        let mut queue = VecDeque::from([seed]);

        while let Some(f) = queue.pop_front() {
            let tri = faces[f];
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let Some(neighbours) = edge_faces.get(&(a.min(b), a.max(b))) else {
                    continue;
                };
                // Only manifold edges carry orientation information
                if neighbours.len() != 2 {
                    closed[components] = false;
                    continue;
                }
                for &g in neighbours {
                    if g == f || component[g] != usize::MAX {
                        continue;
                    }
                    if has_directed(&faces[g], a, b) {
                        faces[g].swap(1, 2);
                        flipped[g] = !flipped[g];
                    }
                    component[g] = components;
                    queue.push_back(g);
                }
            }
        }
        components += 1;
    }

    let mut volumes = vec![0.0f64; components];
    for (f, tri) in faces.iter().enumerate() {
        let [p0, p1, p2] = tri.map(|i| mesh.vertex(i as usize).coords);
        volumes[component[f]] += p0.dot(&p1.cross(&p2));
    }

    for (f, tri) in faces.iter_mut().enumerate() {
        let c = component[f];
        if closed[c] && volumes[c] < 0.0 {
            tri.swap(1, 2);
            flipped[f] = !flipped[f];
        }
    }

    mesh.indices = faces.into_iter().flatten().collect();
    flipped.into_iter().filter(|&f| f).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_mesh;
    use approx::assert_relative_eq;

    fn unit_box() -> Mesh {
        box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    /// Same box with every face owning its own three vertices
    fn soup(mesh: &Mesh) -> Mesh {
        let mut out = Mesh::new();
        for tri in mesh.triangles() {
            out.push_triangle(&tri);
        }
        out
    }

    #[test]
    fn test_repair_leaves_closed_mesh_alone() {
        let (mesh, report) = repair(unit_box());
        assert!(report.watertight);
        assert!(!report.had_changes());
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_merge_vertices_welds_soup() {
        let mut mesh = soup(&unit_box());
        assert_eq!(mesh.vertex_count(), 36);
        assert!(!mesh.is_watertight());

        let merged = merge_vertices(&mut mesh, 1e-6);
        assert_eq!(merged, 28);
        assert_eq!(mesh.vertex_count(), 8);
        assert!(mesh.is_watertight());
    }

    #[test]
    fn test_fill_hole_closes_missing_face() {
        let mut mesh = unit_box();
        // Drop the +Z face (triangles 2 and 3)
        mesh.indices.drain(6..12);
        assert!(!mesh.is_watertight());

        let (mesh, report) = repair(mesh);
        assert_eq!(report.holes_filled, 1);
        assert!(report.watertight);
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duplicate_and_degenerate_faces_removed() {
        let mut mesh = unit_box();
        let dup = mesh.indices[0..3].to_vec();
        mesh.indices.extend_from_slice(&dup);
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(0.5, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_triangle(a, b, c);

        let (mesh, report) = repair(mesh);
        assert_eq!(report.duplicate_faces_removed, 1);
        assert_eq!(report.degenerate_faces_removed, 1);
        assert!(report.watertight);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_fix_normals_restores_outward_winding() {
        let mut mesh = unit_box();
        mesh.indices.swap(1, 2);
        assert!(!mesh.is_watertight());

        let flipped = fix_normals(&mut mesh);
        assert_eq!(flipped, 1);
        assert!(mesh.is_watertight());
        assert!(mesh.volume() > 0.0);
    }

    #[test]
    fn test_fix_normals_turns_inside_out_mesh() {
        let mut mesh = unit_box();
        mesh.flip();
        let flipped = fix_normals(&mut mesh);
        assert_eq!(flipped, 12);
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1e-12);
    }

    /// Unit box whose top face has an extra vertex on its +Y edge that the
    /// +Y side face does not share
    fn t_junction_box() -> Mesh {
        let mut mesh = unit_box();
        // Drop the +Z face (triangles 2 and 3) and rebuild it with a midpoint
        mesh.indices.drain(6..12);
        let m = mesh.add_vertex(Point3::new(0.5, 1.0, 1.0));
        mesh.add_triangle(4, 5, 6);
        mesh.add_triangle(4, 6, m);
        mesh.add_triangle(4, m, 7);
        mesh
    }

    #[test]
    fn test_stitch_closes_t_junction() {
        let mut mesh = t_junction_box();
        assert!(!mesh.is_watertight());

        let split = stitch_cracks(&mut mesh, &RepairParams::default());
        assert_eq!(split, 1);
        assert!(mesh.is_watertight());
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_repair_stitches_before_filling() {
        let (mesh, report) = repair(t_junction_box());
        assert_eq!(report.cracks_stitched, 1);
        assert_eq!(report.holes_filled, 0);
        assert!(report.watertight);
        assert!(report.had_changes());
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stitch_sees_through_sliver() {
        // Split the first -Y triangle at the midpoint of its bottom edge, and
        // paper over the resulting crack with a zero-area face
        let mut mesh = unit_box();
        assert_eq!(&mesh.indices[24..27], &[0, 1, 5]);
        mesh.indices.drain(24..27);
        let m = mesh.add_vertex(Point3::new(0.5, 0.0, 0.0));
        mesh.add_triangle(0, m, 5);
        mesh.add_triangle(m, 1, 5);
        mesh.add_triangle(0, 1, m);
        assert!(mesh.is_watertight());

        let (mesh, report) = repair(mesh);
        assert_eq!(report.cracks_stitched, 1);
        assert_eq!(report.degenerate_faces_removed, 1);
        assert!(report.watertight);
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stitch_ignores_plain_hole() {
        let mut mesh = unit_box();
        mesh.indices.drain(6..12);
        assert_eq!(stitch_cracks(&mut mesh, &RepairParams::default()), 0);
    }

    #[test]
    fn test_repair_soup_with_hole() {
        let mut mesh = soup(&unit_box());
        mesh.indices.truncate(mesh.indices.len() - 6);
        let (mesh, report) = repair(mesh);
        assert_eq!(report.holes_filled, 1);
        assert!(report.watertight);
        assert_eq!(mesh.vertex_count(), 8);
    }
}

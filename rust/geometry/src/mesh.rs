// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::csg::Triangle;
use nalgebra::{Point3, Rotation3, Vector3};
use rustc_hash::FxHashMap;

/// Ray directions used by [`Mesh::contains_point`].
///
/// Deliberately skewed so rays do not run along the axis-aligned edges that
/// dominate printed parts; three rays vote to survive one grazing hit.
const PROBE_DIRECTIONS: [[f64; 3]; 3] = [
    [0.577_215_66, 0.314_159_27, 0.753_698_12],
    [-0.683_012_70, 0.521_480_17, -0.511_281_43],
    [0.275_637_36, -0.861_803_40, 0.425_779_29],
];

/// Depth behind a face, relative to the diagonal, at which interior points are tried
const INTERIOR_OFFSET: f64 = 1e-4;

/// Faces tried by [`Mesh::interior_point`] after the centroid
const INTERIOR_ATTEMPTS: usize = 16;

/// Indexed triangle mesh
///
/// Positions are stored flat in f64 so millimetre-scale geometry keeps full
/// precision through repeated boolean passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f64>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

/// Summary statistics for a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    pub vertices: usize,
    pub triangles: usize,
    pub min: Point3<f64>,
    pub max: Point3<f64>,
    pub dimensions: Vector3<f64>,
    pub centroid: Point3<f64>,
    pub surface_area: f64,
    /// Enclosed volume; only meaningful for watertight meshes, `None` otherwise
    pub volume: Option<f64>,
    pub watertight: bool,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex and return its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.push(position.x);
        self.positions.push(position.y);
        self.positions.push(position.z);
        index
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Append a free-standing triangle (three new vertices)
    pub fn push_triangle(&mut self, triangle: &Triangle) {
        let i0 = self.add_vertex(triangle.v0);
        let i1 = self.add_vertex(triangle.v1);
        let i2 = self.add_vertex(triangle.v2);
        self.add_triangle(i0, i1, i2);
    }

    /// Merge another mesh into this one
    ///
    /// This is plain concatenation: no vertices are shared and no
    /// intersections are resolved.
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = self.vertex_count() as u32;

        self.positions.reserve(other.positions.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh has no faces
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of vertex `index`
    #[inline]
    pub fn vertex(&self, index: usize) -> Point3<f64> {
        Point3::new(
            self.positions[index * 3],
            self.positions[index * 3 + 1],
            self.positions[index * 3 + 2],
        )
    }

    /// Triangle `index` as a standalone [`Triangle`]
    #[inline]
    pub fn triangle(&self, index: usize) -> Triangle {
        let base = index * 3;
        Triangle::new(
            self.vertex(self.indices[base] as usize),
            self.vertex(self.indices[base + 1] as usize),
            self.vertex(self.indices[base + 2] as usize),
        )
    }

    /// Iterate over all triangles
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(move |i| self.triangle(i))
    }

    /// Iterate over all vertex positions
    pub fn vertices(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.positions.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }

    /// Length of the bounding box diagonal
    pub fn diagonal(&self) -> f64 {
        let (min, max) = self.bounds();
        (max - min).norm()
    }

    /// Area-weighted surface centroid
    ///
    /// Falls back to the plain vertex mean when every face is degenerate.
    pub fn centroid(&self) -> Point3<f64> {
        if self.positions.is_empty() {
            return Point3::origin();
        }

        let mut weighted = Vector3::zeros();
        let mut total_area = 0.0;
        for tri in self.triangles() {
            let area = tri.area();
            weighted += tri.centroid().coords * area;
            total_area += area;
        }

        if total_area > 0.0 {
            return Point3::from(weighted / total_area);
        }

        let sum = self
            .vertices()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.vertex_count() as f64)
    }

    /// Total surface area
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|t| t.area()).sum()
    }

    /// Signed enclosed volume (positive for outward-facing winding)
    pub fn volume(&self) -> f64 {
        self.triangles()
            .map(|t| t.v0.coords.dot(&t.v1.coords.cross(&t.v2.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Check that the mesh is a closed, consistently oriented 2-manifold
    ///
    /// Every undirected edge must be used by exactly two faces, once in each
    /// direction.
    pub fn is_watertight(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        // (forward uses, backward uses) per undirected edge
        let mut edges: FxHashMap<(u32, u32), (u32, u32)> = FxHashMap::default();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if a == b {
                    return false;
                }
                let entry = edges.entry((a.min(b), a.max(b))).or_insert((0, 0));
                if a < b {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
        }

        edges.values().all(|&(fwd, bwd)| fwd == 1 && bwd == 1)
    }

    /// Point-in-solid test by ray parity
    ///
    /// Three skewed rays vote; the mesh is assumed closed (open meshes give
    /// best-effort answers).
    pub fn contains_point(&self, point: &Point3<f64>) -> bool {
        if self.is_empty() {
            return false;
        }

        let (min, max) = self.bounds();
        if point.x < min.x
            || point.y < min.y
            || point.z < min.z
            || point.x > max.x
            || point.y > max.y
            || point.z > max.z
        {
            return false;
        }

        let votes = PROBE_DIRECTIONS
            .iter()
            .filter(|d| {
                let dir = Vector3::new(d[0], d[1], d[2]);
                let hits = self
                    .triangles()
                    .filter(|t| ray_hits_triangle(point, &dir, t))
                    .count();
                hits % 2 == 1
            })
            .count();

        votes >= 2
    }

    /// Rotate all vertices about the origin
    pub fn rotate(&mut self, rotation: &Rotation3<f64>) {
        self.positions.chunks_exact_mut(3).for_each(|chunk| {
            let p = rotation * Point3::new(chunk[0], chunk[1], chunk[2]);
            chunk[0] = p.x;
            chunk[1] = p.y;
            chunk[2] = p.z;
        });
    }

    /// Translate all vertices
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        self.positions.chunks_exact_mut(3).for_each(|chunk| {
            chunk[0] += offset.x;
            chunk[1] += offset.y;
            chunk[2] += offset.z;
        });
    }

    /// Reverse the winding of every face
    pub fn flip(&mut self) {
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }

    /// Minimum of `dot(v, direction)` over all vertices
    pub fn min_projection(&self, direction: &Vector3<f64>) -> Option<f64> {
        self.vertices()
            .map(|p| p.coords.dot(direction))
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
    }

    /// Collect summary statistics
    pub fn stats(&self) -> MeshStats {
        let (min, max) = self.bounds();
        let watertight = self.is_watertight();
        MeshStats {
            vertices: self.vertex_count(),
            triangles: self.triangle_count(),
            min,
            max,
            dimensions: max - min,
            centroid: self.centroid(),
            surface_area: self.surface_area(),
            volume: watertight.then(|| self.volume()),
            watertight,
        }
    }

    /// A point strictly inside the solid, if one is easy to find
    ///
    /// Tries the centroid first, then points just behind the largest faces.
    pub fn interior_point(&self) -> Option<Point3<f64>> {
        if self.is_empty() {
            return None;
        }

        let centroid = self.centroid();
        if self.contains_point(&centroid) {
            return Some(centroid);
        }

        let offset = INTERIOR_OFFSET * self.diagonal().max(1.0);
        let mut faces: Vec<Triangle> = self.triangles().filter(|t| t.area() > 0.0).collect();
        faces.sort_by(|a, b| b.area().total_cmp(&a.area()));

        faces
            .iter()
            .take(INTERIOR_ATTEMPTS)
            .map(|t| t.centroid() - t.normal() * offset)
            .find(|p| self.contains_point(p))
    }
}

/// Ray-triangle intersection test (Möller-Trumbore), forward hits only
fn ray_hits_triangle(origin: &Point3<f64>, dir: &Vector3<f64>, tri: &Triangle) -> bool {
    let epsilon = 1e-12;

    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;
    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < epsilon {
        return false;
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    f * edge2.dot(&q) > epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_mesh;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = Mesh::new();
        let idx = mesh.add_vertex(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(idx, 0);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.positions, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let a = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let b = box_mesh(Point3::new(5.0, 0.0, 0.0), Point3::new(6.0, 1.0, 1.0));

        let mut merged = a.clone();
        merged.merge(&b);
        assert_eq!(merged.vertex_count(), 16);
        assert_eq!(merged.triangle_count(), 24);
        assert!(merged.indices[36..].iter().all(|&i| i >= 8));
    }

    #[test]
    fn test_box_is_watertight_with_positive_volume() {
        let mesh = box_mesh(Point3::origin(), Point3::new(2.0, 3.0, 4.0));
        assert!(mesh.is_watertight());
        assert_relative_eq!(mesh.volume(), 24.0, epsilon = 1e-9);
        assert_relative_eq!(mesh.surface_area(), 52.0, epsilon = 1e-9);
    }

    #[test]
    fn test_open_box_is_not_watertight() {
        let mut mesh = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        mesh.indices.truncate(mesh.indices.len() - 3);
        assert!(!mesh.is_watertight());
    }

    #[test]
    fn test_centroid_is_area_weighted() {
        let mesh = box_mesh(Point3::origin(), Point3::new(100.0, 100.0, 20.0));
        let c = mesh.centroid();
        assert_relative_eq!(c.x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 50.0, epsilon = 1e-9);
        assert_relative_eq!(c.z, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_contains_point() {
        let mesh = box_mesh(Point3::origin(), Point3::new(10.0, 10.0, 10.0));
        assert!(mesh.contains_point(&Point3::new(5.0, 5.0, 5.0)));
        assert!(mesh.contains_point(&Point3::new(0.1, 9.9, 0.1)));
        assert!(!mesh.contains_point(&Point3::new(15.0, 5.0, 5.0)));
        assert!(!mesh.contains_point(&Point3::new(5.0, 5.0, -0.1)));
    }

    #[test]
    fn test_bounds_and_translate() {
        let mut mesh = box_mesh(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        mesh.translate(&Vector3::new(10.0, 0.0, -1.0));
        let (min, max) = mesh.bounds();
        assert_eq!(min, Point3::new(10.0, 0.0, -1.0));
        assert_eq!(max, Point3::new(11.0, 2.0, 2.0));
    }

    #[test]
    fn test_flip_negates_volume() {
        let mut mesh = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        mesh.flip();
        assert_relative_eq!(mesh.volume(), -1.0, epsilon = 1e-12);
        assert!(mesh.is_watertight());
    }

    #[test]
    fn test_min_projection() {
        let mesh = box_mesh(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.min_projection(&Vector3::z()), Some(-3.0));
        assert_eq!(mesh.min_projection(&-Vector3::y()), Some(-2.0));
        assert_eq!(Mesh::new().min_projection(&Vector3::x()), None);
    }

    #[test]
    fn test_interior_point() {
        let mesh = box_mesh(Point3::origin(), Point3::new(4.0, 2.0, 1.0));
        let p = mesh.interior_point().unwrap();
        assert!(mesh.contains_point(&p));
        assert_eq!(Mesh::new().interior_point(), None);

        // Centroid of an L-shaped ring of two boxes lies outside both
        let mut l_shape = box_mesh(Point3::origin(), Point3::new(10.0, 1.0, 1.0));
        l_shape.merge(&box_mesh(Point3::new(0.0, 1.0, 0.0), Point3::new(1.0, 10.0, 1.0)));
        assert!(!l_shape.contains_point(&l_shape.centroid()));
        let p = l_shape.interior_point().unwrap();
        assert!(l_shape.contains_point(&p));
    }

    #[test]
    fn test_stats_reports_volume_only_when_closed() {
        let mesh = box_mesh(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
        let stats = mesh.stats();
        assert_eq!(stats.vertices, 8);
        assert_eq!(stats.triangles, 12);
        assert!(stats.watertight);
        assert_relative_eq!(stats.volume.unwrap_or_default(), 8.0, epsilon = 1e-12);

        let mut open = mesh.clone();
        open.indices.truncate(33);
        assert_eq!(open.stats().volume, None);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed primitive solids
//!
//! All primitives are watertight with outward (counter-clockwise seen from
//! outside) winding and shared vertices.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use nalgebra::Point3;
use std::f64::consts::TAU;

/// Axis-aligned box from min/max corners
/// Returns a mesh with 8 vertices and 12 triangles
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 36);

    let v0 = mesh.add_vertex(Point3::new(min.x, min.y, min.z));
    let v1 = mesh.add_vertex(Point3::new(max.x, min.y, min.z));
    let v2 = mesh.add_vertex(Point3::new(max.x, max.y, min.z));
    let v3 = mesh.add_vertex(Point3::new(min.x, max.y, min.z));
    let v4 = mesh.add_vertex(Point3::new(min.x, min.y, max.z));
    let v5 = mesh.add_vertex(Point3::new(max.x, min.y, max.z));
    let v6 = mesh.add_vertex(Point3::new(max.x, max.y, max.z));
    let v7 = mesh.add_vertex(Point3::new(min.x, max.y, max.z));

    // -Z
    mesh.add_triangle(v0, v2, v1);
    mesh.add_triangle(v0, v3, v2);
    // +Z
    mesh.add_triangle(v4, v5, v6);
    mesh.add_triangle(v4, v6, v7);
    // -X
    mesh.add_triangle(v0, v4, v7);
    mesh.add_triangle(v0, v7, v3);
    // +X
    mesh.add_triangle(v1, v2, v6);
    mesh.add_triangle(v1, v6, v5);
    // -Y
    mesh.add_triangle(v0, v1, v5);
    mesh.add_triangle(v0, v5, v4);
    // +Y
    mesh.add_triangle(v3, v7, v6);
    mesh.add_triangle(v3, v6, v2);

    mesh
}

/// Solid cylinder along +Z, centred at the origin
///
/// `segments` is the number of sides of the polygonal cross-section.
pub fn cylinder_mesh(radius: f64, height: f64, segments: usize) -> Result<Mesh> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(Error::InvalidPrimitive(format!(
            "cylinder radius must be positive, got {}",
            radius
        )));
    }
    if !(height.is_finite() && height > 0.0) {
        return Err(Error::InvalidPrimitive(format!(
            "cylinder height must be positive, got {}",
            height
        )));
    }
    if segments < 3 {
        return Err(Error::InvalidPrimitive(format!(
            "cylinder needs at least 3 segments, got {}",
            segments
        )));
    }

    let half = height / 2.0;
    let n = segments as u32;
    let mut mesh = Mesh::with_capacity(2 * segments + 2, 12 * segments);

    let bottom_center = mesh.add_vertex(Point3::new(0.0, 0.0, -half));
    let top_center = mesh.add_vertex(Point3::new(0.0, 0.0, half));

    // Ring vertices interleaved: bottom at 2 + 2i, top at 3 + 2i
    for i in 0..segments {
        let angle = TAU * i as f64 / segments as f64;
        let (sin, cos) = angle.sin_cos();
        mesh.add_vertex(Point3::new(radius * cos, radius * sin, -half));
        mesh.add_vertex(Point3::new(radius * cos, radius * sin, half));
    }

    let bottom = |i: u32| 2 + 2 * (i % n);
    let top = |i: u32| 3 + 2 * (i % n);

    for i in 0..n {
        let j = i + 1;
        mesh.add_triangle(top_center, top(i), top(j));
        mesh.add_triangle(bottom_center, bottom(j), bottom(i));
        mesh.add_triangle(bottom(i), bottom(j), top(j));
        mesh.add_triangle(bottom(i), top(j), top(i));
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_mesh() {
        let mesh = box_mesh(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_watertight());
        assert_relative_eq!(mesh.volume(), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_is_closed_and_outward() {
        let mesh = cylinder_mesh(5.0, 10.0, 32).unwrap();
        assert_eq!(mesh.vertex_count(), 66);
        assert_eq!(mesh.triangle_count(), 128);
        assert!(mesh.is_watertight());

        let expected = 0.5 * 32.0 * 25.0 * (TAU / 32.0).sin() * 10.0;
        assert_relative_eq!(mesh.volume(), expected, epsilon = 1e-9);

        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, -5.0);
        assert_relative_eq!(max.z, 5.0);
        assert_relative_eq!(max.x, 5.0);
    }

    #[test]
    fn test_cylinder_rejects_bad_dimensions() {
        assert!(cylinder_mesh(0.0, 10.0, 32).is_err());
        assert!(cylinder_mesh(1.0, -1.0, 32).is_err());
        assert!(cylinder_mesh(1.0, f64::NAN, 32).is_err());
        assert!(cylinder_mesh(1.0, 1.0, 2).is_err());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cutter solids
//!
//! A cutter is a cylinder placed so that subtracting it bores from the slot
//! position `depth` units into the material.

use crate::config::{positive, MIN_CUTTER_SEGMENTS};
use crate::direction::InsertionDirection;
use crate::error::Result;
use crate::plane::MountingPlane;
use nalgebra::{Point3, Vector3};
use pegmount_geometry::{axis_rotation, cylinder_mesh, rotation_between, Axis, Mesh};
use serde::Serialize;

/// Everything needed to bore one hole
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CuttingSpec {
    /// Point on the surface where the bore starts
    pub position: Point3<f64>,
    pub depth: f64,
    pub diameter: f64,
    pub direction: InsertionDirection,
}

impl CuttingSpec {
    /// Validated spec; depth and diameter must be positive
    pub fn new(
        position: Point3<f64>,
        depth: f64,
        diameter: f64,
        direction: InsertionDirection,
    ) -> Result<Self> {
        Ok(Self {
            position,
            depth: positive("depth", depth)?,
            diameter: positive("diameter", diameter)?,
            direction,
        })
    }
}

/// Build the oriented cutter for `spec`
///
/// `segments` is raised to the 32-side minimum when lower.
pub fn build_cutter(spec: &CuttingSpec, segments: usize) -> Result<Mesh> {
    let depth = positive("depth", spec.depth)?;
    let radius = positive("diameter", spec.diameter)? / 2.0;

    let mut cutter = cylinder_mesh(radius, depth, segments.max(MIN_CUTTER_SEGMENTS))?;

    match spec.direction {
        InsertionDirection::NormalAligned(normal) => {
            cutter.rotate(&rotation_between(&Vector3::z(), &normal));
            cutter.translate(&(spec.position.coords + normal.into_inner() * (depth / 2.0)));
        }
        InsertionDirection::PlaneAligned(plane) => {
            let pre_offset = match plane {
                MountingPlane::XY => Vector3::new(0.0, 0.0, -depth / 2.0),
                MountingPlane::XZ => {
                    cutter.rotate(&axis_rotation(Axis::X, 90.0));
                    Vector3::new(0.0, -depth / 2.0, 0.0)
                }
                MountingPlane::YZ => {
                    cutter.rotate(&axis_rotation(Axis::Y, 90.0));
                    Vector3::new(-depth / 2.0, 0.0, 0.0)
                }
            };
            cutter.translate(&pre_offset);
            cutter.translate(&spec.position.coords);
        }
    }

    Ok(cutter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pegmount_geometry::Unit;

    fn spec(direction: InsertionDirection) -> CuttingSpec {
        CuttingSpec::new(Point3::new(10.0, 20.0, 30.0), 8.0, 28.284, direction).unwrap()
    }

    #[test]
    fn test_plane_cutters_extend_inward() {
        let cases = [
            (MountingPlane::XY, 2usize),
            (MountingPlane::XZ, 1),
            (MountingPlane::YZ, 0),
        ];
        for (plane, axis) in cases {
            let cutter = build_cutter(&spec(plane.into()), 32).unwrap();
            let (min, max) = cutter.bounds();
            let p = spec(plane.into()).position;
            assert_relative_eq!(max[axis], p[axis], epsilon = 1e-9);
            assert_relative_eq!(min[axis], p[axis] - 8.0, epsilon = 1e-9);
            assert!(cutter.is_watertight());
        }
    }

    #[test]
    fn test_normal_cutter_spans_from_surface() {
        let n = Unit::new_normalize(Vector3::new(1.0, -1.0, 0.5));
        let s = spec(InsertionDirection::NormalAligned(n));
        let cutter = build_cutter(&s, 32).unwrap();

        let proj: Vec<f64> = cutter
            .vertices()
            .map(|v| (v - s.position).dot(&n))
            .collect();
        let lo = proj.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = proj.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(lo, 0.0, epsilon = 1e-9);
        assert_relative_eq!(hi, 8.0, epsilon = 1e-9);
        assert!(cutter.volume() > 0.0);
    }

    #[test]
    fn test_antiparallel_normal() {
        let s = spec(InsertionDirection::NormalAligned(-Vector3::z_axis()));
        let cutter = build_cutter(&s, 32).unwrap();
        let (min, max) = cutter.bounds();
        assert_relative_eq!(max.z, 30.0, epsilon = 1e-9);
        assert_relative_eq!(min.z, 22.0, epsilon = 1e-9);
    }

    #[test]
    fn test_segments_clamped() {
        let cutter = build_cutter(&spec(MountingPlane::XY.into()), 6).unwrap();
        assert_eq!(cutter.vertex_count(), 2 + 2 * 32);
    }

    #[test]
    fn test_invalid_dimensions() {
        let dir = MountingPlane::XY.into();
        assert!(CuttingSpec::new(Point3::origin(), 0.0, 28.0, dir).is_err());
        assert!(CuttingSpec::new(Point3::origin(), 10.0, -1.0, dir).is_err());
    }
}

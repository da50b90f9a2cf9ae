// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-face classification booleans
//!
//! No face is split: each face is kept or dropped as a unit depending on
//! which side of the other operand it sits. Seams along intersection curves
//! are jagged, but this works on any pair of closed meshes, convex or not,
//! and is the last resort before plain concatenation.

use super::{check_operands, non_empty, BooleanEngine, BooleanOp};
use crate::csg::Triangle;
use crate::error::Result;
use crate::mesh::Mesh;
use crate::repair::merge_vertices;
use rayon::prelude::*;

const NAME: &str = "face-classify";

/// Centroid-probe boolean engine
#[derive(Debug, Clone, Copy)]
pub struct FaceClassifyEngine {
    /// How far off a face its inside/outside probe is taken
    pub probe_offset: f64,
    /// Output vertices closer than this are welded
    pub weld_epsilon: f64,
}

impl FaceClassifyEngine {
    pub fn new() -> Self {
        Self {
            probe_offset: 1e-4,
            weld_epsilon: 1e-7,
        }
    }

    /// Is the face's centroid, nudged along `side` times its normal, inside `other`?
    fn probe_inside(&self, tri: &Triangle, other: &Mesh, side: f64) -> Option<bool> {
        let normal = tri.normal();
        if normal == nalgebra::Vector3::zeros() {
            return None;
        }
        let probe = tri.centroid() + normal * (self.probe_offset * side);
        Some(other.contains_point(&probe))
    }

    fn run(&self, op: BooleanOp, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        check_operands(NAME, op, a, b)?;

        let a_tris: Vec<Triangle> = a.triangles().collect();
        let b_tris: Vec<Triangle> = b.triangles().collect();

        // First operand: probe just below the surface so faces shared with
        // the second operand count as covered
        let kept_a: Vec<Triangle> = a_tris
            .par_iter()
            .filter(|t| self.probe_inside(t, b, -1.0) == Some(false))
            .copied()
            .collect();

        let kept_b: Vec<Triangle> = b_tris
            .par_iter()
            .filter_map(|t| match (op, self.probe_inside(t, a, 1.0)?) {
                (BooleanOp::Difference, true) => Some(t.flipped()),
                (BooleanOp::Union, false) => Some(*t),
                _ => None,
            })
            .collect();

        let mut mesh = Mesh::with_capacity(3 * (kept_a.len() + kept_b.len()), 3 * (kept_a.len() + kept_b.len()));
        for tri in kept_a.iter().chain(&kept_b) {
            mesh.push_triangle(tri);
        }
        merge_vertices(&mut mesh, self.weld_epsilon);

        non_empty(NAME, op, mesh)
    }
}

impl Default for FaceClassifyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BooleanEngine for FaceClassifyEngine {
    fn name(&self) -> &'static str {
        NAME
    }

    fn difference(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        self.run(BooleanOp::Difference, a, b)
    }

    fn union(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        self.run(BooleanOp::Union, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::primitives::box_mesh;
    use nalgebra::Point3;

    #[test]
    fn test_disjoint_union_keeps_everything() {
        let a = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let b = box_mesh(Point3::new(3.0, 0.0, 0.0), Point3::new(4.0, 1.0, 1.0));
        let result = FaceClassifyEngine::new().union(&a, &b).unwrap();
        assert_eq!(result.triangle_count(), 24);
        assert!((result.volume() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_swallowed_operand_is_empty_error() {
        let small = box_mesh(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0));
        let big = box_mesh(Point3::origin(), Point3::new(3.0, 3.0, 3.0));
        let result = FaceClassifyEngine::new().difference(&small, &big);
        assert!(matches!(result, Err(Error::BooleanFailed { .. })));
    }

    #[test]
    fn test_enclosed_tool_adds_inverted_shell() {
        let big = box_mesh(Point3::origin(), Point3::new(3.0, 3.0, 3.0));
        let small = box_mesh(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0));
        let result = FaceClassifyEngine::new().difference(&big, &small).unwrap();
        assert_eq!(result.triangle_count(), 24);
        assert!((result.volume() - 26.0).abs() < 1e-9);
    }
}

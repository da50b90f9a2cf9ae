// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plane-clipping booleans against a convex tool
//!
//! The first operand may be any closed mesh; the second must be convex
//! (cutters and most clip bodies are). Faces of the first operand are split
//! by the tool's face planes and kept where they fall outside it. Faces of
//! the tool are split by the planes of nearby first-operand faces and kept or
//! dropped by a point-in-solid probe taken just off each piece.

use super::{check_operands, non_empty, BooleanEngine, BooleanOp};
use crate::csg::{bounds_overlap, split_triangle, Plane, Triangle, TriangleVec};
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::repair::merge_vertices;
use nalgebra::Point3;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

const NAME: &str = "convex-clip";

type Bounds = (Point3<f64>, Point3<f64>);

/// Reusable buffers for triangle clipping
///
/// Avoids per-triangle allocations by swapping the same buffers through the
/// plane loop.
struct ClipBuffers {
    /// Pieces that ended up outside the tool
    result: TriangleVec,
    /// Pieces still to be tested against the remaining planes
    remaining: TriangleVec,
    /// Swap buffer for the next plane
    next_remaining: TriangleVec,
}

impl ClipBuffers {
    fn new() -> Self {
        Self {
            result: TriangleVec::new(),
            remaining: TriangleVec::new(),
            next_remaining: TriangleVec::new(),
        }
    }

    #[inline]
    fn clear(&mut self) {
        self.result.clear();
        self.remaining.clear();
        self.next_remaining.clear();
    }
}

/// Boolean engine for convex second operands
#[derive(Debug, Clone, Copy)]
pub struct ConvexClipEngine {
    /// Distance band treated as lying on a plane
    pub epsilon: f64,
    /// How far off a face its inside/outside probe is taken
    pub probe_offset: f64,
    /// Output vertices closer than this are welded
    pub weld_epsilon: f64,
}

impl ConvexClipEngine {
    pub fn new() -> Self {
        Self {
            epsilon: 1e-7,
            probe_offset: 1e-4,
            weld_epsilon: 1e-7,
        }
    }

    fn run(&self, op: BooleanOp, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        check_operands(NAME, op, a, b)?;
        let planes = self.convex_planes(b)?;

        let a_bounds = a.bounds();
        let b_bounds = b.bounds();

        if !bounds_overlap(&a_bounds, &b_bounds, self.epsilon) {
            return Ok(match op {
                BooleanOp::Difference => a.clone(),
                BooleanOp::Union => {
                    let mut out = a.clone();
                    out.merge(b);
                    out
                }
            });
        }

        let a_tris: Vec<Triangle> = a.triangles().collect();
        let b_tris: Vec<Triangle> = b.triangles().collect();

        let outside: Vec<TriangleVec> = a_tris
            .par_iter()
            .map_init(ClipBuffers::new, |buffers, tri| {
                if !bounds_overlap(&tri.bounds(), &b_bounds, self.epsilon) {
                    return TriangleVec::from_elem(*tri, 1);
                }
                self.clip_outside(buffers, tri, &planes);
                buffers.result.clone()
            })
            .collect();

        // Planes of first-operand faces, with bounds for cheap rejection
        let cutters: Vec<(Plane, Bounds)> = a_tris
            .iter()
            .filter(|t| bounds_overlap(&t.bounds(), &b_bounds, self.epsilon))
            .filter_map(|t| Some((Plane::from_triangle(t)?, t.bounds())))
            .collect();

        let kept_tool: Vec<Vec<Triangle>> = b_tris
            .par_iter()
            .map(|tri| {
                self.split_by(tri, &cutters)
                    .into_iter()
                    .filter_map(|piece| self.classify_tool_piece(op, a, &piece))
                    .collect()
            })
            .collect();

        let mut mesh = Mesh::with_capacity(a.vertex_count() + b.vertex_count(), a.indices.len());
        for tri in outside.iter().flatten() {
            mesh.push_triangle(tri);
        }
        for tri in kept_tool.iter().flatten() {
            mesh.push_triangle(tri);
        }
        merge_vertices(&mut mesh, self.weld_epsilon);

        non_empty(NAME, op, mesh)
    }

    /// Distinct face planes of `mesh`, or an error when it is not convex
    fn convex_planes(&self, mesh: &Mesh) -> Result<Vec<Plane>> {
        let tolerance = 1e-6 * mesh.diagonal().max(1.0);
        let mut seen: FxHashSet<(i64, i64, i64, i64)> = FxHashSet::default();
        let mut planes = Vec::new();

        for tri in mesh.triangles() {
            let Some(plane) = Plane::from_triangle(&tri) else {
                continue;
            };
            let offset = plane.normal.dot(&plane.point.coords);
            let key = (
                (plane.normal.x * 1e6).round() as i64,
                (plane.normal.y * 1e6).round() as i64,
                (plane.normal.z * 1e6).round() as i64,
                (offset * 1e6).round() as i64,
            );
            if !seen.insert(key) {
                continue;
            }

            if mesh.vertices().any(|v| plane.signed_distance(&v) > tolerance) {
                return Err(Error::UnsupportedOperand {
                    engine: NAME,
                    reason: "second operand is not convex".to_string(),
                });
            }
            planes.push(plane);
        }

        if planes.len() < 4 {
            return Err(Error::UnsupportedOperand {
                engine: NAME,
                reason: format!("second operand encloses no volume ({} planes)", planes.len()),
            });
        }

        Ok(planes)
    }

    /// Keep the parts of `tri` in front of at least one tool plane
    ///
    /// Whatever survives behind every plane is inside the tool and dropped.
    fn clip_outside(&self, buffers: &mut ClipBuffers, tri: &Triangle, planes: &[Plane]) {
        buffers.clear();
        buffers.remaining.push(*tri);

        for plane in planes {
            buffers.next_remaining.clear();
            for piece in &buffers.remaining {
                let split = split_triangle(piece, plane, self.epsilon);
                buffers.result.extend(split.front);
                buffers.next_remaining.extend(split.back);
            }
            std::mem::swap(&mut buffers.remaining, &mut buffers.next_remaining);
            if buffers.remaining.is_empty() {
                break;
            }
        }
    }

    /// Split a tool face by every nearby first-operand plane
    fn split_by(&self, tri: &Triangle, cutters: &[(Plane, Bounds)]) -> Vec<Triangle> {
        let tri_bounds = tri.bounds();
        let mut pieces = vec![*tri];
        let mut next = Vec::new();

        for (plane, bounds) in cutters {
            if !bounds_overlap(&tri_bounds, bounds, self.epsilon) {
                continue;
            }
            next.clear();
            for piece in &pieces {
                if !bounds_overlap(&piece.bounds(), bounds, self.epsilon) {
                    next.push(*piece);
                    continue;
                }
                let split = split_triangle(piece, plane, self.epsilon);
                next.extend(split.front);
                next.extend(split.back);
            }
            std::mem::swap(&mut pieces, &mut next);
        }

        pieces
    }

    /// Decide whether a tool piece belongs to the result
    fn classify_tool_piece(&self, op: BooleanOp, a: &Mesh, piece: &Triangle) -> Option<Triangle> {
        let normal = piece.normal();
        if normal == nalgebra::Vector3::zeros() {
            return None;
        }
        let probe = piece.centroid() + normal * self.probe_offset;
        let inside = a.contains_point(&probe);

        match op {
            BooleanOp::Difference if inside => Some(piece.flipped()),
            BooleanOp::Union if !inside => Some(*piece),
            _ => None,
        }
    }
}

impl Default for ConvexClipEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BooleanEngine for ConvexClipEngine {
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

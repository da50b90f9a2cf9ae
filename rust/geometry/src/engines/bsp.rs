// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BSP-tree booleans backed by csgrs

use super::{check_operands, non_empty, BooleanEngine, BooleanOp};
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::repair::merge_vertices;
use crate::triangulation::triangulate_loop;
use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};
use csgrs::traits::CSG;
use nalgebra::Point3;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;

const NAME: &str = "bsp";

/// Boolean engine built on the csgrs BSP kernel
///
/// Panics raised inside csgrs are caught and reported as a failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct BspEngine {
    /// Output vertices closer than this are welded
    pub weld_epsilon: f64,
}

impl BspEngine {
    pub fn new() -> Self {
        Self { weld_epsilon: 1e-9 }
    }

    fn run(&self, op: BooleanOp, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        check_operands(NAME, op, a, b)?;

        let host = mesh_to_csgrs(a);
        let tool = mesh_to_csgrs(b);

        let result = catch_unwind(AssertUnwindSafe(|| match op {
            BooleanOp::Difference => host.difference(&tool),
            BooleanOp::Union => host.union(&tool),
        }))
        .map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "kernel panicked".to_string());
            Error::boolean(NAME, op.as_str(), reason)
        })?;

        let mut mesh = csgrs_to_mesh(&result);
        merge_vertices(&mut mesh, self.weld_epsilon);
        non_empty(NAME, op, mesh)
    }
}

impl Default for BspEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BooleanEngine for BspEngine {
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

/// Convert our Mesh format to csgrs Mesh format
fn mesh_to_csgrs(mesh: &Mesh) -> CSGMesh<()> {
    if mesh.is_empty() {
        return CSGMesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        };
    }

    let polygons: Vec<Polygon<()>> = mesh
        .triangles()
        .filter_map(|tri| {
            // Degenerate faces would feed NaN normals into the BSP
            let face_normal = (tri.v1 - tri.v0)
                .cross(&(tri.v2 - tri.v0))
                .try_normalize(1e-10)?;
            let vertices = vec![
                Vertex::new(tri.v0, face_normal),
                Vertex::new(tri.v1, face_normal),
                Vertex::new(tri.v2, face_normal),
            ];
            Some(Polygon::new(vertices, None))
        })
        .collect();

    CSGMesh::from_polygons(&polygons, None)
}

/// Convert csgrs Mesh format back to our Mesh format
fn csgrs_to_mesh(csg_mesh: &CSGMesh<()>) -> Mesh {
    let mut mesh = Mesh::new();

    for polygon in &csg_mesh.polygons {
        let vertices = &polygon.vertices;
        if vertices.len() < 3 {
            continue;
        }

        let points: Vec<Point3<f64>> = vertices
            .iter()
            .map(|v| Point3::new(v.pos[0], v.pos[1], v.pos[2]))
            .collect();

        if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
            continue;
        }

        let base = mesh.vertex_count() as u32;
        if points.len() == 3 {
            for p in &points {
                mesh.add_vertex(*p);
            }
            mesh.add_triangle(base, base + 1, base + 2);
            continue;
        }

        // Polygon winding carries the face orientation
        let Ok(triangles) = triangulate_loop(&points) else {
            continue;
        };
        for p in &points {
            mesh.add_vertex(*p);
        }
        for [i0, i1, i2] in triangles {
            mesh.add_triangle(base + i0 as u32, base + i1 as u32, base + i2 as u32);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_mesh;

    #[test]
    fn test_round_trip_keeps_faces() {
        let a = box_mesh(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        let back = csgrs_to_mesh(&mesh_to_csgrs(&a));
        assert_eq!(back.triangle_count(), 12);
        assert!((back.volume() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_operand_rejected() {
        let a = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let engine = BspEngine::new();
        assert!(matches!(
            engine.difference(&a, &Mesh::new()),
            Err(Error::EmptyMesh(_))
        ));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pegmount Geometry
//!
//! Indexed triangle meshes, primitive solids, mesh repair and a set of
//! interchangeable boolean engines (csgrs BSP, convex plane clipping and
//! whole-face classification).

pub mod csg;
pub mod engines;
pub mod error;
pub mod mesh;
pub mod primitives;
pub mod repair;
pub mod transform;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Rotation3, Unit, Vector2, Vector3};

pub use csg::{Plane, Triangle};
pub use engines::{
    default_engines, run_engines, BooleanEngine, BooleanOp, BspEngine, ConvexClipEngine,
    EngineList, EngineSuccess, FaceClassifyEngine,
};
pub use error::{Error, Result};
pub use mesh::{Mesh, MeshStats};
pub use primitives::{box_mesh, cylinder_mesh};
pub use repair::{repair, repair_with, RepairParams, RepairReport};
pub use transform::{any_perpendicular, axis_rotation, rotation_about, rotation_between, Axis};
pub use triangulation::triangulate_polygon;

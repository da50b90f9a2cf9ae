// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! How cutters and clips are pointed into the object

use crate::error::{Error, Result};
use crate::plane::{BoxFace, MountingPlane};
use nalgebra::{Unit, Vector3};
use serde::Serialize;

/// Insertion direction for a slot
///
/// Plane-aligned placement uses fixed quarter turns per plane and assumes the
/// grid sits on the max side; normal-aligned placement follows an arbitrary
/// face normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum InsertionDirection {
    PlaneAligned(MountingPlane),
    /// Unit normal pointing into the material
    NormalAligned(Unit<Vector3<f64>>),
}

impl InsertionDirection {
    /// Normal-aligned direction from a raw inward vector
    pub fn from_normal(normal: Vector3<f64>) -> Result<Self> {
        if !normal.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidDirection(format!(
                "normal {:?} is not finite",
                normal
            )));
        }
        Unit::try_new(normal, 1e-12)
            .map(InsertionDirection::NormalAligned)
            .ok_or_else(|| Error::InvalidDirection("normal has zero length".to_string()))
    }

    /// Normal-aligned direction into a bounding-box face
    pub fn from_face(face: BoxFace) -> Self {
        InsertionDirection::NormalAligned(face.inward_normal())
    }

    /// Direction pointing into the material
    pub fn inward(&self) -> Unit<Vector3<f64>> {
        match self {
            InsertionDirection::PlaneAligned(plane) => plane.inward(),
            InsertionDirection::NormalAligned(normal) => *normal,
        }
    }

    /// Axis extra clip rotations turn about
    pub fn rotation_axis(&self) -> Unit<Vector3<f64>> {
        match self {
            InsertionDirection::PlaneAligned(plane) => plane.depth_axis().unit(),
            InsertionDirection::NormalAligned(normal) => *normal,
        }
    }
}

impl From<MountingPlane> for InsertionDirection {
    fn from(plane: MountingPlane) -> Self {
        InsertionDirection::PlaneAligned(plane)
    }
}

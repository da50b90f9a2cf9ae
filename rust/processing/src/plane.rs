// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mounting planes, boundary sides and bounding-box face presets

use crate::error::{Error, Result};
use nalgebra::{Unit, Vector3};
use pegmount_geometry::Axis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plane the slot lattice lies in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MountingPlane {
    XY,
    XZ,
    YZ,
}

impl MountingPlane {
    pub const ALL: [MountingPlane; 3] = [MountingPlane::XY, MountingPlane::XZ, MountingPlane::YZ];

    /// (horizontal, vertical, depth) component indices
    #[inline]
    pub fn axes(self) -> (usize, usize, usize) {
        match self {
            MountingPlane::XY => (0, 1, 2),
            MountingPlane::XZ => (0, 2, 1),
            MountingPlane::YZ => (1, 2, 0),
        }
    }

    /// Axis perpendicular to the plane
    #[inline]
    pub fn depth_axis(self) -> Axis {
        Axis::from_index(self.axes().2)
    }

    /// Fixed inward direction used when orienting by plane name
    #[inline]
    pub fn inward(self) -> Unit<Vector3<f64>> {
        -self.depth_axis().unit()
    }
}

impl fmt::Display for MountingPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MountingPlane::XY => "XY",
            MountingPlane::XZ => "XZ",
            MountingPlane::YZ => "YZ",
        })
    }
}

impl FromStr for MountingPlane {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xy" => Ok(MountingPlane::XY),
            "xz" => Ok(MountingPlane::XZ),
            "yz" => Ok(MountingPlane::YZ),
            _ => Err(Error::UnknownName {
                kind: "mounting plane",
                value: s.to_string(),
            }),
        }
    }
}

/// Which extreme of the depth axis the grid sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundarySide {
    Min,
    Max,
}

impl fmt::Display for BoundarySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BoundarySide::Min => "min",
            BoundarySide::Max => "max",
        })
    }
}

impl FromStr for BoundarySide {
    type Err = Error;

    /// Accepts `min`/`max` and axis-qualified forms such as `max_z`
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        if lower.starts_with("max") {
            Ok(BoundarySide::Max)
        } else if lower.starts_with("min") {
            Ok(BoundarySide::Min)
        } else {
            Err(Error::UnknownName {
                kind: "boundary side",
                value: s.to_string(),
            })
        }
    }
}

/// One face of an object's bounding box
///
/// Presets for picking the board-facing side of an object without a face
/// picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxFace {
    /// +Y
    Front,
    /// -Y
    Back,
    /// -X
    Left,
    /// +X
    Right,
    /// +Z
    Top,
    /// -Z
    Bottom,
}

impl BoxFace {
    pub const ALL: [BoxFace; 6] = [
        BoxFace::Front,
        BoxFace::Back,
        BoxFace::Left,
        BoxFace::Right,
        BoxFace::Top,
        BoxFace::Bottom,
    ];

    pub fn plane(self) -> MountingPlane {
        match self {
            BoxFace::Front | BoxFace::Back => MountingPlane::XZ,
            BoxFace::Left | BoxFace::Right => MountingPlane::YZ,
            BoxFace::Top | BoxFace::Bottom => MountingPlane::XY,
        }
    }

    pub fn boundary(self) -> BoundarySide {
        match self {
            BoxFace::Front | BoxFace::Right | BoxFace::Top => BoundarySide::Max,
            BoxFace::Back | BoxFace::Left | BoxFace::Bottom => BoundarySide::Min,
        }
    }

    /// Unit normal pointing into the object through this face
    pub fn inward_normal(self) -> Unit<Vector3<f64>> {
        let axis = self.plane().depth_axis().unit();
        match self.boundary() {
            BoundarySide::Max => -axis,
            BoundarySide::Min => axis,
        }
    }

    /// Colour the viewer draws this face in
    pub fn colour(self) -> &'static str {
        match self {
            BoxFace::Front => "red",
            BoxFace::Back => "blue",
            BoxFace::Left => "green",
            BoxFace::Right => "yellow",
            BoxFace::Top => "cyan",
            BoxFace::Bottom => "magenta",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BoxFace::Front => "front",
            BoxFace::Back => "back",
            BoxFace::Left => "left",
            BoxFace::Right => "right",
            BoxFace::Top => "top",
            BoxFace::Bottom => "bottom",
        }
    }
}

impl fmt::Display for BoxFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoxFace {
    type Err = Error;

    /// Accepts face names or their viewer colours
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        BoxFace::ALL
            .into_iter()
            .find(|face| face.name() == lower || face.colour() == lower)
            .ok_or_else(|| Error::UnknownName {
                kind: "box face",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_axes() {
        assert_eq!(MountingPlane::XY.axes(), (0, 1, 2));
        assert_eq!(MountingPlane::XZ.axes(), (0, 2, 1));
        assert_eq!(MountingPlane::YZ.axes(), (1, 2, 0));
        assert_eq!(MountingPlane::XZ.depth_axis(), Axis::Y);
        assert_eq!(*MountingPlane::YZ.inward(), -Vector3::x());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("xz".parse::<MountingPlane>().unwrap(), MountingPlane::XZ);
        assert_eq!("max_z".parse::<BoundarySide>().unwrap(), BoundarySide::Max);
        assert_eq!("Min".parse::<BoundarySide>().unwrap(), BoundarySide::Min);
        assert!("diagonal".parse::<MountingPlane>().is_err());
        assert!("middle".parse::<BoundarySide>().is_err());
    }

    #[test]
    fn test_box_face_mapping() {
        assert_eq!(BoxFace::Front.plane(), MountingPlane::XZ);
        assert_eq!(BoxFace::Front.boundary(), BoundarySide::Max);
        assert_eq!(*BoxFace::Front.inward_normal(), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(*BoxFace::Back.inward_normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(*BoxFace::Left.inward_normal(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(*BoxFace::Right.inward_normal(), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(*BoxFace::Top.inward_normal(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(*BoxFace::Bottom.inward_normal(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_box_face_from_colour() {
        assert_eq!("cyan".parse::<BoxFace>().unwrap(), BoxFace::Top);
        assert_eq!("Left".parse::<BoxFace>().unwrap(), BoxFace::Left);
        assert_eq!("magenta".parse::<BoxFace>().unwrap(), BoxFace::Bottom);
        assert!("purple".parse::<BoxFace>().is_err());
    }
}

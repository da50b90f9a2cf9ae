// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared transform utilities
//!
//! Rotations between directions and fixed axis turns used to orient cutters
//! and inserts against a mounting face.

use nalgebra::{Rotation3, Unit, Vector3};

/// Below this cross-product magnitude two directions are treated as colinear
pub const AXIS_EPSILON: f64 = 1e-6;

/// Cartesian axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index (0, 1, 2)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along the axis
    #[inline]
    pub fn unit(self) -> Unit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }

    /// Axis for a component index; anything past 2 maps to Z
    #[inline]
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }
}

/// Some unit vector perpendicular to `v`
///
/// Crosses with +Z unless `v` is close to Z, in which case +X is used, so the
/// result is deterministic for a given input.
pub fn any_perpendicular(v: &Vector3<f64>) -> Unit<Vector3<f64>> {
    let reference = if v.z.abs() < 0.9 {
        Vector3::z()
    } else {
        Vector3::x()
    };
    let perp = reference.cross(v);
    // `v` is only degenerate if it is the zero vector
    Unit::try_new(perp, 1e-12).unwrap_or_else(Vector3::x_axis)
}

/// Minimal rotation that carries `from` onto `to`
///
/// Identity when the directions already agree; a half-turn about
/// [`any_perpendicular`] when they are opposite.
pub fn rotation_between(from: &Vector3<f64>, to: &Vector3<f64>) -> Rotation3<f64> {
    let (Some(a), Some(b)) = (
        Unit::try_new(*from, 1e-12),
        Unit::try_new(*to, 1e-12),
    ) else {
        return Rotation3::identity();
    };

    let axis = a.cross(&b);
    let dot = a.dot(&b).clamp(-1.0, 1.0);

    if axis.norm() < AXIS_EPSILON {
        if dot > 0.0 {
            return Rotation3::identity();
        }
        return Rotation3::from_axis_angle(&any_perpendicular(&a), std::f64::consts::PI);
    }

    Rotation3::from_axis_angle(&Unit::new_normalize(axis), dot.acos())
}

/// Rotation of `degrees` about a Cartesian axis
#[inline]
pub fn axis_rotation(axis: Axis, degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&axis.unit(), degrees.to_radians())
}

/// Rotation of `degrees` about an arbitrary direction
#[inline]
pub fn rotation_about(axis: &Unit<Vector3<f64>>, degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(axis, degrees.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_maps(from: Vector3<f64>, to: Vector3<f64>) {
        let r = rotation_between(&from, &to);
        let mapped = r * from.normalize();
        let target = to.normalize();
        assert_relative_eq!(mapped.x, target.x, epsilon = 1e-9);
        assert_relative_eq!(mapped.y, target.y, epsilon = 1e-9);
        assert_relative_eq!(mapped.z, target.z, epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_between_general() {
        assert_maps(Vector3::z(), Vector3::x());
        assert_maps(Vector3::z(), Vector3::new(1.0, 1.0, 1.0));
        assert_maps(Vector3::y(), Vector3::new(-0.3, 0.2, -0.9));
    }

    #[test]
    fn test_rotation_between_parallel_is_identity() {
        let r = rotation_between(&Vector3::z(), &Vector3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(r.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_between_antiparallel() {
        assert_maps(Vector3::z(), -Vector3::z());
        assert_maps(Vector3::y(), -Vector3::y());
        assert_maps(Vector3::x(), -Vector3::x());
        let r = rotation_between(&Vector3::z(), &-Vector3::z());
        assert_relative_eq!(r.angle(), std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_between_zero_vector() {
        let r = rotation_between(&Vector3::zeros(), &Vector3::x());
        assert_eq!(r, Rotation3::identity());
    }

    #[test]
    fn test_any_perpendicular() {
        for v in [
            Vector3::x(),
            Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
            Vector3::new(0.3, -0.7, 0.2),
        ] {
            let p = any_perpendicular(&v);
            assert_relative_eq!(p.dot(&v), 0.0, epsilon = 1e-12);
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_axis_rotation_quarter_turn() {
        let r = axis_rotation(Axis::X, 90.0);
        let z = r * Vector3::z();
        assert_relative_eq!(z.y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(z.z, 0.0, epsilon = 1e-12);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planes, triangles and triangle splitting
//!
//! The building blocks shared by the face-level boolean engines.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

/// Small inline buffer for split results (a split yields at most 2+2 pieces)
pub type TriangleVec = SmallVec<[Triangle; 4]>;

/// Which side of a plane a point lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    On,
}

/// Plane definition for clipping
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Supporting plane of a triangle, `None` when the triangle is degenerate
    pub fn from_triangle(triangle: &Triangle) -> Option<Self> {
        let normal = (triangle.v1 - triangle.v0)
            .cross(&(triangle.v2 - triangle.v0))
            .try_normalize(1e-10)?;
        Some(Self {
            point: triangle.v0,
            normal,
        })
    }

    /// Calculate signed distance from point to plane
    /// Positive = in front, Negative = behind
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    /// Classify a point with a tolerance band around the plane
    #[inline]
    pub fn classify(&self, point: &Point3<f64>, epsilon: f64) -> Side {
        let d = self.signed_distance(point);
        if d > epsilon {
            Side::Front
        } else if d < -epsilon {
            Side::Back
        } else {
            Side::On
        }
    }
}

/// Triangle definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit normal, zero for degenerate triangles
    pub fn normal(&self) -> Vector3<f64> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1
            .cross(&edge2)
            .try_normalize(1e-10)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Calculate triangle area
    pub fn area(&self) -> f64 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).norm() * 0.5
    }

    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Same triangle with reversed winding
    #[inline]
    pub fn flipped(&self) -> Self {
        Self::new(self.v0, self.v2, self.v1)
    }

    /// Axis-aligned bounds (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        (
            self.v0.inf(&self.v1).inf(&self.v2),
            self.v0.sup(&self.v1).sup(&self.v2),
        )
    }

    pub fn is_degenerate(&self, min_area: f64) -> bool {
        self.area() <= min_area
    }
}

/// Outcome of splitting one triangle by a plane
#[derive(Debug, Clone, Default)]
pub struct Split {
    /// Pieces strictly in front of the plane
    pub front: TriangleVec,
    /// Pieces behind or on the plane
    pub back: TriangleVec,
}

/// Split a triangle by a plane
///
/// Vertices within `epsilon` of the plane belong to both halves; a triangle
/// lying entirely within the band is assigned to the back. Pieces keep the
/// winding of the input triangle.
pub fn split_triangle(triangle: &Triangle, plane: &Plane, epsilon: f64) -> Split {
    let verts = [triangle.v0, triangle.v1, triangle.v2];
    let dist = verts.map(|v| plane.signed_distance(&v));
    let sides = dist.map(|d| {
        if d > epsilon {
            Side::Front
        } else if d < -epsilon {
            Side::Back
        } else {
            Side::On
        }
    });

    let mut split = Split::default();

    if !sides.contains(&Side::Back) && sides.contains(&Side::Front) {
        split.front.push(*triangle);
        return split;
    }
    if !sides.contains(&Side::Front) {
        split.back.push(*triangle);
        return split;
    }

    // Walk the edges, emitting intersection points where an edge crosses
    let mut front: SmallVec<[Point3<f64>; 4]> = SmallVec::new();
    let mut back: SmallVec<[Point3<f64>; 4]> = SmallVec::new();

    for i in 0..3 {
        let j = (i + 1) % 3;
        let (vi, si, di) = (verts[i], sides[i], dist[i]);
        let (vj, sj, dj) = (verts[j], sides[j], dist[j]);

        match si {
            Side::Front => front.push(vi),
            Side::Back => back.push(vi),
            Side::On => {
                front.push(vi);
                back.push(vi);
            }
        }

        let crosses = matches!(
            (si, sj),
            (Side::Front, Side::Back) | (Side::Back, Side::Front)
        );
        if crosses {
            let t = di / (di - dj);
            let p = vi + (vj - vi) * t;
            front.push(p);
            back.push(p);
        }
    }

    fan_into(&front, &mut split.front);
    fan_into(&back, &mut split.back);
    split
}

/// Fan-triangulate a convex polygon, dropping slivers
fn fan_into(polygon: &[Point3<f64>], out: &mut TriangleVec) {
    if polygon.len() < 3 {
        return;
    }
    for i in 1..polygon.len() - 1 {
        let tri = Triangle::new(polygon[0], polygon[i], polygon[i + 1]);
        if !tri.is_degenerate(1e-14) {
            out.push(tri);
        }
    }
}

/// Check whether two axis-aligned boxes overlap (with padding)
#[inline]
pub fn bounds_overlap(
    a: &(Point3<f64>, Point3<f64>),
    b: &(Point3<f64>, Point3<f64>),
    padding: f64,
) -> bool {
    a.0.x <= b.1.x + padding
        && a.1.x + padding >= b.0.x
        && a.0.y <= b.1.y + padding
        && a.1.y + padding >= b.0.y
        && a.0.z <= b.1.z + padding
        && a.1.z + padding >= b.0.z
}

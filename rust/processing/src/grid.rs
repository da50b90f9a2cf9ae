// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Staggered slot grid layout
//!
//! Lays the board's slot lattice over a mesh face. The lattice always passes
//! exactly through the grid origin: every coordinate is computed as
//! `origin + step * spacing` from an integer step, never accumulated.

use crate::config::{GridParams, PegboardSpec};
use crate::error::{Error, Result};
use crate::plane::{BoundarySide, MountingPlane};
use nalgebra::{Point3, Vector3};
use pegmount_geometry::Mesh;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// One labelled position on the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    index: usize,
    position: Point3<f64>,
    label: String,
    row: usize,
    col: usize,
    staggered: bool,
}

impl Slot {
    fn new(index: usize, position: Point3<f64>, row: usize, col: usize) -> Self {
        Self {
            index,
            position,
            label: format!("S{}", index),
            row,
            col,
            staggered: col % 2 == 1,
        }
    }

    /// 1-based, column-major index
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    #[inline]
    pub fn is_staggered(&self) -> bool {
        self.staggered
    }
}

/// Slot lattice for one mesh/plane/boundary/offset combination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    plane: MountingPlane,
    boundary: BoundarySide,
    origin: Point3<f64>,
    offset: Vector3<f64>,
    spec: PegboardSpec,
    slots: Vec<Slot>,
}

impl Grid {
    /// Lay out the grid over `mesh`
    pub fn generate(mesh: &Mesh, params: &GridParams, spec: &PegboardSpec) -> Result<Self> {
        spec.validate()?;

        let (h, v, d) = params.plane.axes();
        let (min, max) = mesh.bounds();

        let anchor = if params.center { mesh.centroid() } else { min };
        let mut origin = anchor;
        origin[d] = match params.boundary {
            BoundarySide::Max => max[d],
            BoundarySide::Min => min[d],
        };
        origin += params.offset;

        let padding = spec.padding();
        let (h_min, h_max) = (min[h] - padding, max[h] + padding);
        let (v_min, v_max) = (min[v] - padding, max[v] + padding);

        let mut grid = Self {
            plane: params.plane,
            boundary: params.boundary,
            origin,
            offset: params.offset,
            spec: *spec,
            slots: Vec::new(),
        };

        let finite = [h_min, h_max, v_min, v_max]
            .iter()
            .chain(origin.coords.iter())
            .all(|c| c.is_finite());
        if !finite {
            warn!(plane = %params.plane, "Mesh bounds are not finite; grid is empty");
            return Ok(grid);
        }

        let hs = spec.horizontal_spacing;
        let vs = spec.vertical_spacing;

        // Whole spacings between the extent's start and the origin
        let k_h = ((origin[h] - h_min) / hs).trunc() as i64;
        let k_v = ((origin[v] - v_min) / vs).trunc() as i64;

        let mut index = 1;
        for col in 0usize.. {
            let h_coord = origin[h] + (col as i64 - k_h) as f64 * hs;
            if h_coord > h_max {
                break;
            }
            let stagger = if col % 2 == 1 { spec.stagger_offset } else { 0.0 };

            for row in 0usize.. {
                let v_coord = origin[v] + (row as i64 - k_v) as f64 * vs + stagger;
                if v_coord > v_max {
                    break;
                }

                let mut position = Point3::origin();
                position[h] = h_coord;
                position[v] = v_coord;
                position[d] = origin[d];

                grid.slots.push(Slot::new(index, position, row, col));
                index += 1;
            }
        }

        debug!(
            plane = %grid.plane,
            boundary = %grid.boundary,
            origin = ?grid.origin,
            slots = grid.slots.len(),
            "Generated staggered grid"
        );

        Ok(grid)
    }

    pub fn plane(&self) -> MountingPlane {
        self.plane
    }

    pub fn boundary(&self) -> BoundarySide {
        self.boundary
    }

    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    pub fn offset(&self) -> Vector3<f64> {
        self.offset
    }

    pub fn spec(&self) -> &PegboardSpec {
        &self.spec
    }

    /// All slots in numbering order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot by 1-based index
    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.index == index)
    }

    /// Slots for `indices`, silently skipping unknown ones
    pub fn get_many(&self, indices: &[usize]) -> Vec<&Slot> {
        indices.iter().filter_map(|&i| self.get(i)).collect()
    }

    /// Slots for `indices`, failing on the first unknown one
    pub fn require_many(&self, indices: &[usize]) -> Result<Vec<&Slot>> {
        indices
            .iter()
            .map(|&index| {
                self.get(index).ok_or(Error::SlotIndexOutOfRange {
                    index,
                    count: self.slots.len(),
                })
            })
            .collect()
    }

    /// Positions of the slots in `indices` (unknown indices skipped)
    pub fn positions(&self, indices: &[usize]) -> Vec<Point3<f64>> {
        self.get_many(indices).into_iter().map(Slot::position).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Pegboard Grid ===")?;
        writeln!(f, "Grid plane: {} ({})", self.plane, self.boundary)?;
        writeln!(
            f,
            "Origin: ({:.2}, {:.2}, {:.2})",
            self.origin.x, self.origin.y, self.origin.z
        )?;
        writeln!(
            f,
            "Offset: ({:.2}, {:.2}, {:.2})",
            self.offset.x, self.offset.y, self.offset.z
        )?;
        writeln!(f, "Total slots: {}", self.slots.len())?;
        writeln!(f, "Horizontal spacing: {}mm", self.spec.horizontal_spacing)?;
        writeln!(f, "Vertical spacing: {}mm", self.spec.vertical_spacing)?;
        write!(
            f,
            "Stagger offset: {}mm (every other column)",
            self.spec.stagger_offset
        )
    }
}

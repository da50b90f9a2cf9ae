// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Physical board constants and pipeline tunables

use crate::error::{Error, Result};
use crate::plane::{BoundarySide, MountingPlane};
use nalgebra::Vector3;
use pegmount_geometry::{BspEngine, ConvexClipEngine, EngineList, FaceClassifyEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cutters never get fewer sides than this
pub const MIN_CUTTER_SEGMENTS: usize = 32;

/// A clip whose mounting face sits further than this from its local origin
/// was not modelled anchored at the face; alignment still corrects it
pub const FLUSH_TOLERANCE: f64 = 0.1;

/// Physical pegboard dimensions in millimetres
///
/// `Default` is the IKEA Skådis board. Only the spacings, stagger, cutter
/// diameter and depth drive geometry; the slot and board sizes are carried
/// for front ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PegboardSpec {
    /// Centre-to-centre distance between columns
    pub horizontal_spacing: f64,
    /// Centre-to-centre distance between rows
    pub vertical_spacing: f64,
    /// Vertical shift applied to every odd column
    pub stagger_offset: f64,
    /// Bore diameter; √2·20 so a 20 mm square clip body turned 45° fits
    pub hole_diameter: f64,
    /// Default bore depth
    pub hole_depth: f64,
    pub slot_width: f64,
    pub slot_height: f64,
    pub slot_arc_radius: f64,
    pub board_thickness: f64,
}

impl Default for PegboardSpec {
    fn default() -> Self {
        Self {
            horizontal_spacing: 20.0,
            vertical_spacing: 40.0,
            stagger_offset: 20.0,
            hole_diameter: 28.284,
            hole_depth: 10.0,
            slot_width: 5.0,
            slot_height: 15.0,
            slot_arc_radius: 2.5,
            board_thickness: 5.0,
        }
    }
}

impl PegboardSpec {
    /// Skådis board (same as `Default`)
    pub fn skadis() -> Self {
        Self::default()
    }

    /// Load a board description from JSON; missing fields take Skådis values
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every geometric dimension is positive and finite
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
            ("hole_diameter", self.hole_diameter),
            ("hole_depth", self.hole_depth),
        ] {
            positive(name, value)?;
        }
        if !self.stagger_offset.is_finite() {
            return Err(Error::InvalidDimension {
                name: "stagger_offset",
                value: self.stagger_offset,
            });
        }
        Ok(())
    }

    /// Padding added around the mesh before laying out the lattice
    #[inline]
    pub fn padding(&self) -> f64 {
        self.horizontal_spacing.max(self.vertical_spacing)
    }
}

/// Fail unless `value` is a positive, finite number
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidDimension { name, value })
    }
}

/// Per-grid choices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    pub plane: MountingPlane,
    pub boundary: BoundarySide,
    /// Manual offset in world axes; the depth-axis component shifts the grid
    /// off the boundary
    pub offset: Vector3<f64>,
    /// Anchor the lattice at the mesh centroid instead of its minimum corner
    pub center: bool,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            plane: MountingPlane::XY,
            boundary: BoundarySide::Max,
            offset: Vector3::zeros(),
            center: true,
        }
    }
}

impl GridParams {
    pub fn new(plane: MountingPlane, boundary: BoundarySide) -> Self {
        Self {
            plane,
            boundary,
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: Vector3<f64>) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }
}

/// Pipeline tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Requested cutter sides, raised to [`MIN_CUTTER_SEGMENTS`] if lower
    pub cutter_segments: usize,
    /// Distance off a face at which the clip and classify engines probe
    /// inside/outside
    pub probe_offset: f64,
    /// Flush-alignment correction above which a warning is logged
    pub flush_tolerance: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            cutter_segments: MIN_CUTTER_SEGMENTS,
            probe_offset: 1e-4,
            flush_tolerance: FLUSH_TOLERANCE,
        }
    }
}

impl PipelineOptions {
    /// Effective cutter side count
    #[inline]
    pub fn segments(&self) -> usize {
        self.cutter_segments.max(MIN_CUTTER_SEGMENTS)
    }

    /// Default engine priority list built with these options
    pub fn engines(&self) -> EngineList {
        let clip = ConvexClipEngine {
            probe_offset: self.probe_offset,
            ..ConvexClipEngine::new()
        };
        let classify = FaceClassifyEngine {
            probe_offset: self.probe_offset,
            ..FaceClassifyEngine::new()
        };
        vec![Arc::new(BspEngine::new()), Arc::new(clip), Arc::new(classify)]
    }
}

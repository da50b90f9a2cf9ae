// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slot batch orchestration
//!
//! Runs every cut before any insertion. Per-slot failures are absorbed and
//! reported; only caller contract violations (mismatched depth lists, invalid
//! dimensions) fail the whole call, and they are checked before any geometry
//! work starts.

use crate::config::PipelineOptions;
use crate::cut::cut;
use crate::cutter::CuttingSpec;
use crate::direction::InsertionDirection;
use crate::error::{Error, Result};
use crate::insert::{insert, ClipTemplate, InsertMethod, InsertSpec};
use nalgebra::Point3;
use pegmount_geometry::{BooleanEngine, Mesh};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Cut depths for a batch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Depths {
    /// No cutting
    #[default]
    None,
    /// Same depth for every position
    Uniform(f64),
    /// One depth per position
    PerSlot(Vec<f64>),
}

impl Depths {
    /// One depth per position, zero meaning "do not cut"
    pub fn resolve(&self, count: usize) -> Result<Vec<f64>> {
        let depths = match self {
            Depths::None => vec![0.0; count],
            Depths::Uniform(depth) => vec![*depth; count],
            Depths::PerSlot(depths) => {
                if depths.len() != count {
                    return Err(Error::DepthCountMismatch {
                        positions: count,
                        depths: depths.len(),
                    });
                }
                depths.clone()
            }
        };

        if let Some(bad) = depths.iter().find(|d| !(d.is_finite() && **d >= 0.0)) {
            return Err(Error::InvalidDimension {
                name: "depth",
                value: *bad,
            });
        }
        Ok(depths)
    }
}

impl From<f64> for Depths {
    fn from(depth: f64) -> Self {
        Depths::Uniform(depth)
    }
}

impl From<Vec<f64>> for Depths {
    fn from(depths: Vec<f64>) -> Self {
        Depths::PerSlot(depths)
    }
}

/// One batch request
#[derive(Debug, Clone)]
pub struct SlotBatch<'a> {
    pub positions: Vec<Point3<f64>>,
    pub depths: Depths,
    pub clip: Option<&'a ClipTemplate>,
    pub direction: InsertionDirection,
    /// Insert only, leave the mesh uncut
    pub skip_holes: bool,
    /// Extra clip turn about the insertion axis, degrees
    pub clip_rotation: f64,
}

impl<'a> SlotBatch<'a> {
    pub fn new(positions: Vec<Point3<f64>>, direction: InsertionDirection) -> Self {
        Self {
            positions,
            depths: Depths::None,
            clip: None,
            direction,
            skip_holes: false,
            clip_rotation: 0.0,
        }
    }

    pub fn with_depths(mut self, depths: impl Into<Depths>) -> Self {
        self.depths = depths.into();
        self
    }

    pub fn with_clip(mut self, clip: &'a ClipTemplate) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn skip_holes(mut self, skip: bool) -> Self {
        self.skip_holes = skip;
        self
    }

    pub fn with_clip_rotation(mut self, degrees: f64) -> Self {
        self.clip_rotation = degrees;
        self
    }
}

/// What happened to a slot's bore
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CutStatus {
    Cut { engine: &'static str },
    Failed { errors: Vec<String> },
    Skipped,
}

/// What happened to a slot's clip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsertStatus {
    Inserted { engine: &'static str },
    /// Degraded output: appended without a boolean merge
    Concatenated { errors: Vec<String> },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotReport {
    pub position: Point3<f64>,
    pub depth: f64,
    pub cut: CutStatus,
    pub insert: InsertStatus,
}

/// Per-slot outcome of a batch, in position order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub slots: Vec<SlotReport>,
}

impl BatchReport {
    pub fn cuts_succeeded(&self) -> usize {
        self.count(|s| matches!(s.cut, CutStatus::Cut { .. }))
    }

    pub fn cuts_failed(&self) -> usize {
        self.count(|s| matches!(s.cut, CutStatus::Failed { .. }))
    }

    pub fn inserts_merged(&self) -> usize {
        self.count(|s| matches!(s.insert, InsertStatus::Inserted { .. }))
    }

    pub fn inserts_degraded(&self) -> usize {
        self.count(|s| matches!(s.insert, InsertStatus::Concatenated { .. }))
    }

    /// No failed cut and no degraded insert
    pub fn is_clean(&self) -> bool {
        self.cuts_failed() == 0 && self.inserts_degraded() == 0
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn count(&self, pred: impl Fn(&SlotReport) -> bool) -> usize {
        self.slots.iter().filter(|s| pred(s)).count()
    }
}

/// Cut and fill every position of `batch`
///
/// `diameter` is the cutter diameter. The working mesh is threaded through
/// each stage and returned with the report.
pub fn process_slots(
    mesh: Mesh,
    batch: &SlotBatch<'_>,
    diameter: f64,
    engines: &[Arc<dyn BooleanEngine>],
    options: &PipelineOptions,
) -> Result<(Mesh, BatchReport)> {
    let count = batch.positions.len();
    let depths = if batch.skip_holes {
        vec![0.0; count]
    } else {
        batch.depths.resolve(count)?
    };

    // Validate every cut up front so nothing is half-applied
    let cuts = batch
        .positions
        .iter()
        .zip(&depths)
        .map(|(position, &depth)| {
            if depth > 0.0 {
                CuttingSpec::new(*position, depth, diameter, batch.direction).map(Some)
            } else {
                Ok(None)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let mut report = BatchReport {
        slots: batch
            .positions
            .iter()
            .zip(&depths)
            .map(|(position, &depth)| SlotReport {
                position: *position,
                depth,
                cut: CutStatus::Skipped,
                insert: InsertStatus::Skipped,
            })
            .collect(),
    };

    if count == 0 {
        return Ok((mesh, report));
    }

    let start = Instant::now();
    let mut working = mesh;

    for (i, spec) in cuts.iter().enumerate() {
        let Some(spec) = spec else { continue };
        info!(slot = i + 1, of = count, "Cut");
        let outcome = cut(working, spec, engines, options.segments());
        report.slots[i].cut = match outcome.engine {
            Some(engine) => CutStatus::Cut { engine },
            None => CutStatus::Failed {
                errors: outcome.errors,
            },
        };
        working = outcome.mesh;
    }

    if let Some(template) = batch.clip {
        for (i, position) in batch.positions.iter().enumerate() {
            info!(slot = i + 1, of = count, "Insert");
            let spec = InsertSpec::new(*position, batch.direction)
                .with_rotation(batch.clip_rotation);
            let outcome = insert(working, template, &spec, engines, options);
            report.slots[i].insert = match outcome.method {
                InsertMethod::Engine(engine) => InsertStatus::Inserted { engine },
                InsertMethod::Concatenated => InsertStatus::Concatenated {
                    errors: outcome.errors,
                },
            };
            working = outcome.mesh;
        }
    }

    if !report.is_clean() {
        warn!(
            cuts_failed = report.cuts_failed(),
            inserts_degraded = report.inserts_degraded(),
            "Batch finished with failures"
        );
    }
    info!(
        slots = count,
        cuts = report.cuts_succeeded(),
        inserts = report.inserts_merged(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Batch complete"
    );

    Ok((working, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::MountingPlane;

    #[test]
    fn test_uniform_depth_broadcasts() {
        let depths = Depths::Uniform(10.0).resolve(5).unwrap();
        assert_eq!(depths, Depths::PerSlot(vec![10.0; 5]).resolve(5).unwrap());
    }

    #[test]
    fn test_depth_count_mismatch() {
        let err = Depths::PerSlot(vec![5.0, 6.0]).resolve(3).unwrap_err();
        assert!(matches!(
            err,
            Error::DepthCountMismatch {
                positions: 3,
                depths: 2
            }
        ));
    }

    #[test]
    fn test_negative_depth_rejected() {
        assert!(Depths::Uniform(-1.0).resolve(2).is_err());
        assert!(Depths::PerSlot(vec![1.0, f64::NAN]).resolve(2).is_err());
    }

    #[test]
    fn test_mismatch_fails_before_geometry() {
        let batch = SlotBatch::new(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            MountingPlane::XY.into(),
        )
        .with_depths(vec![10.0]);
        let result = process_slots(
            Mesh::new(),
            &batch,
            28.284,
            &[],
            &PipelineOptions::default(),
        );
        assert!(matches!(result, Err(Error::DepthCountMismatch { .. })));
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mesh = pegmount_geometry::box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let batch = SlotBatch::new(Vec::new(), MountingPlane::XY.into()).with_depths(10.0);
        let (out, report) =
            process_slots(mesh.clone(), &batch, 28.284, &[], &PipelineOptions::default())
                .unwrap();
        assert_eq!(out, mesh);
        assert!(report.slots.is_empty());
    }

    #[test]
    fn test_skip_holes_ignores_depths() {
        let mesh = pegmount_geometry::box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let batch = SlotBatch::new(vec![Point3::origin()], MountingPlane::XY.into())
            .with_depths(vec![1.0, 2.0])
            .skip_holes(true);
        let (out, report) =
            process_slots(mesh.clone(), &batch, 28.284, &[], &PipelineOptions::default())
                .unwrap();
        assert_eq!(out, mesh);
        assert_eq!(report.slots[0].cut, CutStatus::Skipped);
        assert_eq!(report.slots[0].depth, 0.0);
    }
}

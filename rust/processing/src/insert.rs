// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clip orientation and boolean union stage
//!
//! A clip template is modelled with its mounting face normal along one axis
//! (its thinnest by default). Inserting a clip copies the template, turns it
//! onto the insertion direction, slides it so the mounting face lies flush on
//! the slot position and unions it into the target.

use crate::config::PipelineOptions;
use crate::direction::InsertionDirection;
use crate::plane::MountingPlane;
use nalgebra::{Point3, Rotation3, Unit, Vector3};
use pegmount_geometry::{
    axis_rotation, repair, rotation_about, rotation_between, run_engines, Axis, BooleanEngine,
    BooleanOp, Mesh, RepairReport,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reusable clip solid
///
/// Never mutated by insertion; every insert works on a copy.
#[derive(Debug, Clone)]
pub struct ClipTemplate {
    mesh: Mesh,
    mounting_axis: Unit<Vector3<f64>>,
}

impl ClipTemplate {
    /// Template whose mounting face normal is +Y
    pub fn new(mesh: Mesh) -> Self {
        Self::with_axis(mesh, Vector3::y_axis())
    }

    pub fn with_axis(mesh: Mesh, mounting_axis: Unit<Vector3<f64>>) -> Self {
        Self {
            mesh,
            mounting_axis,
        }
    }

    /// Template whose mounting axis is its thinnest bounding-box axis
    pub fn detect(mesh: Mesh) -> Self {
        let (min, max) = mesh.bounds();
        let extent = max - min;
        let thin = Axis::from_index(extent.imin());
        debug!(axis = ?thin, extent = ?extent, "Detected clip mounting axis");
        Self::with_axis(mesh, thin.unit())
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn mounting_axis(&self) -> Unit<Vector3<f64>> {
        self.mounting_axis
    }

    /// Extent along the mounting axis
    pub fn thickness(&self) -> f64 {
        let axis = self.mounting_axis.into_inner();
        let lo = self.mesh.min_projection(&axis).unwrap_or(0.0);
        let hi = self.mesh.min_projection(&-axis).map(|v| -v).unwrap_or(0.0);
        hi - lo
    }
}

/// Where and how to place one clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InsertSpec {
    /// Slot position on the mounting surface
    pub position: Point3<f64>,
    pub direction: InsertionDirection,
    /// Extra turn about the insertion axis, degrees
    pub rotation_deg: f64,
}

impl InsertSpec {
    pub fn new(position: Point3<f64>, direction: InsertionDirection) -> Self {
        Self {
            position,
            direction,
            rotation_deg: 0.0,
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_deg = degrees;
        self
    }
}

/// How the clip ended up in the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "engine", rename_all = "snake_case")]
pub enum InsertMethod {
    /// A boolean engine produced a merged solid
    Engine(&'static str),
    /// Every engine failed; the clip was appended without merging
    Concatenated,
}

impl InsertMethod {
    /// True for the degraded concatenation fallback
    pub fn is_degraded(&self) -> bool {
        matches!(self, InsertMethod::Concatenated)
    }
}

/// Result of one insertion
#[derive(Debug, Clone)]
pub struct InsertOutcome {
    pub mesh: Mesh,
    pub method: InsertMethod,
    /// Projection minimum of the oriented clip before flush translation
    pub flush_correction: f64,
    pub clip_repair: Option<RepairReport>,
    pub target_repair: Option<RepairReport>,
    pub errors: Vec<String>,
}

/// Rotation that carries the template into world orientation
fn orientation(template: &ClipTemplate, spec: &InsertSpec) -> Rotation3<f64> {
    let base = match spec.direction {
        InsertionDirection::NormalAligned(normal) => {
            // Mounting face points out of the material
            rotation_between(&template.mounting_axis, &-normal.into_inner())
        }
        InsertionDirection::PlaneAligned(plane) => {
            let to_y = rotation_between(&template.mounting_axis, &Vector3::y());
            let turn = match plane {
                MountingPlane::XY => axis_rotation(Axis::X, -90.0),
                MountingPlane::XZ => Rotation3::identity(),
                MountingPlane::YZ => axis_rotation(Axis::Z, -90.0),
            };
            turn * to_y
        }
    };

    if spec.rotation_deg != 0.0 {
        rotation_about(&spec.direction.rotation_axis(), spec.rotation_deg) * base
    } else {
        base
    }
}

/// Copy of the template oriented and flush-aligned for `spec`
///
/// Returns the placed clip and the projection minimum that was corrected.
/// After placement the clip's minimum projection onto the inward direction
/// equals the slot position's projection.
pub fn place_clip(
    template: &ClipTemplate,
    spec: &InsertSpec,
    options: &PipelineOptions,
) -> (Mesh, f64) {
    let mut clip = template.mesh.clone();
    clip.rotate(&orientation(template, spec));

    let inward = spec.direction.inward().into_inner();
    let min_proj = clip.min_projection(&inward).unwrap_or(0.0);
    if min_proj.abs() > options.flush_tolerance {
        warn!(
            offset = min_proj,
            tolerance = options.flush_tolerance,
            "Clip mounting face is not at its origin; correcting flush offset"
        );
    }

    clip.translate(&(spec.position.coords - inward * min_proj));
    (clip, min_proj)
}

fn repair_if_open(mesh: Mesh, what: &'static str) -> (Mesh, Option<RepairReport>) {
    if mesh.is_empty() || mesh.is_watertight() {
        return (mesh, None);
    }
    let (mesh, report) = repair(mesh);
    if report.watertight {
        debug!(what, changed = report.had_changes(), "Repaired to a closed solid");
    } else {
        warn!(what, changed = report.had_changes(), "Still open after repair; trying union anyway");
    }
    (mesh, Some(report))
}

/// Union an oriented copy of `template` into `mesh`
///
/// Never fails: when no engine succeeds the clip is concatenated onto the
/// mesh and the outcome is marked [`InsertMethod::Concatenated`].
pub fn insert(
    mesh: Mesh,
    template: &ClipTemplate,
    spec: &InsertSpec,
    engines: &[Arc<dyn BooleanEngine>],
    options: &PipelineOptions,
) -> InsertOutcome {
    info!(position = ?spec.position, rotation = spec.rotation_deg, "Inserting clip");

    let (clip, flush_correction) = place_clip(template, spec, options);
    let (clip, clip_repair) = repair_if_open(clip, "clip");
    let (mesh, target_repair) = repair_if_open(mesh, "target");

    match run_engines(engines, BooleanOp::Union, &mesh, &clip) {
        Ok(success) => {
            info!(engine = success.engine, "Clip inserted");
            InsertOutcome {
                mesh: success.mesh,
                method: InsertMethod::Engine(success.engine),
                flush_correction,
                clip_repair,
                target_repair,
                errors: Vec::new(),
            }
        }
        Err(errors) => {
            warn!(
                attempts = errors.len(),
                "All boolean engines failed; appending clip without merging"
            );
            let mut merged = mesh;
            merged.merge(&clip);
            InsertOutcome {
                mesh: merged,
                method: InsertMethod::Concatenated,
                flush_correction,
                clip_repair,
                target_repair,
                errors: errors.iter().map(ToString::to_string).collect(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pegmount_geometry::{
        box_mesh, cylinder_mesh, default_engines, ConvexClipEngine, Error, Result,
    };

    struct Refuse;

    impl BooleanEngine for Refuse {
        fn name(&self) -> &'static str {
            "refuse"
        }
        fn difference(&self, _: &Mesh, _: &Mesh) -> Result<Mesh> {
            Err(Error::boolean("refuse", "difference", "no"))
        }
        fn union(&self, _: &Mesh, _: &Mesh) -> Result<Mesh> {
            Err(Error::boolean("refuse", "union", "no"))
        }
    }

    /// 6 x 2 x 4 block, thin along Y, mounting face on y = 0
    fn clip() -> ClipTemplate {
        ClipTemplate::new(box_mesh(
            Point3::new(-3.0, 0.0, -2.0),
            Point3::new(3.0, 2.0, 2.0),
        ))
    }

    fn projection_range(mesh: &Mesh, n: &Vector3<f64>) -> (f64, f64) {
        let lo = mesh.min_projection(n).unwrap();
        let hi = -mesh.min_projection(&-n).unwrap();
        (lo, hi)
    }

    #[test]
    fn test_detect_thin_axis() {
        let template = ClipTemplate::detect(box_mesh(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 5.0, 1.5),
        ));
        assert_eq!(template.mounting_axis(), Vector3::z_axis());
        assert_relative_eq!(template.thickness(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_placement_is_flush() {
        let options = PipelineOptions::default();
        let position = Point3::new(10.0, 20.0, 30.0);
        for plane in MountingPlane::ALL {
            let spec = InsertSpec::new(position, plane.into());
            let (placed, correction) = place_clip(&clip(), &spec, &options);
            let n = plane.inward().into_inner();
            let (lo, hi) = projection_range(&placed, &n);
            assert_relative_eq!(lo, position.coords.dot(&n), epsilon = 1e-9);
            assert_relative_eq!(hi - lo, 2.0, epsilon = 1e-9);
            assert!(correction.abs() <= 2.0 + 1e-9);
        }
    }

    #[test]
    fn test_normal_placement_is_flush() {
        let options = PipelineOptions::default();
        let position = Point3::new(-4.0, 1.0, 7.5);
        for raw in [
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, -2.0, 0.5),
        ] {
            let direction = InsertionDirection::from_normal(raw).unwrap();
            let spec = InsertSpec::new(position, direction).with_rotation(30.0);
            let (placed, _) = place_clip(&clip(), &spec, &options);
            let n = direction.inward().into_inner();
            let (lo, hi) = projection_range(&placed, &n);
            assert_relative_eq!(lo, position.coords.dot(&n), epsilon = 1e-9);
            // Clip body extends inward by its thickness
            assert_relative_eq!(hi - lo, 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_template_untouched() {
        let template = clip();
        let before = template.mesh().clone();
        let spec = InsertSpec::new(Point3::new(5.0, 5.0, 5.0), MountingPlane::XY.into());
        let _ = insert(
            Mesh::new(),
            &template,
            &spec,
            &[Arc::new(Refuse) as Arc<dyn BooleanEngine>],
            &PipelineOptions::default(),
        );
        assert_eq!(template.mesh(), &before);
    }

    #[test]
    fn test_failed_union_concatenates() {
        let target = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(20.0, 20.0, 10.0));
        let spec = InsertSpec::new(Point3::new(10.0, 10.0, 10.0), MountingPlane::XY.into());
        let engines: Vec<Arc<dyn BooleanEngine>> = vec![Arc::new(Refuse), Arc::new(Refuse)];
        let outcome = insert(
            target.clone(),
            &clip(),
            &spec,
            &engines,
            &PipelineOptions::default(),
        );

        assert_eq!(outcome.method, InsertMethod::Concatenated);
        assert!(outcome.method.is_degraded());
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.mesh.triangle_count(), 24);
        assert_eq!(outcome.mesh.vertex_count(), 16);
        assert!(outcome.target_repair.is_none());
    }

    #[test]
    fn test_insert_closes_engine_bored_target() {
        let slab = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(40.0, 40.0, 10.0));
        let mut cutter = cylinder_mesh(6.0, 6.0, 32).unwrap();
        cutter.translate(&Vector3::new(20.0, 20.0, 7.0));
        let bored = ConvexClipEngine::new().difference(&slab, &cutter).unwrap();
        assert!(!bored.is_watertight());

        let spec = InsertSpec::new(Point3::new(20.0, 20.0, 10.0), MountingPlane::XY.into());
        let outcome = insert(
            bored,
            &clip(),
            &spec,
            &default_engines(),
            &PipelineOptions::default(),
        );

        let repair = outcome.target_repair.unwrap();
        assert!(repair.watertight);
        assert!(repair.cracks_stitched > 0);
        assert!(!outcome.method.is_degraded());
        assert!(outcome.mesh.contains_point(&Point3::new(20.0, 20.0, 9.0)));
        assert!(!outcome.mesh.contains_point(&Point3::new(20.0, 20.0, 6.0)));
    }
}

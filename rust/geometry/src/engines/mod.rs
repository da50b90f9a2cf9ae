// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean engines
//!
//! Each engine implements [`BooleanEngine`]. Callers hold an ordered list and
//! try engines one after another until one succeeds ([`run_engines`]).

mod bsp;
mod classify;
mod clip;

pub use bsp::BspEngine;
pub use classify::FaceClassifyEngine;
pub use clip::ConvexClipEngine;

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use nalgebra::Point3;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Boolean operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Difference,
    Union,
}

impl BooleanOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BooleanOp::Difference => "difference",
            BooleanOp::Union => "union",
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean engine trait
/// Each engine is one back-end able to combine two closed meshes
pub trait BooleanEngine: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;

    /// `a` minus `b`
    fn difference(&self, a: &Mesh, b: &Mesh) -> Result<Mesh>;

    /// `a` plus `b`
    fn union(&self, a: &Mesh, b: &Mesh) -> Result<Mesh>;

    fn apply(&self, op: BooleanOp, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        match op {
            BooleanOp::Difference => self.difference(a, b),
            BooleanOp::Union => self.union(a, b),
        }
    }
}

/// Shared, ordered engine list
pub type EngineList = Vec<Arc<dyn BooleanEngine>>;

/// Engines in default priority order: BSP, convex clip, face classification
pub fn default_engines() -> EngineList {
    vec![
        Arc::new(BspEngine::new()),
        Arc::new(ConvexClipEngine::new()),
        Arc::new(FaceClassifyEngine::new()),
    ]
}

/// Result of the first engine that succeeded
#[derive(Debug, Clone)]
pub struct EngineSuccess {
    pub mesh: Mesh,
    pub engine: &'static str,
}

/// Relative volume slack when checking an engine's result
const VOLUME_TOLERANCE: f64 = 1e-6;

/// Facts about the operands every accepted result must agree with
struct Expectations {
    volume_a: f64,
    volume_b: f64,
    /// A point inside `b`, and whether `a` contains it too
    inside_b: Option<(Point3<f64>, bool)>,
}

impl Expectations {
    fn new(op: BooleanOp, a: &Mesh, b: &Mesh) -> Self {
        let inside_b = b.interior_point().map(|p| {
            let in_a = op == BooleanOp::Difference && a.contains_point(&p);
            (p, in_a)
        });
        Self {
            volume_a: a.volume(),
            volume_b: b.volume(),
            inside_b,
        }
    }

    /// Reject results that silently dropped or kept the second operand
    fn check(&self, op: BooleanOp, result: &Mesh) -> std::result::Result<(), String> {
        let volume = result.volume();
        let slack = VOLUME_TOLERANCE * self.volume_a.abs().max(self.volume_b.abs()).max(1.0);

        match op {
            BooleanOp::Union => {
                let floor = self.volume_a.max(self.volume_b) - slack;
                if volume < floor {
                    return Err(format!(
                        "result volume {:.6} below operand volume {:.6}",
                        volume,
                        floor + slack
                    ));
                }
                if let Some((p, _)) = self.inside_b {
                    if !result.contains_point(&p) {
                        return Err(format!(
                            "second operand missing at ({:.3}, {:.3}, {:.3})",
                            p.x, p.y, p.z
                        ));
                    }
                }
            }
            BooleanOp::Difference => {
                if volume > self.volume_a + slack {
                    return Err(format!(
                        "result volume {:.6} exceeds first operand {:.6}",
                        volume, self.volume_a
                    ));
                }
                if let Some((p, true)) = self.inside_b {
                    if result.contains_point(&p) {
                        return Err(format!(
                            "material kept at ({:.3}, {:.3}, {:.3})",
                            p.x, p.y, p.z
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Try `engines` in order and return the first successful result
///
/// A result only counts as a success once it passes a volume and containment
/// check against the operands; a rejected result is recorded as that engine's
/// failure. Every failure is logged and collected; the error list is returned
/// when no engine succeeds. Inputs are never modified.
pub fn run_engines(
    engines: &[Arc<dyn BooleanEngine>],
    op: BooleanOp,
    a: &Mesh,
    b: &Mesh,
) -> std::result::Result<EngineSuccess, Vec<Error>> {
    let mut failures = Vec::with_capacity(engines.len());
    let mut expected: Option<Expectations> = None;

    for engine in engines {
        let start = Instant::now();
        let outcome = engine.apply(op, a, b).and_then(|mesh| {
            let expected = expected.get_or_insert_with(|| Expectations::new(op, a, b));
            expected
                .check(op, &mesh)
                .map(|()| mesh)
                .map_err(|reason| Error::boolean(engine.name(), op.as_str(), reason))
        });

        match outcome {
            Ok(mesh) => {
                debug!(
                    engine = engine.name(),
                    op = op.as_str(),
                    triangles = mesh.triangle_count(),
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Boolean succeeded"
                );
                return Ok(EngineSuccess {
                    mesh,
                    engine: engine.name(),
                });
            }
            Err(e) => {
                warn!(engine = engine.name(), op = op.as_str(), error = %e, "Boolean engine failed");
                failures.push(e);
            }
        }
    }

    Err(failures)
}

/// Reject empty operands before any engine work
pub(crate) fn check_operands(engine: &'static str, op: BooleanOp, a: &Mesh, b: &Mesh) -> Result<()> {
    if a.is_empty() {
        return Err(Error::EmptyMesh(format!("{} {}: first operand", engine, op)));
    }
    if b.is_empty() {
        return Err(Error::EmptyMesh(format!("{} {}: second operand", engine, op)));
    }
    Ok(())
}

/// Treat an empty result as a failed attempt
pub(crate) fn non_empty(engine: &'static str, op: BooleanOp, mesh: Mesh) -> Result<Mesh> {
    if mesh.is_empty() {
        return Err(Error::boolean(engine, op.as_str(), "result has no faces"));
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl BooleanEngine for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn difference(&self, _a: &Mesh, _b: &Mesh) -> Result<Mesh> {
            Err(Error::boolean("failing", "difference", "always fails"))
        }
        fn union(&self, _a: &Mesh, _b: &Mesh) -> Result<Mesh> {
            Err(Error::boolean("failing", "union", "always fails"))
        }
    }

    struct Echo;

    impl BooleanEngine for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }
        fn difference(&self, a: &Mesh, _b: &Mesh) -> Result<Mesh> {
            Ok(a.clone())
        }
        fn union(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
            let mut out = a.clone();
            out.merge(b);
            Ok(out)
        }
    }

    /// Returns the first operand untouched for both operations
    struct DropsSecond;

    impl BooleanEngine for DropsSecond {
        fn name(&self) -> &'static str {
            "drops-second"
        }
        fn difference(&self, a: &Mesh, _b: &Mesh) -> Result<Mesh> {
            Ok(a.clone())
        }
        fn union(&self, a: &Mesh, _b: &Mesh) -> Result<Mesh> {
            Ok(a.clone())
        }
    }

    fn unit_box(x: f64) -> Mesh {
        crate::primitives::box_mesh(Point3::new(x, 0.0, 0.0), Point3::new(x + 1.0, 1.0, 1.0))
    }

    #[test]
    fn test_first_success_wins() {
        let engines: EngineList = vec![Arc::new(Failing), Arc::new(Echo), Arc::new(Failing)];
        let ok = run_engines(&engines, BooleanOp::Union, &unit_box(0.0), &unit_box(5.0)).unwrap();
        assert_eq!(ok.engine, "echo");
        assert_eq!(ok.mesh.triangle_count(), 24);
    }

    #[test]
    fn test_union_missing_second_operand_is_rejected() {
        let engines: EngineList = vec![Arc::new(DropsSecond), Arc::new(Echo)];
        let ok = run_engines(&engines, BooleanOp::Union, &unit_box(0.0), &unit_box(5.0)).unwrap();
        assert_eq!(ok.engine, "echo");

        let errors = run_engines(&engines[..1], BooleanOp::Union, &unit_box(0.0), &unit_box(5.0))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("drops-second"));
    }

    #[test]
    fn test_difference_keeping_material_is_rejected() {
        let big = crate::primitives::box_mesh(Point3::origin(), Point3::new(4.0, 4.0, 4.0));
        let tool = crate::primitives::box_mesh(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0));
        let engines: EngineList = vec![Arc::new(DropsSecond)];
        assert!(run_engines(&engines, BooleanOp::Difference, &big, &tool).is_err());

        // A tool that misses the part leaves nothing to remove
        let ok = run_engines(&engines, BooleanOp::Difference, &big, &unit_box(10.0)).unwrap();
        assert_eq!(ok.engine, "drops-second");
    }

    #[test]
    fn test_difference_gaining_volume_is_rejected() {
        struct Grows;
        impl BooleanEngine for Grows {
            fn name(&self) -> &'static str {
                "grows"
            }
            fn difference(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
                let mut out = a.clone();
                out.merge(b);
                Ok(out)
            }
            fn union(&self, a: &Mesh, _b: &Mesh) -> Result<Mesh> {
                Ok(a.clone())
            }
        }
        let engines: EngineList = vec![Arc::new(Grows)];
        let errors = run_engines(&engines, BooleanOp::Difference, &unit_box(0.0), &unit_box(5.0))
            .unwrap_err();
        assert!(errors[0].to_string().contains("exceeds"));
    }

    #[test]
    fn test_all_failures_collected() {
        let engines: EngineList = vec![Arc::new(Failing), Arc::new(Failing)];
        let a = Mesh::new();
        let errors = run_engines(&engines, BooleanOp::Difference, &a, &a).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_default_priority_order() {
        let names: Vec<_> = default_engines().iter().map(|e| e.name()).collect();
        assert_eq!(names, ["bsp", "convex-clip", "face-classify"]);
    }
}

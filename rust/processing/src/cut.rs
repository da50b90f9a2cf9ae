// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean cut stage

use crate::cutter::{build_cutter, CuttingSpec};
use pegmount_geometry::{run_engines, BooleanEngine, BooleanOp, Mesh};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one cut attempt
#[derive(Debug, Clone)]
pub struct CutOutcome {
    /// The bored mesh, or the untouched input when every engine failed
    pub mesh: Mesh,
    /// Engine that produced the result
    pub engine: Option<&'static str>,
    /// Why each engine (or cutter construction) failed
    pub errors: Vec<String>,
}

impl CutOutcome {
    pub fn succeeded(&self) -> bool {
        self.engine.is_some()
    }
}

/// Subtract the cutter described by `spec` from `mesh`
///
/// Never fails: when no engine succeeds the input mesh is handed back
/// unchanged and the outcome carries the reasons.
pub fn cut(
    mesh: Mesh,
    spec: &CuttingSpec,
    engines: &[Arc<dyn BooleanEngine>],
    segments: usize,
) -> CutOutcome {
    info!(
        position = ?spec.position,
        depth = spec.depth,
        diameter = spec.diameter,
        "Cutting hole"
    );

    let cutter = match build_cutter(spec, segments) {
        Ok(cutter) => cutter,
        Err(e) => {
            warn!(error = %e, "Could not build cutter; mesh left unchanged");
            return CutOutcome {
                mesh,
                engine: None,
                errors: vec![e.to_string()],
            };
        }
    };

    match run_engines(engines, BooleanOp::Difference, &mesh, &cutter) {
        Ok(success) => {
            info!(engine = success.engine, "Hole cut");
            CutOutcome {
                mesh: success.mesh,
                engine: Some(success.engine),
                errors: Vec::new(),
            }
        }
        Err(errors) => {
            warn!(attempts = errors.len(), "All boolean engines failed; mesh left unchanged");
            CutOutcome {
                mesh,
                engine: None,
                errors: errors.iter().map(ToString::to_string).collect(),
            }
        }
    }
}

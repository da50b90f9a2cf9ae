// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mounting pipeline
//!
//! Bundles the pegboard dimensions, tunables and engine priority list so a
//! caller can go from mesh to grid to bored-and-filled mesh.

use crate::batch::{process_slots, BatchReport, SlotBatch};
use crate::config::{GridParams, PegboardSpec, PipelineOptions};
use crate::cut::{cut, CutOutcome};
use crate::cutter::CuttingSpec;
use crate::direction::InsertionDirection;
use crate::error::Result;
use crate::grid::Grid;
use crate::insert::{insert, ClipTemplate, InsertOutcome, InsertSpec};
use crate::selection::select;
use nalgebra::Point3;
use pegmount_geometry::{EngineList, Mesh};

/// Pegboard mounting pipeline
#[derive(Clone)]
pub struct MountingPipeline {
    spec: PegboardSpec,
    options: PipelineOptions,
    engines: EngineList,
}

impl MountingPipeline {
    /// Pipeline with default options and engine order
    pub fn new(spec: PegboardSpec) -> Result<Self> {
        Self::with_options(spec, PipelineOptions::default())
    }

    pub fn with_options(spec: PegboardSpec, options: PipelineOptions) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            spec,
            engines: options.engines(),
            options,
        })
    }

    /// Replace the engine priority list
    pub fn with_engines(mut self, engines: EngineList) -> Self {
        self.engines = engines;
        self
    }

    pub fn spec(&self) -> &PegboardSpec {
        &self.spec
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Engine names in priority order
    pub fn engine_names(&self) -> Vec<&'static str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    pub fn grid(&self, mesh: &Mesh, params: &GridParams) -> Result<Grid> {
        Grid::generate(mesh, params, &self.spec)
    }

    /// Positions for a selection string such as `1,4,7-9`
    ///
    /// Numbers outside the grid are logged and dropped.
    pub fn select_positions(&self, grid: &Grid, input: &str) -> Result<Vec<Point3<f64>>> {
        let selection = select(input, grid.len())?;
        Ok(grid.positions(&selection.valid))
    }

    /// Bore one hole of the board's hole diameter
    pub fn cut(
        &self,
        mesh: Mesh,
        position: Point3<f64>,
        depth: f64,
        direction: InsertionDirection,
    ) -> Result<CutOutcome> {
        let spec = CuttingSpec::new(position, depth, self.spec.hole_diameter, direction)?;
        Ok(cut(mesh, &spec, &self.engines, self.options.segments()))
    }

    pub fn insert(&self, mesh: Mesh, template: &ClipTemplate, spec: &InsertSpec) -> InsertOutcome {
        insert(mesh, template, spec, &self.engines, &self.options)
    }

    /// Cut then fill every slot in `batch`
    pub fn process(&self, mesh: Mesh, batch: &SlotBatch<'_>) -> Result<(Mesh, BatchReport)> {
        process_slots(
            mesh,
            batch,
            self.spec.hole_diameter,
            &self.engines,
            &self.options,
        )
    }
}

impl std::fmt::Debug for MountingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountingPipeline")
            .field("spec", &self.spec)
            .field("options", &self.options)
            .field("engines", &self.engine_names())
            .finish()
    }
}

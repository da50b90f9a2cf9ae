// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pegmount Processing
//!
//! Lays a staggered pegboard slot grid over a mesh face, bores cylindrical
//! holes at chosen slots and unions clip solids into them. Boolean work goes
//! through the engine list from `pegmount-geometry`, falling back engine by
//! engine; a failed slot never aborts a batch.
//!
//! ```no_run
//! use pegmount_processing::{
//!     BoundarySide, ClipTemplate, GridParams, MountingPipeline, MountingPlane, PegboardSpec,
//!     SlotBatch,
//! };
//! use pegmount_geometry::{box_mesh, Point3};
//!
//! let pipeline = MountingPipeline::new(PegboardSpec::skadis()).unwrap();
//! let slab = box_mesh(Point3::origin(), Point3::new(100.0, 100.0, 20.0));
//! let grid = pipeline
//!     .grid(&slab, &GridParams::new(MountingPlane::XY, BoundarySide::Max))
//!     .unwrap();
//! let clip = ClipTemplate::detect(box_mesh(
//!     Point3::new(-5.0, -5.0, 0.0),
//!     Point3::new(5.0, 5.0, 2.0),
//! ));
//!
//! let positions = pipeline.select_positions(&grid, "21").unwrap();
//! let batch = SlotBatch::new(positions, MountingPlane::XY.into())
//!     .with_depths(10.0)
//!     .with_clip(&clip);
//! let (mesh, report) = pipeline.process(slab, &batch).unwrap();
//! println!("{} triangles, {} cuts", mesh.triangle_count(), report.cuts_succeeded());
//! ```

pub mod batch;
pub mod config;
pub mod cut;
pub mod cutter;
pub mod direction;
pub mod error;
pub mod grid;
pub mod insert;
pub mod pipeline;
pub mod plane;
pub mod selection;

pub use batch::{process_slots, BatchReport, CutStatus, Depths, InsertStatus, SlotBatch, SlotReport};
pub use config::{GridParams, PegboardSpec, PipelineOptions, FLUSH_TOLERANCE, MIN_CUTTER_SEGMENTS};
pub use cut::{cut, CutOutcome};
pub use cutter::{build_cutter, CuttingSpec};
pub use direction::InsertionDirection;
pub use error::{Error, Result};
pub use grid::{Grid, Slot};
pub use insert::{insert, place_clip, ClipTemplate, InsertMethod, InsertOutcome, InsertSpec};
pub use pipeline::MountingPipeline;
pub use plane::{BoundarySide, BoxFace, MountingPlane};
pub use selection::{parse_selection, partition, select, Selection};

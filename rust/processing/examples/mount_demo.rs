// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end run on a synthetic slab
//!
//! Lays a grid on the top face of a 100 x 100 x 20 slab, bores three slots
//! and fills them with a small clip block, then bores one hole into a side
//! wall along its face normal.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p pegmount-processing --example mount_demo -- "5,21,30"
//! ```

use pegmount_geometry::{box_mesh, Point3};
use pegmount_processing::{
    BoundarySide, BoxFace, ClipTemplate, GridParams, InsertionDirection, MountingPipeline,
    MountingPlane, PegboardSpec, SlotBatch,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,pegmount_geometry=warn".into()),
        )
        .init();

    let selection = std::env::args().nth(1).unwrap_or_else(|| "5,21,30".into());

    match run(&selection) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Demo failed");
            ExitCode::FAILURE
        }
    }
}

fn run(selection: &str) -> pegmount_processing::Result<()> {
    let pipeline = MountingPipeline::new(PegboardSpec::skadis())?;
    tracing::info!(engines = ?pipeline.engine_names(), "Pipeline ready");

    let slab = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(100.0, 100.0, 20.0));
    let stats = slab.stats();
    println!(
        "Input: {} vertices, {} triangles, {:.1} x {:.1} x {:.1}",
        stats.vertices, stats.triangles, stats.dimensions.x, stats.dimensions.y, stats.dimensions.z
    );

    let grid = pipeline.grid(&slab, &GridParams::new(MountingPlane::XY, BoundarySide::Max))?;
    println!("{}", grid);

    let positions = pipeline.select_positions(&grid, selection)?;
    let clip = ClipTemplate::detect(box_mesh(
        Point3::new(-6.0, -6.0, 0.0),
        Point3::new(6.0, 6.0, 2.5),
    ));

    let batch = SlotBatch::new(positions, MountingPlane::XY.into())
        .with_depths(pipeline.spec().hole_depth)
        .with_clip(&clip)
        .with_clip_rotation(45.0);
    let (mesh, report) = pipeline.process(slab, &batch)?;

    println!(
        "Batch: {} cut, {} failed, {} clips merged, {} degraded",
        report.cuts_succeeded(),
        report.cuts_failed(),
        report.inserts_merged(),
        report.inserts_degraded()
    );
    println!("{}", report.to_json()?);

    // Side wall bore, oriented by the face's inward normal
    let face: BoxFace = "right".parse()?;
    let side = pipeline.cut(
        mesh,
        Point3::new(100.0, 50.0, 10.0),
        8.0,
        InsertionDirection::from_face(face),
    )?;
    println!(
        "Side bore on {} face: {}",
        face,
        side.engine.unwrap_or("failed")
    );

    let stats = side.mesh.stats();
    println!(
        "Output: {} vertices, {} triangles, watertight: {}",
        stats.vertices, stats.triangles, stats.watertight
    );
    Ok(())
}

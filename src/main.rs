//! # DungeonForge Headless Demo
//!
//! Generates a dungeon grid from the command line, prints it, and writes the
//! result to the snapshot slot. The 3D previewer consumes the same library
//! through its bindings; this binary exists for quick inspection and for
//! exercising the pipeline end to end.
//!
//! Usage: `dungeon_forge [rows] [cols]` (both within 5..=50, default 10).

use std::env;
use std::error::Error;
use std::sync::Arc;

use log::info;

use dungeon_forge::document::{Document, FileSlot, SnapshotStore};
use dungeon_forge::generator::GenerationParameters;
use dungeon_forge::session::GenerationSession;

const SNAPSHOT_PATH: &str = "dungeon_snapshot.json";

fn parse_extent(arg: Option<String>) -> usize {
    arg.and_then(|s| s.parse().ok()).unwrap_or(10)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("dungeon-forge starting...");

    let mut args = env::args().skip(1);
    let params = GenerationParameters {
        rows: parse_extent(args.next()),
        cols: parse_extent(args.next()),
        ..GenerationParameters::default()
    };

    let document = Arc::new(Document::default());
    let mut session = GenerationSession::new(Arc::clone(&document));
    session.request(params)?;
    let report = session.generate_blocking()?;
    info!(
        "placed {}/{} rooms, {} doors, {} corridor cells in {:.4}s (checksum {:08x})",
        report.rooms_placed,
        report.rooms_requested,
        report.doors_placed,
        report.corridor_cells,
        report.generation_time,
        document.checksum()
    );

    println!("{}", document.grid());

    let mut store = SnapshotStore::new(FileSlot::new(SNAPSHOT_PATH));
    store.save(&document.grid())?;
    info!("snapshot written to {SNAPSHOT_PATH}");

    info!("dungeon-forge exiting.");
    Ok(())
}

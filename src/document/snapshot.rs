// src/document/snapshot.rs

use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;
use thiserror::Error;

use crate::map::{Grid, GridError, TileType};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot contains no cells")]
    Empty,
    #[error("snapshot rows have inconsistent lengths")]
    RaggedRows,
    #[error("unrecognized tile code {code:?} at ({x}, {y})")]
    UnknownCode { code: char, x: usize, y: usize },
    #[error("snapshot payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("snapshot storage failed: {0}")]
    Storage(#[from] io::Error),
}

/// Encode a grid as the persisted form: rows of single-character tile codes.
pub fn encode(grid: &Grid) -> Vec<Vec<char>> {
    grid.iter_rows()
        .map(|row| row.iter().map(|tile| tile.code()).collect())
        .collect()
}

/// Rebuild a grid from rows of tile codes, rejecting ragged or unknown input.
pub fn decode(rows: &[Vec<char>]) -> Result<Grid, SnapshotError> {
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if height == 0 || width == 0 {
        return Err(SnapshotError::Empty);
    }
    let mut grid = Grid::new(height, width);
    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(SnapshotError::RaggedRows);
        }
        for (x, &code) in row.iter().enumerate() {
            let tile =
                TileType::from_code(code).ok_or(SnapshotError::UnknownCode { code, x, y })?;
            grid.set(x, y, tile)?;
        }
    }
    Ok(grid)
}

/// A single named storage slot for one serialized grid. Absence is a normal,
/// distinguishable state, not an error.
pub trait SnapshotSlot {
    fn read(&self) -> Result<Option<String>, io::Error>;
    fn write(&mut self, data: &str) -> Result<(), io::Error>;
}

/// In-memory slot, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySlot {
    data: Option<String>,
}

impl SnapshotSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, io::Error> {
        Ok(self.data.clone())
    }

    fn write(&mut self, data: &str) -> Result<(), io::Error> {
        self.data = Some(data.to_owned());
        Ok(())
    }
}

/// Slot backed by a single file on disk. A missing file reads as absent.
#[derive(Debug)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, io::Error> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&mut self, data: &str) -> Result<(), io::Error> {
        fs::write(&self.path, data)
    }
}

/// Saves and restores one grid through an injected storage slot.
pub struct SnapshotStore<S: SnapshotSlot> {
    slot: S,
}

impl<S: SnapshotSlot> SnapshotStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn save(&mut self, grid: &Grid) -> Result<(), SnapshotError> {
        let payload = serde_json::to_string(&encode(grid))?;
        self.slot.write(&payload)?;
        debug!("snapshot saved ({} bytes)", payload.len());
        Ok(())
    }

    /// Loads the stored grid, or `None` when the slot has never been written.
    pub fn load(&self) -> Result<Option<Grid>, SnapshotError> {
        let Some(payload) = self.slot.read()? else {
            return Ok(None);
        };
        let rows: Vec<Vec<char>> = serde_json::from_str(&payload)?;
        Ok(Some(decode(&rows)?))
    }
}

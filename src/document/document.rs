// src/document/document.rs

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::map::{Grid, TileType};

/// Pass-through metadata attached to a streamed grid update. The engine
/// stores and surfaces it without interpreting any field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AiInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_noise_sample: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// The shared document holding the live dungeon grid.
///
/// The grid sits behind an `RwLock` so the presentation layer can clone the
/// document handle and take a stable read snapshot per frame while the editor
/// or a generation session mutates it. Replacing the grid is a single atomic
/// swap; readers never observe a half-written grid.
#[derive(Debug)]
pub struct Document {
    grid: RwLock<Grid>,
    ai_info: RwLock<Option<AiInfo>>,
}

impl Document {
    /// Create a document around an initial grid.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid: RwLock::new(grid),
            ai_info: RwLock::new(None),
        }
    }

    /// A cloned snapshot of the current grid.
    pub fn grid(&self) -> Grid {
        self.grid.read().clone()
    }

    /// Run `f` against the current grid under the read lock.
    pub fn with_grid<T>(&self, f: impl FnOnce(&Grid) -> T) -> T {
        f(&self.grid.read())
    }

    /// Run `f` against the current grid under the write lock.
    pub fn with_grid_mut<T>(&self, f: impl FnOnce(&mut Grid) -> T) -> T {
        f(&mut self.grid.write())
    }

    /// Swap in a freshly generated or deserialized grid.
    pub fn replace_grid(&self, grid: Grid) {
        *self.grid.write() = grid;
    }

    /// Number of cells currently holding `tile`.
    pub fn count(&self, tile: TileType) -> usize {
        self.grid.read().count(tile)
    }

    pub fn ai_info(&self) -> Option<AiInfo> {
        self.ai_info.read().clone()
    }

    pub fn set_ai_info(&self, info: Option<AiInfo>) {
        *self.ai_info.write() = info;
    }

    /// Computes a checksum over the grid contents.
    pub fn checksum(&self) -> u32 {
        let grid = self.grid.read();
        let cols = grid.cols().max(1);
        grid.cells()
            .par_chunks(cols)
            .enumerate()
            .map(|(y, row)| {
                let mut crc = 0u32;
                for (x, tile) in row.iter().enumerate() {
                    checksum_tile(&mut crc, x, y, *tile);
                }
                crc
            })
            .reduce(|| 0u32, |a, b| a.wrapping_add(b))
    }
}

impl Default for Document {
    fn default() -> Self {
        // Matches the default extent offered by the generation form.
        Self::new(Grid::new(10, 10))
    }
}

// --- Checksum helper functions ---

fn add_crc(crc: &mut u32, value: u32) {
    *crc = crc.wrapping_add(value);
}

fn checksum_tile(crc: &mut u32, x: usize, y: usize, tile: TileType) {
    add_crc(crc, x as u32);
    add_crc(crc, (y as u32) << 8);
    add_crc(crc, tile.code() as u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_extent() {
        let doc = Document::default();
        let grid = doc.grid();
        assert_eq!(grid.rows(), 10);
        assert_eq!(grid.cols(), 10);
        assert_eq!(doc.count(TileType::Empty), 100);
    }

    #[test]
    fn test_replace_grid_swaps_wholesale() {
        let doc = Document::default();
        let mut next = Grid::new(5, 5);
        next.set(1, 1, TileType::Boss).unwrap();
        doc.replace_grid(next);
        assert_eq!(doc.grid().rows(), 5);
        assert_eq!(doc.count(TileType::Boss), 1);
    }

    #[test]
    fn test_checksum_tracks_content() {
        let doc = Document::default();
        let before = doc.checksum();
        doc.with_grid_mut(|grid| grid.set(4, 4, TileType::Room).unwrap());
        assert_ne!(doc.checksum(), before);
    }

    #[test]
    fn test_concurrent_access() {
        let doc = Document::default();
        std::thread::scope(|s| {
            s.spawn(|| {
                doc.with_grid_mut(|grid| grid.set(0, 0, TileType::Wall).unwrap());
            });
            s.spawn(|| {
                let _ = doc.grid();
            });
        });
        assert_eq!(doc.grid().get(0, 0), Ok(TileType::Wall));
    }
}

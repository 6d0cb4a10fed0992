// src/generator/mod.rs
pub mod corridors;
pub mod doors;
pub mod rooms;

pub use rooms::PlacementError;

use std::time::Instant;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::map::{Door, Grid, GridError};

// Grid extent accepted by the generation form.
pub const MIN_EXTENT: usize = 5;
pub const MAX_EXTENT: usize = 50;
// Room edge lengths are sampled uniformly from this range.
pub const MIN_ROOM_EXTENT: usize = 1;
pub const MAX_ROOM_EXTENT: usize = 3;
// Rejection-sampling budget per requested room.
pub const ATTEMPTS_PER_ROOM: usize = 64;
// Chance that a room origin becomes a trap when traps are enabled.
pub const TRAP_CHANCE: f64 = 0.2;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    #[error("grid extent {rows}x{cols} is outside {min}..={max}", min = MIN_EXTENT, max = MAX_EXTENT)]
    ExtentOutOfRange { rows: usize, cols: usize },
    #[error("room count must be at least 1")]
    RoomCountTooSmall,
}

/// Everything a generation request can configure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParameters {
    pub rows: usize,
    pub cols: usize,
    pub room_count: usize,
    pub traps_enabled: bool,
    pub boss_enabled: bool,
    /// Fixed seed for reproducible output; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl GenerationParameters {
    pub fn validate(&self) -> Result<(), ParameterError> {
        let extent_ok = |v: usize| (MIN_EXTENT..=MAX_EXTENT).contains(&v);
        if !extent_ok(self.rows) || !extent_ok(self.cols) {
            return Err(ParameterError::ExtentOutOfRange {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.room_count < 1 {
            return Err(ParameterError::RoomCountTooSmall);
        }
        Ok(())
    }
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            room_count: 5,
            traps_enabled: true,
            boss_enabled: true,
            seed: None,
        }
    }
}

/// What a synchronous generation pass produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationReport {
    pub rooms_requested: usize,
    pub rooms_placed: usize,
    pub doors_placed: usize,
    pub corridor_cells: usize,
    /// False when the room placement budget ran out first.
    pub complete: bool,
    pub generation_time: f64,
}

/// Runs the full synchronous pipeline: rooms, origin overrides, doors,
/// corridors.
pub struct DungeonGenerator {
    params: GenerationParameters,
}

impl DungeonGenerator {
    pub fn new(params: GenerationParameters) -> Result<Self, ParameterError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// Generates a dungeon with the configured seed, or an OS-seeded RNG
    /// when no seed was set.
    pub fn generate(&self) -> Result<(Grid, GenerationReport), GridError> {
        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.generate_with(&mut rng)
    }

    /// Generates a dungeon from the supplied random source. Deterministic
    /// for a given RNG state.
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Result<(Grid, GenerationReport), GridError> {
        let started = Instant::now();
        let mut grid = Grid::new(self.params.rows, self.params.cols);

        let (placed, complete) = match rooms::place(&mut grid, self.params.room_count, rng) {
            Ok(rooms) => (rooms, true),
            Err(PlacementError::Incomplete { rooms, requested }) => {
                warn!(
                    "room placement budget exhausted: placed {} of {} rooms",
                    rooms.len(),
                    requested
                );
                (rooms, false)
            }
            Err(PlacementError::Grid(err)) => return Err(err),
        };

        let mut door_list: Vec<Door> = Vec::with_capacity(placed.len());
        let last = placed.len().saturating_sub(1);
        for (i, room) in placed.iter().enumerate() {
            doors::override_origin(&mut grid, room, i == last, &self.params, rng)?;
            if let Some(door) = doors::attach_door(&mut grid, room, rng)? {
                door_list.push(door);
            }
        }

        let corridor_cells = corridors::connect(&mut grid, &door_list)?;

        let report = GenerationReport {
            rooms_requested: self.params.room_count,
            rooms_placed: placed.len(),
            doors_placed: door_list.len(),
            corridor_cells,
            complete,
            generation_time: started.elapsed().as_secs_f64(),
        };
        info!(
            "generated {}x{} dungeon: {} rooms, {} doors, {} corridor cells",
            self.params.rows,
            self.params.cols,
            report.rooms_placed,
            report.doors_placed,
            report.corridor_cells
        );
        Ok((grid, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TileType;

    #[test]
    fn test_invalid_parameters_rejected() {
        let too_small = GenerationParameters {
            rows: 4,
            ..GenerationParameters::default()
        };
        assert_eq!(
            too_small.validate(),
            Err(ParameterError::ExtentOutOfRange { rows: 4, cols: 10 })
        );

        let too_large = GenerationParameters {
            cols: 51,
            ..GenerationParameters::default()
        };
        assert!(too_large.validate().is_err());

        let no_rooms = GenerationParameters {
            room_count: 0,
            ..GenerationParameters::default()
        };
        assert_eq!(no_rooms.validate(), Err(ParameterError::RoomCountTooSmall));

        assert!(GenerationParameters::default().validate().is_ok());
        assert!(DungeonGenerator::new(no_rooms).is_err());

        let generator = DungeonGenerator::new(GenerationParameters::default()).unwrap();
        assert_eq!(generator.params().room_count, 5);
    }

    #[test]
    fn test_boss_scenario_produces_exactly_one_boss() {
        // 10x10, five rooms, traps off, boss on: one boss cell, no traps.
        let params = GenerationParameters {
            room_count: 5,
            traps_enabled: false,
            boss_enabled: true,
            seed: Some(9),
            ..GenerationParameters::default()
        };
        let generator = DungeonGenerator::new(params).unwrap();
        let (grid, report) = generator.generate().unwrap();
        assert!(report.complete);
        assert_eq!(report.rooms_placed, 5);
        assert_eq!(grid.count(TileType::Boss), 1);
        assert_eq!(grid.count(TileType::Trap), 0);
    }

    #[test]
    fn test_generation_is_reproducible_for_a_seed() {
        let params = GenerationParameters {
            seed: Some(1234),
            ..GenerationParameters::default()
        };
        let generator = DungeonGenerator::new(params).unwrap();
        let (first, _) = generator.generate().unwrap();
        let (second, _) = generator.generate().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_incomplete_placement_is_recovered() {
        let params = GenerationParameters {
            rows: 5,
            cols: 5,
            room_count: 200,
            seed: Some(5),
            ..GenerationParameters::default()
        };
        let generator = DungeonGenerator::new(params).unwrap();
        let (grid, report) = generator.generate().unwrap();
        assert!(!report.complete);
        assert!(report.rooms_placed < 200);
        assert!(report.rooms_placed > 0);
        assert!(report.doors_placed <= report.rooms_placed);
        // The partial dungeon is still a usable grid.
        assert!(grid.count(TileType::Room) + grid.count(TileType::Boss) > 0);
    }

    #[test]
    fn test_corridors_only_replace_empty_cells() {
        let params = GenerationParameters {
            rows: 20,
            cols: 20,
            room_count: 10,
            seed: Some(21),
            ..GenerationParameters::default()
        };
        let generator = DungeonGenerator::new(params).unwrap();
        let (grid, report) = generator.generate().unwrap();
        // Rooms, doors, traps and the boss all survive corridor carving:
        // carved cells plus surviving stamps account for every non-empty cell.
        let non_empty = (grid.rows() * grid.cols()) - grid.count(TileType::Empty);
        let stamped = grid.count(TileType::Room)
            + grid.count(TileType::Door)
            + grid.count(TileType::Trap)
            + grid.count(TileType::Boss);
        assert_eq!(non_empty, stamped + report.corridor_cells);
        assert_eq!(grid.count(TileType::Hallway), report.corridor_cells);
    }
}

// src/generator/rooms.rs

use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::generator::{ATTEMPTS_PER_ROOM, MAX_ROOM_EXTENT, MIN_ROOM_EXTENT};
use crate::map::{Grid, GridError, Room, TileType};

#[derive(Debug, Error)]
pub enum PlacementError {
    /// The attempt budget ran out before every requested room fit. Carries
    /// the rooms that were placed so callers can continue with them.
    #[error("placed {} of {requested} rooms before the attempt budget ran out", .rooms.len())]
    Incomplete { rooms: Vec<Room>, requested: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Places `room_count` non-overlapping rooms on the grid by rejection
/// sampling and stamps each accepted footprint as `Room` cells.
///
/// Candidates draw their edge lengths uniformly from the room extent range
/// and an origin that keeps them inside the grid; a candidate is accepted
/// only if its whole footprint is still empty. The attempt budget is
/// `room_count * ATTEMPTS_PER_ROOM` so an infeasible request terminates
/// with the partial result instead of spinning forever.
pub fn place<R: Rng>(
    grid: &mut Grid,
    room_count: usize,
    rng: &mut R,
) -> Result<Vec<Room>, PlacementError> {
    let budget = room_count.saturating_mul(ATTEMPTS_PER_ROOM);
    let mut rooms: Vec<Room> = Vec::with_capacity(room_count);
    let mut attempts = 0usize;

    while rooms.len() < room_count {
        if attempts >= budget {
            return Err(PlacementError::Incomplete {
                rooms,
                requested: room_count,
            });
        }
        attempts += 1;

        let width = rng.random_range(MIN_ROOM_EXTENT..=MAX_ROOM_EXTENT);
        let height = rng.random_range(MIN_ROOM_EXTENT..=MAX_ROOM_EXTENT);
        if width > grid.cols() || height > grid.rows() {
            continue;
        }
        let x = rng.random_range(0..=grid.cols() - width);
        let y = rng.random_range(0..=grid.rows() - height);
        let candidate = Room::new(x, y, width, height);

        if !footprint_is_clear(grid, &candidate) {
            continue;
        }
        stamp(grid, &candidate)?;
        rooms.push(candidate);
    }

    debug!("placed {} rooms in {} attempts", rooms.len(), attempts);
    Ok(rooms)
}

fn footprint_is_clear(grid: &Grid, room: &Room) -> bool {
    room.cells().all(|(x, y)| grid.get(x, y) == Ok(TileType::Empty))
}

fn stamp(grid: &mut Grid, room: &Room) -> Result<(), GridError> {
    for (x, y) in room.cells() {
        grid.set(x, y, TileType::Room)?;
    }
    Ok(())
}

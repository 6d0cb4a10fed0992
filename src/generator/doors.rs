// src/generator/doors.rs

use log::debug;
use rand::Rng;

use crate::generator::{GenerationParameters, TRAP_CHANCE};
use crate::map::{Door, Grid, GridError, Room, TileType};

#[derive(Debug, Clone, Copy)]
enum Side {
    North,
    South,
    West,
    East,
}

/// Stamps one door next to the room's perimeter on a uniformly chosen side.
///
/// Returns `None` without retrying when the chosen side presses against the
/// outer grid edge; a room may legitimately end up doorless.
pub fn attach_door<R: Rng>(
    grid: &mut Grid,
    room: &Room,
    rng: &mut R,
) -> Result<Option<Door>, GridError> {
    let side = match rng.random_range(0..4) {
        0 => Side::North,
        1 => Side::South,
        2 => Side::West,
        _ => Side::East,
    };
    let target = match side {
        Side::North => room.y.checked_sub(1).map(|y| (room.x, y)),
        Side::South => {
            let y = room.y + room.height;
            (y < grid.rows()).then_some((room.x, y))
        }
        Side::West => room.x.checked_sub(1).map(|x| (x, room.y)),
        Side::East => {
            let x = room.x + room.width;
            (x < grid.cols()).then_some((x, room.y))
        }
    };
    let Some((x, y)) = target else {
        debug!(
            "room at ({}, {}) drew a side flush with the grid edge; no door",
            room.x, room.y
        );
        return Ok(None);
    };
    grid.set(x, y, TileType::Door)?;
    Ok(Some(Door::new(x, y)))
}

/// Applies the origin-cell overrides: the last placed room becomes the boss
/// room, and any other room has a trap chance. Boss beats trap beats room.
pub fn override_origin<R: Rng>(
    grid: &mut Grid,
    room: &Room,
    is_last: bool,
    params: &GenerationParameters,
    rng: &mut R,
) -> Result<(), GridError> {
    let (x, y) = room.origin();
    if is_last && params.boss_enabled {
        grid.set(x, y, TileType::Boss)?;
    } else if params.traps_enabled && rng.random_bool(TRAP_CHANCE) {
        grid.set(x, y, TileType::Trap)?;
    }
    Ok(())
}

// src/generator/corridors.rs

use log::debug;

use crate::map::{Door, Grid, GridError, TileType};

/// Carves straight corridors between consecutive doors in placement order.
///
/// A pair sharing an x-coordinate gets the vertical span between them filled,
/// a pair sharing a y-coordinate the horizontal span; a pair sharing neither
/// is skipped. Only `Empty` cells become `Hallway`; anything already placed
/// is left alone. Returns the number of cells carved.
pub fn connect(grid: &mut Grid, doors: &[Door]) -> Result<usize, GridError> {
    let mut carved = 0usize;
    for pair in doors.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.x == b.x {
            let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
            for y in lo + 1..hi {
                carved += carve(grid, a.x, y)?;
            }
        } else if a.y == b.y {
            let (lo, hi) = (a.x.min(b.x), a.x.max(b.x));
            for x in lo + 1..hi {
                carved += carve(grid, x, a.y)?;
            }
        } else {
            debug!(
                "doors ({}, {}) and ({}, {}) share no axis; skipping",
                a.x, a.y, b.x, b.y
            );
        }
    }
    Ok(carved)
}

fn carve(grid: &mut Grid, x: usize, y: usize) -> Result<usize, GridError> {
    if grid.get(x, y)? == TileType::Empty {
        grid.set(x, y, TileType::Hallway)?;
        return Ok(1);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door_at(grid: &mut Grid, x: usize, y: usize) -> Door {
        grid.set(x, y, TileType::Door).unwrap();
        Door::new(x, y)
    }

    #[test]
    fn test_vertical_span_between_aligned_doors() {
        let mut grid = Grid::new(10, 10);
        let doors = vec![door_at(&mut grid, 2, 2), door_at(&mut grid, 2, 7)];
        assert!(doors[0].matches(2, 2));
        let carved = connect(&mut grid, &doors).unwrap();
        assert_eq!(carved, 4);
        for y in 3..=6 {
            assert_eq!(grid.get(2, y), Ok(TileType::Hallway));
        }
        // Endpoints stay doors.
        assert_eq!(grid.get(2, 2), Ok(TileType::Door));
        assert_eq!(grid.get(2, 7), Ok(TileType::Door));
    }

    #[test]
    fn test_horizontal_span_between_aligned_doors() {
        let mut grid = Grid::new(10, 10);
        let doors = vec![door_at(&mut grid, 1, 4), door_at(&mut grid, 6, 4)];
        connect(&mut grid, &doors).unwrap();
        for x in 2..=5 {
            assert_eq!(grid.get(x, 4), Ok(TileType::Hallway));
        }
    }

    #[test]
    fn test_fewer_than_two_doors_carves_nothing() {
        let mut grid = Grid::new(10, 10);
        assert_eq!(connect(&mut grid, &[]).unwrap(), 0);
        let doors = vec![door_at(&mut grid, 3, 3)];
        assert_eq!(connect(&mut grid, &doors).unwrap(), 0);
        assert_eq!(grid.count(TileType::Hallway), 0);
    }

    #[test]
    fn test_unaligned_pair_is_skipped() {
        let mut grid = Grid::new(10, 10);
        let doors = vec![door_at(&mut grid, 2, 2), door_at(&mut grid, 5, 7)];
        assert_eq!(connect(&mut grid, &doors).unwrap(), 0);
        assert_eq!(grid.count(TileType::Hallway), 0);
    }

    #[test]
    fn test_occupied_cells_are_never_overwritten() {
        let mut grid = Grid::new(10, 10);
        let doors = vec![door_at(&mut grid, 2, 2), door_at(&mut grid, 2, 7)];
        grid.set(2, 4, TileType::Room).unwrap();
        grid.set(2, 5, TileType::Trap).unwrap();
        let carved = connect(&mut grid, &doors).unwrap();
        assert_eq!(carved, 2);
        assert_eq!(grid.get(2, 3), Ok(TileType::Hallway));
        assert_eq!(grid.get(2, 4), Ok(TileType::Room));
        assert_eq!(grid.get(2, 5), Ok(TileType::Trap));
        assert_eq!(grid.get(2, 6), Ok(TileType::Hallway));
    }
}

// src/map/tile.rs

/// The closed set of cell kinds a dungeon grid can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileType {
    #[default]
    Empty,
    Room,
    Hallway,
    Trap,
    Boss,
    Door,
    Wall,
}

/// The order left-clicks walk a cell through. Wraps around at the end.
pub const EDIT_CYCLE: [TileType; 7] = [
    TileType::Empty,
    TileType::Room,
    TileType::Trap,
    TileType::Boss,
    TileType::Door,
    TileType::Hallway,
    TileType::Wall,
];

impl TileType {
    /// Single-character wire code used by snapshots and stream messages.
    pub fn code(self) -> char {
        match self {
            TileType::Empty => ' ',
            TileType::Room => 'R',
            TileType::Hallway => 'H',
            TileType::Trap => 'T',
            TileType::Boss => 'B',
            TileType::Door => 'D',
            TileType::Wall => 'W',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            ' ' => Some(TileType::Empty),
            'R' => Some(TileType::Room),
            'H' => Some(TileType::Hallway),
            'T' => Some(TileType::Trap),
            'B' => Some(TileType::Boss),
            'D' => Some(TileType::Door),
            'W' => Some(TileType::Wall),
            _ => None,
        }
    }

    /// The tile that follows this one in the edit cycle.
    pub fn next_in_cycle(self) -> Self {
        let index = EDIT_CYCLE.iter().position(|t| *t == self).unwrap_or(0);
        EDIT_CYCLE[(index + 1) % EDIT_CYCLE.len()]
    }
}

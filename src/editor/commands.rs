// src/editor/commands.rs

use thiserror::Error;

use crate::document::Document;
use crate::editor::tiles;
use crate::map::{GridError, TileType};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("no previous tile recorded for undo")]
    MissingUndoState,
}

pub trait Command {
    fn execute(&mut self, document: &Document) -> Result<(), CommandError>;
    fn unexecute(&mut self, document: &Document) -> Result<(), CommandError>;
    fn undo(&mut self, document: &Document) -> Result<(), CommandError> {
        self.unexecute(document)
    }
}

/// Undoable edits on the document grid. Each variant records the tile it
/// replaced the first time it executes so it can be unwound later.
#[derive(Debug, Clone)]
pub enum CommandType {
    CycleTile {
        x: usize,
        y: usize,
        previous: Option<TileType>,
    },
    ClearTile {
        x: usize,
        y: usize,
        previous: Option<TileType>,
    },
    BatchCommand {
        commands: Vec<CommandType>,
    },
}

impl Command for CommandType {
    fn execute(&mut self, document: &Document) -> Result<(), CommandError> {
        match self {
            CommandType::BatchCommand { commands } => {
                for command in commands {
                    command.execute(document)?;
                }
                Ok(())
            }
            CommandType::CycleTile { x, y, previous } => document.with_grid_mut(|grid| {
                let current = grid.get(*x, *y)?;
                tiles::cycle(grid, *x, *y)?;
                *previous = Some(current);
                Ok(())
            }),
            CommandType::ClearTile { x, y, previous } => document.with_grid_mut(|grid| {
                let replaced = tiles::clear(grid, *x, *y)?;
                *previous = Some(replaced);
                Ok(())
            }),
        }
    }

    fn unexecute(&mut self, document: &Document) -> Result<(), CommandError> {
        match self {
            CommandType::BatchCommand { commands } => {
                for command in commands.iter_mut().rev() {
                    command.unexecute(document)?;
                }
                Ok(())
            }
            CommandType::CycleTile { x, y, previous }
            | CommandType::ClearTile { x, y, previous } => match previous {
                Some(tile) => {
                    document.with_grid_mut(|grid| grid.set(*x, *y, *tile))?;
                    Ok(())
                }
                None => Err(CommandError::MissingUndoState),
            },
        }
    }
}

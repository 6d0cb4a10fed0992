// src/editor/mod.rs

pub mod commands;
pub mod tiles;

pub use commands::{Command, CommandError, CommandType};

use std::sync::Arc;

use log::{debug, info};

use crate::document::Document;
use crate::map::{GridError, TileType};

/// Which pointer button the presentation layer reported for a tile click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Cycles the tile through the edit sequence.
    Primary,
    /// Clears the tile back to `Empty`.
    Secondary,
}

/// The interactive editing state around a shared document.
///
/// All click-driven mutation funnels through here: clicks become commands,
/// commands land on the undo stack, and undo/redo replay them. The editor is
/// the only mutation path once a grid is presented for editing.
pub struct Editor {
    document: Arc<Document>,
    undo_stack: Vec<CommandType>,
    redo_stack: Vec<CommandType>,
    is_dirty: bool,
}

impl Editor {
    /// Creates an editor over the given document.
    pub fn new(document: Arc<Document>) -> Self {
        Self {
            document,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            is_dirty: false,
        }
    }

    pub fn document(&self) -> Arc<Document> {
        Arc::clone(&self.document)
    }

    /// Validates a click against the current grid and dispatches the edit.
    /// Returns the tile the cell holds afterwards.
    pub fn handle_tile_click(
        &mut self,
        x: i32,
        y: i32,
        button: MouseButton,
    ) -> Result<TileType, CommandError> {
        let (cx, cy) = self.validate_click(x, y)?;
        let command = match button {
            MouseButton::Primary => CommandType::CycleTile {
                x: cx,
                y: cy,
                previous: None,
            },
            MouseButton::Secondary => CommandType::ClearTile {
                x: cx,
                y: cy,
                previous: None,
            },
        };
        self.execute_command(command)?;
        let tile = self.document.with_grid(|grid| grid.get(cx, cy))?;
        debug!("tile ({cx}, {cy}) is now {tile:?}");
        Ok(tile)
    }

    fn validate_click(&self, x: i32, y: i32) -> Result<(usize, usize), GridError> {
        let out_of_bounds = GridError::OutOfBounds {
            x: i64::from(x),
            y: i64::from(y),
        };
        let (Ok(cx), Ok(cy)) = (usize::try_from(x), usize::try_from(y)) else {
            return Err(out_of_bounds);
        };
        self.document.with_grid(|grid| grid.get(cx, cy))?;
        Ok((cx, cy))
    }

    /// Executes a command and records it for undo. A failed command is not
    /// recorded.
    pub fn execute_command(&mut self, mut command: CommandType) -> Result<(), CommandError> {
        command.execute(&self.document)?;
        self.undo_stack.push(command);
        self.redo_stack.clear();
        self.is_dirty = true;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), CommandError> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(());
        };
        match command.undo(&self.document) {
            Ok(()) => {
                self.redo_stack.push(command);
                self.is_dirty = !self.undo_stack.is_empty();
                Ok(())
            }
            Err(err) => {
                self.undo_stack.push(command);
                Err(err)
            }
        }
    }

    pub fn redo(&mut self) -> Result<(), CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(());
        };
        match command.execute(&self.document) {
            Ok(()) => {
                self.undo_stack.push(command);
                self.is_dirty = true;
                Ok(())
            }
            Err(err) => {
                self.redo_stack.push(command);
                Err(err)
            }
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.is_dirty
    }

    /// Called after a successful snapshot save.
    pub fn mark_saved(&mut self) {
        self.is_dirty = false;
        info!("document marked clean");
    }
}

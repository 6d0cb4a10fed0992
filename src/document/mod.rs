// src/document/mod.rs
mod document;
pub mod snapshot;

pub use self::document::{AiInfo, Document};
pub use self::snapshot::{FileSlot, MemorySlot, SnapshotError, SnapshotSlot, SnapshotStore};

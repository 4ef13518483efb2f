//! dc-save: Save/restore system for the dungeon crawler
//!
//! Encodes the live maze and player into JSON documents, rebuilds them on
//! load, reads hand-authored maze definitions, and manages save slots.

pub mod codec;
pub mod definition;
pub mod document;
pub mod slot;

mod error;

pub use codec::{decode_maze, decode_player, document_records, encode_maze, encode_player};
pub use definition::{load_definition, parse_definition};
pub use document::{MapDocument, PlayerDocument, RoomEntry};
pub use error::SaveError;
pub use slot::{SAVE_VERSION, SaveConfig, SaveHeader, SaveSlot, default_save_dir, list_slots};

//! Room document storage for Denki.
//!
//! The game's only shared mutable resource is the room document. This
//! crate defines the contract for storing it ([`RoomStore`]) and ships an
//! in-memory implementation ([`MemoryStore`]) with optimistic transactions,
//! so two players acting on the same room at once are serialized without
//! any lock held over game logic.
//!
//! # Key types
//!
//! - [`RoomStore`]: read, partial write, transactional update, subscribe
//! - [`MemoryStore`]: versioned in-memory documents
//! - [`StoreConfig`]: transaction attempt limit
//! - [`StoreError`]: not found, conflict, or a rejected action

mod config;
mod error;
mod memory;
mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{RoomReceiver, RoomSender, RoomStore};

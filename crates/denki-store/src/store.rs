//! The `RoomStore` trait: the contract between the game and its storage.
//!
//! The rules are pure functions; everything that touches the shared room
//! document goes through this trait. An implementation must give
//! [`transactional_update`](RoomStore::transactional_update) atomic
//! read-modify-write semantics: the body always sees the latest committed
//! snapshot, and a failed transaction leaves that snapshot untouched.

use std::future::Future;

use denki_protocol::RoomId;
use denki_rules::{GameRoom, RoomUpdate, RulesError};
use tokio::sync::mpsc;

use crate::StoreError;

/// Receives every committed snapshot of a subscribed room.
pub type RoomReceiver = mpsc::UnboundedReceiver<GameRoom>;

/// Channel sender for pushing snapshots to a subscriber.
pub type RoomSender = mpsc::UnboundedSender<GameRoom>;

/// A document store holding one [`GameRoom`] per room id.
///
/// Methods return `Send` futures so a store can be driven from any Tokio
/// task.
pub trait RoomStore: Send + Sync + 'static {
    /// Creates an empty room (no players, no round) and returns it.
    fn create_room(&self) -> impl Future<Output = Result<GameRoom, StoreError>> + Send;

    /// Reads the latest committed snapshot.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if the room doesn't exist.
    fn read_room(&self, room_id: RoomId) -> impl Future<Output = Result<GameRoom, StoreError>> + Send;

    /// Merges a partial update into the room: only the fields set in
    /// `update` are replaced.
    ///
    /// With `expected_version: Some(v)` the write only happens if the
    /// committed version is still `v`.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if the room doesn't exist
    /// - [`StoreError::Conflict`] if the version moved on
    fn write_room(
        &self,
        room_id: RoomId,
        update: RoomUpdate,
        expected_version: Option<u64>,
    ) -> impl Future<Output = Result<GameRoom, StoreError>> + Send;

    /// Runs `body` against the latest snapshot and commits what it returns.
    ///
    /// If another writer commits in between, `body` is run again against
    /// the fresh snapshot, up to the store's attempt limit. `Ok(None)` from
    /// the body means "nothing to write": the current snapshot is returned
    /// unchanged. An `Err` from the body aborts the transaction.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if the room doesn't exist
    /// - [`StoreError::Conflict`] once every attempt lost the race
    /// - [`StoreError::Rules`] with whatever the body rejected
    fn transactional_update<F>(
        &self,
        room_id: RoomId,
        body: F,
    ) -> impl Future<Output = Result<GameRoom, StoreError>> + Send
    where
        F: FnMut(&GameRoom) -> Result<Option<RoomUpdate>, RulesError> + Send;

    /// Deletes a room. Its subscribers see their channel close.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if the room doesn't exist.
    fn remove_room(&self, room_id: RoomId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Subscribes to a room. The receiver gets the current snapshot right
    /// away and then every committed one, in commit order.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if the room doesn't exist.
    fn subscribe(&self, room_id: RoomId) -> impl Future<Output = Result<RoomReceiver, StoreError>> + Send;
}

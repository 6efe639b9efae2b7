//! In-memory [`RoomStore`] with versioned documents.
//!
//! Each room is kept as encoded bytes plus a version number, the way a
//! document database keeps it: every read decodes a fresh copy, so no
//! caller ever holds a reference into shared state.
//!
//! Transactions are optimistic. The lock is taken to read a snapshot,
//! released while the transaction body runs, and taken again to commit.
//! The commit succeeds only if the version is still the one that was read.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use denki_protocol::{Codec, JsonCodec, RoomId};
use denki_rules::{GameRoom, RoomUpdate, RulesError};
use tokio::sync::{Mutex, mpsc};

use crate::{RoomReceiver, RoomSender, RoomStore, StoreConfig, StoreError};

/// One stored room.
struct Document {
    version: u64,
    bytes: Vec<u8>,
    /// Subscribers, pruned lazily when their receiver is gone.
    watchers: Vec<RoomSender>,
}

/// An in-memory room store.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct MemoryStore<C: Codec = JsonCodec> {
    documents: Mutex<HashMap<RoomId, Document>>,
    /// Counter for generating unique room ids.
    next_room_id: AtomicU64,
    codec: C,
    config: StoreConfig,
}

impl MemoryStore<JsonCodec> {
    /// Creates an empty store using JSON documents and the default config.
    pub fn new() -> Self {
        Self::with_codec(JsonCodec, StoreConfig::default())
    }

    /// Creates an empty JSON store with the given config.
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_codec(JsonCodec, config)
    }
}

impl Default for MemoryStore<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> MemoryStore<C> {
    /// Creates an empty store with a custom codec.
    pub fn with_codec(codec: C, config: StoreConfig) -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            next_room_id: AtomicU64::new(1),
            codec,
            config,
        }
    }

    /// Returns the number of stored rooms.
    pub async fn room_count(&self) -> usize {
        self.documents.lock().await.len()
    }

    fn decode(&self, doc: &Document) -> Result<GameRoom, StoreError> {
        let mut room: GameRoom = self.codec.decode(&doc.bytes)?;
        room.version = doc.version;
        Ok(room)
    }

    /// Applies `update` if the version still matches, bumps the version and
    /// fans the new snapshot out to subscribers.
    async fn commit(
        &self,
        room_id: RoomId,
        update: RoomUpdate,
        expected_version: Option<u64>,
    ) -> Result<GameRoom, StoreError> {
        let mut documents = self.documents.lock().await;
        let doc = documents
            .get_mut(&room_id)
            .ok_or(StoreError::NotFound(room_id))?;

        if let Some(expected) = expected_version {
            if doc.version != expected {
                tracing::debug!(
                    %room_id,
                    expected,
                    found = doc.version,
                    "version mismatch"
                );
                return Err(StoreError::Conflict {
                    room_id,
                    attempts: 1,
                });
            }
        }

        let mut room = self.decode(doc)?;
        room.apply(update);
        room.version = doc.version + 1;
        // Encode before touching the document so a codec failure leaves the
        // committed state as it was.
        doc.bytes = self.codec.encode(&room)?;
        doc.version = room.version;

        doc.watchers.retain(|watcher| watcher.send(room.clone()).is_ok());
        tracing::trace!(%room_id, version = room.version, "room committed");
        Ok(room)
    }
}

impl<C: Codec> RoomStore for MemoryStore<C> {
    async fn create_room(&self) -> Result<GameRoom, StoreError> {
        let room_id = RoomId(self.next_room_id.fetch_add(1, Ordering::Relaxed));
        let room = GameRoom::new(room_id);
        let bytes = self.codec.encode(&room)?;

        self.documents.lock().await.insert(
            room_id,
            Document {
                version: room.version,
                bytes,
                watchers: Vec::new(),
            },
        );
        tracing::info!(%room_id, "room created");
        Ok(room)
    }

    async fn read_room(&self, room_id: RoomId) -> Result<GameRoom, StoreError> {
        let documents = self.documents.lock().await;
        let doc = documents
            .get(&room_id)
            .ok_or(StoreError::NotFound(room_id))?;
        self.decode(doc)
    }

    async fn write_room(
        &self,
        room_id: RoomId,
        update: RoomUpdate,
        expected_version: Option<u64>,
    ) -> Result<GameRoom, StoreError> {
        self.commit(room_id, update, expected_version).await
    }

    async fn transactional_update<F>(
        &self,
        room_id: RoomId,
        mut body: F,
    ) -> Result<GameRoom, StoreError>
    where
        F: FnMut(&GameRoom) -> Result<Option<RoomUpdate>, RulesError> + Send,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let snapshot = self.read_room(room_id).await?;

            let update = match body(&snapshot)? {
                Some(update) if !update.is_empty() => update,
                _ => return Ok(snapshot),
            };

            match self.commit(room_id, update, Some(snapshot.version)).await {
                Err(StoreError::Conflict { .. }) if attempts < max_attempts => {
                    tracing::warn!(%room_id, attempts, "write conflict, retrying");
                }
                Err(StoreError::Conflict { .. }) => {
                    tracing::warn!(%room_id, attempts, "write conflict, giving up");
                    return Err(StoreError::Conflict { room_id, attempts });
                }
                other => return other,
            }
        }
    }

    async fn remove_room(&self, room_id: RoomId) -> Result<(), StoreError> {
        let doc = self
            .documents
            .lock()
            .await
            .remove(&room_id)
            .ok_or(StoreError::NotFound(room_id))?;
        tracing::info!(
            %room_id,
            version = doc.version,
            watchers = doc.watchers.len(),
            "room removed"
        );
        Ok(())
    }

    async fn subscribe(&self, room_id: RoomId) -> Result<RoomReceiver, StoreError> {
        let mut documents = self.documents.lock().await;
        let doc = documents
            .get_mut(&room_id)
            .ok_or(StoreError::NotFound(room_id))?;

        let (tx, rx) = mpsc::unbounded_channel();
        // Send the current snapshot so a new subscriber doesn't wait for
        // the next commit to render.
        let _ = tx.send(self.decode(doc)?);
        doc.watchers.push(tx);
        tracing::debug!(%room_id, watchers = doc.watchers.len(), "subscriber added");
        Ok(rx)
    }
}

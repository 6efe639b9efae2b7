//! `GameService` builder and the per-action entry points.
//!
//! This is where the layers meet: every player action reads the room,
//! runs the matching pure rule function, and commits the result in one
//! store transaction. Two players acting on the same room at once never
//! see each other's half-applied state.

use denki_protocol::{PlayerId, RoomId};
use denki_rules::{
    Confirmation, GameRoom, Player, RoomUpdate, RuleConfig, RulesError, barrier, lobby,
    selection,
};
use denki_store::{MemoryStore, RoomReceiver, RoomStore, StoreConfig};
use tokio::sync::mpsc;

use crate::DenkiError;

/// Builder for configuring a [`GameService`].
///
/// # Example
///
/// ```rust
/// use denki::prelude::*;
///
/// let service = GameService::builder()
///     .rules(RuleConfig { winning_points: 30, ..RuleConfig::default() })
///     .build_in_memory();
/// assert_eq!(service.rules().winning_points, 30);
/// ```
pub struct GameServiceBuilder {
    rules: RuleConfig,
    store_config: StoreConfig,
}

impl GameServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            rules: RuleConfig::default(),
            store_config: StoreConfig::default(),
        }
    }

    /// Sets the game rules. Out-of-range values are raised to their
    /// minimum (see [`RuleConfig::validated`]).
    pub fn rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules.validated();
        self
    }

    /// Sets the store configuration used by [`build_in_memory`](Self::build_in_memory).
    pub fn store_config(mut self, config: StoreConfig) -> Self {
        self.store_config = config;
        self
    }

    /// Builds a service backed by a fresh [`MemoryStore`].
    pub fn build_in_memory(self) -> GameService<MemoryStore> {
        GameService {
            store: MemoryStore::with_config(self.store_config),
            rules: self.rules,
        }
    }

    /// Builds a service on top of an existing store.
    pub fn build<S: RoomStore>(self, store: S) -> GameService<S> {
        GameService {
            store,
            rules: self.rules,
        }
    }
}

impl Default for GameServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The game engine as seen by a client session.
///
/// Share it behind an `Arc`; every method takes `&self`. Rooms handed back
/// to a player are that player's view ([`GameRoom::view_for`]): the
/// attacker never sees the electric chair before the switch is pulled.
pub struct GameService<S: RoomStore> {
    store: S,
    rules: RuleConfig,
}

impl GameService<MemoryStore> {
    /// Creates a new builder.
    pub fn builder() -> GameServiceBuilder {
        GameServiceBuilder::new()
    }
}

impl<S: RoomStore> GameService<S> {
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an empty room.
    pub async fn create_room(&self) -> Result<GameRoom, DenkiError> {
        Ok(self.store.create_room().await?)
    }

    /// Seats a new player named `name` and returns their id.
    ///
    /// # Errors
    /// [`RulesError::RoomFull`] once both seats are taken.
    pub async fn join(
        &self,
        room_id: RoomId,
        name: &str,
    ) -> Result<(PlayerId, GameRoom), DenkiError> {
        let player = Player::new(PlayerId::random(), name);
        let player_id = player.id;
        let room = self
            .store
            .transactional_update(room_id, |room| {
                let next = lobby::join(room, player.clone())?;
                Ok(Some(RoomUpdate::players(next.players)))
            })
            .await?;
        Ok((player_id, room.view_for(player_id)))
    }

    /// Marks a player ready; the game starts once both are.
    pub async fn ready(&self, room_id: RoomId, player_id: PlayerId) -> Result<GameRoom, DenkiError> {
        self.transition(room_id, player_id, |room| {
            lobby::set_ready(room, player_id, &self.rules)
        })
        .await
    }

    /// The defender hides the electric chair.
    pub async fn select_electric_chair(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        chair: u32,
    ) -> Result<GameRoom, DenkiError> {
        self.transition(room_id, player_id, |room| {
            selection::select_electric_chair(room, player_id, chair)
        })
        .await
    }

    /// The attacker takes a seat.
    pub async fn sit(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        chair: u32,
    ) -> Result<GameRoom, DenkiError> {
        self.transition(room_id, player_id, |room| {
            selection::sit(room, player_id, chair)
        })
        .await
    }

    /// The defender pulls the switch and the round is resolved.
    ///
    /// Safe to call concurrently: the resolution commits at most once per
    /// round, any later attempt sees the `Result` phase and is rejected.
    pub async fn activate(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<GameRoom, DenkiError> {
        self.transition(room_id, player_id, |room| {
            selection::pull_switch(room, player_id, &self.rules)
        })
        .await
    }

    /// Acknowledges the shown result. The second acknowledgement starts
    /// the next round; surplus ones change nothing.
    pub async fn confirm(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<GameRoom, DenkiError> {
        let room = self
            .store
            .transactional_update(room_id, |room| {
                barrier::confirm(room, player_id).map(Confirmation::into_update)
            })
            .await?;
        Ok(room.view_for(player_id))
    }

    /// Reads the latest committed snapshot as `player_id` sees it.
    ///
    /// # Errors
    /// [`RulesError::NotAuthorized`] if the player isn't in the room.
    pub async fn room(&self, room_id: RoomId, player_id: PlayerId) -> Result<GameRoom, DenkiError> {
        let room = self.store.read_room(room_id).await?;
        if !room.is_member(player_id) {
            return Err(RulesError::NotAuthorized(player_id).into());
        }
        Ok(room.view_for(player_id))
    }

    /// Subscribes `player_id` to every committed snapshot of a room, each
    /// one filtered to that player's view.
    ///
    /// The forwarding task ends when either side of the channel closes.
    ///
    /// # Errors
    /// [`RulesError::NotAuthorized`] if the player isn't in the room.
    pub async fn subscribe(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<RoomReceiver, DenkiError> {
        let mut snapshots = self.store.subscribe(room_id).await?;
        let (tx, rx) = mpsc::unbounded_channel();

        match snapshots.recv().await {
            Some(current) if current.is_member(player_id) => {
                let _ = tx.send(current.view_for(player_id));
            }
            _ => return Err(RulesError::NotAuthorized(player_id).into()),
        }

        tokio::spawn(async move {
            while let Some(room) = snapshots.recv().await {
                if tx.send(room.view_for(player_id)).is_err() {
                    break;
                }
            }
            tracing::debug!(%room_id, %player_id, "subscription closed");
        });
        Ok(rx)
    }

    /// Deletes a finished or abandoned room. Subscribers see their channel
    /// close.
    pub async fn remove_room(&self, room_id: RoomId) -> Result<(), DenkiError> {
        Ok(self.store.remove_room(room_id).await?)
    }

    /// Runs a whole-room rule transition inside one transaction and returns
    /// the result as `viewer` sees it.
    async fn transition<F>(
        &self,
        room_id: RoomId,
        viewer: PlayerId,
        rule: F,
    ) -> Result<GameRoom, DenkiError>
    where
        F: Fn(&GameRoom) -> Result<GameRoom, RulesError> + Send,
    {
        let room = self
            .store
            .transactional_update(room_id, move |room| {
                let next = rule(room)?;
                Ok(Some(RoomUpdate::snapshot(&next)))
            })
            .await?;
        Ok(room.view_for(viewer))
    }
}

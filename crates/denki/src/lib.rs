//! # Denki
//!
//! Game engine for the two-player "electric chair" game.
//!
//! Each round one player (the defender) hides an electric chair among the
//! chairs still in play, the other (the attacker) sits on one, and the
//! defender pulls the switch. A safe seat scores the chair's number and
//! removes it from play; the electric chair zeroes the attacker's score
//! and counts a shock. Both players acknowledge the result before the
//! next round starts.
//!
//! [`GameService`] runs every action as one optimistic transaction over a
//! [`RoomStore`](denki_store::RoomStore), so concurrent actions from both
//! players are serialized without locks held over game logic.
//!
//! ## Quick Start
//!
//! ```rust
//! use denki::prelude::*;
//!
//! # async fn demo() -> Result<(), DenkiError> {
//! let service = GameService::builder().build_in_memory();
//! let room = service.create_room().await?;
//! let (alice, _) = service.join(room.id, "alice").await?;
//! let (bob, _) = service.join(room.id, "bob").await?;
//! service.ready(room.id, alice).await?;
//! let room = service.ready(room.id, bob).await?;
//! assert_eq!(room.round.map(|r| r.attacker_id), Some(alice));
//! # Ok(())
//! # }
//! ```

mod error;
mod service;

pub use error::DenkiError;
pub use service::{GameService, GameServiceBuilder};

/// Re-exports everything needed to drive a game.
pub mod prelude {
    pub use crate::{DenkiError, GameService, GameServiceBuilder};
    pub use denki_protocol::{Codec, JsonCodec, PlayerId, ProtocolError, RoomId};
    pub use denki_rules::{
        BarrierState, GameRoom, Phase, Player, ResultStatus, Round, RoundResult, RuleConfig,
        RulesError, Turn, Winner,
    };
    pub use denki_store::{MemoryStore, RoomReceiver, RoomStore, StoreConfig, StoreError};
}

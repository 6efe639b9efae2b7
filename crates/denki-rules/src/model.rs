//! The room document: players, the current round, and the chair pool.
//!
//! Everything here is plain data with serde derives. The store persists a
//! [`GameRoom`] as one document; the rule functions take a snapshot by
//! reference and hand back a new one (or a [`RoomUpdate`]).

use std::collections::BTreeSet;

use denki_protocol::{PlayerId, RoomId};
use serde::{Deserialize, Serialize};

use crate::{Phase, RulesError, Turn};

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One of the two seats at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Set once the player is ready to start. The game starts when both are.
    pub ready: bool,
    pub point: u32,
    /// Shocks taken so far. Only ever goes up.
    pub shocked_count: u32,
}

impl Player {
    /// A freshly joined player: not ready, no points, no shocks.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ready: false,
            point: 0,
            shocked_count: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// Outcome of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Shocked,
    Safe,
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shocked => write!(f, "shocked"),
            Self::Safe => write!(f, "safe"),
        }
    }
}

/// The shown result of a round plus who has acknowledged it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// `None` until the round is activated.
    pub status: Option<ResultStatus>,
    /// Players who confirmed the result, in confirmation order. At most two.
    pub confirmed_ids: Vec<PlayerId>,
    /// Set by the first confirmation so refreshing clients know the
    /// result is already on screen.
    pub shown_result: bool,
}

/// A single round: one seat taken, one switch pulled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// The player who sits and scores this round.
    pub attacker_id: PlayerId,
    pub turn: Turn,
    /// Starts at 1; goes up after each `Bottom` round.
    pub count: u32,
    pub phase: Phase,
    /// The lethal chair. Hidden from the attacker; `None` until chosen.
    pub electric_chair: Option<u32>,
    /// The chair the attacker sat on; `None` until chosen.
    pub seated_chair: Option<u32>,
    pub result: RoundResult,
}

impl Round {
    /// A round in its initial `Select` state.
    pub fn new(attacker_id: PlayerId, turn: Turn, count: u32) -> Self {
        Self {
            attacker_id,
            turn,
            count,
            phase: Phase::Select,
            electric_chair: None,
            seated_chair: None,
            result: RoundResult::default(),
        }
    }

    /// The opening round of a game.
    pub fn first(attacker_id: PlayerId) -> Self {
        Self::new(attacker_id, Turn::Top, 1)
    }
}

// ---------------------------------------------------------------------------
// Winner
// ---------------------------------------------------------------------------

/// How a finished game ended.
///
/// A draw is its own variant rather than a reserved player id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Winner {
    Player(PlayerId),
    Draw,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player(id) => write!(f, "{id}"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameRoom
// ---------------------------------------------------------------------------

/// The shared room document.
///
/// `version` belongs to the store: it goes up by one on every committed
/// write and is what optimistic transactions compare against. Rule
/// functions never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRoom {
    pub id: RoomId,
    pub version: u64,
    /// Join order. Never more than two.
    pub players: Vec<Player>,
    /// `None` while the room is still in the lobby.
    pub round: Option<Round>,
    pub remaining_chairs: BTreeSet<u32>,
    /// Set once, when the game ends.
    pub winner: Option<Winner>,
}

impl GameRoom {
    /// An empty room waiting for players.
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            version: 0,
            players: Vec::new(),
            round: None,
            remaining_chairs: BTreeSet::new(),
            winner: None,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn is_member(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// The other player at the table, if both seats are filled.
    pub fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        if !self.is_member(id) {
            return None;
        }
        self.players.iter().map(|p| p.id).find(|&other| other != id)
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// The current round, or `InvalidState` if the game hasn't started.
    pub fn current_round(&self) -> Result<&Round, RulesError> {
        self.round
            .as_ref()
            .ok_or_else(|| RulesError::InvalidState("game has not started".into()))
    }

    /// The player hiding the electric chair this round.
    pub fn defender_id(&self) -> Option<PlayerId> {
        let round = self.round.as_ref()?;
        self.opponent_of(round.attacker_id)
    }

    /// The room as `viewer` may see it. The attacker doesn't learn where the
    /// electric chair is until the round reaches `Result`.
    pub fn view_for(&self, viewer: PlayerId) -> GameRoom {
        let mut view = self.clone();
        if let Some(round) = view.round.as_mut() {
            if round.attacker_id == viewer && round.phase != Phase::Result {
                round.electric_chair = None;
            }
        }
        view
    }

    /// Merges a partial update. Only the supplied fields are replaced;
    /// `id` and `version` are left alone.
    pub fn apply(&mut self, update: RoomUpdate) {
        let RoomUpdate {
            players,
            round,
            remaining_chairs,
            winner,
        } = update;
        if let Some(players) = players {
            self.players = players;
        }
        if let Some(round) = round {
            self.round = Some(round);
        }
        if let Some(remaining_chairs) = remaining_chairs {
            self.remaining_chairs = remaining_chairs;
        }
        if let Some(winner) = winner {
            self.winner = Some(winner);
        }
    }
}

// ---------------------------------------------------------------------------
// RoomUpdate
// ---------------------------------------------------------------------------

/// A partial write to a room document.
///
/// `None` means "leave as is". There is no way to clear a field, which
/// keeps `winner` from ever reverting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUpdate {
    pub players: Option<Vec<Player>>,
    pub round: Option<Round>,
    pub remaining_chairs: Option<BTreeSet<u32>>,
    pub winner: Option<Winner>,
}

impl RoomUpdate {
    /// Replaces only the current round.
    pub fn round(round: Round) -> Self {
        Self {
            round: Some(round),
            ..Self::default()
        }
    }

    /// Replaces only the player list.
    pub fn players(players: Vec<Player>) -> Self {
        Self {
            players: Some(players),
            ..Self::default()
        }
    }

    /// Replaces every game field with the values in `room`.
    pub fn snapshot(room: &GameRoom) -> Self {
        Self {
            players: Some(room.players.clone()),
            round: room.round.clone(),
            remaining_chairs: Some(room.remaining_chairs.clone()),
            winner: room.winner,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_none()
            && self.round.is_none()
            && self.remaining_chairs.is_none()
            && self.winner.is_none()
    }
}

//! Identity types shared by every Denki crate.
//!
//! These are the ids that appear inside stored room documents and in the
//! errors each layer reports, so they live at the bottom of the stack.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Opaque to the game: it is assigned once when the player joins a room and
/// stays stable for the room's lifetime. Wrapping the `u64` keeps it from
/// being mixed up with a [`RoomId`] or with a chair number.
///
/// `#[serde(transparent)]` stores `PlayerId(42)` as plain `42` in a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Generates a fresh random id for a joining player.
    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one electric-chair match).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Rule configuration and the per-round state machines.

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// RuleConfig
// ---------------------------------------------------------------------------

/// Tunable constants of the electric-chair game.
///
/// The defaults are the standard game: twelve chairs numbered 1 to 12,
/// forty points to win, three shocks and you're out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Number of chairs on the board. Chairs are numbered `1..=chair_count`
    /// and a chair's number is the points it scores.
    pub chair_count: u32,

    /// Score at which a player wins outright.
    pub winning_points: u32,

    /// Shocks after which a player is eliminated.
    pub max_shocks: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            chair_count: 12,
            winning_points: 40,
            max_shocks: 3,
        }
    }
}

impl RuleConfig {
    /// Fewest chairs a game can start with. With one chair or none the game
    /// would be decided before the first round.
    pub const MIN_CHAIRS: u32 = 2;

    /// Raise any out-of-range value to its minimum so the config is safe to
    /// use.
    ///
    /// Applied by the service builder. Rules:
    /// - `chair_count` at least [`Self::MIN_CHAIRS`].
    /// - `winning_points` at least 1, so a freshly shocked player (0 points)
    ///   can't win.
    /// - `max_shocks` at least 1.
    pub fn validated(mut self) -> Self {
        if self.chair_count < Self::MIN_CHAIRS {
            warn!(
                chair_count = self.chair_count,
                min = Self::MIN_CHAIRS,
                "chair_count below minimum, raising"
            );
            self.chair_count = Self::MIN_CHAIRS;
        }
        if self.winning_points == 0 {
            warn!("winning_points is 0, raising to 1");
            self.winning_points = 1;
        }
        if self.max_shocks == 0 {
            warn!("max_shocks is 0, raising to 1");
            self.max_shocks = 1;
        }
        self
    }

    /// The full set of chairs a new game starts with.
    pub fn chairs(&self) -> impl Iterator<Item = u32> {
        1..=self.chair_count
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a round is in its lifecycle.
///
/// Transitions are strictly ordered, no skipping states:
///
/// ```text
/// Select → Activate → Result
/// ```
///
/// - **Select**: the defender is hiding the electric chair.
/// - **Activate**: the electric chair is set; the attacker picks a seat and
///   the defender pulls the switch.
/// - **Result**: the outcome is shown and the confirmation barrier runs.
///   A new round replaces this one once both players confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Select,
    Activate,
    Result,
}

impl Phase {
    /// Returns the next phase, or `None` from `Result` (the round is over).
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Select => Some(Self::Activate),
            Self::Activate => Some(Self::Result),
            Self::Result => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Activate => write!(f, "activate"),
            Self::Result => write!(f, "result"),
        }
    }
}

// ---------------------------------------------------------------------------
// Turn
// ---------------------------------------------------------------------------

/// Which half of a count cycle a round belongs to.
///
/// One `Top` round plus one `Bottom` round make up a full cycle; the round
/// `count` goes up when a `Bottom` round ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    #[default]
    Top,
    Bottom,
}

impl Turn {
    /// Returns the turn of the following round and whether the count
    /// cycle completed.
    pub fn advance(self) -> (Self, bool) {
        match self {
            Self::Top => (Self::Bottom, false),
            Self::Bottom => (Self::Top, true),
        }
    }
}

impl std::fmt::Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

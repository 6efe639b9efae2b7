//! Rules of the electric-chair game.
//!
//! Every transition here is a pure function from a room snapshot (plus an
//! action) to the next snapshot. Nothing in this crate does I/O or holds
//! locks; the store applies these functions inside its transactions.
//!
//! # Key items
//!
//! - [`GameRoom`]: the room document ([`Player`], [`Round`], [`Winner`])
//! - [`lobby`]: joining and readying up
//! - [`selection`]: hiding the electric chair, sitting, pulling the switch
//! - [`resolver`]: what a pulled switch does to scores and chairs
//! - [`barrier`]: the two-player confirmation before the next round
//! - [`RuleConfig`]: chair count, winning score, shock limit

mod config;
mod error;
mod model;

pub mod barrier;
pub mod lobby;
pub mod resolver;
pub mod selection;

pub use barrier::{BarrierState, Confirmation};
pub use config::{Phase, RuleConfig, Turn};
pub use error::RulesError;
pub use model::{GameRoom, Player, ResultStatus, RoomUpdate, Round, RoundResult, Winner};

//! Identity types and document codecs for Denki.
//!
//! - **Types** ([`PlayerId`], [`RoomId`]): the ids every other layer
//!   passes around.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how room documents are
//!   converted to and from bytes in the store.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! ```text
//! Protocol (ids, bytes) → Rules (pure transitions) → Store (documents) → Service
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{PlayerId, RoomId};

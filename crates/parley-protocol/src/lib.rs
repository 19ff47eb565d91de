//! Wire protocol for Parley.
//!
//! - **Types** ([`Request`], [`Call`], [`Response`], [`Reply`],
//!   [`ChatMessage`], [`Timestamp`]): what travels between client and
//!   server.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how frames become bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong doing that.
//!
//! The protocol layer knows nothing about connections or rooms. The room
//! store and presence tracker reuse [`ChatMessage`] and [`Timestamp`] as
//! their stored values, so what is stored is exactly what is sent.
//!
//! ```text
//! Transport (bytes) → Protocol (Request / Response) → Coordinator
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    CODE_INVALID_INPUT, CODE_UNAVAILABLE, Call, ChatMessage, Presence, Reply,
    Request, Response, RoomSummary, TIMESTAMP_FORMAT, Timestamp,
};

//! Wire protocol for Gambit.
//!
//! This crate defines the events that clients and the server exchange:
//!
//! - **Types** ([`Envelope`], [`ServerEvent`], [`ClientEvent`], [`Role`],
//!   [`Rejection`], etc.): the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those structures
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope) → Table (roles, turns, position)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    ChatMessage, ClientEnvelope, ClientEvent, Envelope, InvalidMove,
    MoveRequest, MoveSubmission, ParticipantId, Rejection, Role, RoleLabel,
    ServerEnvelope, ServerEvent,
};

//! The authoritative table for Gambit.
//!
//! A table runs as one Tokio task (actor model) that owns the
//! [`SessionRegistry`](gambit_session::SessionRegistry), every participant's
//! outbound channel, and nothing else. All seat claims, move submissions
//! and chat lines are commands on its queue, so they are applied one at a
//! time and every participant sees the resulting events in the same order.
//!
//! # Key types
//!
//! - [`RulesOracle`]: the trait a rules engine implements
//! - [`TableHandle`]: send commands to the running table
//! - [`Broadcaster`]: per-event fan-out to participants
//! - [`authorize`]: the turn gate run before the oracle is consulted
//! - [`ConnectionState`]: per-connection lifecycle state machine
//! - [`TableConfig`]: table settings (chat limits, queue size)

mod broadcast;
mod config;
mod error;
mod gate;
mod lifecycle;
mod oracle;
mod table;

pub use broadcast::{Broadcaster, ParticipantReceiver, ParticipantSender};
pub use config::TableConfig;
pub use error::TableError;
pub use gate::authorize;
pub use lifecycle::ConnectionState;
pub use oracle::{IllegalMove, Outcome, RulesOracle};
pub use table::{TableHandle, TableSnapshot, spawn_table};

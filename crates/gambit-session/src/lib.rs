//! Seat bookkeeping for a Gambit table.
//!
//! This crate owns the two pieces of shared state every other layer
//! depends on:
//!
//! 1. **Seating**: which connection, if any, holds White and Black
//!    ([`Seating`])
//! 2. **Position**: the current game position, replaced wholesale after
//!    each accepted move ([`SessionRegistry`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Table Layer (above)  ← gates turns and fans events out
//!     ↕
//! Session Layer (this crate)  ← seats and position, no I/O
//!     ↕
//! Protocol Layer (below)  ← provides ParticipantId, Role
//! ```
//!
//! Nothing here broadcasts or locks. The registry is owned by exactly one
//! task, which is what makes claims and position replacement atomic.

mod registry;
mod seating;

pub use gambit_protocol::{ParticipantId, Role};
pub use registry::SessionRegistry;
pub use seating::Seating;

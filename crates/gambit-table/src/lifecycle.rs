//! Per-connection lifecycle state.

use std::fmt;

use gambit_protocol::Role;

/// Where a connection stands at the table.
///
/// ```text
/// Connecting ──claim──→ Seated(White | Black) ──disconnect──→ Disconnected
///      │                                                         ▲
///      └──────claim──→ Spectating ──────────disconnect───────────┘
/// ```
///
/// - **Connecting**: transport is up, no seat decision yet.
/// - **Seated**: holds a seat. Leaving it frees the seat and is announced.
/// - **Spectating**: both seats were taken on arrival. Watches and chats.
/// - **Disconnected**: terminal. A returning client is a new connection.
///
/// A spectator is never promoted into a seat that frees up later; only
/// new connections claim seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Seated(Role),
    Spectating,
    Disconnected,
}

impl ConnectionState {
    /// The state a connection lands in once its seat claim is decided.
    pub fn from_claim(claim: Option<Role>) -> Self {
        match claim {
            Some(role) => Self::Seated(role),
            None => Self::Spectating,
        }
    }

    /// Returns `true` if chat lines from this connection are relayed.
    pub fn can_chat(&self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    /// Returns `true` if `target` is reachable from here in one step.
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Connecting, Self::Seated(_) | Self::Spectating) => true,
            (
                Self::Connecting | Self::Seated(_) | Self::Spectating,
                Self::Disconnected,
            ) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Seated(role) => write!(f, "Seated({role})"),
            Self::Spectating => write!(f, "Spectating"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

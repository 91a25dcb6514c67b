//! Core protocol types for Gambit's wire format.
//!
//! Every type here travels on the wire. Event and field names are chosen
//! to match what browser chess clients already listen for (`playerRole`,
//! `boardState`, `invalidMove`, ...), so the JSON shapes are pinned down by
//! the tests at the bottom of this file.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifies one live connection at the table.
///
/// Assigned from the transport's connection id and never shown to other
/// participants; chat and notices are labelled by [`RoleLabel`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// One of the two playing seats.
///
/// Serialized as the single-letter side codes `"w"` and `"b"`, the same
/// letters FEN uses for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Role {
    /// Both seats, in claim order.
    pub const ALL: [Role; 2] = [Role::White, Role::Black];

    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns the chat label for a participant holding this seat.
    pub fn label(self) -> RoleLabel {
        match self {
            Self::White => RoleLabel::White,
            Self::Black => RoleLabel::Black,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "White"),
            Self::Black => write!(f, "Black"),
        }
    }
}

/// The author tag attached to a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleLabel {
    White,
    Black,
    Spectator,
    /// Server-originated notices such as disconnect announcements.
    System,
}

/// A seated participant is labelled by their seat, anyone else is a
/// spectator.
impl From<Option<Role>> for RoleLabel {
    fn from(role: Option<Role>) -> Self {
        role.map_or(Self::Spectator, Role::label)
    }
}

impl fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::White => "White",
            Self::Black => "Black",
            Self::Spectator => "Spectator",
            Self::System => "System",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// A move exactly as a client submitted it.
///
/// Every field is optional so that a submission with missing fields still
/// decodes and can be rejected as [`Rejection::MalformedSubmission`] and
/// echoed back, instead of vanishing as an undecodable frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

/// A well-formed move: both squares present, promotion optional.
///
/// Square and piece syntax is not checked here; that is the rules
/// oracle's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

impl MoveRequest {
    /// Creates a move without a promotion piece.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            promotion: None,
        }
    }

    /// Sets the promotion piece letter.
    pub fn with_promotion(mut self, piece: impl Into<String>) -> Self {
        self.promotion = Some(piece.into());
        self
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = &self.promotion {
            write!(f, "{piece}")?;
        }
        Ok(())
    }
}

impl TryFrom<MoveSubmission> for MoveRequest {
    type Error = Rejection;

    fn try_from(submission: MoveSubmission) -> Result<Self, Self::Error> {
        let required = |field: Option<String>| {
            field
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .ok_or(Rejection::MalformedSubmission)
        };
        let promotion = submission
            .promotion
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());
        Ok(Self {
            from: required(submission.from)?,
            to: required(submission.to)?,
            promotion,
        })
    }
}

impl From<MoveRequest> for MoveSubmission {
    fn from(mv: MoveRequest) -> Self {
        Self {
            from: Some(mv.from),
            to: Some(mv.to),
            promotion: mv.promotion,
        }
    }
}

/// Why a move submission was turned down.
///
/// Only the submitter ever sees one of these; the position is unchanged
/// and nobody else is notified.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error,
)]
pub enum Rejection {
    /// The sender holds no seat.
    #[error("spectators cannot move")]
    NotAPlayer,
    /// The sender's seat is not the side to move.
    #[error("it is not your turn")]
    NotYourTurn,
    /// The rules oracle refused the move (or failed while judging it).
    #[error("illegal move")]
    IllegalMove,
    /// The submission lacked a required field.
    #[error("malformed move submission")]
    MalformedSubmission,
}

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// One relayed chat line, or a system notice when `role` is `System`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: RoleLabel,
    pub message: String,
    /// Random per-message id for client-side keying. Never a connection
    /// id. Absent on system notices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Payload of an `invalidMove` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidMove {
    /// The submission being rejected, echoed verbatim.
    #[serde(rename = "move")]
    pub submitted: MoveSubmission,
    pub reason: Rejection,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events the server sends to a client.
///
/// Adjacently tagged, so `ServerEvent::BoardState(fen)` becomes
/// `{"event": "boardState", "data": "<fen>"}` and the unit variant
/// `SpectatorRole` becomes `{"event": "spectatorRole"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Unicast: you hold this seat.
    PlayerRole(Role),
    /// Unicast: both seats are taken, you are watching.
    SpectatorRole,
    /// Full position in portable notation.
    BoardState(String),
    /// The move that was just accepted.
    Move(MoveRequest),
    /// Unicast: your submission was rejected.
    InvalidMove(InvalidMove),
    /// Chat line or system notice.
    ChatMessage(ChatMessage),
}

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Move submission.
    Move(MoveSubmission),
    /// Chat text. The server attaches the sender's label.
    ChatMessage(String),
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level frame. Every message on the wire is an Envelope.
///
/// ```text
/// ┌──────────────────────────────────────┐
/// │ seq: 42                              │  ← table-wide event order
/// │ timestamp: 15000                     │  ← ms since the table started
/// │ ┌──────────────────────────────────┐ │
/// │ │ payload: {event: "boardState",   │ │
/// │ │           data: "rnbqkbnr/..."}  │ │
/// │ └──────────────────────────────────┘ │
/// └──────────────────────────────────────┘
/// ```
///
/// On server frames `seq` comes from a single counter per table, so two
/// participants comparing `seq` values agree on which event came first.
/// Clients may omit both header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<E> {
    #[serde(default)]
    pub seq: u64,
    #[serde(default)]
    pub timestamp: u64,
    pub payload: E,
}

/// A frame sent by the server.
pub type ServerEnvelope = Envelope<ServerEvent>;

/// A frame sent by a client.
pub type ClientEnvelope = Envelope<ClientEvent>;

// =========================================================================
// Tests
// =========================================================================

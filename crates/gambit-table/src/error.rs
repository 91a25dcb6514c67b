//! Error types for the table layer.

use gambit_protocol::ParticipantId;

/// Errors that can occur when talking to the table.
///
/// Rejected moves are not errors; they are reported to the submitter as
/// [`Rejection`](gambit_protocol::Rejection)s.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The participant is already at the table.
    #[error("participant {0} already joined the table")]
    AlreadyJoined(ParticipantId),

    /// The participant is not at the table.
    #[error("participant {0} is not at the table")]
    UnknownParticipant(ParticipantId),

    /// The table's command channel is closed (the table stopped).
    #[error("table is unavailable")]
    Unavailable,
}

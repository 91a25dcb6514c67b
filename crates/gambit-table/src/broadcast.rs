//! Event fan-out from the table to its participants.
//!
//! Every outgoing event is stamped with the next value of one table-wide
//! sequence counter before it is queued, and each participant's queue is
//! FIFO. Together that gives a total order: if one participant sees event
//! 12 before event 13, so does everyone who receives both.

use std::collections::HashMap;
use std::time::Instant;

use gambit_protocol::{
    ChatMessage, InvalidMove, MoveRequest, MoveSubmission, ParticipantId,
    Rejection, Role, RoleLabel, ServerEnvelope, ServerEvent,
};
use rand::Rng;
use tokio::sync::mpsc;

/// Channel sender for delivering events to one participant's connection.
pub type ParticipantSender = mpsc::UnboundedSender<ServerEnvelope>;

/// Receiving half of a participant's event channel.
pub type ParticipantReceiver = mpsc::UnboundedReceiver<ServerEnvelope>;

/// Fans events out to the participants attached to a table.
///
/// Unicast methods take the addressee; broadcast methods go to every
/// attached participant, the originator included, so every client renders
/// from the same wire events.
pub struct Broadcaster {
    outboxes: HashMap<ParticipantId, ParticipantSender>,
    seq: u64,
    started: Instant,
}

impl Broadcaster {
    /// Creates a broadcaster with nobody attached.
    pub fn new() -> Self {
        Self {
            outboxes: HashMap::new(),
            seq: 0,
            started: Instant::now(),
        }
    }

    /// Starts delivering events to `participant` through `sender`.
    pub fn attach(
        &mut self,
        participant: ParticipantId,
        sender: ParticipantSender,
    ) {
        self.outboxes.insert(participant, sender);
    }

    /// Stops delivering events to `participant`. Returns `false` if they
    /// were not attached.
    pub fn detach(&mut self, participant: ParticipantId) -> bool {
        self.outboxes.remove(&participant).is_some()
    }

    /// Unicast: tells `participant` which seat they hold.
    pub fn announce_role(&mut self, participant: ParticipantId, role: Role) {
        self.unicast(participant, ServerEvent::PlayerRole(role));
    }

    /// Unicast: tells `participant` they are spectating.
    pub fn announce_spectator(&mut self, participant: ParticipantId) {
        self.unicast(participant, ServerEvent::SpectatorRole);
    }

    /// Unicast: the full position, for a participant who just arrived.
    pub fn send_position(
        &mut self,
        participant: ParticipantId,
        notation: String,
    ) {
        self.unicast(participant, ServerEvent::BoardState(notation));
    }

    /// Everyone: the full position after an accepted move.
    pub fn broadcast_position(&mut self, notation: String) {
        self.broadcast(ServerEvent::BoardState(notation));
    }

    /// Everyone: the move that was just accepted.
    pub fn broadcast_move(&mut self, mv: MoveRequest) {
        self.broadcast(ServerEvent::Move(mv));
    }

    /// Unicast: only the submitter learns their move was turned down.
    pub fn notify_rejected(
        &mut self,
        participant: ParticipantId,
        submitted: MoveSubmission,
        reason: Rejection,
    ) {
        self.unicast(
            participant,
            ServerEvent::InvalidMove(InvalidMove { submitted, reason }),
        );
    }

    /// Everyone: a chat line tagged with its author's label.
    pub fn broadcast_chat(&mut self, role: RoleLabel, text: String) {
        self.broadcast(ServerEvent::ChatMessage(ChatMessage {
            role,
            message: text,
            id: Some(message_id()),
        }));
    }

    /// Everyone: a server notice.
    pub fn broadcast_system(&mut self, text: impl Into<String>) {
        self.broadcast(ServerEvent::ChatMessage(ChatMessage {
            role: RoleLabel::System,
            message: text.into(),
            id: None,
        }));
    }

    fn unicast(&mut self, participant: ParticipantId, event: ServerEvent) {
        let envelope = self.stamp(event);
        self.deliver(participant, envelope);
    }

    fn broadcast(&mut self, event: ServerEvent) {
        let envelope = self.stamp(event);
        for participant in self.outboxes.keys().copied().collect::<Vec<_>>() {
            self.deliver(participant, envelope.clone());
        }
    }

    /// Wraps `event` with the next sequence number.
    fn stamp(&mut self, event: ServerEvent) -> ServerEnvelope {
        self.seq += 1;
        ServerEnvelope {
            seq: self.seq,
            timestamp: self.started.elapsed().as_millis() as u64,
            payload: event,
        }
    }

    /// Queues an envelope for one participant. Silently drops it if their
    /// connection task is gone; the leave command is already on its way.
    fn deliver(&self, participant: ParticipantId, envelope: ServerEnvelope) {
        if let Some(sender) = self.outboxes.get(&participant) {
            if sender.send(envelope).is_err() {
                tracing::debug!(%participant, "outbox closed, event dropped");
            }
        }
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a random 32-character hex id for a chat line.
fn message_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

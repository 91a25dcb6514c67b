//! Table actor: the one Tokio task that owns the game session.
//!
//! Connection handlers never touch the session directly. They send
//! commands through a [`TableHandle`], and the actor applies them one at
//! a time. A seat claim, a move and the broadcasts it triggers all happen
//! inside one command, so nothing can interleave with them.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use gambit_protocol::{
    MoveRequest, MoveSubmission, ParticipantId, Rejection, Role, RoleLabel,
};
use gambit_session::SessionRegistry;
use tokio::sync::{mpsc, oneshot};

use crate::{
    Broadcaster, ConnectionState, ParticipantSender, RulesOracle,
    TableConfig, TableError, authorize,
};

/// Commands sent to the table actor through its channel.
///
/// Variants with a `reply` are request/response; the rest are
/// fire-and-forget and report back, if at all, through the participant's
/// event channel.
enum TableCommand {
    /// Seat a new connection, or make it a spectator.
    Join {
        participant: ParticipantId,
        sender: ParticipantSender,
        reply: oneshot::Sender<Result<Option<Role>, TableError>>,
    },

    /// Remove a connection and free its seat.
    Leave {
        participant: ParticipantId,
        reply: oneshot::Sender<Result<(), TableError>>,
    },

    /// A move submission.
    Move {
        participant: ParticipantId,
        submission: MoveSubmission,
    },

    /// A chat line.
    Chat {
        participant: ParticipantId,
        text: String,
    },

    /// Request a snapshot of the table.
    Snapshot {
        reply: oneshot::Sender<TableSnapshot>,
    },

    /// Stop the actor.
    Shutdown,
}

/// A point-in-time view of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    /// Who holds White, if anyone.
    pub white: Option<ParticipantId>,
    /// Who holds Black, if anyone.
    pub black: Option<ParticipantId>,
    /// The side to move, derived from the position.
    pub mover: Role,
    /// The position in wire notation.
    pub position: String,
    /// Connections at the table, spectators included.
    pub participants: usize,
}

/// Handle to a running table. Cheap to clone.
#[derive(Clone)]
pub struct TableHandle {
    sender: mpsc::Sender<TableCommand>,
}

impl TableHandle {
    /// Joins `participant`, delivering their events through `sender`.
    ///
    /// Returns the claimed seat, or `None` for a spectator. By the time
    /// this returns the role announcement and the current position are
    /// already queued on `sender`.
    pub async fn join(
        &self,
        participant: ParticipantId,
        sender: ParticipantSender,
    ) -> Result<Option<Role>, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Join {
                participant,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| TableError::Unavailable)?;
        reply_rx.await.map_err(|_| TableError::Unavailable)?
    }

    /// Removes `participant`. A freed seat is announced to everyone left.
    pub async fn leave(
        &self,
        participant: ParticipantId,
    ) -> Result<(), TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Leave {
                participant,
                reply: reply_tx,
            })
            .await
            .map_err(|_| TableError::Unavailable)?;
        reply_rx.await.map_err(|_| TableError::Unavailable)?
    }

    /// Submits a move (fire-and-forget). The verdict arrives as events.
    pub async fn submit_move(
        &self,
        participant: ParticipantId,
        submission: MoveSubmission,
    ) -> Result<(), TableError> {
        self.sender
            .send(TableCommand::Move {
                participant,
                submission,
            })
            .await
            .map_err(|_| TableError::Unavailable)
    }

    /// Sends a chat line (fire-and-forget).
    pub async fn chat(
        &self,
        participant: ParticipantId,
        text: String,
    ) -> Result<(), TableError> {
        self.sender
            .send(TableCommand::Chat { participant, text })
            .await
            .map_err(|_| TableError::Unavailable)
    }

    /// Returns a snapshot of seats and position.
    pub async fn snapshot(&self) -> Result<TableSnapshot, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| TableError::Unavailable)?;
        reply_rx.await.map_err(|_| TableError::Unavailable)
    }

    /// Tells the table to stop. Pending commands queued before this one
    /// are still processed.
    pub async fn shutdown(&self) -> Result<(), TableError> {
        self.sender
            .send(TableCommand::Shutdown)
            .await
            .map_err(|_| TableError::Unavailable)
    }
}

/// The actor state. Lives inside the spawned task.
struct TableActor<G: RulesOracle> {
    registry: SessionRegistry<G::Position>,
    broadcaster: Broadcaster,
    connections: HashMap<ParticipantId, ConnectionState>,
    config: TableConfig,
    receiver: mpsc::Receiver<TableCommand>,
}

impl<G: RulesOracle> TableActor<G> {
    async fn run(mut self) {
        tracing::info!(
            position = %G::notation(self.registry.current_position()),
            "table actor started"
        );

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                TableCommand::Join {
                    participant,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(participant, sender);
                    let _ = reply.send(result);
                }
                TableCommand::Leave { participant, reply } => {
                    let result = self.handle_leave(participant);
                    let _ = reply.send(result);
                }
                TableCommand::Move {
                    participant,
                    submission,
                } => {
                    self.handle_move(participant, submission);
                }
                TableCommand::Chat { participant, text } => {
                    self.handle_chat(participant, text);
                }
                TableCommand::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                TableCommand::Shutdown => {
                    tracing::info!("table shutting down");
                    break;
                }
            }
        }

        tracing::info!("table actor stopped");
    }

    fn handle_join(
        &mut self,
        participant: ParticipantId,
        sender: ParticipantSender,
    ) -> Result<Option<Role>, TableError> {
        if self.connections.contains_key(&participant) {
            return Err(TableError::AlreadyJoined(participant));
        }

        self.broadcaster.attach(participant, sender);
        let claim = self.registry.claim_role(participant);
        self.transition(participant, ConnectionState::from_claim(claim));

        match claim {
            Some(role) => self.broadcaster.announce_role(participant, role),
            None => self.broadcaster.announce_spectator(participant),
        }
        let notation = G::notation(self.registry.current_position());
        self.broadcaster.send_position(participant, notation);

        tracing::info!(
            %participant,
            label = %RoleLabel::from(claim),
            participants = self.connections.len(),
            "participant joined"
        );
        Ok(claim)
    }

    fn handle_leave(
        &mut self,
        participant: ParticipantId,
    ) -> Result<(), TableError> {
        if !self.connections.contains_key(&participant) {
            return Err(TableError::UnknownParticipant(participant));
        }

        self.transition(participant, ConnectionState::Disconnected);
        self.connections.remove(&participant);
        self.broadcaster.detach(participant);

        if let Some(role) = self.registry.release_role(participant) {
            self.broadcaster
                .broadcast_system(format!("{role} player disconnected."));
        }

        tracing::info!(
            %participant,
            participants = self.connections.len(),
            "participant left"
        );
        Ok(())
    }

    fn handle_move(
        &mut self,
        participant: ParticipantId,
        submission: MoveSubmission,
    ) {
        if !self.connections.contains_key(&participant) {
            tracing::warn!(%participant, "move from non-member, ignoring");
            return;
        }

        match self.adjudicate(participant, submission.clone()) {
            Ok((mv, next)) => {
                self.registry.apply_accepted(next);
                let position = self.registry.current_position();
                let notation = G::notation(position);
                let outcome = G::outcome(position);

                tracing::info!(%participant, %mv, "move accepted");
                self.broadcaster.broadcast_move(mv);
                self.broadcaster.broadcast_position(notation);

                if let Some(outcome) = outcome {
                    tracing::info!(%outcome, "game over");
                    if self.config.announce_outcome {
                        self.broadcaster.broadcast_system(outcome.to_string());
                    }
                }
            }
            Err(reason) => {
                tracing::debug!(%participant, %reason, "move rejected");
                self.broadcaster
                    .notify_rejected(participant, submission, reason);
            }
        }
    }

    /// Runs a submission through the turn gate, the shape check and the
    /// oracle, in that order. Touches nothing.
    fn adjudicate(
        &self,
        participant: ParticipantId,
        submission: MoveSubmission,
    ) -> Result<(MoveRequest, G::Position), Rejection> {
        authorize::<G>(&self.registry, participant)?;
        let mv = MoveRequest::try_from(submission)?;

        let position = self.registry.current_position();
        match catch_unwind(AssertUnwindSafe(|| G::apply(position, &mv))) {
            Ok(Ok(next)) => Ok((mv, next)),
            Ok(Err(_)) => Err(Rejection::IllegalMove),
            Err(_) => {
                tracing::warn!(%participant, %mv, "rules oracle panicked");
                Err(Rejection::IllegalMove)
            }
        }
    }

    fn handle_chat(&mut self, participant: ParticipantId, text: String) {
        let Some(state) = self.connections.get(&participant) else {
            tracing::warn!(%participant, "chat from non-member, ignoring");
            return;
        };
        if !state.can_chat() || text.trim().is_empty() {
            return;
        }

        let text: String = text.chars().take(self.config.max_chat_len).collect();
        let label = RoleLabel::from(self.registry.role_of(participant));
        self.broadcaster.broadcast_chat(label, text);
    }

    /// Records a lifecycle step, logging any step the state machine
    /// doesn't allow.
    fn transition(&mut self, participant: ParticipantId, next: ConnectionState) {
        let current = self
            .connections
            .get(&participant)
            .copied()
            .unwrap_or(ConnectionState::Connecting);
        if !current.can_transition_to(next) {
            tracing::warn!(
                %participant,
                from = %current,
                to = %next,
                "unexpected connection transition"
            );
        }
        self.connections.insert(participant, next);
    }

    fn snapshot(&self) -> TableSnapshot {
        let seating = self.registry.seating();
        let position = self.registry.current_position();
        TableSnapshot {
            white: seating.occupant(Role::White),
            black: seating.occupant(Role::Black),
            mover: G::mover(position),
            position: G::notation(position),
            participants: self.connections.len(),
        }
    }
}

/// Spawns a table at `start` and returns a handle to it.
///
/// The command queue is bounded by
/// [`TableConfig::command_channel_size`]; senders wait when it is full.
pub fn spawn_table<G: RulesOracle>(
    start: G::Position,
    config: TableConfig,
) -> TableHandle {
    let (tx, rx) = mpsc::channel(config.command_channel_size);

    let actor = TableActor::<G> {
        registry: SessionRegistry::new(start),
        broadcaster: Broadcaster::new(),
        connections: HashMap::new(),
        config,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    TableHandle { sender: tx }
}

//! Per-connection handler: seat claim, event forwarding, and routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Join the table → seat or spectator, current position queued
//!   2. Spawn a writer that forwards table events to the socket
//!   3. Loop: receive envelopes → route moves and chat to the table
//!   4. On close, leave the table (frees the seat, announces it)

use std::sync::Arc;

use gambit_protocol::{
    ClientEnvelope, ClientEvent, Codec, ParticipantId,
};
use gambit_table::{ParticipantReceiver, TableHandle};
use gambit_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::GambitError;
use crate::server::ServerState;

/// Drop guard that removes a participant from the table when the handler
/// exits, however it exits.
///
/// `Drop` is synchronous, so the leave is a fire-and-forget task.
struct LeaveGuard {
    participant: ParticipantId,
    table: TableHandle,
}

impl Drop for LeaveGuard {
    fn drop(&mut self) {
        let participant = self.participant;
        let table = self.table.clone();
        tokio::spawn(async move {
            if let Err(e) = table.leave(participant).await {
                tracing::debug!(%participant, error = %e, "leave failed");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), GambitError> {
    let conn_id = conn.id();
    let participant = ParticipantId(conn_id.into_inner());
    let conn = Arc::new(conn);
    tracing::debug!(%conn_id, %participant, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    let role = state.table.join(participant, tx).await?;
    let _guard = LeaveGuard {
        participant,
        table: state.table.clone(),
    };
    match role {
        Some(role) => tracing::info!(%participant, %role, "player seated"),
        None => tracing::info!(%participant, "spectator joined"),
    }

    tokio::spawn(forward_events(
        Arc::clone(&conn),
        Arc::clone(&state),
        participant,
        rx,
    ));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%participant, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%participant, error = %e, "recv error");
                break;
            }
        };

        let envelope: ClientEnvelope = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(
                    %participant, error = %e, "failed to decode envelope"
                );
                continue;
            }
        };

        match envelope.payload {
            ClientEvent::Move(submission) => {
                state.table.submit_move(participant, submission).await?;
            }
            ClientEvent::ChatMessage(text) => {
                state.table.chat(participant, text).await?;
            }
        }
    }

    // _guard drops here → table leave fires.
    Ok(())
}

/// Writes table events to the socket until the table detaches this
/// participant or the socket fails.
async fn forward_events<C: Codec>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<C>>,
    participant: ParticipantId,
    mut events: ParticipantReceiver,
) {
    while let Some(envelope) = events.recv().await {
        let bytes = match state.codec.encode(&envelope) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%participant, error = %e, "encode failed");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%participant, error = %e, "send failed");
            break;
        }
    }

    let _ = conn.close().await;
}

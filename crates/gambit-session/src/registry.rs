//! The session registry: seats plus the current position.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is NOT thread-safe by itself, in the same way the
//! position it holds isn't. It is owned by the table actor, which
//! processes one command at a time, so a claim or a position replacement
//! always runs to completion before the next one starts. Two connections
//! racing for White are serialized by the actor's queue, not by a lock
//! in here.

use gambit_protocol::{ParticipantId, Role};

use crate::Seating;

/// The single shared game session.
///
/// `P` is the position type, opaque to this crate. Whose turn it is
/// is deliberately NOT stored here: it is always derived from the
/// position by the rules layer, so the two can never disagree.
///
/// ## Lifecycle
///
/// ```text
/// new(start) ──→ claim_role() ──→ apply_accepted() ... ──→ release_role()
///                  │                                        │
///                  ▼                                        ▼
///          Some(White|Black)                          seat vacant again
///          or None (spectator)
/// ```
#[derive(Debug)]
pub struct SessionRegistry<P> {
    position: P,
    seating: Seating,
}

impl<P> SessionRegistry<P> {
    /// Creates a session at `start` with both seats vacant.
    pub fn new(start: P) -> Self {
        Self {
            position: start,
            seating: Seating::new(),
        }
    }

    /// Seats `participant` in the first vacant seat, White before Black.
    ///
    /// Returns `None` when both seats are taken: the participant is a
    /// spectator. A participant that already holds a seat keeps it and
    /// gets it back, so one connection can never occupy both seats.
    pub fn claim_role(&mut self, participant: ParticipantId) -> Option<Role> {
        if let Some(held) = self.seating.role_of(participant) {
            return Some(held);
        }

        let role = Role::ALL
            .into_iter()
            .find(|role| self.seating.is_vacant(*role))?;
        *self.seating.seat_mut(role) = Some(participant);

        tracing::info!(%participant, %role, "seat claimed");
        Some(role)
    }

    /// Vacates whatever seat `participant` holds.
    ///
    /// Idempotent: releasing a spectator or an unknown id does nothing
    /// and returns `None`. Otherwise returns the seat that was freed.
    pub fn release_role(&mut self, participant: ParticipantId) -> Option<Role> {
        let role = self.seating.role_of(participant)?;
        *self.seating.seat_mut(role) = None;

        tracing::info!(%participant, %role, "seat released");
        Some(role)
    }

    /// Returns the seat `participant` holds, `None` for spectators.
    pub fn role_of(&self, participant: ParticipantId) -> Option<Role> {
        self.seating.role_of(participant)
    }

    /// Returns the current position.
    pub fn current_position(&self) -> &P {
        &self.position
    }

    /// Replaces the position with one the rules oracle just produced.
    ///
    /// The position is swapped whole, never edited in place. Callers must
    /// only pass positions returned from a successful oracle call.
    pub fn apply_accepted(&mut self, next: P) {
        self.position = next;
    }

    /// Returns the seat map.
    pub fn seating(&self) -> &Seating {
        &self.seating
    }
}

// =========================================================================
// Tests
// =========================================================================

//! The seat map: one optional occupant per [`Role`].

use gambit_protocol::{ParticipantId, Role};

/// Who sits in each seat.
///
/// Each seat is an `Option`: `None` is vacant. Because a seat holds a
/// single id, two participants can never share a seat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seating {
    white: Option<ParticipantId>,
    black: Option<ParticipantId>,
}

impl Seating {
    /// Creates a seating with both seats vacant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the occupant of `role`, or `None` if the seat is vacant.
    pub fn occupant(&self, role: Role) -> Option<ParticipantId> {
        *self.seat(role)
    }

    /// Returns `true` if nobody holds `role`.
    pub fn is_vacant(&self, role: Role) -> bool {
        self.seat(role).is_none()
    }

    /// Returns the seat `participant` holds, if any.
    pub fn role_of(&self, participant: ParticipantId) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| self.occupant(*role) == Some(participant))
    }

    /// Number of occupied seats (0, 1 or 2).
    pub fn occupied(&self) -> usize {
        Role::ALL
            .into_iter()
            .filter(|role| !self.is_vacant(*role))
            .count()
    }

    pub(crate) fn seat_mut(
        &mut self,
        role: Role,
    ) -> &mut Option<ParticipantId> {
        match role {
            Role::White => &mut self.white,
            Role::Black => &mut self.black,
        }
    }

    fn seat(&self, role: Role) -> &Option<ParticipantId> {
        match role {
            Role::White => &self.white,
            Role::Black => &self.black,
        }
    }
}

//! The turn gate: decides whether a submission may reach the oracle.

use gambit_protocol::{ParticipantId, Rejection, Role};
use gambit_session::SessionRegistry;

use crate::RulesOracle;

/// Checks that `participant` holds the seat whose turn it is.
///
/// The mover is derived from the registry's current position through
/// `G::mover` on every call. This never consults [`RulesOracle::apply`]
/// and never mutates anything.
///
/// Returns the participant's seat when allowed.
///
/// # Errors
/// - [`Rejection::NotAPlayer`]: the participant holds no seat
/// - [`Rejection::NotYourTurn`]: the participant's seat is not the mover
pub fn authorize<G: RulesOracle>(
    registry: &SessionRegistry<G::Position>,
    participant: ParticipantId,
) -> Result<Role, Rejection> {
    let role = registry
        .role_of(participant)
        .ok_or(Rejection::NotAPlayer)?;
    if role != G::mover(registry.current_position()) {
        return Err(Rejection::NotYourTurn);
    }
    Ok(role)
}

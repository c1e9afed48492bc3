//! Host and drawer selection
//!
//! These run while the owning session's lock is held, so an election is
//! atomic with respect to every other mutation of the same room.

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::room::roster::PlayerRoster;

/// First connected player in roster order, or `None` when nobody qualifies
pub fn elect_host(roster: &PlayerRoster) -> Option<Uuid> {
    roster.iter().find(|p| p.connected).map(|p| p.id)
}

/// Uniformly sampled connected member of the given team, or `None` when the
/// team has no connected members
pub fn elect_drawer(roster: &PlayerRoster, members: &[Uuid]) -> Option<Uuid> {
    let eligible: Vec<Uuid> = members
        .iter()
        .copied()
        .filter(|&id| roster.get(id).map_or(false, |p| p.connected))
        .collect();
    eligible.choose(&mut rand::thread_rng()).copied()
}

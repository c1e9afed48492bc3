//! Rooms: players, rosters, sessions and the process-wide registry

pub mod player;
pub mod registry;
pub mod roster;
pub mod session;

pub use player::{Player, PlayerRole};
pub use registry::{RoomRegistry, SharedSession};
pub use roster::PlayerRoster;
pub use session::{GameSession, LeaveOutcome, MoveOutcome, Phase};

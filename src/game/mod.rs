//! Game rules: grid logic, team rounds, word supply and elections

pub mod board;
pub mod election;
pub mod sketch;
pub mod words;

pub use board::{Board, BoardState, Cell, Mark};
pub use sketch::{SketchState, Team};
pub use words::WordBank;

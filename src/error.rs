use thiserror::Error;

/// Recoverable rejections, surfaced only to the originating connection.
/// None of these mutate session state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is full")]
    RoomFull,

    #[error("Only the host can start the game")]
    NotHost,

    #[error("Not enough players to start")]
    InsufficientPlayers,

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("Invalid move")]
    InvalidMove,

    #[error("Your team is drawing this round")]
    SameTeamGuess,

    #[error("The game is not in progress")]
    NotInProgress,
}

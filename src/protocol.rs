//! Protocol messages for WebSocket communication
//!
//! All frames are JSON text messages tagged with a `type` field.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::board::Mark;
use crate::game::sketch::Team;

/// Rule variant a room runs, chosen at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Sketch,
    Tictactoe,
}

/// One stroke segment as drawn on the client canvas
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrokePoints {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateGame {
        player_name: Option<String>,
        #[serde(default)]
        mode: GameMode,
    },
    JoinGame {
        room: String,
        player_name: Option<String>,
    },
    StartGame {
        room: String,
    },
    MakeMove {
        room: String,
        row: i32,
        col: i32,
    },
    Draw {
        room: String,
        points: StrokePoints,
        color: String,
        thickness: f64,
    },
    ClearCanvas {
        room: String,
    },
    Guess {
        room: String,
        guess: String,
    },
}

impl ClientMessage {
    /// Parse a client frame; `None` for anything malformed
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

/// One roster entry in a state snapshot
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub id: Uuid,
    pub name: String,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark: Option<Mark>,
}

/// Team scores keyed the way clients render them
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TeamScores {
    #[serde(rename = "A")]
    pub a: u32,
    #[serde(rename = "B")]
    pub b: u32,
}

/// Flat room snapshot attached to state-changing broadcasts.
/// Variant-specific fields are omitted when absent.
#[derive(Debug, Clone, Serialize)]
pub struct GameStateView {
    pub players: Vec<PlayerView>,
    pub game_started: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<TeamScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_team: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_drawer: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_mover: Option<Uuid>,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameCreated {
        room: String,
        player_id: Uuid,
        is_host: bool,
    },
    GameJoined {
        room: String,
        player_id: Uuid,
        is_host: bool,
    },
    PlayerJoined {
        game_state: GameStateView,
    },
    GameStarted {
        game_state: GameStateView,
    },
    /// Unicast to the drawer only
    WordToDraw {
        word: String,
    },
    BoardUpdate {
        game_state: GameStateView,
    },
    DrawData {
        points: StrokePoints,
        color: String,
        thickness: f64,
    },
    ClearCanvas,
    CorrectGuess {
        game_state: GameStateView,
        player_id: Uuid,
    },
    GameOver {
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<Mark>,
        #[serde(skip_serializing_if = "Option::is_none")]
        winner_id: Option<Uuid>,
        game_state: GameStateView,
    },
    PlayerDisconnected {
        game_state: GameStateView,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    /// Serialize message to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_game_defaults_to_sketch() {
        let msg = ClientMessage::parse(r#"{"type":"create_game","player_name":"Ana"}"#).unwrap();
        match msg {
            ClientMessage::CreateGame { player_name, mode } => {
                assert_eq!(player_name.as_deref(), Some("Ana"));
                assert_eq!(mode, GameMode::Sketch);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_create_game_tictactoe() {
        let msg =
            ClientMessage::parse(r#"{"type":"create_game","mode":"tictactoe"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::CreateGame {
                mode: GameMode::Tictactoe,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_make_move() {
        let msg =
            ClientMessage::parse(r#"{"type":"make_move","room":"ABCD","row":0,"col":2}"#).unwrap();
        match msg {
            ClientMessage::MakeMove { room, row, col } => {
                assert_eq!(room, "ABCD");
                assert_eq!(row, 0);
                assert_eq!(col, 2);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ClientMessage::parse("not json").is_none());
        assert!(ClientMessage::parse(r#"{"type":"no_such_event"}"#).is_none());
    }

    #[test]
    fn test_error_message_json() {
        let msg = ServerMessage::Error {
            message: "Room not found".to_string(),
        };
        assert_eq!(
            msg.to_json(),
            r#"{"type":"error","message":"Room not found"}"#
        );
    }

    #[test]
    fn test_clear_canvas_json() {
        assert_eq!(ServerMessage::ClearCanvas.to_json(), r#"{"type":"clear_canvas"}"#);
    }

    #[test]
    fn test_state_view_omits_absent_fields() {
        let view = GameStateView {
            players: Vec::new(),
            game_started: false,
            scores: None,
            current_team: None,
            current_drawer: None,
            board: None,
            current_mover: None,
        };
        let json = serde_json::to_string(&ServerMessage::PlayerJoined { game_state: view })
            .unwrap();
        assert!(!json.contains("scores"));
        assert!(!json.contains("board"));
    }
}

use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::game::board::Mark;
use crate::game::sketch::Team;

/// Role a player currently holds inside their room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerRole {
    #[default]
    None,
    Mark(Mark),
    Team(Team),
}

impl PlayerRole {
    pub fn mark(self) -> Option<Mark> {
        match self {
            PlayerRole::Mark(mark) => Some(mark),
            _ => None,
        }
    }

    pub fn team(self) -> Option<Team> {
        match self {
            PlayerRole::Team(team) => Some(team),
            _ => None,
        }
    }
}

/// A connected player. Owned by exactly one session.
#[derive(Debug)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub role: PlayerRole,
    pub score: u32,
    pub connected: bool,
    sender: UnboundedSender<Message>,
}

impl Player {
    pub fn new(id: Uuid, name: String, sender: UnboundedSender<Message>) -> Self {
        Self {
            id,
            name,
            role: PlayerRole::None,
            score: 0,
            connected: true,
            sender,
        }
    }

    /// Queue a text frame to this player.
    /// Returns false if the connection side is gone.
    pub fn send(&self, text: &str) -> bool {
        self.sender.send(Message::Text(text.to_string())).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_player_send() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let player = Player::new(Uuid::new_v4(), "Player 1".to_string(), tx);

        assert!(player.send("hello"));

        match rx.try_recv().unwrap() {
            Message::Text(text) => assert_eq!(text, "hello"),
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let player = Player::new(Uuid::new_v4(), "Player 1".to_string(), tx);
        drop(rx);

        assert!(!player.send("hello"));
    }
}

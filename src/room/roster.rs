//! Insertion-ordered player collection for one room

use uuid::Uuid;

use crate::error::GameError;
use crate::room::player::Player;

/// The players of a single room, in join order. Join order defines host
/// succession.
#[derive(Debug, Default)]
pub struct PlayerRoster {
    players: Vec<Player>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player, rejecting with `RoomFull` at capacity
    pub fn add(&mut self, player: Player, capacity: usize) -> Result<(), GameError> {
        if self.players.len() >= capacity {
            return Err(GameError::RoomFull);
        }
        self.players.push(player);
        Ok(())
    }

    /// Remove and return a player. Removing an unknown id is a no-op, which
    /// keeps duplicate disconnect delivery idempotent.
    pub fn remove(&mut self, id: Uuid) -> Option<Player> {
        let pos = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(pos))
    }

    pub fn get(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Member ids in join order
    pub fn ids(&self) -> Vec<Uuid> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Queue a text frame to every member
    pub fn broadcast(&self, text: &str) {
        for player in &self.players {
            let _ = player.send(text);
        }
    }

    /// Queue a text frame to one member.
    /// Returns false when the id is absent or the channel is closed.
    pub fn send_to(&self, id: Uuid, text: &str) -> bool {
        self.get(id).map_or(false, |p| p.send(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ws::Message;
    use tokio::sync::mpsc;

    fn member(name: &str) -> (Player, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Player::new(Uuid::new_v4(), name.to_string(), tx), rx)
    }

    #[tokio::test]
    async fn test_add_up_to_capacity() {
        let mut roster = PlayerRoster::new();
        let (p1, _rx1) = member("Player 1");
        let (p2, _rx2) = member("Player 2");
        let (p3, _rx3) = member("Player 3");

        assert!(roster.add(p1, 2).is_ok());
        assert!(roster.add(p2, 2).is_ok());
        assert_eq!(roster.add(p3, 2), Err(GameError::RoomFull));
        assert_eq!(roster.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let mut roster = PlayerRoster::new();
        let (p1, _rx1) = member("Player 1");
        let id = p1.id;
        roster.add(p1, 10).unwrap();

        assert!(roster.remove(id).is_some());
        assert!(roster.remove(id).is_none());
        assert!(roster.is_empty());
    }

    #[tokio::test]
    async fn test_ids_preserve_join_order() {
        let mut roster = PlayerRoster::new();
        let (p1, _rx1) = member("Player 1");
        let (p2, _rx2) = member("Player 2");
        let (first, second) = (p1.id, p2.id);
        roster.add(p1, 10).unwrap();
        roster.add(p2, 10).unwrap();

        assert_eq!(roster.ids(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_members() {
        let mut roster = PlayerRoster::new();
        let (p1, mut rx1) = member("Player 1");
        let (p2, mut rx2) = member("Player 2");
        roster.add(p1, 10).unwrap();
        roster.add(p2, 10).unwrap();

        roster.broadcast("ping");

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_send_to_single_member() {
        let mut roster = PlayerRoster::new();
        let (p1, mut rx1) = member("Player 1");
        let (p2, mut rx2) = member("Player 2");
        let target = p1.id;
        roster.add(p1, 10).unwrap();
        roster.add(p2, 10).unwrap();

        assert!(roster.send_to(target, "secret"));
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());
        assert!(!roster.send_to(Uuid::new_v4(), "nobody"));
    }
}

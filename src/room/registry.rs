//! Process-wide table of live rooms
//!
//! The registry is the only state shared across rooms: the code -> session
//! map and the connection -> code index. Both are touched briefly for
//! create/lookup/remove; all game state lives behind each session's own
//! mutex, so unrelated rooms never wait on each other.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::ROOM_CODE_LENGTH;
use crate::protocol::GameMode;
use crate::room::session::GameSession;

pub type SharedSession = Arc<Mutex<GameSession>>;

pub struct RoomRegistry {
    rooms: DashMap<String, SharedSession>,
    /// connection id -> room code, so a disconnect resolves its room in O(1)
    connections: DashMap<Uuid, String>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            connections: DashMap::new(),
        }
    }

    /// Create a room under a freshly sampled code. Codes are drawn until a
    /// vacant one is found; the entry API makes the claim atomic.
    pub fn create_room(&self, mode: GameMode) -> (String, SharedSession) {
        loop {
            let code = generate_code(ROOM_CODE_LENGTH);
            match self.rooms.entry(code.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(entry) => {
                    let session = Arc::new(Mutex::new(GameSession::new(code.clone(), mode)));
                    entry.insert(Arc::clone(&session));
                    return (code, session);
                }
            }
        }
    }

    /// Case-normalized lookup
    pub fn get(&self, code: &str) -> Option<SharedSession> {
        self.rooms
            .get(&code.to_uppercase())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a room; idempotent
    pub fn remove(&self, code: &str) {
        self.rooms.remove(&code.to_uppercase());
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Record which room a connection lives in
    pub fn bind_connection(&self, conn_id: Uuid, code: &str) {
        self.connections.insert(conn_id, code.to_uppercase());
    }

    /// Drop the index entry, returning the room the connection was in
    pub fn unbind_connection(&self, conn_id: &Uuid) -> Option<String> {
        self.connections.remove(conn_id).map(|(_, code)| code)
    }

    pub fn room_of(&self, conn_id: &Uuid) -> Option<String> {
        self.connections.get(conn_id).map(|entry| entry.value().clone())
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| rng.gen_range(b'A'..=b'Z') as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_generated_codes_are_uppercase_letters() {
        for _ in 0..50 {
            let code = generate_code(ROOM_CODE_LENGTH);
            assert_eq!(code.len(), ROOM_CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let registry = RoomRegistry::new();
        let (code, _session) = registry.create_room(GameMode::Sketch);

        assert!(registry.get(&code).is_some());
        assert!(registry.get(&code.to_lowercase()).is_some());
        assert!(registry.get("ZZZZZZ").is_none());
        assert_eq!(registry.room_count(), 1);
    }

    #[tokio::test]
    async fn test_codes_are_unique() {
        let registry = RoomRegistry::new();
        let mut codes = std::collections::HashSet::new();
        for _ in 0..100 {
            let (code, _) = registry.create_room(GameMode::Sketch);
            assert!(codes.insert(code));
        }
    }

    #[tokio::test]
    async fn test_remove_is_idempotent_and_code_reusable() {
        let registry = RoomRegistry::new();
        let (code, session) = registry.create_room(GameMode::Tictactoe);

        let (tx, _rx) = mpsc::unbounded_channel();
        session
            .lock()
            .await
            .add_player(Uuid::new_v4(), None, tx)
            .unwrap();

        registry.remove(&code);
        registry.remove(&code);
        assert!(registry.get(&code).is_none());
        assert_eq!(registry.room_count(), 0);
    }

    #[tokio::test]
    async fn test_connection_index_round_trip() {
        let registry = RoomRegistry::new();
        let conn = Uuid::new_v4();

        registry.bind_connection(conn, "abcd");
        assert_eq!(registry.room_of(&conn).as_deref(), Some("ABCD"));

        assert_eq!(registry.unbind_connection(&conn).as_deref(), Some("ABCD"));
        assert_eq!(registry.unbind_connection(&conn), None);
        assert_eq!(registry.room_of(&conn), None);
    }
}

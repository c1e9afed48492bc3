//! WebSocket handler for client connections
//!
//! Each connection gets an unbounded outbound channel plus a forwarding
//! task; inbound frames are parsed and dispatched to the room the frame
//! names. Rejections go back to the originator only; state deltas are
//! broadcast by the session itself.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use uuid::Uuid;

use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::room::session::{LeaveOutcome, MoveOutcome};
use crate::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection for its whole lifetime
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let conn_id = Uuid::new_v4();
    tracing::info!("Connection {} established", conn_id);

    // Forward queued frames to the socket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_text_message(&state, conn_id, &tx, &text).await;
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Connection {} sent close frame", conn_id);
                break;
            }
            Ok(_) => {
                // Ignore binary, ping, pong frames
            }
            Err(e) => {
                tracing::warn!("WebSocket error for {}: {}", conn_id, e);
                break;
            }
        }
    }

    handle_disconnect(&state, conn_id).await;
    send_task.abort();
}

/// Parse one frame and dispatch it; rejections become a unicast error
async fn handle_text_message(
    state: &AppState,
    conn_id: Uuid,
    tx: &UnboundedSender<Message>,
    text: &str,
) {
    let Some(msg) = ClientMessage::parse(text) else {
        tracing::warn!("Unknown message from {}: {}", conn_id, text);
        return;
    };

    if let Err(err) = dispatch(state, conn_id, tx, msg).await {
        let reply = ServerMessage::Error {
            message: err.to_string(),
        };
        let _ = tx.send(Message::Text(reply.to_json()));
    }
}

async fn dispatch(
    state: &AppState,
    conn_id: Uuid,
    tx: &UnboundedSender<Message>,
    msg: ClientMessage,
) -> Result<(), GameError> {
    match msg {
        ClientMessage::CreateGame { player_name, mode } => {
            leave_current_room(state, conn_id).await;

            let (code, session) = state.registry.create_room(mode);
            let mut session = session.lock().await;
            if let Err(err) = session.add_player(conn_id, player_name, tx.clone()) {
                state.registry.remove(&code);
                return Err(err);
            }
            state.registry.bind_connection(conn_id, &code);

            session.unicast(
                conn_id,
                &ServerMessage::GameCreated {
                    room: code.clone(),
                    player_id: conn_id,
                    is_host: true,
                },
            );
            tracing::info!("Room {} created by {}", code, conn_id);
            Ok(())
        }

        ClientMessage::JoinGame { room, player_name } => {
            // A player belongs to at most one room
            leave_current_room(state, conn_id).await;

            let session = state.registry.get(&room).ok_or(GameError::RoomNotFound)?;
            let mut session = session.lock().await;
            session.add_player(conn_id, player_name, tx.clone())?;
            state.registry.bind_connection(conn_id, session.code());

            session.unicast(
                conn_id,
                &ServerMessage::GameJoined {
                    room: session.code().to_string(),
                    player_id: conn_id,
                    is_host: session.host() == Some(conn_id),
                },
            );
            session.broadcast(&ServerMessage::PlayerJoined {
                game_state: session.game_state(),
            });
            tracing::info!("Connection {} joined room {}", conn_id, session.code());
            Ok(())
        }

        ClientMessage::StartGame { room } => {
            let session = state.registry.get(&room).ok_or(GameError::RoomNotFound)?;
            let result = session.lock().await.start(conn_id);
            result
        }

        ClientMessage::MakeMove { room, row, col } => {
            let session = state.registry.get(&room).ok_or(GameError::RoomNotFound)?;
            let mut session = session.lock().await;
            if session.make_move(conn_id, row, col)? == MoveOutcome::Finished {
                destroy_room(state, &session.code().to_string(), session.player_ids());
            }
            Ok(())
        }

        ClientMessage::Draw {
            room,
            points,
            color,
            thickness,
        } => {
            // Strokes in a vanished room are stale, not an error
            let Some(session) = state.registry.get(&room) else {
                return Ok(());
            };
            let session = session.lock().await;
            if !session.relay_draw(conn_id, points, color, thickness) {
                tracing::debug!("Dropped stroke from non-drawer {}", conn_id);
            }
            Ok(())
        }

        ClientMessage::ClearCanvas { room } => {
            let Some(session) = state.registry.get(&room) else {
                return Ok(());
            };
            session.lock().await.relay_clear(conn_id);
            Ok(())
        }

        ClientMessage::Guess { room, guess } => {
            // A guess for a vanished room is stale, not an error
            let Some(session) = state.registry.get(&room) else {
                return Ok(());
            };
            let result = session.lock().await.guess(conn_id, &guess);
            result
        }
    }
}

/// Remove the player from their room, destroying it when it empties
async fn handle_disconnect(state: &AppState, conn_id: Uuid) {
    if state.registry.room_of(&conn_id).is_none() {
        tracing::info!("Connection {} closed (no room)", conn_id);
    }
    leave_current_room(state, conn_id).await;
}

/// Detach a connection from whatever room it is in, if any
async fn leave_current_room(state: &AppState, conn_id: Uuid) {
    let Some(code) = state.registry.unbind_connection(&conn_id) else {
        return;
    };
    let Some(session) = state.registry.get(&code) else {
        return;
    };

    let mut session = session.lock().await;
    match session.remove_player(conn_id) {
        LeaveOutcome::Empty => {
            state.registry.remove(&code);
            tracing::info!("Room {} removed (last player left)", code);
        }
        LeaveOutcome::Remaining => {
            tracing::info!("Connection {} left room {}", conn_id, code);
        }
    }
}

/// Tear a finished room down and release its connection index entries
fn destroy_room(state: &AppState, code: &str, player_ids: Vec<Uuid>) {
    for id in player_ids {
        state.registry.unbind_connection(&id);
    }
    state.registry.remove(code);
    tracing::info!("Room {} removed (game over)", code);
}

//! Per-room state machine
//!
//! A session owns its roster and rule state outright and is only ever
//! touched through the registry's per-room mutex, so every operation here
//! runs as one serialized step. Methods never block: outbound traffic goes
//! through the players' unbounded channels.

use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::config;
use crate::error::GameError;
use crate::game::board::{BoardState, Mark};
use crate::game::election;
use crate::game::sketch::{SketchState, Team};
use crate::game::words::WordBank;
use crate::protocol::{
    GameMode, GameStateView, PlayerView, ServerMessage, StrokePoints, TeamScores,
};
use crate::room::player::{Player, PlayerRole};
use crate::room::roster::PlayerRoster;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lobby,
    InProgress,
    Finished,
}

/// Rule state for the room's variant
#[derive(Debug)]
pub enum Rules {
    Board(BoardState),
    Sketch(SketchState),
}

/// Result of an accepted move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Continuing,
    /// Win or draw; the caller tears the room down
    Finished,
}

/// Result of a player removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Roster is now empty; the caller destroys the room
    Empty,
    Remaining,
}

pub struct GameSession {
    code: String,
    phase: Phase,
    roster: PlayerRoster,
    host: Option<Uuid>,
    rules: Rules,
}

impl GameSession {
    pub fn new(code: String, mode: GameMode) -> Self {
        let rules = match mode {
            GameMode::Tictactoe => Rules::Board(BoardState::new()),
            GameMode::Sketch => Rules::Sketch(SketchState::new()),
        };
        Self {
            code,
            phase: Phase::Lobby,
            roster: PlayerRoster::new(),
            host: None,
            rules,
        }
    }

    /// Sketch session over a specific word bank
    pub fn with_sketch_words(code: String, words: WordBank) -> Self {
        Self {
            code,
            phase: Phase::Lobby,
            roster: PlayerRoster::new(),
            host: None,
            rules: Rules::Sketch(SketchState::with_words(words)),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn host(&self) -> Option<Uuid> {
        self.host
    }

    pub fn capacity(&self) -> usize {
        match self.rules {
            Rules::Board(_) => config::BOARD_ROOM_CAPACITY,
            Rules::Sketch(_) => config::SKETCH_ROOM_CAPACITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn player_ids(&self) -> Vec<Uuid> {
        self.roster.ids()
    }

    /// Add a player. The first joiner becomes host; a joiner arriving while
    /// a sketch game runs is placed on the smaller team so they can play.
    pub fn add_player(
        &mut self,
        id: Uuid,
        name: Option<String>,
        sender: UnboundedSender<Message>,
    ) -> Result<(), GameError> {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Player {}", self.roster.len() + 1));

        let capacity = self.capacity();
        self.roster.add(Player::new(id, name, sender), capacity)?;

        if self.host.is_none() {
            self.host = Some(id);
        }

        if self.phase == Phase::InProgress {
            if let Rules::Sketch(s) = &mut self.rules {
                let team = s.assign_late_joiner(id);
                if let Some(player) = self.roster.get_mut(id) {
                    player.role = PlayerRole::Team(team);
                }
            }
        }
        Ok(())
    }

    /// Host-triggered start: Lobby -> InProgress.
    /// Duplicate start frames after the game began are tolerated silently.
    pub fn start(&mut self, by: Uuid) -> Result<(), GameError> {
        if self.phase != Phase::Lobby {
            return Ok(());
        }
        if self.host != Some(by) {
            return Err(GameError::NotHost);
        }
        if self.roster.len() < config::MIN_PLAYERS_TO_START {
            return Err(GameError::InsufficientPlayers);
        }

        let mut word_notice = None;
        match &mut self.rules {
            Rules::Board(bs) => {
                // First joiner is X and moves first
                let ids = self.roster.ids();
                bs.board.reset();
                bs.current_mover = ids.first().copied();
                for (i, id) in ids.iter().enumerate() {
                    let mark = if i == 0 { Mark::X } else { Mark::O };
                    if let Some(player) = self.roster.get_mut(*id) {
                        player.role = PlayerRole::Mark(mark);
                    }
                }
            }
            Rules::Sketch(s) => {
                s.assign_teams(self.roster.ids());
                for team in [Team::A, Team::B] {
                    for id in s.members(team).to_vec() {
                        if let Some(player) = self.roster.get_mut(id) {
                            player.role = PlayerRole::Team(team);
                        }
                    }
                }
                s.current_team = Team::A;
                word_notice = s.begin_round(&self.roster);
            }
        }
        self.phase = Phase::InProgress;

        tracing::info!("Room {} started", self.code);
        self.broadcast(&ServerMessage::GameStarted {
            game_state: self.game_state(),
        });
        if let Some((drawer, word)) = word_notice {
            self.unicast(drawer, &ServerMessage::WordToDraw { word });
        }
        Ok(())
    }

    /// Validate and apply a move in the turn variant, then evaluate
    /// termination. Checks run in order: phase, turn, cell validity; a
    /// rejected move leaves the board untouched.
    pub fn make_move(&mut self, by: Uuid, row: i32, col: i32) -> Result<MoveOutcome, GameError> {
        let Rules::Board(bs) = &mut self.rules else {
            return Err(GameError::InvalidMove);
        };
        if self.phase != Phase::InProgress {
            return Err(GameError::NotInProgress);
        }
        if bs.current_mover != Some(by) {
            return Err(GameError::NotYourTurn);
        }
        let mark = self
            .roster
            .get(by)
            .and_then(|p| p.role.mark())
            .ok_or(GameError::NotYourTurn)?;
        if !bs.board.place(row, col, mark) {
            return Err(GameError::InvalidMove);
        }

        bs.current_mover = self.roster.ids().into_iter().find(|&id| id != by);

        let winner = bs.board.winner();
        let finished = winner.is_some() || bs.board.is_full();
        if finished {
            bs.current_mover = None;
            self.phase = Phase::Finished;
        }

        if finished {
            let winner_id = winner.and_then(|mark| {
                self.roster
                    .iter()
                    .find(|p| p.role.mark() == Some(mark))
                    .map(|p| p.id)
            });
            tracing::info!("Room {} finished (winner: {:?})", self.code, winner);
            self.broadcast(&ServerMessage::GameOver {
                winner,
                winner_id,
                game_state: self.game_state(),
            });
            Ok(MoveOutcome::Finished)
        } else {
            self.broadcast(&ServerMessage::BoardUpdate {
                game_state: self.game_state(),
            });
            Ok(MoveOutcome::Continuing)
        }
    }

    /// Score a guess in the sketch variant. Wrong guesses and guesses
    /// outside a live round are ignored without an error; only a teammate
    /// of the drawer gets an explicit rejection.
    pub fn guess(&mut self, by: Uuid, text: &str) -> Result<(), GameError> {
        if self.phase != Phase::InProgress {
            return Ok(());
        }
        let Rules::Sketch(s) = &mut self.rules else {
            return Ok(());
        };
        if s.current_word.is_none() {
            // Round is paused; treat the guess as stale
            return Ok(());
        }
        let Some(team) = s.team_of(by) else {
            return Ok(());
        };
        if team == s.current_team {
            return Err(GameError::SameTeamGuess);
        }
        if !s.matches_word(text) {
            return Ok(());
        }

        // The guessing side takes over the brush
        s.award_point(team);
        s.current_team = team;
        let word_notice = s.begin_round(&self.roster);

        if let Some(player) = self.roster.get_mut(by) {
            player.score += 1;
        }

        tracing::info!("Room {}: word guessed by {}", self.code, by);
        self.broadcast(&ServerMessage::CorrectGuess {
            game_state: self.game_state(),
            player_id: by,
        });
        if let Some((drawer, word)) = word_notice {
            self.unicast(drawer, &ServerMessage::WordToDraw { word });
        }
        Ok(())
    }

    /// Stroke fan-out. Only the current drawer is relayed; anything else is
    /// dropped without an error. No state changes.
    pub fn relay_draw(&self, by: Uuid, points: StrokePoints, color: String, thickness: f64) -> bool {
        if !self.is_current_drawer(by) {
            return false;
        }
        self.broadcast(&ServerMessage::DrawData {
            points,
            color,
            thickness,
        });
        true
    }

    /// Canvas-clear fan-out with the same gating as strokes
    pub fn relay_clear(&self, by: Uuid) -> bool {
        if !self.is_current_drawer(by) {
            return false;
        }
        self.broadcast(&ServerMessage::ClearCanvas);
        true
    }

    /// Remove a player entirely, re-electing host and drawer as needed.
    /// Removing an unknown id is a no-op.
    pub fn remove_player(&mut self, id: Uuid) -> LeaveOutcome {
        if self.roster.remove(id).is_none() {
            return if self.roster.is_empty() {
                LeaveOutcome::Empty
            } else {
                LeaveOutcome::Remaining
            };
        }
        if self.roster.is_empty() {
            return LeaveOutcome::Empty;
        }

        if self.host == Some(id) {
            self.host = election::elect_host(&self.roster);
        }

        let mut word_notice = None;
        match &mut self.rules {
            Rules::Board(bs) => {
                if self.phase == Phase::InProgress {
                    // Opponent left mid-game: back to the lobby with a
                    // fresh grid, the seat stays open for a new player
                    bs.board.reset();
                    bs.current_mover = None;
                    self.phase = Phase::Lobby;
                    for player in self.roster.iter_mut() {
                        player.role = PlayerRole::None;
                    }
                }
            }
            Rules::Sketch(s) => {
                let was_drawer = s.current_drawer == Some(id);
                s.remove_member(id);
                if was_drawer && self.phase == Phase::InProgress {
                    word_notice = s.begin_round(&self.roster);
                }
            }
        }

        self.broadcast(&ServerMessage::PlayerDisconnected {
            game_state: self.game_state(),
        });
        if let Some((drawer, word)) = word_notice {
            self.unicast(drawer, &ServerMessage::WordToDraw { word });
        }
        LeaveOutcome::Remaining
    }

    /// Snapshot for state-changing broadcasts
    pub fn game_state(&self) -> GameStateView {
        let players = self
            .roster
            .iter()
            .map(|p| PlayerView {
                id: p.id,
                name: p.name.clone(),
                score: p.score,
                team: p.role.team(),
                mark: p.role.mark(),
            })
            .collect();

        let mut view = GameStateView {
            players,
            game_started: self.phase == Phase::InProgress,
            scores: None,
            current_team: None,
            current_drawer: None,
            board: None,
            current_mover: None,
        };
        match &self.rules {
            Rules::Board(bs) => {
                view.board = Some(bs.board.to_rows());
                view.current_mover = bs.current_mover;
            }
            Rules::Sketch(s) => {
                view.scores = Some(TeamScores {
                    a: s.score(Team::A),
                    b: s.score(Team::B),
                });
                view.current_team = Some(s.current_team);
                view.current_drawer = s.current_drawer;
            }
        }
        view
    }

    /// Queue a frame to every member
    pub fn broadcast(&self, msg: &ServerMessage) {
        self.roster.broadcast(&msg.to_json());
    }

    /// Queue a frame to one member
    pub fn unicast(&self, to: Uuid, msg: &ServerMessage) {
        self.roster.send_to(to, &msg.to_json());
    }

    fn is_current_drawer(&self, id: Uuid) -> bool {
        match &self.rules {
            Rules::Sketch(s) => s.current_drawer == Some(id),
            Rules::Board(_) => false,
        }
    }
}

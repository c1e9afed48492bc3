//! Team and round sub-state for the sketch variant

use rand::seq::SliceRandom;
use serde::Serialize;
use uuid::Uuid;

use crate::game::election;
use crate::game::words::WordBank;
use crate::room::roster::PlayerRoster;

/// One of the two sides of a sketch room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn other(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Team::A => 0,
            Team::B => 1,
        }
    }
}

/// Sketch rules state: team membership, the live round and team scores.
/// The word bank is private to the room.
#[derive(Debug)]
pub struct SketchState {
    teams: [Vec<Uuid>; 2],
    pub current_team: Team,
    pub current_drawer: Option<Uuid>,
    pub current_word: Option<String>,
    team_scores: [u32; 2],
    words: WordBank,
}

impl SketchState {
    pub fn new() -> Self {
        Self::with_words(WordBank::new())
    }

    /// Build with a specific word bank (tests use a small vocabulary)
    pub fn with_words(words: WordBank) -> Self {
        Self {
            teams: [Vec::new(), Vec::new()],
            current_team: Team::A,
            current_drawer: None,
            current_word: None,
            team_scores: [0, 0],
            words,
        }
    }

    pub fn members(&self, team: Team) -> &[Uuid] {
        &self.teams[team.index()]
    }

    pub fn team_of(&self, id: Uuid) -> Option<Team> {
        for team in [Team::A, Team::B] {
            if self.teams[team.index()].contains(&id) {
                return Some(team);
            }
        }
        None
    }

    pub fn score(&self, team: Team) -> u32 {
        self.team_scores[team.index()]
    }

    pub fn award_point(&mut self, team: Team) {
        self.team_scores[team.index()] += 1;
    }

    /// Shuffle all ids and split into two near-equal teams, first half to
    /// team A. Resets any previous membership.
    pub fn assign_teams(&mut self, mut ids: Vec<Uuid>) {
        ids.shuffle(&mut rand::thread_rng());
        let rest = ids.split_off((ids.len() + 1) / 2);
        self.teams = [ids, rest];
    }

    /// Mid-game joiner goes to the smaller team, ties to team A
    pub fn assign_late_joiner(&mut self, id: Uuid) -> Team {
        let team = if self.teams[1].len() < self.teams[0].len() {
            Team::B
        } else {
            Team::A
        };
        self.teams[team.index()].push(id);
        team
    }

    pub fn remove_member(&mut self, id: Uuid) {
        for side in &mut self.teams {
            side.retain(|&member| member != id);
        }
        if self.current_drawer == Some(id) {
            self.current_drawer = None;
        }
    }

    /// Start the next round: elect a drawer from the active team and draw a
    /// fresh word. When the active side has no connected members the round
    /// skips to the other team; when neither side has any, the round pauses
    /// with no drawer and no word until the roster changes again.
    pub fn begin_round(&mut self, roster: &PlayerRoster) -> Option<(Uuid, String)> {
        let mut drawer = election::elect_drawer(roster, self.members(self.current_team));
        if drawer.is_none() {
            self.current_team = self.current_team.other();
            drawer = election::elect_drawer(roster, self.members(self.current_team));
        }

        let elected = match (drawer, self.words.draw()) {
            (Some(id), Some(word)) => Some((id, word)),
            _ => None,
        };

        match &elected {
            Some((id, word)) => {
                self.current_drawer = Some(*id);
                self.current_word = Some(word.clone());
            }
            None => {
                self.current_drawer = None;
                self.current_word = None;
            }
        }
        elected
    }

    /// Case-insensitive, whitespace-trimmed match against the live word
    pub fn matches_word(&self, guess: &str) -> bool {
        self.current_word
            .as_deref()
            .map_or(false, |word| word.to_lowercase() == guess.trim().to_lowercase())
    }
}

impl Default for SketchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::player::Player;
    use tokio::sync::mpsc;

    fn roster_of(count: usize) -> (PlayerRoster, Vec<Uuid>) {
        let mut roster = PlayerRoster::new();
        let mut ids = Vec::new();
        for i in 0..count {
            let (tx, _rx) = mpsc::unbounded_channel();
            let player = Player::new(Uuid::new_v4(), format!("Player {}", i + 1), tx);
            ids.push(player.id);
            roster.add(player, 10).unwrap();
        }
        (roster, ids)
    }

    fn two_word_state() -> SketchState {
        SketchState::with_words(WordBank::with_vocabulary(vec![
            "boat".to_string(),
            "cat".to_string(),
        ]))
    }

    #[tokio::test]
    async fn test_assign_teams_splits_everyone() {
        let (_roster, ids) = roster_of(5);
        let mut state = two_word_state();
        state.assign_teams(ids.clone());

        assert_eq!(state.members(Team::A).len(), 3);
        assert_eq!(state.members(Team::B).len(), 2);
        for id in ids {
            assert!(state.team_of(id).is_some());
        }
    }

    #[tokio::test]
    async fn test_late_joiner_balances_teams() {
        let (_roster, ids) = roster_of(3);
        let mut state = two_word_state();
        state.assign_teams(ids);
        assert_eq!(state.members(Team::A).len(), 2);

        let late = Uuid::new_v4();
        assert_eq!(state.assign_late_joiner(late), Team::B);
        assert_eq!(state.members(Team::B).len(), 2);
    }

    #[tokio::test]
    async fn test_begin_round_picks_drawer_and_word() {
        let (roster, ids) = roster_of(4);
        let mut state = two_word_state();
        state.assign_teams(ids);

        let (drawer, word) = state.begin_round(&roster).unwrap();
        assert_eq!(state.current_drawer, Some(drawer));
        assert_eq!(state.current_word.as_deref(), Some(word.as_str()));
        assert!(state.members(Team::A).contains(&drawer));
    }

    #[tokio::test]
    async fn test_begin_round_skips_empty_team() {
        let (roster, ids) = roster_of(2);
        let mut state = two_word_state();
        // Both players on team B; team A is empty
        state.assign_teams(Vec::new());
        for id in &ids {
            state.teams[1].push(*id);
        }
        state.current_team = Team::A;

        let (drawer, _word) = state.begin_round(&roster).unwrap();
        assert_eq!(state.current_team, Team::B);
        assert!(ids.contains(&drawer));
    }

    #[tokio::test]
    async fn test_round_pauses_with_no_connected_members() {
        let (mut roster, ids) = roster_of(2);
        let mut state = two_word_state();
        state.assign_teams(ids);
        for player in roster.iter_mut() {
            player.connected = false;
        }

        assert!(state.begin_round(&roster).is_none());
        assert_eq!(state.current_drawer, None);
        assert_eq!(state.current_word, None);
    }

    #[tokio::test]
    async fn test_matches_word_trims_and_ignores_case() {
        let mut state = two_word_state();
        state.current_word = Some("boat".to_string());

        assert!(state.matches_word("  BoAt "));
        assert!(!state.matches_word("goat"));
        assert!(!SketchState::new().matches_word("boat"));
    }

    #[tokio::test]
    async fn test_scores_accumulate() {
        let mut state = two_word_state();
        state.award_point(Team::B);
        state.award_point(Team::B);
        assert_eq!(state.score(Team::A), 0);
        assert_eq!(state.score(Team::B), 2);
    }
}

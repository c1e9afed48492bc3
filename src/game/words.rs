//! Repetition-avoiding word supply for the sketch variant

use std::collections::HashSet;

use rand::Rng;

use crate::config::WORDS;

/// A private per-room word source. No word repeats until the whole
/// vocabulary has been handed out, then the cycle restarts.
#[derive(Debug, Clone)]
pub struct WordBank {
    vocabulary: Vec<String>,
    used: HashSet<usize>,
}

impl WordBank {
    /// Create a bank over the built-in vocabulary
    pub fn new() -> Self {
        Self::with_vocabulary(WORDS.iter().map(|w| (*w).to_string()).collect())
    }

    /// Create a bank over a custom vocabulary
    pub fn with_vocabulary(vocabulary: Vec<String>) -> Self {
        Self {
            vocabulary,
            used: HashSet::new(),
        }
    }

    /// Draw the next word. Returns `None` only for an empty vocabulary.
    pub fn draw(&mut self) -> Option<String> {
        if self.vocabulary.is_empty() {
            return None;
        }

        // The used set is cleared here and only here, exactly when the next
        // pick would otherwise have nothing left to choose from.
        if self.used.len() == self.vocabulary.len() {
            self.used.clear();
        }

        let available: Vec<usize> = (0..self.vocabulary.len())
            .filter(|i| !self.used.contains(i))
            .collect();

        let idx = available[rand::thread_rng().gen_range(0..available.len())];
        self.used.insert(idx);
        Some(self.vocabulary[idx].clone())
    }

    /// Words left before the cycle resets
    pub fn remaining(&self) -> usize {
        self.vocabulary.len() - self.used.len()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::new()
    }
}

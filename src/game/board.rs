//! 3x3 grid state, move validation and win/draw detection

use serde::Serialize;
use uuid::Uuid;

/// A player's symbol in the turn variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The opposing symbol
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

/// One grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

/// The 3x3 grid. Cells are write-once: a taken cell is never overwritten.
#[derive(Debug, Clone, Default)]
pub struct Board {
    cells: [[Cell; 3]; 3],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a mark. Returns `false` without mutating when the position is
    /// out of range or the cell is already taken.
    pub fn place(&mut self, row: i32, col: i32, mark: Mark) -> bool {
        if !(0..3).contains(&row) || !(0..3).contains(&col) {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        if self.cells[row][col] != Cell::Empty {
            return false;
        }
        self.cells[row][col] = Cell::Marked(mark);
        true
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Scan the 3 rows, 3 columns and 2 diagonals for a full line
    pub fn winner(&self) -> Option<Mark> {
        let lines: [[(usize, usize); 3]; 8] = [
            [(0, 0), (0, 1), (0, 2)],
            [(1, 0), (1, 1), (1, 2)],
            [(2, 0), (2, 1), (2, 2)],
            [(0, 0), (1, 0), (2, 0)],
            [(0, 1), (1, 1), (2, 1)],
            [(0, 2), (1, 2), (2, 2)],
            [(0, 0), (1, 1), (2, 2)],
            [(0, 2), (1, 1), (2, 0)],
        ];

        for line in &lines {
            if let Cell::Marked(mark) = self.cells[line[0].0][line[0].1] {
                if line
                    .iter()
                    .all(|&(r, c)| self.cells[r][c] == Cell::Marked(mark))
                {
                    return Some(mark);
                }
            }
        }
        None
    }

    /// A draw iff every cell is taken and nobody won
    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&cell| cell != Cell::Empty))
    }

    pub fn reset(&mut self) {
        self.cells = Default::default();
    }

    /// Grid as rows of "X"/"O"/"" for state snapshots
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => String::new(),
                        Cell::Marked(mark) => mark.as_str().to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}

/// Turn-variant sub-state: the grid plus whoever may move next
#[derive(Debug, Default)]
pub struct BoardState {
    pub board: Board,
    pub current_mover: Option<Uuid>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }
}

//! Nonogram puzzle engine.
//!
//! A puzzle is a square boolean solution. Clues are the run lengths of filled
//! cells per row and per column; a blank line has the single clue `0`.
//! Players cycle cells through empty, filled and crossed. Only filled cells
//! matter for the win check.

use crate::error::PuzzleError;
use crate::types::WordPair;
use serde::{Deserialize, Serialize};

/// Validated square solution matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct Solution {
    cells: Vec<Vec<bool>>,
}

impl Solution {
    pub fn new(cells: Vec<Vec<bool>>) -> Result<Self, PuzzleError> {
        let size = cells.len();
        if size == 0 {
            return Err(PuzzleError::Empty);
        }
        if let Some((row, line)) = cells.iter().enumerate().find(|(_, l)| l.len() != size) {
            return Err(PuzzleError::NotSquare {
                row,
                len: line.len(),
                size,
            });
        }
        Ok(Self { cells })
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|line| line.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.cells
    }
}

impl TryFrom<Vec<Vec<bool>>> for Solution {
    type Error = PuzzleError;

    fn try_from(cells: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::new(cells)
    }
}

impl From<Solution> for Vec<Vec<bool>> {
    fn from(solution: Solution) -> Self {
        solution.cells
    }
}

/// Run lengths of consecutive `true` cells, or `[0]` for a blank line.
pub fn line_clue<I>(line: I) -> Vec<usize>
where
    I: IntoIterator<Item = bool>,
{
    let mut clue = Vec::new();
    let mut run = 0;
    for filled in line {
        if filled {
            run += 1;
        } else if run > 0 {
            clue.push(run);
            run = 0;
        }
    }
    if run > 0 {
        clue.push(run);
    }
    if clue.is_empty() {
        clue.push(0);
    }
    clue
}

/// Row and column clues of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clues {
    pub rows: Vec<Vec<usize>>,
    pub cols: Vec<Vec<usize>>,
}

pub fn derive_clues(solution: &Solution) -> Clues {
    let size = solution.size();
    let rows = solution
        .rows()
        .iter()
        .map(|line| line_clue(line.iter().copied()))
        .collect();
    let cols = (0..size)
        .map(|c| line_clue((0..size).map(|r| solution.get(r, c))))
        .collect();
    Clues { rows, cols }
}

/// Player mark on one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    #[default]
    Empty,
    Filled,
    Crossed,
}

impl CellState {
    /// Next state in the empty, filled, crossed cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Empty => Self::Filled,
            Self::Filled => Self::Crossed,
            Self::Crossed => Self::Empty,
        }
    }
}

/// The player's marks, same dimensions as the solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGrid {
    cells: Vec<Vec<CellState>>,
}

impl PlayerGrid {
    pub fn blank(size: usize) -> Self {
        Self {
            cells: vec![vec![CellState::Empty; size]; size],
        }
    }

    pub fn from_cells(cells: Vec<Vec<CellState>>) -> Self {
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellState> {
        self.cells.get(row).and_then(|line| line.get(col)).copied()
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.cells
    }
}

/// Cycle one cell. Out-of-range coordinates leave the grid unchanged.
pub fn toggle_cell(grid: &PlayerGrid, row: usize, col: usize) -> PlayerGrid {
    let mut next = grid.clone();
    if let Some(cell) = next.cells.get_mut(row).and_then(|line| line.get_mut(col)) {
        *cell = cell.next();
    }
    next
}

/// True iff every filled cell matches the solution. Crossed and empty are
/// interchangeable; a grid of the wrong shape is never solved.
pub fn is_solved(grid: &PlayerGrid, solution: &Solution) -> bool {
    grid.cells.len() == solution.size()
        && grid
            .cells
            .iter()
            .zip(solution.rows())
            .all(|(player, expected)| {
                player.len() == expected.len()
                    && player
                        .iter()
                        .zip(expected)
                        .all(|(cell, want)| (*cell == CellState::Filled) == *want)
            })
}

/// A playable puzzle with the words it unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub name: String,
    pub solution: Solution,
    #[serde(default)]
    pub vocabulary: Vec<WordPair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleStatus {
    InProgress,
    Solved,
}

/// Puzzle selection plus the state of the active puzzle.
#[derive(Debug, Clone)]
pub struct PuzzleBoard {
    puzzles: Vec<Puzzle>,
    selected: usize,
    grid: PlayerGrid,
    status: PuzzleStatus,
}

impl PuzzleBoard {
    /// Board on the first puzzle, `None` when there is nothing to play.
    /// `on_solved` runs if the blank grid already solves it.
    pub fn new<F>(puzzles: Vec<Puzzle>, on_solved: F) -> Option<Self>
    where
        F: FnOnce(&Puzzle),
    {
        let first = puzzles.first()?;
        let grid = PlayerGrid::blank(first.solution.size());
        let mut board = Self {
            puzzles,
            selected: 0,
            grid,
            status: PuzzleStatus::InProgress,
        };
        board.settle(on_solved);
        Some(board)
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    pub fn current(&self) -> &Puzzle {
        &self.puzzles[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn grid(&self) -> &PlayerGrid {
        &self.grid
    }

    pub fn status(&self) -> PuzzleStatus {
        self.status
    }

    pub fn clues(&self) -> Clues {
        derive_clues(&self.current().solution)
    }

    /// Switch to a puzzle with a blank grid. Re-selecting the current puzzle
    /// also starts over. Unknown indices are ignored. An all-blank solution
    /// is solved on selection and runs `on_solved`.
    pub fn select<F>(&mut self, index: usize, on_solved: F) -> PuzzleStatus
    where
        F: FnOnce(&Puzzle),
    {
        let Some(puzzle) = self.puzzles.get(index) else {
            return self.status;
        };
        self.grid = PlayerGrid::blank(puzzle.solution.size());
        self.selected = index;
        self.status = PuzzleStatus::InProgress;
        self.settle(on_solved)
    }

    /// Cycle a cell and check for a win. `on_solved` runs once, on the move
    /// that completes the puzzle. A solved grid accepts no further moves.
    pub fn toggle<F>(&mut self, row: usize, col: usize, on_solved: F) -> PuzzleStatus
    where
        F: FnOnce(&Puzzle),
    {
        if self.status == PuzzleStatus::Solved {
            return self.status;
        }

        self.grid = toggle_cell(&self.grid, row, col);
        self.settle(on_solved)
    }

    fn settle<F>(&mut self, on_solved: F) -> PuzzleStatus
    where
        F: FnOnce(&Puzzle),
    {
        let puzzle = &self.puzzles[self.selected];
        if self.status == PuzzleStatus::InProgress && is_solved(&self.grid, &puzzle.solution) {
            self.status = PuzzleStatus::Solved;
            tracing::info!(puzzle = %puzzle.name, "puzzle solved");
            on_solved(puzzle);
        }
        self.status
    }

    /// Words revealed by the current puzzle, empty until it is solved.
    pub fn unlocked_vocabulary(&self) -> &[WordPair] {
        match self.status {
            PuzzleStatus::Solved => &self.current().vocabulary,
            PuzzleStatus::InProgress => &[],
        }
    }
}

//! Phase invariants for the sliding-tile solver.
//!
//! Each predicate describes, for one target cell, exactly which cells must
//! already hold their solved labels and where the blank must sit. They are
//! recomputed from the grid on every call; nothing is cached.

use crate::engine::Puzzle;
use crate::error::SolveError;
use std::fmt;
use tracing::warn;

/// Names one of the three phase invariants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    /// `lower_row_invariant(row, col)`.
    LowerRow,
    /// `row1_invariant(col)`; the row is always 1.
    Row1,
    /// `row0_invariant(col)`; the row is always 0.
    Row0,
}

impl Checkpoint {
    /// Evaluates this invariant for the target cell `(row, col)`.
    ///
    /// For `Row1` and `Row0` the row is implied and `row` is ignored.
    pub fn holds(&self, puzzle: &Puzzle, row: usize, col: usize) -> bool {
        match self {
            Checkpoint::LowerRow => lower_row_invariant(puzzle, row, col),
            Checkpoint::Row1 => row1_invariant(puzzle, col),
            Checkpoint::Row0 => row0_invariant(puzzle, col),
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Checkpoint::LowerRow => "lower_row_invariant",
            Checkpoint::Row1 => "row1_invariant",
            Checkpoint::Row0 => "row0_invariant",
        };
        write!(f, "{}", name)
    }
}

/// Checks the invariant for a target cell below row 1.
///
/// Holds iff the blank is at `(target_row, target_col)`, every row below
/// `target_row` is solved, and every cell of `target_row` right of
/// `target_col` is solved. Targets outside the grid never hold.
///
/// # Examples
/// ```
/// use fifteen_solver::engine::Puzzle;
/// use fifteen_solver::invariants::lower_row_invariant;
///
/// let puzzle = Puzzle::from_grid(3, 3, vec![
///     vec![4, 1, 2],
///     vec![3, 5, 0],
///     vec![6, 7, 8],
/// ]).unwrap();
/// assert!(lower_row_invariant(&puzzle, 1, 2));
/// assert!(!lower_row_invariant(&puzzle, 1, 1));
/// ```
pub fn lower_row_invariant(puzzle: &Puzzle, target_row: usize, target_col: usize) -> bool {
    if target_row >= puzzle.height() || target_col >= puzzle.width() {
        return false;
    }
    if puzzle.get_number(target_row, target_col) != 0 {
        return false;
    }
    rows_solved(puzzle, target_row + 1) && cols_solved(puzzle, target_row, target_col + 1)
}

/// Checks the invariant for a target cell in row 1.
///
/// Holds iff `lower_row_invariant(1, target_col)` holds and every cell of
/// row 0 right of `target_col` is solved.
pub fn row1_invariant(puzzle: &Puzzle, target_col: usize) -> bool {
    lower_row_invariant(puzzle, 1, target_col) && cols_solved(puzzle, 0, target_col + 1)
}

/// Checks the invariant for a target cell in row 0.
///
/// Holds iff the blank is at `(0, target_col)`, row 0 right of `target_col`
/// is solved, row 1 from `target_col` rightwards is solved, and all rows
/// from 2 down are solved. `row0_invariant(0)` means the puzzle is solved.
pub fn row0_invariant(puzzle: &Puzzle, target_col: usize) -> bool {
    if target_col >= puzzle.width() {
        return false;
    }
    puzzle.get_number(0, target_col) == 0
        && cols_solved(puzzle, 0, target_col + 1)
        && cols_solved(puzzle, 1, target_col)
        && rows_solved(puzzle, 2)
}

/// Contract check at a phase boundary.
///
/// Only evaluated in debug builds; release builds always succeed.
///
/// # Errors
/// Returns `SolveError::InvariantViolation` naming the checkpoint and target
/// cell when the invariant does not hold.
pub fn ensure(
    puzzle: &Puzzle,
    checkpoint: Checkpoint,
    row: usize,
    col: usize,
) -> Result<(), SolveError> {
    if cfg!(debug_assertions) && !checkpoint.holds(puzzle, row, col) {
        warn!(%checkpoint, row, col, "Phase invariant violated");
        return Err(SolveError::InvariantViolation {
            checkpoint,
            row,
            col,
        });
    }
    Ok(())
}

// Every row from `first_row` to the bottom holds its solved labels.
fn rows_solved(puzzle: &Puzzle, first_row: usize) -> bool {
    (first_row..puzzle.height()).all(|row| cols_solved(puzzle, row, 0))
}

// Every cell of `row` from `first_col` to the right edge holds its solved label.
fn cols_solved(puzzle: &Puzzle, row: usize, first_col: usize) -> bool {
    (first_col..puzzle.width()).all(|col| puzzle.is_tile_solved(row, col))
}

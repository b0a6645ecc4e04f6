//! Error type shared by every fallible operation in the crate.

use crate::engine::Direction;
use crate::invariants::Checkpoint;

/// Error that can occur while building, moving or solving a puzzle.
///
/// All of these are local to a single call: nothing is retried, and a phase
/// that fails leaves the caller's puzzle as it was on entry.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SolveError {
    /// A phase contract did not hold at one of its checkpoints.
    #[display("Invariant violation: {} does not hold at ({}, {})", checkpoint, row, col)]
    InvariantViolation {
        checkpoint: Checkpoint,
        row: usize,
        col: usize,
    },

    /// A move would push the blank outside the grid.
    #[display(
        "Move off grid: step {} ('{}') with blank at ({}, {})",
        step,
        direction,
        row,
        col
    )]
    OffGrid {
        direction: Direction,
        step: usize,
        row: usize,
        col: usize,
    },

    /// The corner rotation never converged, so the permutation has odd parity.
    #[display("Puzzle is unsolvable: the top-left 2x2 block cannot be rotated into place")]
    Unsolvable,

    /// The grid is not a rectangular permutation of `0..height*width`.
    #[display("Invalid grid: {}", _0)]
    InvalidGrid(String),

    /// A move string contained something other than `u`, `d`, `l` or `r`.
    #[display("Invalid direction '{}'", _0)]
    InvalidDirection(char),
}

impl std::error::Error for SolveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invariant_violation() {
        let err = SolveError::InvariantViolation {
            checkpoint: Checkpoint::Row0,
            row: 0,
            col: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invariant violation: row0_invariant does not hold at (0, 3)"
        );
    }

    #[test]
    fn test_display_off_grid() {
        let err = SolveError::OffGrid {
            direction: Direction::Up,
            step: 4,
            row: 0,
            col: 1,
        };
        assert_eq!(
            err.to_string(),
            "Move off grid: step 4 ('u') with blank at (0, 1)"
        );
    }

    #[test]
    fn test_display_invalid_direction() {
        assert_eq!(
            SolveError::InvalidDirection('x').to_string(),
            "Invalid direction 'x'"
        );
    }
}

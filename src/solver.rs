use crate::engine::{Direction, Moves, Puzzle};
use crate::error::SolveError;
use crate::invariants::{ensure, row0_invariant, Checkpoint};
use crate::primitives::{
    move_tile_horizontally, move_tile_off_row0, move_tile_vertically, move_zero_above_tile,
};
use tracing::{debug, info, instrument, warn};

/// Rotation that seats a column-0 tile parked at `(row-1, 1)` with the blank
/// at `(row-1, 0)`. Ends with the blank at `(row-1, 1)`.
pub const COL0_ROTATION: &str = "ruldrdlurdluurddlur";

/// Rotation that seats a row-0 tile parked at `(1, col-1)` with the blank at
/// `(1, col-2)`. Ends with the blank at `(1, col-1)`.
pub const ROW0_ROTATION: &str = "urdlurrdluldrruld";

/// Three-tile cycle of the top-left 2x2 block, blank at `(0, 0)` before and after.
pub const CORNER_ROTATION: &str = "rdlu";

/// A solvable corner needs at most two rotations; the third returns the block
/// to where it started.
const MAX_CORNER_ROTATIONS: usize = 3;

/// One completed step of the solve, reported to trace observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// The blank was moved to the bottom-right corner.
    Translocate,
    /// An interior cell `(row, col)` with `row >= 2` and `col >= 1` was placed.
    Interior { row: usize, col: usize },
    /// The column-0 cell of `row` was placed.
    Col0 { row: usize },
    /// The row-1 cell of `col` was placed.
    Row1 { col: usize },
    /// The row-0 cell of `col` was placed.
    Row0 { col: usize },
    /// The top-left 2x2 block was rotated into place.
    Corner,
}

/// Computes the moves that bring the tile at `(tile_row, tile_col)` to
/// `(target_row, target_col)`, assuming the blank sits on the target.
///
/// The tile is first walked across to the target column (pulled out of row 0
/// first if needed), then down the column. The blank finishes immediately left
/// of the placed tile, so `target_col` must be at least 1.
///
/// # Examples
/// ```
/// use fifteen_solver::solver::position_tile;
/// // Tile sits in row 0, two columns left of a bottom-right target.
/// assert_eq!(position_tile(2, 2, 0, 0).to_string(), "ullurdlurrdlurlddruld");
/// ```
pub fn position_tile(
    target_row: usize,
    target_col: usize,
    tile_row: usize,
    tile_col: usize,
) -> Moves {
    let mut moves = Moves::new();
    let mut zero_row = target_row;
    let mut tile_row = tile_row;

    if tile_col != target_col {
        if tile_row == 0 {
            moves.append(&move_tile_off_row0(zero_row, target_col, tile_col));
            zero_row = 0;
            tile_row = 1;
        } else {
            moves.append(&move_zero_above_tile(zero_row, target_col, tile_row, tile_col));
            zero_row = tile_row - 1;
        }
        // The blank now sits directly above the tile.
        moves.append(&move_tile_horizontally(target_col, tile_col, tile_col));
    }

    moves.append(&move_tile_vertically(zero_row, tile_row, target_row));
    moves
}

/// Places the tile belonging at `(target_row, target_col)` for a row below 1
/// and a column right of 0.
///
/// Entry contract: `lower_row_invariant(target_row, target_col)`.
/// Exit contract: `lower_row_invariant(target_row, target_col - 1)`.
///
/// # Errors
/// * `SolveError::InvariantViolation` if a contract fails (debug builds) or
///   `target_col` is 0.
/// * `SolveError::OffGrid` if the generated moves leave the grid.
///
/// On error the puzzle is unchanged.
pub fn solve_interior_tile(
    puzzle: &mut Puzzle,
    target_row: usize,
    target_col: usize,
) -> Result<Moves, SolveError> {
    ensure(puzzle, Checkpoint::LowerRow, target_row, target_col)?;
    let exit_col = target_col.checked_sub(1).ok_or(SolveError::InvariantViolation {
        checkpoint: Checkpoint::LowerRow,
        row: target_row,
        col: target_col,
    })?;

    let (tile_row, tile_col) = tile_position(puzzle, target_row, target_col)?;
    let moves = position_tile(target_row, target_col, tile_row, tile_col);

    let mut trial = puzzle.clone();
    trial.update_puzzle(&moves)?;
    ensure(&trial, Checkpoint::LowerRow, target_row, exit_col)?;
    *puzzle = trial;
    Ok(moves)
}

/// Places the tile belonging at `(target_row, 0)` for a row below 1.
///
/// The blank first probes `up, right`. If that drops the tile into place the
/// blank simply runs right along `target_row - 1`; otherwise the tile is
/// parked at `(target_row - 1, 1)` and seated by `COL0_ROTATION`.
///
/// Entry contract: `lower_row_invariant(target_row, 0)`.
/// Exit contract: `lower_row_invariant(target_row - 1, width - 1)`.
///
/// # Errors
/// Same as `solve_interior_tile`; a `target_row` below 2 is a contract
/// violation. On error the puzzle is unchanged.
pub fn solve_col0_tile(puzzle: &mut Puzzle, target_row: usize) -> Result<Moves, SolveError> {
    ensure(puzzle, Checkpoint::LowerRow, target_row, 0)?;
    if target_row < 2 {
        return Err(SolveError::InvariantViolation {
            checkpoint: Checkpoint::LowerRow,
            row: target_row,
            col: 0,
        });
    }

    let mut trial = puzzle.clone();
    let mut moves = Moves::from_static("ur");
    trial.update_puzzle(&moves)?;

    let mut rest = Moves::new();
    let (tile_row, tile_col) = tile_position(&trial, target_row, 0)?;
    if (tile_row, tile_col) != (target_row, 0) {
        rest.append(&position_tile(target_row - 1, 1, tile_row, tile_col));
        rest.append(&Moves::from_static(COL0_ROTATION));
    }
    rest.push_n(Direction::Right, trial.width() - 2);
    trial.update_puzzle(&rest)?;

    ensure(&trial, Checkpoint::LowerRow, target_row - 1, trial.width() - 1)?;
    *puzzle = trial;
    moves.append(&rest);
    Ok(moves)
}

/// Places the tile belonging at `(1, target_col)`, then moves the blank
/// `up, right` onto `(0, target_col)`.
///
/// Entry contract: `row1_invariant(target_col)`.
/// Exit contract: `row0_invariant(target_col)`.
///
/// # Errors
/// Same as `solve_interior_tile`. On error the puzzle is unchanged.
pub fn solve_row1_tile(puzzle: &mut Puzzle, target_col: usize) -> Result<Moves, SolveError> {
    ensure(puzzle, Checkpoint::Row1, 1, target_col)?;

    let (tile_row, tile_col) = tile_position(puzzle, 1, target_col)?;
    let mut moves = position_tile(1, target_col, tile_row, tile_col);
    moves.extend([Direction::Up, Direction::Right]);

    let mut trial = puzzle.clone();
    trial.update_puzzle(&moves)?;
    ensure(&trial, Checkpoint::Row0, 0, target_col)?;
    *puzzle = trial;
    Ok(moves)
}

/// Places the tile belonging at `(0, target_col)` for a column right of 1.
///
/// The blank first probes `left, down`. If the tile did not land, it is parked
/// at `(1, target_col - 1)` and seated by `ROW0_ROTATION`.
///
/// Entry contract: `row0_invariant(target_col)`.
/// Exit contract: `row1_invariant(target_col - 1)`.
///
/// # Errors
/// Same as `solve_interior_tile`; a `target_col` below 2 is a contract
/// violation. On error the puzzle is unchanged.
pub fn solve_row0_tile(puzzle: &mut Puzzle, target_col: usize) -> Result<Moves, SolveError> {
    ensure(puzzle, Checkpoint::Row0, 0, target_col)?;
    if target_col < 2 {
        return Err(SolveError::InvariantViolation {
            checkpoint: Checkpoint::Row0,
            row: 0,
            col: target_col,
        });
    }

    let mut trial = puzzle.clone();
    let mut moves = Moves::from_static("ld");
    trial.update_puzzle(&moves)?;

    let (tile_row, tile_col) = tile_position(&trial, 0, target_col)?;
    if (tile_row, tile_col) != (0, target_col) {
        let mut rest = position_tile(1, target_col - 1, tile_row, tile_col);
        rest.append(&Moves::from_static(ROW0_ROTATION));
        trial.update_puzzle(&rest)?;
        moves.append(&rest);
    }

    ensure(&trial, Checkpoint::Row1, 1, target_col - 1)?;
    *puzzle = trial;
    Ok(moves)
}

/// Solves the top-left 2x2 block once everything else is in place.
///
/// The blank moves `up, left` to the corner, then the block is cycled with
/// `CORNER_ROTATION` until the puzzle is solved.
///
/// Entry contract: `row1_invariant(1)`.
///
/// # Errors
/// * `SolveError::Unsolvable` if three rotations never solve the block, which
///   happens exactly when the permutation has the wrong parity.
/// * `SolveError::InvariantViolation` if the entry contract fails (debug builds).
///
/// On error the puzzle is unchanged.
pub fn solve_2x2(puzzle: &mut Puzzle) -> Result<Moves, SolveError> {
    ensure(puzzle, Checkpoint::Row1, 1, 1)?;

    let mut trial = puzzle.clone();
    let mut moves = Moves::from_static("ul");
    trial.update_puzzle(&moves)?;

    let rotation = Moves::from_static(CORNER_ROTATION);
    let mut rotations = 0;
    while !row0_invariant(&trial, 0) {
        if rotations == MAX_CORNER_ROTATIONS {
            warn!(rotations, "Corner did not converge; permutation has odd parity");
            return Err(SolveError::Unsolvable);
        }
        trial.update_puzzle(&rotation)?;
        moves.append(&rotation);
        rotations += 1;
    }

    *puzzle = trial;
    Ok(moves)
}

/// Solves the puzzle in place and returns the moves that were applied.
///
/// Returns an empty sequence if the puzzle is already solved.
///
/// # Errors
/// See `solve_puzzle_with_trace`.
///
/// # Examples
/// ```
/// use fifteen_solver::engine::Puzzle;
/// use fifteen_solver::solver::solve_puzzle;
///
/// let mut puzzle = Puzzle::from_grid(2, 2, vec![vec![1, 0], vec![2, 3]]).unwrap();
/// let moves = solve_puzzle(&mut puzzle).unwrap();
/// assert_eq!(moves.to_string(), "dul");
/// assert!(puzzle.is_solved());
/// ```
pub fn solve_puzzle(puzzle: &mut Puzzle) -> Result<Moves, SolveError> {
    solve_puzzle_with_trace(puzzle, |_, _| {})
}

/// Solves a copy of `puzzle`, leaving the original untouched.
pub fn solve(puzzle: &Puzzle) -> Result<Moves, SolveError> {
    let mut working = puzzle.clone();
    solve_puzzle(&mut working)
}

/// Solves the puzzle in place, calling `observer` after every completed step
/// with the puzzle state at that point.
///
/// Order of steps: move the blank to the bottom-right corner; for each row from
/// the bottom up to row 2, place columns right to left with column 0 last; for
/// each column from the right down to 2, place row 1 then row 0; finally rotate
/// the top-left 2x2 block.
///
/// # Errors
/// * `SolveError::Unsolvable` for a permutation of the wrong parity.
/// * `SolveError::InvariantViolation` or `SolveError::OffGrid` if a phase
///   breaks its contract, which indicates a bug rather than bad input.
/// * `SolveError::InvalidGrid` if the grid is missing a label.
///
/// On error the puzzle holds the state reached by the last completed step.
#[instrument(skip_all, fields(height = puzzle.height(), width = puzzle.width()))]
pub fn solve_puzzle_with_trace<F>(puzzle: &mut Puzzle, mut observer: F) -> Result<Moves, SolveError>
where
    F: FnMut(Step, &Puzzle),
{
    let mut moves = Moves::new();
    if row0_invariant(puzzle, 0) {
        debug!("Puzzle already solved");
        return Ok(moves);
    }

    let max_row = puzzle.height() - 1;
    let max_col = puzzle.width() - 1;

    let (zero_row, zero_col) = puzzle
        .zero_position()
        .ok_or_else(|| SolveError::InvalidGrid("grid has no blank tile".to_string()))?;
    moves.push_n(Direction::Down, max_row - zero_row);
    moves.push_n(Direction::Right, max_col - zero_col);
    puzzle.update_puzzle(&moves)?;
    observer(Step::Translocate, puzzle);

    for row in (2..=max_row).rev() {
        for col in (0..=max_col).rev() {
            let (step, placed) = if col == 0 {
                (Step::Col0 { row }, solve_col0_tile(puzzle, row)?)
            } else {
                (Step::Interior { row, col }, solve_interior_tile(puzzle, row, col)?)
            };
            record(&mut moves, &placed, step, puzzle, &mut observer);
        }
    }

    for col in (2..=max_col).rev() {
        let placed = solve_row1_tile(puzzle, col)?;
        record(&mut moves, &placed, Step::Row1 { col }, puzzle, &mut observer);
        let placed = solve_row0_tile(puzzle, col)?;
        record(&mut moves, &placed, Step::Row0 { col }, puzzle, &mut observer);
    }

    let placed = solve_2x2(puzzle)?;
    record(&mut moves, &placed, Step::Corner, puzzle, &mut observer);

    info!(total_moves = moves.len(), "Puzzle solved");
    Ok(moves)
}

fn record<F>(moves: &mut Moves, placed: &Moves, step: Step, puzzle: &Puzzle, observer: &mut F)
where
    F: FnMut(Step, &Puzzle),
{
    debug!(?step, moves = placed.len(), "Step complete");
    moves.append(placed);
    observer(step, puzzle);
}

fn tile_position(
    puzzle: &Puzzle,
    solved_row: usize,
    solved_col: usize,
) -> Result<(usize, usize), SolveError> {
    puzzle
        .current_position(solved_row, solved_col)
        .ok_or_else(|| {
            SolveError::InvalidGrid(format!(
                "label {} is missing",
                puzzle.solved_value(solved_row, solved_col)
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::{lower_row_invariant, row1_invariant};

    fn puzzle(rows: Vec<Vec<u32>>) -> Puzzle {
        Puzzle::from_grid(rows.len(), rows[0].len(), rows).unwrap()
    }

    #[test]
    fn test_position_tile_same_column() {
        // Tile directly above the target: climb through it, then park left.
        assert_eq!(position_tile(2, 1, 0, 1).to_string(), "uulddruld");
    }

    #[test]
    fn test_solve_interior_tile_from_row0() {
        let mut p = puzzle(vec![vec![8, 2, 1], vec![6, 5, 4], vec![3, 7, 0]]);
        let moves = solve_interior_tile(&mut p, 2, 2).unwrap();
        assert_eq!(moves.to_string(), "ullurdlurrdlurlddruld");
        assert_eq!(p.get_number(2, 2), 8);
        assert!(lower_row_invariant(&p, 2, 1));
    }

    #[test]
    fn test_solve_interior_tile_rejects_bad_entry() {
        if !cfg!(debug_assertions) {
            return;
        }
        let mut p = Puzzle::new(3, 3).unwrap();
        let before = p.clone();
        let err = solve_interior_tile(&mut p, 2, 2).unwrap_err();
        assert_eq!(
            err,
            SolveError::InvariantViolation {
                checkpoint: Checkpoint::LowerRow,
                row: 2,
                col: 2,
            }
        );
        assert_eq!(p, before, "failed phase must not touch the puzzle");
    }

    #[test]
    fn test_solve_col0_tile_lucky_probe() {
        let mut p = puzzle(vec![vec![3, 2, 1], vec![6, 5, 4], vec![0, 7, 8]]);
        let moves = solve_col0_tile(&mut p, 2).unwrap();
        assert_eq!(moves.to_string(), "urr");
        assert!(lower_row_invariant(&p, 1, 2));
    }

    #[test]
    fn test_solve_col0_tile_with_rotation() {
        let mut p = puzzle(vec![vec![6, 2, 1], vec![3, 5, 4], vec![0, 7, 8]]);
        let moves = solve_col0_tile(&mut p, 2).unwrap();
        assert_eq!(moves.to_string(), "urlurdlurldruldrdlurdluurddlurr");
        assert!(lower_row_invariant(&p, 1, 2));
        assert_eq!(p.get_grid()[2], vec![6, 7, 8]);
    }

    #[test]
    fn test_solve_col0_tile_rejects_row1() {
        let mut p = puzzle(vec![vec![1, 2, 3], vec![0, 4, 5], vec![6, 7, 8]]);
        assert!(matches!(
            solve_col0_tile(&mut p, 1),
            Err(SolveError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_solve_row1_then_row0() {
        // Bottom row solved, blank at (1,2).
        let mut p = puzzle(vec![vec![2, 5, 1], vec![4, 3, 0], vec![6, 7, 8]]);
        assert!(row1_invariant(&p, 2));

        solve_row1_tile(&mut p, 2).unwrap();
        assert!(row0_invariant(&p, 2));
        assert_eq!(p.get_number(1, 2), 5);

        solve_row0_tile(&mut p, 2).unwrap();
        assert!(row1_invariant(&p, 1));
        assert_eq!(p.get_number(0, 2), 2);
    }

    #[test]
    fn test_solve_row0_tile_lucky_probe() {
        // Tile 2 sits at (0,1), so "ld" drops it straight into (0,2).
        let mut p = puzzle(vec![vec![1, 2, 0], vec![3, 4, 5], vec![6, 7, 8]]);
        let moves = solve_row0_tile(&mut p, 2).unwrap();
        assert_eq!(moves.to_string(), "ld");
        assert!(row1_invariant(&p, 1));
    }

    #[test]
    fn test_solve_2x2_rotations() {
        // After "ul" the corner reads 0 3 / 1 2 and needs two rotations.
        let mut p = puzzle(vec![vec![3, 2], vec![1, 0]]);
        let moves = solve_2x2(&mut p).unwrap();
        assert!(p.is_solved());
        assert_eq!(moves.to_string(), "ulrdlurdlu");
    }

    #[test]
    fn test_solve_2x2_unsolvable_leaves_puzzle() {
        let mut p = puzzle(vec![vec![1, 2], vec![3, 0]]);
        let before = p.clone();
        assert_eq!(solve_2x2(&mut p), Err(SolveError::Unsolvable));
        assert_eq!(p, before);
    }

    #[test]
    fn test_solve_already_solved_is_empty() {
        let mut p = puzzle(vec![vec![0, 1], vec![2, 3]]);
        let moves = solve_puzzle(&mut p).unwrap();
        assert!(moves.is_empty());
        assert_eq!(moves.to_string(), "");
        assert!(p.is_solved());
    }

    #[test]
    fn test_solve_blank_swapped_right() {
        let original = puzzle(vec![vec![1, 0], vec![2, 3]]);
        let moves = solve(&original).unwrap();
        let mut replay = original.clone();
        replay.update_puzzle(&moves).unwrap();
        assert_eq!(replay.get_grid(), &[vec![0, 1], vec![2, 3]]);
        assert_eq!(original.get_number(0, 0), 1, "solve works on a copy");
    }

    #[test]
    fn test_solve_3x3_scenario_checkpoints() {
        let original = puzzle(vec![vec![3, 2, 1], vec![6, 5, 4], vec![0, 7, 8]]);
        let mut p = original.clone();
        let mut steps = Vec::new();
        let moves = solve_puzzle_with_trace(&mut p, |step, state| {
            match step {
                Step::Translocate => assert!(lower_row_invariant(state, 2, 2)),
                Step::Interior { row, col } => assert!(lower_row_invariant(state, row, col - 1)),
                Step::Col0 { row } => assert!(lower_row_invariant(state, row - 1, 2)),
                Step::Row1 { col } => assert!(row0_invariant(state, col)),
                Step::Row0 { col } => assert!(row1_invariant(state, col - 1)),
                Step::Corner => assert!(state.is_solved()),
            }
            steps.push(step);
        })
        .unwrap();

        assert_eq!(
            steps,
            vec![
                Step::Translocate,
                Step::Interior { row: 2, col: 2 },
                Step::Interior { row: 2, col: 1 },
                Step::Col0 { row: 2 },
                Step::Row1 { col: 2 },
                Step::Row0 { col: 2 },
                Step::Corner,
            ]
        );
        assert_eq!(
            moves.to_string(),
            "rrulrdlurldulrdlurldurrullrdlurrdlurldurlduldurdlurrdluldrruldulrdlurdlu"
        );
        assert_eq!(p.get_grid(), &[vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]);

        let mut replay = original;
        replay.update_puzzle(&moves).unwrap();
        assert!(replay.is_solved());
    }

    #[test]
    fn test_solve_odd_parity_is_unsolvable() {
        let mut p = puzzle(vec![vec![0, 2, 1], vec![3, 4, 5], vec![6, 7, 8]]);
        assert_eq!(solve_puzzle(&mut p), Err(SolveError::Unsolvable));
        assert!(p.is_permutation());
    }

    #[test]
    fn test_solve_wide_and_tall_grids() {
        for (height, width) in [(2, 5), (5, 2), (4, 6), (6, 3)] {
            for seed in 0..5 {
                let original =
                    Puzzle::new_scrambled_with_seed(height, width, seed, 500).unwrap();
                let mut p = original.clone();
                let moves = solve_puzzle(&mut p).unwrap();
                assert!(p.is_solved(), "{}x{} seed {}", height, width, seed);

                let mut replay = original;
                replay.update_puzzle(&moves).unwrap();
                assert!(replay.is_solved());
            }
        }
    }
}

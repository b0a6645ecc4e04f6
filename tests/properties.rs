//! Property-based tests for the solver over random permutations.

use proptest::prelude::*;

use fifteen_solver::engine::{Moves, Puzzle};
use fifteen_solver::error::SolveError;
use fifteen_solver::invariants::row0_invariant;
use fifteen_solver::solver::{solve, solve_puzzle, solve_puzzle_with_trace, Step};
use fifteen_solver::utils::is_solvable;

fn build(height: usize, width: usize, labels: &[u32]) -> Puzzle {
    let rows = labels.chunks(width).map(|row| row.to_vec()).collect();
    Puzzle::from_grid(height, width, rows).unwrap()
}

/// Swaps tiles 1 and 2, which flips permutation parity without moving the blank.
fn swap_two_tiles(mut puzzle: Puzzle) -> Puzzle {
    let (r1, c1) = puzzle.locate(1).unwrap();
    let (r2, c2) = puzzle.locate(2).unwrap();
    puzzle.set_number(r1, c1, 2);
    puzzle.set_number(r2, c2, 1);
    puzzle
}

/// Strategy: any permutation of any size from 2x2 up to 5x5.
fn any_puzzle() -> impl Strategy<Value = Puzzle> {
    (2usize..=5, 2usize..=5).prop_flat_map(|(height, width)| {
        let labels: Vec<u32> = (0..(height * width) as u32).collect();
        Just(labels)
            .prop_shuffle()
            .prop_map(move |labels| build(height, width, &labels))
    })
}

/// Strategy: a solvable permutation, repaired by one transposition if needed.
fn solvable_puzzle() -> impl Strategy<Value = Puzzle> {
    any_puzzle().prop_map(|puzzle| {
        if is_solvable(&puzzle) {
            puzzle
        } else {
            swap_two_tiles(puzzle)
        }
    })
}

/// Cells a completed step promises are solved from then on.
fn claimed_cells(step: Step, puzzle: &Puzzle) -> Vec<(usize, usize)> {
    match step {
        Step::Translocate => Vec::new(),
        Step::Interior { row, col } => vec![(row, col)],
        Step::Col0 { row } => vec![(row, 0)],
        Step::Row1 { col } => vec![(1, col)],
        Step::Row0 { col } => vec![(0, col)],
        Step::Corner => (0..puzzle.height())
            .flat_map(|row| (0..puzzle.width()).map(move |col| (row, col)))
            .collect(),
    }
}

proptest! {
    // 1. Every solvable permutation ends in the solved grid
    #[test]
    fn solves_every_solvable_permutation(puzzle in solvable_puzzle()) {
        let mut working = puzzle.clone();
        let moves = solve_puzzle(&mut working).unwrap();
        prop_assert!(working.is_solved(), "not solved:\n{}", working);

        let mut replay = puzzle;
        replay.update_puzzle(&moves).unwrap();
        prop_assert!(replay.is_solved());
    }

    // 2. Replaying token by token never pushes the blank off the grid
    #[test]
    fn moves_stay_on_grid(puzzle in solvable_puzzle()) {
        let moves = solve(&puzzle).unwrap();
        let mut replay = puzzle;
        for direction in &moves {
            let single: Moves = std::iter::once(*direction).collect();
            prop_assert!(replay.update_puzzle(&single).is_ok());
        }
        prop_assert!(replay.is_solved());
    }

    // 3. Labels stay a permutation after every step
    #[test]
    fn permutation_is_preserved(puzzle in solvable_puzzle()) {
        let mut working = puzzle;
        let mut all_permutations = true;
        solve_puzzle_with_trace(&mut working, |_, state| {
            all_permutations &= state.is_permutation();
        })
        .unwrap();
        prop_assert!(all_permutations);
    }

    // 4. The set of claimed, solved cells strictly grows with every placement step
    #[test]
    fn solved_cells_grow_monotonically(puzzle in solvable_puzzle()) {
        let mut working = puzzle;
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut violations: Vec<String> = Vec::new();

        solve_puzzle_with_trace(&mut working, |step, state| {
            let before = claimed.len();
            for cell in claimed_cells(step, state) {
                if !claimed.contains(&cell) {
                    claimed.push(cell);
                }
            }
            if step != Step::Translocate && step != Step::Corner && claimed.len() <= before {
                violations.push(format!("{:?} claimed nothing new", step));
            }
            for &(row, col) in &claimed {
                if !state.is_tile_solved(row, col) {
                    violations.push(format!("({}, {}) unsolved after {:?}", row, col, step));
                }
            }
        })
        .unwrap();

        prop_assert!(violations.is_empty(), "{:?}", violations);
    }

    // 5. Odd-parity permutations are reported, not looped on
    #[test]
    fn odd_parity_is_unsolvable(puzzle in solvable_puzzle()) {
        let odd = swap_two_tiles(puzzle);
        prop_assert!(!is_solvable(&odd));
        prop_assert_eq!(solve(&odd), Err(SolveError::Unsolvable));
    }

    // 6. Solving a solved puzzle is a no-op
    #[test]
    fn solved_input_is_untouched(height in 2usize..=6, width in 2usize..=6) {
        let mut puzzle = Puzzle::new(height, width).unwrap();
        let moves = solve_puzzle(&mut puzzle).unwrap();
        prop_assert!(moves.is_empty());
        prop_assert!(puzzle.is_solved());
        prop_assert!(row0_invariant(&puzzle, 0));
    }

    // 7. Seeded scrambles are always solvable and always solved
    #[test]
    fn scrambles_are_solved(
        height in 2usize..=6,
        width in 2usize..=6,
        seed in any::<u64>(),
        steps in 0usize..400,
    ) {
        let puzzle = Puzzle::new_scrambled_with_seed(height, width, seed, steps).unwrap();
        prop_assert!(is_solvable(&puzzle));
        let moves = solve(&puzzle).unwrap();
        let mut replay = puzzle;
        replay.update_puzzle(&moves).unwrap();
        prop_assert!(replay.is_solved());
    }
}

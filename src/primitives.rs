//! Move generators used to walk a single tile into place.
//!
//! Every function here is pure: it computes a short `Moves` sequence from
//! the current blank and tile coordinates and never touches a `Puzzle`.
//! Composition and application happen in `solver`.

use crate::engine::{Direction, Moves};

/// Moves the blank from `(zero_row, zero_col)` to just above a row-0 tile's
/// column in row 1, then up, pulling the tile down into row 1.
///
/// Afterwards the blank sits at `(0, tile_col)` and the tile at `(1, tile_col)`.
///
/// # Arguments
/// * `zero_row`, `zero_col`: Current blank position; `zero_row` is at least 1.
/// * `tile_col`: Column of the tile, which is in row 0.
///
/// # Examples
/// ```
/// use fifteen_solver::primitives::move_tile_off_row0;
/// assert_eq!(move_tile_off_row0(2, 2, 0).to_string(), "ullu");
/// ```
pub fn move_tile_off_row0(zero_row: usize, zero_col: usize, tile_col: usize) -> Moves {
    let mut moves = Moves::new();
    moves.push_n(Direction::Up, zero_row.saturating_sub(1));
    walk_blank_to_col(&mut moves, zero_col, tile_col);
    moves.push(Direction::Up);
    moves
}

/// Moves the blank from `(zero_row, zero_col)` to the cell directly above the
/// tile at `(tile_row, tile_col)`: straight up first, then across.
///
/// The tile must not be in row 0 and must not share the blank's column below
/// the blank's row.
pub fn move_zero_above_tile(
    zero_row: usize,
    zero_col: usize,
    tile_row: usize,
    tile_col: usize,
) -> Moves {
    let mut moves = Moves::new();
    moves.push_n(Direction::Up, (zero_row + 1).saturating_sub(tile_row));
    walk_blank_to_col(&mut moves, zero_col, tile_col);
    moves
}

/// Walks a tile one column at a time towards `target_col`, starting with the
/// blank directly above it.
///
/// Each column costs the four-move cycle `step, down, back, up`, which leaves
/// the blank one column behind the tile; the next cycle is preceded by a single
/// `step` to get above the tile again. A final `step` puts the blank above the
/// tile once it reaches `target_col`.
///
/// Returns an empty sequence if the tile is already in `target_col`.
///
/// # Examples
/// ```
/// use fifteen_solver::primitives::move_tile_horizontally;
/// assert_eq!(move_tile_horizontally(3, 1, 1).to_string(), "rdlurrdlur");
/// assert_eq!(move_tile_horizontally(0, 1, 1).to_string(), "ldrul");
/// ```
pub fn move_tile_horizontally(target_col: usize, zero_col: usize, tile_col: usize) -> Moves {
    let mut moves = Moves::new();
    if tile_col == target_col {
        return moves;
    }

    let step = Direction::toward_col(tile_col, target_col);
    let cycle = [step, Direction::Down, step.opposite(), Direction::Up];
    let columns = tile_col.abs_diff(target_col);

    // The blank starts over the tile only on the first column.
    let mut blank_over_tile = zero_col == tile_col;
    for _ in 0..columns {
        if !blank_over_tile {
            moves.push(step);
        }
        moves.extend(cycle);
        blank_over_tile = false;
    }
    moves.push(step);
    moves
}

/// Walks a tile straight down its column to `target_row`, leaving the blank
/// immediately to the left of it.
///
/// If the blank starts below the tile it first climbs up through it, which
/// drops the tile one row. Each further row costs the five-move cycle
/// `left, down, down, right, up`, and a closing `left, down` parks the blank
/// beside the tile. The tile's column must not be column 0.
///
/// # Examples
/// ```
/// use fifteen_solver::primitives::move_tile_vertically;
/// // Blank directly above a tile that is two rows short of its target.
/// assert_eq!(move_tile_vertically(0, 1, 3).to_string(), "lddrulddruld");
/// // Blank at the target, tile one row above it.
/// assert_eq!(move_tile_vertically(2, 1, 2).to_string(), "uld");
/// ```
pub fn move_tile_vertically(zero_row: usize, tile_row: usize, target_row: usize) -> Moves {
    let mut moves = Moves::new();
    let mut tile_row = tile_row;

    if zero_row > tile_row {
        moves.push_n(Direction::Up, zero_row - tile_row);
        tile_row += 1;
    }

    for _ in tile_row..target_row {
        moves.extend([
            Direction::Left,
            Direction::Down,
            Direction::Down,
            Direction::Right,
            Direction::Up,
        ]);
    }
    moves.extend([Direction::Left, Direction::Down]);
    moves
}

fn walk_blank_to_col(moves: &mut Moves, zero_col: usize, target_col: usize) {
    let direction = Direction::toward_col(zero_col, target_col);
    moves.push_n(direction, zero_col.abs_diff(target_col));
}

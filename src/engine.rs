//! Core grid model for the sliding-tile puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Direction`: One unit slide of the blank tile.
//! - `Moves`: An append-only sequence of directions, rendered as a `udlr` string.
//! - `Puzzle`: The `height x width` grid of tile labels, with lookup, cloning
//!   and move application.
use crate::error::SolveError;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// A unit slide of the blank tile.
///
/// Each variant means "swap the blank with its neighbour in that direction".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Blank moves one row towards row 0.
    Up,
    /// Blank moves one row away from row 0.
    Down,
    /// Blank moves one column towards column 0.
    Left,
    /// Blank moves one column away from column 0.
    Right,
}

impl Direction {
    /// All four directions, in `u d l r` order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the `(row_delta, col_delta)` the blank travels for this direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use fifteen_solver::engine::Direction;
    /// assert_eq!(Direction::Up.offset(), (-1, 0));
    /// assert_eq!(Direction::Right.offset(), (0, 1));
    /// ```
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Returns the direction that undoes this one.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Converts the direction to its move-string token.
    pub fn to_char(&self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Down => 'd',
            Direction::Left => 'l',
            Direction::Right => 'r',
        }
    }

    /// Horizontal direction that walks from column `from` towards column `to`.
    ///
    /// Returns `Right` when `from < to`, `Left` otherwise.
    pub fn toward_col(from: usize, to: usize) -> Direction {
        if from < to {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = SolveError;

    fn try_from(token: char) -> Result<Self, Self::Error> {
        match token {
            'u' => Ok(Direction::Up),
            'd' => Ok(Direction::Down),
            'l' => Ok(Direction::Left),
            'r' => Ok(Direction::Right),
            other => Err(SolveError::InvalidDirection(other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// An ordered, append-only sequence of blank slides.
///
/// Moves are accumulated as `Direction` tokens and only turned into text at
/// the boundary, through `Display`.
///
/// # Examples
/// ```
/// use fifteen_solver::engine::{Direction, Moves};
///
/// let mut moves = Moves::new();
/// moves.push(Direction::Up);
/// moves.push_n(Direction::Right, 2);
/// assert_eq!(moves.to_string(), "urr");
///
/// let parsed: Moves = "urr".parse().unwrap();
/// assert_eq!(parsed, moves);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Moves {
    steps: Vec<Direction>,
}

impl Moves {
    /// Creates an empty move sequence.
    pub fn new() -> Self {
        Moves { steps: Vec::new() }
    }

    /// Builds a sequence from a literal made only of `u`, `d`, `l` and `r`.
    ///
    /// Intended for the fixed rotations baked into the solver; any other
    /// character is skipped.
    pub(crate) fn from_static(literal: &'static str) -> Self {
        Moves {
            steps: literal
                .chars()
                .filter_map(|c| Direction::try_from(c).ok())
                .collect(),
        }
    }

    /// Appends a single slide.
    pub fn push(&mut self, direction: Direction) {
        self.steps.push(direction);
    }

    /// Appends the same slide `count` times.
    pub fn push_n(&mut self, direction: Direction, count: usize) {
        self.steps.extend(std::iter::repeat(direction).take(count));
    }

    /// Appends every slide of `other`, preserving order.
    pub fn append(&mut self, other: &Moves) {
        self.steps.extend_from_slice(&other.steps);
    }

    /// Number of slides in the sequence.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the sequence holds no slides.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the slides in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Direction> {
        self.steps.iter()
    }

    /// Returns the slides as a slice.
    pub fn as_slice(&self) -> &[Direction] {
        &self.steps
    }
}

impl Extend<Direction> for Moves {
    fn extend<I: IntoIterator<Item = Direction>>(&mut self, iter: I) {
        self.steps.extend(iter);
    }
}

impl FromIterator<Direction> for Moves {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        Moves {
            steps: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Moves {
    type Item = &'a Direction;
    type IntoIter = std::slice::Iter<'a, Direction>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl FromStr for Moves {
    type Err = SolveError;

    /// Parses a compact move string such as `"urdl"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars().map(Direction::try_from).collect()
    }
}

impl fmt::Display for Moves {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for direction in &self.steps {
            write!(f, "{}", direction.to_char())?;
        }
        Ok(())
    }
}

/// Represents a sliding-tile puzzle as a `height x width` grid of tile labels.
///
/// Every label in `0..height*width` occurs exactly once; `0` is the blank.
/// The solved configuration holds `col + width * row` at `(row, col)`, which
/// puts the blank in the top-left corner.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Puzzle {
    height: usize,
    width: usize,
    grid: Vec<Vec<u32>>,
}

impl Puzzle {
    /// Creates a solved puzzle of the given size.
    ///
    /// # Errors
    /// Returns `SolveError::InvalidGrid` if either dimension is smaller than 2.
    ///
    /// # Examples
    /// ```
    /// use fifteen_solver::engine::Puzzle;
    /// let puzzle = Puzzle::new(3, 4).unwrap();
    /// assert_eq!(puzzle.get_number(0, 0), 0);
    /// assert_eq!(puzzle.get_number(2, 3), 11);
    /// assert!(puzzle.is_solved());
    /// ```
    pub fn new(height: usize, width: usize) -> Result<Self, SolveError> {
        check_dimensions(height, width)?;
        let grid = (0..height)
            .map(|row| (0..width).map(|col| solved_value(width, row, col)).collect())
            .collect();
        Ok(Puzzle {
            height,
            width,
            grid,
        })
    }

    /// Creates a puzzle from explicit rows.
    ///
    /// # Arguments
    /// * `height`, `width`: Expected dimensions, both at least 2.
    /// * `rows`: Exactly `height` rows of exactly `width` labels each.
    ///
    /// # Errors
    /// Returns `SolveError::InvalidGrid` if the shape does not match or the labels
    /// are not a permutation of `0..height*width`.
    pub fn from_grid(
        height: usize,
        width: usize,
        rows: Vec<Vec<u32>>,
    ) -> Result<Self, SolveError> {
        check_dimensions(height, width)?;
        if rows.len() != height {
            return Err(SolveError::InvalidGrid(format!(
                "expected {} rows, found {}",
                height,
                rows.len()
            )));
        }
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(SolveError::InvalidGrid(format!(
                "row {} has {} tiles (expected {})",
                r,
                row.len(),
                width
            )));
        }
        let puzzle = Puzzle {
            height,
            width,
            grid: rows,
        };
        puzzle.check_permutation()?;
        Ok(puzzle)
    }

    /// Creates a solvable scrambled puzzle by walking the blank `steps` times
    /// from the solved configuration.
    ///
    /// The walk never immediately undoes its previous slide. The same `seed`
    /// always produces the same puzzle.
    ///
    /// # Errors
    /// Returns `SolveError::InvalidGrid` if either dimension is smaller than 2.
    pub fn new_scrambled_with_seed(
        height: usize,
        width: usize,
        seed: u64,
        steps: usize,
    ) -> Result<Self, SolveError> {
        let mut puzzle = Puzzle::new(height, width)?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let (mut zero_row, mut zero_col) = (0usize, 0usize);
        let mut last: Option<Direction> = None;

        for _ in 0..steps {
            let candidates: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| Some(d.opposite()) != last)
                .filter(|d| puzzle.neighbor(zero_row, zero_col, *d).is_some())
                .collect();
            let direction = candidates[rng.gen_range(0..candidates.len())];
            if let Some((next_row, next_col)) = puzzle.neighbor(zero_row, zero_col, direction) {
                puzzle.grid[zero_row][zero_col] = puzzle.grid[next_row][next_col];
                puzzle.grid[next_row][next_col] = 0;
                zero_row = next_row;
                zero_col = next_col;
            }
            last = Some(direction);
        }
        Ok(puzzle)
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the label at `(row, col)`.
    ///
    /// # Panics
    /// Panics if `row` or `col` is outside the grid.
    pub fn get_number(&self, row: usize, col: usize) -> u32 {
        self.grid[row][col]
    }

    /// Overwrites the label at `(row, col)`.
    ///
    /// This does not preserve the permutation invariant on its own; callers
    /// swapping labels by hand must write both cells.
    ///
    /// # Panics
    /// Panics if `row` or `col` is outside the grid.
    pub fn set_number(&mut self, row: usize, col: usize, value: u32) {
        self.grid[row][col] = value;
    }

    /// Returns the rows of the grid.
    pub fn get_grid(&self) -> &[Vec<u32>] {
        &self.grid
    }

    /// Label that belongs at `(row, col)` once the puzzle is solved.
    pub fn solved_value(&self, row: usize, col: usize) -> u32 {
        solved_value(self.width, row, col)
    }

    /// Returns `true` if the cell at `(row, col)` holds its solved label.
    pub fn is_tile_solved(&self, row: usize, col: usize) -> bool {
        self.grid[row][col] == self.solved_value(row, col)
    }

    /// Returns `true` if every cell holds its solved label.
    pub fn is_solved(&self) -> bool {
        (0..self.height).all(|row| (0..self.width).all(|col| self.is_tile_solved(row, col)))
    }

    /// Finds the cell currently holding `value` by linear scan.
    ///
    /// Returns `None` if the label is not on the grid.
    pub fn locate(&self, value: u32) -> Option<(usize, usize)> {
        self.grid.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|&cell| cell == value)
                .map(|col| (row, col))
        })
    }

    /// Finds the current position of the tile that belongs at
    /// `(solved_row, solved_col)` when the puzzle is solved.
    ///
    /// # Examples
    /// ```
    /// use fifteen_solver::engine::Puzzle;
    /// let puzzle = Puzzle::from_grid(2, 2, vec![vec![1, 0], vec![2, 3]]).unwrap();
    /// assert_eq!(puzzle.current_position(0, 0), Some((0, 1)));
    /// assert_eq!(puzzle.current_position(0, 1), Some((0, 0)));
    /// ```
    pub fn current_position(&self, solved_row: usize, solved_col: usize) -> Option<(usize, usize)> {
        self.locate(self.solved_value(solved_row, solved_col))
    }

    /// Position of the blank tile.
    pub fn zero_position(&self) -> Option<(usize, usize)> {
        self.locate(0)
    }

    /// Returns `true` if the labels are exactly `0..height*width`, each once.
    pub fn is_permutation(&self) -> bool {
        self.check_permutation().is_ok()
    }

    /// Applies a move sequence to the grid, sliding the blank one token at a time.
    ///
    /// The blank's whole path is validated before any cell changes, so on error
    /// the puzzle is left untouched.
    ///
    /// # Errors
    /// * `SolveError::OffGrid` if a token would move the blank outside the grid;
    ///   the error carries the failing step index and the blank's position at
    ///   that step.
    /// * `SolveError::InvalidGrid` if the grid has no blank.
    ///
    /// # Examples
    /// ```
    /// use fifteen_solver::engine::{Moves, Puzzle};
    /// let mut puzzle = Puzzle::new(2, 2).unwrap();
    /// puzzle.update_puzzle(&"rd".parse::<Moves>().unwrap()).unwrap();
    /// assert_eq!(puzzle.get_grid(), &[vec![1, 3], vec![2, 0]]);
    /// assert!(puzzle.update_puzzle(&"d".parse::<Moves>().unwrap()).is_err());
    /// ```
    pub fn update_puzzle(&mut self, moves: &Moves) -> Result<(), SolveError> {
        let start = self
            .zero_position()
            .ok_or_else(|| SolveError::InvalidGrid("grid has no blank tile".to_string()))?;

        // Dry run first so a bad token never leaves the grid half-updated.
        let (mut zero_row, mut zero_col) = start;
        for (step, &direction) in moves.iter().enumerate() {
            let (next_row, next_col) =
                self.neighbor(zero_row, zero_col, direction)
                    .ok_or(SolveError::OffGrid {
                        direction,
                        step,
                        row: zero_row,
                        col: zero_col,
                    })?;
            zero_row = next_row;
            zero_col = next_col;
        }

        let (mut zero_row, mut zero_col) = start;
        for &direction in moves.iter() {
            if let Some((next_row, next_col)) = self.neighbor(zero_row, zero_col, direction) {
                self.grid[zero_row][zero_col] = self.grid[next_row][next_col];
                self.grid[next_row][next_col] = 0;
                zero_row = next_row;
                zero_col = next_col;
            }
        }
        Ok(())
    }

    /// Cell reached from `(row, col)` by one slide, or `None` if it leaves the grid.
    fn neighbor(&self, row: usize, col: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = direction.offset();
        let next_row = row.checked_add_signed(dr)?;
        let next_col = col.checked_add_signed(dc)?;
        (next_row < self.height && next_col < self.width).then_some((next_row, next_col))
    }

    fn check_permutation(&self) -> Result<(), SolveError> {
        let cells = self.height * self.width;
        let mut seen = vec![false; cells];
        for (row, cells_in_row) in self.grid.iter().enumerate() {
            for (col, &value) in cells_in_row.iter().enumerate() {
                let index = value as usize;
                if index >= cells {
                    return Err(SolveError::InvalidGrid(format!(
                        "label {} at ({}, {}) is outside 0..{}",
                        value, row, col, cells
                    )));
                }
                if seen[index] {
                    return Err(SolveError::InvalidGrid(format!(
                        "label {} appears more than once",
                        value
                    )));
                }
                seen[index] = true;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Puzzle {
    /// Formats the grid one row per line with right-aligned labels.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell_width = (self.height * self.width - 1).to_string().len();
        for (r, row) in self.grid.iter().enumerate() {
            let line = row
                .iter()
                .map(|value| format!("{:>width$}", value, width = cell_width))
                .collect::<Vec<_>>()
                .join(" ");
            write!(f, "{}", line)?;
            if r < self.height - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn solved_value(width: usize, row: usize, col: usize) -> u32 {
    (col + width * row) as u32
}

fn check_dimensions(height: usize, width: usize) -> Result<(), SolveError> {
    if height < 2 || width < 2 {
        return Err(SolveError::InvalidGrid(format!(
            "puzzle must be at least 2x2, got {}x{}",
            height, width
        )));
    }
    Ok(())
}

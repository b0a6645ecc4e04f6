use crate::engine::Puzzle;
use crate::error::SolveError;

/// Parses an array of string slices into a `Puzzle`.
///
/// Each string slice is one row, starting from row 0. Labels are separated by
/// whitespace and/or commas. Blank lines and lines starting with `#` are
/// skipped, so a puzzle file can be passed in line by line.
///
/// # Arguments
/// * `s`: A slice of string slices, one per row.
///
/// # Returns
/// * `Ok(Puzzle)` with height equal to the number of rows and width equal to
///   the length of the first row.
/// * `Err(SolveError::InvalidGrid)` if a label is not a number, rows differ in
///   length, the puzzle is smaller than 2x2, or the labels are not a
///   permutation of `0..height*width`.
///
/// # Examples
/// ```
/// use fifteen_solver::utils::puzzle_from_str_array;
///
/// let rows = [
///     "# blank swapped right",
///     "1 0",
///     "2 3",
/// ];
/// let puzzle = puzzle_from_str_array(&rows).unwrap();
/// assert_eq!(puzzle.height(), 2);
/// assert_eq!(puzzle.get_number(0, 0), 1);
/// ```
pub fn puzzle_from_str_array(s: &[&str]) -> Result<Puzzle, SolveError> {
    let mut rows: Vec<Vec<u32>> = Vec::new();

    for line in s.iter().map(|line| line.trim()) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<u32>().map_err(|_| {
                    SolveError::InvalidGrid(format!(
                        "unrecognized label '{}' in row {}",
                        token,
                        rows.len()
                    ))
                })
            })
            .collect::<Result<Vec<u32>, SolveError>>()?;
        rows.push(row);
    }

    let height = rows.len();
    let width = rows.first().map_or(0, |row| row.len());
    Puzzle::from_grid(height, width, rows)
}

/// Returns `true` if the puzzle can be brought to the solved configuration.
///
/// A slide of the blank is a transposition, so the permutation parity must
/// match the parity of the blank's taxicab distance from `(0, 0)`.
pub fn is_solvable(puzzle: &Puzzle) -> bool {
    let labels: Vec<u32> = puzzle.get_grid().iter().flatten().copied().collect();
    let inversions: usize = labels
        .iter()
        .enumerate()
        .map(|(i, &a)| labels[i + 1..].iter().filter(|&&b| b < a).count())
        .sum();
    match puzzle.zero_position() {
        Some((zero_row, zero_col)) => inversions % 2 == (zero_row + zero_col) % 2,
        None => false,
    }
}

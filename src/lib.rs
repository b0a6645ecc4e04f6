//! # Fifteen Solver Library
//!
//! This library solves the generalized sliding-tile ("fifteen") puzzle: any
//! `height x width` grid (both at least 2) holding a permutation of
//! `0..height*width`, with `0` as the blank. The solved configuration is
//! row-major ascending order with the blank in the top-left corner.
//!
//! The solver is constructive rather than a search: it places tiles one cell
//! at a time in a fixed order, checking a phase invariant at every boundary,
//! and finishes by rotating the top-left 2x2 block. Move sequences are correct
//! but not minimal.
//!
//! It is used by two binaries:
//! - `fifteen_solver`: Reads a puzzle file and prints a solving move string.
//! - `scramble_evaluator`: Solves many seeded scrambles and reports move counts.
//!
//! ## Modules
//! - `engine`: The grid (`Puzzle`), slide directions (`Direction`) and move
//!   sequences (`Moves`), including move application.
//! - `invariants`: The three phase invariants and the contract check built on them.
//! - `primitives`: Pure move generators that walk one tile horizontally or vertically.
//! - `solver`: Tile placement and the phase-by-phase solve, with an optional trace.
//! - `error`: `SolveError`, returned by every fallible operation.
//! - `utils`: Text parsing of puzzles and a parity-based solvability check.

pub mod engine;
pub mod error;
pub mod invariants;
pub mod primitives;
pub mod solver;
pub mod utils;

pub use engine::{Direction, Moves, Puzzle};
pub use error::SolveError;
pub use solver::{solve, solve_puzzle};

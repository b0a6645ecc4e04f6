use clap::Parser;
use fifteen_solver::engine::Puzzle;
use fifteen_solver::solver::solve_puzzle;
use fifteen_solver::utils::{is_solvable, puzzle_from_str_array};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Only print the move string
    #[clap(short, long)]
    quiet: bool,

    /// Path to the puzzle file (one row per line, labels separated by spaces or commas)
    puzzle_file: PathBuf,
}

fn read_puzzle_file(path: &PathBuf) -> Result<Puzzle, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file: {}", e))?;

    let lines: Vec<&str> = content.lines().collect();

    puzzle_from_str_array(&lines)
        .map_err(|e| format!("Invalid puzzle format: {}", e))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut puzzle = match read_puzzle_file(&args.puzzle_file) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("{}: {}", args.puzzle_file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if !args.quiet {
        println!("Loaded {}x{} puzzle from {}\n", puzzle.height(), puzzle.width(), args.puzzle_file.display());
        println!("Initial puzzle state:\n{}\n", puzzle);
        if !is_solvable(&puzzle) {
            println!("Warning: permutation parity says this puzzle has no solution.\n");
        }
    }

    match solve_puzzle(&mut puzzle) {
        Ok(moves) => {
            if args.quiet {
                println!("{}", moves);
            } else {
                println!("Solution found:\n");
                println!("Moves ({}):", moves.len());
                if moves.is_empty() {
                    println!("  Already solved, no moves needed.");
                } else {
                    println!("  {}", moves);
                }
                println!("\nFinal puzzle state:\n{}\n", puzzle);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to solve puzzle: {}", e);
            ExitCode::FAILURE
        }
    }
}

use clap::Parser;
use fifteen_solver::engine::Puzzle;
use fifteen_solver::solver::solve;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solve seeded scrambles and report move counts", long_about = None)]
struct Args {
    /// Number of rows
    #[clap(long, default_value_t = 4)]
    height: usize,

    /// Number of columns
    #[clap(long, default_value_t = 4)]
    width: usize,

    /// Number of scrambles to solve
    #[clap(short, long, default_value_t = 20)]
    count: usize,

    /// Seed of the first scramble; later scrambles use consecutive seeds
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Random blank slides per scramble
    #[clap(long, default_value_t = 1000)]
    steps: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!(
        "Solving {} scrambles of a {}x{} puzzle ({} slides each)...",
        args.count, args.height, args.width, args.steps
    );

    let mut move_counts: Vec<usize> = Vec::with_capacity(args.count);
    let mut failures = 0;

    for index in 0..args.count {
        let seed = args.seed + index as u64;
        let initial = match Puzzle::new_scrambled_with_seed(args.height, args.width, seed, args.steps) {
            Ok(puzzle) => puzzle,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };

        match solve(&initial) {
            Ok(moves) => {
                // Replay on the untouched scramble to confirm the move string.
                let mut replay = initial.clone();
                let verified = replay.update_puzzle(&moves).is_ok() && replay.is_solved();
                if verified {
                    info!(seed, moves = moves.len(), "Scramble solved");
                    move_counts.push(moves.len());
                } else {
                    error!(seed, "Move string did not solve the scramble");
                    failures += 1;
                }
            }
            Err(e) => {
                error!(seed, %e, "Solver failed");
                failures += 1;
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Scrambles solved: {}/{}", move_counts.len(), args.count);
    if failures > 0 {
        println!("Failures: {}", failures);
    }
    if let (Some(min), Some(max)) = (move_counts.iter().min(), move_counts.iter().max()) {
        let total: usize = move_counts.iter().sum();
        let avg = total as f64 / move_counts.len() as f64;
        println!("Moves: min {}, max {}, average {:.2}", min, max, avg);
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

//! CLI entry point for the bucket solver.
//!
//! Usage:
//!   bucket-solver solve <puzzle.json> [options]
//!   bucket-solver solve --stdin [options]
//!   bucket-solver solve --capacities 5,3 --target 4 [--start 0,0] [--no-refills]
//!   bucket-solver hardest [--max-capacity <n>]
//!   bucket-solver demo
//!
//! Options:
//!   --format <json|text>  Output format (default: text)
//!
//! Set `RUST_LOG=debug` to log search statistics to stderr.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use bucket_solver::{
    breadth_first_search, describe_path, hardest_puzzle, two_bucket_family, BucketError,
    BucketState, HardestError, Move, PuzzleConfig, SearchResult,
};

#[derive(Parser)]
#[command(name = "bucket-solver")]
#[command(about = "Shortest-path solver for water bucket puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the fewest moves that put the target amount in some bucket
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE", conflicts_with = "capacities")]
        file: Option<PathBuf>,

        /// Read puzzle JSON from stdin instead of file
        #[arg(long, conflicts_with_all = ["file", "capacities"])]
        stdin: bool,

        /// Bucket capacities, comma separated
        #[arg(long, value_delimiter = ',')]
        capacities: Vec<u32>,

        /// Amount that must end up in a single bucket
        #[arg(long, requires = "capacities")]
        target: Option<u32>,

        /// Initial fill levels, comma separated (default: all empty)
        #[arg(long, value_delimiter = ',', requires = "capacities")]
        start: Vec<u32>,

        /// Disallow filling buckets to capacity from the tap
        #[arg(long, requires = "capacities")]
        no_refills: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Find the two-bucket puzzle that takes the most moves to solve
    Hardest {
        /// Largest capacity and target to enumerate
        #[arg(long, default_value = "10")]
        max_capacity: u32,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Solve the classic example puzzles
    Demo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
enum CliError {
    #[display("failed to read puzzle: {_0}")]
    Io(#[from] io::Error),
    #[display("failed to parse puzzle JSON: {_0}")]
    Json(#[from] serde_json::Error),
    #[display("invalid puzzle: {_0}")]
    Bucket(#[from] BucketError),
    #[display("{_0}")]
    Hardest(#[from] HardestError),
    #[display("must provide a puzzle file, --stdin, or --capacities")]
    MissingPuzzle,
    #[display("--target is required with --capacities")]
    MissingTarget,
}

/// Output format for a solved (or unsolvable) puzzle
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    puzzle: PuzzleConfig,
    solved: bool,
    moves: usize,
    path: Vec<Vec<u32>>,
    steps: Vec<Move>,
    states_discovered: usize,
    states_expanded: usize,
    time_elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HardestOutput {
    puzzles_searched: usize,
    difficulty: usize,
    hardest: SolveOutput,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn run(command: Commands) -> Result<ExitCode, CliError> {
    match command {
        Commands::Solve {
            file,
            stdin,
            capacities,
            target,
            start,
            no_refills,
            format,
        } => {
            let config: PuzzleConfig = if stdin {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                serde_json::from_str(&buffer)?
            } else if let Some(path) = file {
                serde_json::from_str(&fs::read_to_string(&path)?)?
            } else if !capacities.is_empty() {
                PuzzleConfig {
                    values: (!start.is_empty()).then_some(start),
                    capacities,
                    target: target.ok_or(CliError::MissingTarget)?,
                    allow_refills: !no_refills,
                }
            } else {
                return Err(CliError::MissingPuzzle);
            };

            let initial = config.to_state()?;
            let result = breadth_first_search(&initial);
            let solved = result.is_solved();
            print_solution(&initial, &result, format)?;

            // Exit with 2 when the target cannot be reached
            Ok(if solved {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Commands::Hardest {
            max_capacity,
            format,
        } => {
            let family = two_bucket_family(max_capacity)?;
            let hardest = hardest_puzzle(&family)?;
            match format {
                OutputFormat::Json => {
                    let output = HardestOutput {
                        puzzles_searched: family.len(),
                        difficulty: hardest.difficulty(),
                        hardest: solve_output(&hardest.puzzle, &hardest.solution),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    println!(
                        "Hardest of {} puzzles: capacities {:?}, target {} ({} states)",
                        family.len(),
                        hardest.puzzle.capacities(),
                        hardest.puzzle.target(),
                        hardest.difficulty()
                    );
                    print_solution(&hardest.puzzle, &hardest.solution, format)?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Demo => {
            run_demo()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn solve_output(initial: &BucketState, result: &SearchResult<BucketState>) -> SolveOutput {
    SolveOutput {
        puzzle: PuzzleConfig::from(initial),
        solved: result.is_solved(),
        moves: result.moves(),
        path: result.path.iter().map(|s| s.values().to_vec()).collect(),
        steps: describe_path(&result.path).unwrap_or_default(),
        states_discovered: result.states_discovered,
        states_expanded: result.states_expanded,
        time_elapsed_ms: result.time_elapsed_ms,
    }
}

fn print_solution(
    initial: &BucketState,
    result: &SearchResult<BucketState>,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let output = solve_output(initial, result);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if !result.is_solved() {
                println!("No solution: {} cannot be measured from {}", initial.target(), initial);
                return Ok(());
            }
            println!("{}", result.path[0]);
            let steps = describe_path(&result.path).unwrap_or_default();
            for (step, state) in steps.iter().zip(&result.path[1..]) {
                println!("{state}  <- {step}");
            }
            println!("Solved in {} moves", result.moves());
        }
    }
    Ok(())
}

fn run_demo() -> Result<(), CliError> {
    let examples = [
        (
            "two buckets of capacity 5 and 3, with a target goal of 4",
            BucketState::new(&[0, 0], &[5, 3], 4, true)?,
        ),
        (
            "three buckets of capacity 10, 7, and 4, with a target goal of 2",
            BucketState::new(&[10, 0, 0], &[10, 7, 4], 2, false)?,
        ),
        (
            "three buckets of capacity 8, 5, and 3, with a target goal of 4",
            BucketState::new(&[8, 0, 0], &[8, 5, 3], 4, false)?,
        ),
        (
            "three buckets of capacity 12, 8, and 5, with a target goal of 2",
            BucketState::new(&[12, 0, 0], &[12, 8, 5], 2, false)?,
        ),
    ];

    for (title, initial) in &examples {
        println!("Example: {title}.");
        print_path(&breadth_first_search(initial).path);
        println!();
    }

    println!("Example: two buckets of size at most 10 with the deepest search tree.");
    let hardest = hardest_puzzle(&two_bucket_family(10)?)?;
    println!(
        "capacities {:?}, target {}",
        hardest.puzzle.capacities(),
        hardest.puzzle.target()
    );
    print_path(&hardest.solution.path);
    Ok(())
}

fn print_path(path: &[BucketState]) {
    let states: Vec<String> = path.iter().map(ToString::to_string).collect();
    println!("[{}]", states.join(", "));
}

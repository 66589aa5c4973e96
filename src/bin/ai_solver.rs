use anyhow::{Context, Result};
use clap::Parser;
use hanoi_solver::engine::{Puzzle, State, MIN_DISKS};
use hanoi_solver::solver::{solve_puzzle, SearchLimits, Strategy};
use hanoi_solver::utils::{state_from_str, state_from_str_array};
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search strategy: dfs, bfs, ucs, a_star or best_first
    #[clap(short, long, default_value = "dfs")]
    strategy: Strategy,

    /// Number of disks for the canonical start
    #[clap(short, long, default_value_t = MIN_DISKS)]
    disks: usize,

    /// Starting layout, towers bottom to top separated by '|' (e.g. "3 2 | 1 |")
    #[clap(long, conflicts_with = "state_file")]
    state: Option<String>,

    /// Path to a layout file with one line per tower
    #[clap(long)]
    state_file: Option<PathBuf>,

    /// Stop the search after expanding this many nodes
    #[clap(long)]
    max_expansions: Option<usize>,

    /// Stop the search after this many milliseconds
    #[clap(long)]
    time_limit_ms: Option<u64>,

    /// Pause between replayed moves
    #[clap(long, default_value_t = 0)]
    delay_ms: u64,

    /// Draw the towers after every replayed move
    #[clap(short, long)]
    verbose: bool,
}

fn read_state_file(path: &PathBuf) -> Result<State> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let lines: Vec<&str> = content.lines().collect();
    state_from_str_array(&lines).with_context(|| format!("invalid layout in {}", path.display()))
}

fn initial_puzzle(args: &Args) -> Result<Puzzle> {
    let state = match (&args.state, &args.state_file) {
        (Some(layout), _) => Some(state_from_str(layout).context("invalid --state layout")?),
        (None, Some(path)) => Some(read_state_file(path)?),
        (None, None) => None,
    };
    let puzzle = match state {
        Some(state) => Puzzle::from_state(state)?,
        None => Puzzle::with_disks(args.disks)?,
    };
    Ok(puzzle)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut puzzle = initial_puzzle(&args)?;
    let limits = SearchLimits {
        max_expansions: args.max_expansions,
        time_limit: args.time_limit_ms.map(Duration::from_millis),
    };

    println!(
        "Initial state ({} disks):\n{}\n",
        puzzle.num_disks(),
        puzzle.state().to_string_with_highlight(None)
    );
    println!("Searching with {}...\n", args.strategy);

    let solution = solve_puzzle(&puzzle, args.strategy, &limits)?;

    println!("Solution found:\n");
    println!(
        "Moves ({}, minimum from canonical start {}):",
        solution.moves.len(),
        puzzle.minimum_moves()
    );
    if solution.moves.is_empty() {
        println!("  No moves needed.");
    } else {
        for (i, mv) in solution.moves.iter().enumerate() {
            println!("  Move {}: {}", i + 1, mv);
        }
    }
    println!("Nodes expanded: {}\n", solution.nodes_expanded);

    let delay = Duration::from_millis(args.delay_ms);
    puzzle.replay(&solution.moves, |p, mv| {
        if args.verbose {
            println!(
                "{} -> {}\n{}\n",
                p.moves(),
                mv,
                p.state().to_string_with_highlight(None)
            );
        }
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    });

    println!("Final state after {} moves: {}", puzzle.moves(), puzzle.state());
    println!("Solved: {}", puzzle.is_solved());
    Ok(())
}

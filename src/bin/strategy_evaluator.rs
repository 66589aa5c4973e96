use clap::Parser;
use hanoi_solver::engine::{State, GOAL_TOWER, MAX_DISKS, MIN_DISKS};
use hanoi_solver::solver::{solve_with_limits, SearchLimits, Strategy};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compares the search strategies on canonical and random starts")]
struct Args {
    /// Largest disk count to evaluate (from the minimum upwards)
    #[clap(long, default_value_t = MAX_DISKS)]
    max_disks: usize,

    /// Random starting layouts per disk count, in addition to the canonical start
    #[clap(long, default_value_t = 10)]
    random_starts: u64,

    /// First seed for the random layouts
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Per-search time limit in milliseconds
    #[clap(long, default_value_t = 10_000)]
    time_limit_ms: u64,
}

#[derive(Default)]
struct Totals {
    runs: usize,
    moves: usize,
    expanded: usize,
    failures: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let limits = SearchLimits {
        max_expansions: None,
        time_limit: Some(Duration::from_millis(args.time_limit_ms)),
    };

    let mut totals: HashMap<Strategy, Totals> = HashMap::new();
    let mut shortest_path_violations = 0;

    for num_disks in MIN_DISKS..=args.max_disks.clamp(MIN_DISKS, MAX_DISKS) {
        println!("\n=== {} disks ===", num_disks);

        let starts = std::iter::once(("canonical".to_string(), State::new(num_disks))).chain(
            (0..args.random_starts).map(|i| {
                let seed = args.seed + i;
                (format!("seed {}", seed), State::random(num_disks, seed))
            }),
        );

        for (label, start) in starts {
            println!("\nStart {} {}", label, start);
            let mut bfs_len = None;
            let mut lengths = Vec::new();

            for strategy in Strategy::ALL {
                let entry = totals.entry(strategy).or_default();
                match solve_with_limits(strategy, &start, GOAL_TOWER, &limits) {
                    Ok(solution) => {
                        println!(
                            "  Strategy: {:<10}, Moves: {:<6}, Expanded: {}",
                            strategy,
                            solution.moves.len(),
                            solution.nodes_expanded
                        );
                        entry.runs += 1;
                        entry.moves += solution.moves.len();
                        entry.expanded += solution.nodes_expanded;
                        if strategy == Strategy::Bfs {
                            bfs_len = Some(solution.moves.len());
                        }
                        lengths.push((strategy, solution.moves.len()));
                    }
                    Err(err) => {
                        eprintln!("  Strategy: {:<10}, Error: {}", strategy, err);
                        entry.failures += 1;
                    }
                }
            }

            if let Some(bfs_len) = bfs_len {
                for (strategy, len) in lengths {
                    if len < bfs_len {
                        eprintln!(
                            "Warning: {} found {} moves, shorter than BFS ({}) from {}",
                            strategy, len, bfs_len, start
                        );
                        shortest_path_violations += 1;
                    }
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Average Moves / Nodes Expanded ---");
    for strategy in Strategy::ALL {
        let Some(t) = totals.get(&strategy) else {
            continue;
        };
        if t.runs == 0 {
            println!("Strategy {:<10}: no solutions ({} failures)", strategy, t.failures);
            continue;
        }
        println!(
            "Strategy {:<10}: Average Moves = {:.2}, Average Expanded = {:.2}, Failures = {}",
            strategy,
            t.moves as f64 / t.runs as f64,
            t.expanded as f64 / t.runs as f64,
            t.failures
        );
    }
    println!("\nShortest-path violations: {}", shortest_path_violations);
}

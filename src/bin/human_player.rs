use hanoi_solver::engine::{ClickOutcome, Puzzle, NUM_TOWERS};
use hanoi_solver::solver::{solve_puzzle, SearchLimits, Strategy};
use hanoi_solver::utils::move_from_str;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

const REPLAY_DELAY: Duration = Duration::from_millis(500);

fn print_help() {
    println!("Commands:");
    println!("  <src> <dst>      move the top disk from tower src to tower dst");
    println!("  <tower>          click a tower (select, then click again to drop)");
    println!("  solve <strategy> solve from here with dfs, bfs, ucs, a_star or best_first");
    println!("  u                undo the last move");
    println!("  + / -            add or remove a disk (restarts the game)");
    println!("  r                restart with the minimum number of disks");
    println!("  h                show this help");
    println!("  q                quit");
}

fn solve_and_replay(puzzle: &mut Puzzle, strategy: Strategy) {
    match solve_puzzle(puzzle, strategy, &SearchLimits::default()) {
        Ok(solution) => {
            println!(
                "{} found {} moves (expanded {} nodes). Replaying...",
                strategy,
                solution.moves.len(),
                solution.nodes_expanded
            );
            puzzle.replay(&solution.moves, |p, mv| {
                println!("Move {}: {}", p.moves(), mv);
                println!("{}\n", p.state().to_string_with_highlight(None));
                thread::sleep(REPLAY_DELAY);
            });
        }
        Err(err) => println!("Solver failed: {}", err),
    }
}

fn main() {
    env_logger::init();
    let mut puzzle = Puzzle::new();
    println!("Welcome to the Tower of Hanoi!");
    print_help();

    loop {
        println!("---------------------");
        println!(
            "Disks: {}, Moves: {}, Minimum Moves: {}",
            puzzle.num_disks(),
            puzzle.moves(),
            puzzle.minimum_moves()
        );
        println!("{}", puzzle.state().to_string_with_highlight(puzzle.selected_tower()));

        if puzzle.is_solved() {
            println!();
            println!(
                "Congratulations! You completed the Tower of Hanoi in {} moves!",
                puzzle.moves()
            );
            println!("Press '+' or '-' to change disks, 'r' to restart, or 'q' to quit.");
        }

        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        let trimmed_input = input.trim();
        match trimmed_input {
            "" => continue,
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "h" => print_help(),
            "u" => {
                if puzzle.undo_last_move() {
                    println!("Move undone.");
                } else {
                    println!("Nothing to undo.");
                }
            }
            "+" => {
                if !puzzle.increase_disks() {
                    println!("Already at the maximum number of disks.");
                }
            }
            "-" => {
                if !puzzle.decrease_disks() {
                    println!("Already at the minimum number of disks.");
                }
            }
            "r" => puzzle.restart(),
            _ => {
                if let Some(name) = trimmed_input.strip_prefix("solve") {
                    match name.parse::<Strategy>() {
                        Ok(strategy) => solve_and_replay(&mut puzzle, strategy),
                        Err(err) => println!("{}", err),
                    }
                } else if let Ok(tower) = trimmed_input.parse::<usize>() {
                    if tower >= NUM_TOWERS {
                        println!("Towers are numbered 0 to {}.", NUM_TOWERS - 1);
                        continue;
                    }
                    match puzzle.click_tower(tower) {
                        Ok(ClickOutcome::Selected(t)) => println!("Selected tower {}.", t),
                        Ok(ClickOutcome::Deselected) => println!("Selection cleared."),
                        Ok(ClickOutcome::Moved(mv)) => println!("Moved {}.", mv),
                        Ok(ClickOutcome::Ignored) => println!("Tower {} is empty.", tower),
                        Err(err) => println!("Invalid move: {}", err),
                    }
                } else {
                    match move_from_str(trimmed_input) {
                        Ok(mv) => match puzzle.apply(mv) {
                            Ok(()) => println!("Move processed."),
                            Err(err) => println!("Invalid move: {}", err),
                        },
                        Err(_) => println!("Invalid input. Type 'h' for help."),
                    }
                }
            }
        }
    }
}

//! # Tower of Hanoi Solver Library
//!
//! This library provides the core game logic for the three-tower Tower of Hanoi
//! puzzle and a search engine that finds a move sequence from any legal layout
//! to the goal tower with one of five strategies.
//!
//! It is used by three binaries:
//! - `human_player`: Interactive play on the command line, with undo, disk-count
//!   changes and solve-and-replay.
//! - `ai_solver`: Takes a starting layout and a strategy, then prints and
//!   replays the moves found.
//! - `strategy_evaluator`: Compares the strategies' path lengths and search effort.
//!
//! ## Modules
//! - `engine`: Contains the tower snapshot (`State`), moves (`Move`), the move
//!   generator (`legal_moves`), and the live puzzle (`Puzzle`).
//! - `solver`: Provides `solve` and the five `Strategy` variants.
//! - `heuristics`: Defines the goal-tower heuristic and the frontier priorities built on it.
//! - `utils`: Parses states and moves from text and formats move lists.
//! - `error`: Error types for all of the above.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod solver;
pub mod utils;

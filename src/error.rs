//! Error types shared by the engine, the solver and the text utilities.

use crate::engine::{Move, MAX_DISKS, MIN_DISKS};
use thiserror::Error;

/// Errors raised by the live puzzle and by `State` construction.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum PuzzleError {
    /// The move references an empty or out-of-range source tower, or would
    /// place a larger disk on a smaller one.
    #[error("illegal move {0}")]
    IllegalMove(Move),
    #[error("invalid disk count {0}: must be between {} and {}", MIN_DISKS, MAX_DISKS)]
    InvalidDiskCount(usize),
    /// A tower layout that breaks the stacking or disk-numbering rules.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised by the search strategies.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum SolveError {
    #[error("no solution found after expanding {expanded} nodes")]
    NoSolutionFound { expanded: usize },
    #[error("search limit reached after expanding {expanded} nodes")]
    LimitReached { expanded: usize },
}

/// Errors raised while parsing states or move lists from text.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum ParseError {
    #[error("expected {expected} towers, found {found}")]
    TowerCount { expected: usize, found: usize },
    #[error("unrecognized disk '{token}' on tower {tower}")]
    BadDisk { tower: usize, token: String },
    #[error("unrecognized move '{0}'")]
    BadMove(String),
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

#[derive(Error, PartialEq, Eq, Clone, Debug)]
#[error("unknown strategy '{0}' (expected one of: dfs, bfs, ucs, a_star, best_first)")]
pub struct ParseStrategyError(pub String);

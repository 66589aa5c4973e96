//! Core game engine for the Tower of Hanoi puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Move`: A single-disk move between two towers.
//! - `State`: An immutable, hashable snapshot of all towers, and the unit of search.
//! - `legal_moves`: The move generator shared by every graph-search strategy.
//! - `Puzzle`: Owns the live state the player sees, including the move counter,
//!   undo history, tower selection, and move-path replay.
use crate::error::PuzzleError;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::mem;

/// Number of towers. The recursive solver and the goal test both assume three.
pub const NUM_TOWERS: usize = 3;

/// The tower that must hold every disk for the puzzle to be solved.
pub const GOAL_TOWER: usize = NUM_TOWERS - 1;

/// Smallest disk count the live puzzle accepts.
pub const MIN_DISKS: usize = 3;

/// Largest disk count the live puzzle accepts.
pub const MAX_DISKS: usize = 8;

/// Moves the top disk of `source` onto `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub source: usize,
    pub target: usize,
}

impl Move {
    pub fn new(source: usize, target: usize) -> Self {
        Move { source, target }
    }
}

impl From<(usize, usize)> for Move {
    fn from((source, target): (usize, usize)) -> Self {
        Move::new(source, target)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}

/// A snapshot of every tower's disks, listed bottom to top.
///
/// Disks are numbered `1..=num_disks` by size, each appears exactly once, and
/// within a tower sizes strictly decrease from bottom to top. A `State` is never
/// mutated after construction: `apply` returns a new state, so a search can
/// branch many times from the same ancestor. Two states with the same tower
/// contents are equal and hash the same no matter how they were reached.
///
/// # Examples
/// ```
/// use hanoi_solver::engine::{Move, State};
///
/// let start = State::new(3);
/// assert_eq!(start.to_string(), "[[3, 2, 1], [], []]");
///
/// let next = start.apply(Move::new(0, 1)).unwrap();
/// assert_eq!(next.to_string(), "[[3, 2], [1], []]");
/// assert!(next.apply(Move::new(0, 1)).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
    towers: [Vec<usize>; NUM_TOWERS],
}

impl State {
    /// Creates the canonical start: all disks on tower 0, largest at the bottom.
    pub fn new(num_disks: usize) -> Self {
        State {
            towers: [(1..=num_disks).rev().collect(), Vec::new(), Vec::new()],
        }
    }

    /// Creates a state from explicit tower contents (bottom to top).
    ///
    /// # Returns
    /// * `Ok(State)` if the disks are exactly `1..=n` with no duplicates and every
    ///   tower is strictly decreasing from bottom to top.
    /// * `Err(PuzzleError::InvalidState)` otherwise.
    pub fn from_towers(towers: [Vec<usize>; NUM_TOWERS]) -> Result<Self, PuzzleError> {
        for (i, tower) in towers.iter().enumerate() {
            if let Some(pair) = tower.windows(2).find(|pair| pair[0] <= pair[1]) {
                return Err(PuzzleError::InvalidState(format!(
                    "disk {} rests on disk {} on tower {}",
                    pair[1], pair[0], i
                )));
            }
        }

        let mut disks: Vec<usize> = towers.iter().flatten().copied().collect();
        disks.sort_unstable();
        if let Some((expected, &found)) = disks
            .iter()
            .enumerate()
            .map(|(i, disk)| (i + 1, disk))
            .find(|&(expected, &found)| expected != found)
        {
            return Err(PuzzleError::InvalidState(format!(
                "expected disk {}, found disk {}",
                expected, found
            )));
        }

        Ok(State { towers })
    }

    /// Creates a reproducible random legal state with `num_disks` disks.
    ///
    /// Disks are dealt largest first onto uniformly chosen towers, so every
    /// tower is automatically in stacking order.
    pub fn random(num_disks: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut towers: [Vec<usize>; NUM_TOWERS] = Default::default();
        for disk in (1..=num_disks).rev() {
            towers[rng.gen_range(0..NUM_TOWERS)].push(disk);
        }
        State { towers }
    }

    pub fn towers(&self) -> &[Vec<usize>; NUM_TOWERS] {
        &self.towers
    }

    /// Returns the disks on `tower`, bottom to top.
    ///
    /// # Panics
    /// Panics if `tower >= NUM_TOWERS`.
    pub fn tower(&self, tower: usize) -> &[usize] {
        &self.towers[tower]
    }

    /// Returns the top disk of `tower`, or `None` if it is empty or out of range.
    pub fn top(&self, tower: usize) -> Option<usize> {
        self.towers.get(tower).and_then(|t| t.last().copied())
    }

    pub fn num_disks(&self) -> usize {
        self.towers.iter().map(Vec::len).sum()
    }

    /// Number of disks on `tower` (0 when out of range).
    pub fn disks_on(&self, tower: usize) -> usize {
        self.towers.get(tower).map_or(0, Vec::len)
    }

    /// True if every disk rests on `goal_tower`.
    pub fn is_goal(&self, goal_tower: usize) -> bool {
        self.disks_on(goal_tower) == self.num_disks()
    }

    /// Checks a move against this state.
    ///
    /// A move is legal iff both indices are in range and distinct, the source
    /// tower is non-empty, and the target tower is empty or its top disk is
    /// larger than the source's top disk.
    pub fn is_legal(&self, mv: Move) -> bool {
        if mv.source == mv.target || mv.target >= NUM_TOWERS {
            return false;
        }
        match (self.top(mv.source), self.top(mv.target)) {
            (Some(_), None) => true,
            (Some(moving), Some(resting)) => resting > moving,
            (None, _) => false,
        }
    }

    /// Returns the state produced by `mv`, leaving `self` untouched.
    pub fn apply(&self, mv: Move) -> Result<State, PuzzleError> {
        if !self.is_legal(mv) {
            return Err(PuzzleError::IllegalMove(mv));
        }
        let mut next = self.clone();
        if let Some(disk) = next.towers[mv.source].pop() {
            next.towers[mv.target].push(disk);
        }
        Ok(next)
    }

    /// Every legal move from this state paired with the state it produces, in
    /// `legal_moves` order.
    pub fn children(&self) -> impl Iterator<Item = (Move, State)> + '_ {
        legal_moves(self)
            .into_iter()
            .filter_map(move |mv| self.apply(mv).ok().map(|child| (mv, child)))
    }

    /// Draws the towers as text, one row per disk level.
    ///
    /// When `selected` names a tower, its label is bracketed so the player can
    /// see which tower a pending click will move from.
    pub fn to_string_with_highlight(&self, selected: Option<usize>) -> String {
        let n = self.num_disks().max(1);
        let height = self.towers.iter().map(Vec::len).max().unwrap_or(0) + 1;
        let mut output = String::new();

        for level in (0..height).rev() {
            let row: Vec<String> = self
                .towers
                .iter()
                .map(|tower| match tower.get(level) {
                    Some(&disk) => {
                        let pad = " ".repeat(n - disk);
                        let half = "=".repeat(disk);
                        format!("{pad}{half}|{half}{pad}")
                    }
                    None => format!("{0}|{0}", " ".repeat(n)),
                })
                .collect();
            output.push_str(row.join(" ").trim_end());
            output.push('\n');
        }

        let base = vec!["-".repeat(2 * n + 1); NUM_TOWERS];
        output.push_str(&base.join(" "));
        output.push('\n');

        let labels: Vec<String> = (0..NUM_TOWERS)
            .map(|i| {
                let label = if selected == Some(i) {
                    format!("[{i}]")
                } else {
                    i.to_string()
                };
                format!("{:^width$}", label, width = 2 * n + 1)
            })
            .collect();
        output.push_str(labels.join(" ").trim_end());
        output
    }
}

impl fmt::Display for State {
    /// Formats the towers as nested lists, e.g. `[[3, 2], [1], []]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let towers: Vec<String> = self.towers.iter().map(|t| format!("{:?}", t)).collect();
        write!(f, "[{}]", towers.join(", "))
    }
}

/// Enumerates every legal single-disk move from `state`.
///
/// Moves are ordered by source tower ascending, then target tower ascending.
/// This order fixes which child each search strategy sees first and so decides
/// ties between equal priorities.
pub fn legal_moves(state: &State) -> Vec<Move> {
    let mut moves = Vec::new();
    for source in 0..NUM_TOWERS {
        if state.top(source).is_none() {
            continue;
        }
        for target in 0..NUM_TOWERS {
            let mv = Move::new(source, target);
            if state.is_legal(mv) {
                moves.push(mv);
            }
        }
    }
    moves
}

/// What a call to `Puzzle::click_tower` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The tower was selected as the source of the next move.
    Selected(usize),
    /// The already selected tower was clicked again and the selection dropped.
    Deselected,
    /// A disk was moved from the selected tower to the clicked one.
    Moved(Move),
    /// Nothing happened (empty or out-of-range tower with nothing selected).
    Ignored,
}

/// Manages the live puzzle that the player sees and mutates.
///
/// This struct is the only owner of the live `State`. It tracks the move counter,
/// a history of earlier states for undo, and a pending tower selection for
/// click-driven play. Search never touches it directly: solvers work on a clone
/// of `state()` and hand back a move list that `replay` applies.
///
/// # Examples
/// ```
/// use hanoi_solver::engine::{Move, Puzzle};
///
/// let mut puzzle = Puzzle::new();
/// assert_eq!(puzzle.minimum_moves(), 7);
///
/// puzzle.apply(Move::new(0, 1)).unwrap();
/// assert_eq!(puzzle.moves(), 1);
/// assert!(puzzle.apply(Move::new(0, 1)).is_err());
///
/// assert!(puzzle.undo_last_move());
/// assert_eq!(puzzle.moves(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Puzzle {
    state: State,
    num_disks: usize,
    moves: u32,
    history: Vec<(State, u32)>, // (state, moves) before each applied move
    selected_tower: Option<usize>,
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl Puzzle {
    /// Creates a puzzle with `MIN_DISKS` disks in the canonical start.
    pub fn new() -> Self {
        Puzzle {
            state: State::new(MIN_DISKS),
            num_disks: MIN_DISKS,
            moves: 0,
            history: Vec::new(),
            selected_tower: None,
        }
    }

    /// Creates a puzzle with `num_disks` disks in the canonical start.
    pub fn with_disks(num_disks: usize) -> Result<Self, PuzzleError> {
        let mut puzzle = Puzzle::new();
        puzzle.reset(num_disks)?;
        Ok(puzzle)
    }

    /// Creates a puzzle whose live state is an arbitrary legal layout.
    ///
    /// Fails with `InvalidDiskCount` if the layout's disk count is out of bounds.
    pub fn from_state(state: State) -> Result<Self, PuzzleError> {
        let num_disks = state.num_disks();
        check_disk_count(num_disks)?;
        Ok(Puzzle {
            state,
            num_disks,
            moves: 0,
            history: Vec::new(),
            selected_tower: None,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn num_disks(&self) -> usize {
        self.num_disks
    }

    /// Returns the number of moves applied since the last reset.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn selected_tower(&self) -> Option<usize> {
        self.selected_tower
    }

    /// True iff the goal tower holds all `num_disks` disks.
    pub fn is_solved(&self) -> bool {
        self.state.disks_on(GOAL_TOWER) == self.num_disks
    }

    /// Returns `2^num_disks - 1`, the optimal move count from the canonical start.
    pub fn minimum_moves(&self) -> u64 {
        (1u64 << self.num_disks) - 1
    }

    /// Validates `mv` against the live state and applies it.
    ///
    /// On success exactly one disk moves, the move counter goes up by one, the
    /// previous state is pushed to the undo history and any tower selection is
    /// cleared. On failure nothing changes and `PuzzleError::IllegalMove` is
    /// returned.
    pub fn apply(&mut self, mv: Move) -> Result<(), PuzzleError> {
        let next = self.state.apply(mv)?;
        let previous = mem::replace(&mut self.state, next);
        self.history.push((previous, self.moves));
        self.moves += 1;
        self.selected_tower = None;
        Ok(())
    }

    /// Undoes the last applied move.
    ///
    /// # Returns
    /// * `true` if a move was undone.
    /// * `false` if no moves have been applied since the last reset.
    pub fn undo_last_move(&mut self) -> bool {
        match self.history.pop() {
            Some((previous, moves)) => {
                self.state = previous;
                self.moves = moves;
                self.selected_tower = None;
                true
            }
            None => false,
        }
    }

    /// Rebuilds the canonical start with `num_disks` disks.
    ///
    /// Zeroes the move counter and clears history and selection. Out-of-range
    /// counts fail with `InvalidDiskCount` and leave the puzzle untouched.
    pub fn reset(&mut self, num_disks: usize) -> Result<(), PuzzleError> {
        check_disk_count(num_disks)?;
        self.reset_unchecked(num_disks);
        Ok(())
    }

    /// Resets to the canonical start with `MIN_DISKS` disks.
    pub fn restart(&mut self) {
        self.reset_unchecked(MIN_DISKS);
    }

    fn reset_unchecked(&mut self, num_disks: usize) {
        self.num_disks = num_disks;
        self.state = State::new(num_disks);
        self.moves = 0;
        self.history.clear();
        self.selected_tower = None;
    }

    /// Adds one disk and resets. Returns `false` (and does nothing) at `MAX_DISKS`.
    pub fn increase_disks(&mut self) -> bool {
        self.num_disks < MAX_DISKS && self.reset(self.num_disks + 1).is_ok()
    }

    /// Removes one disk and resets. Returns `false` (and does nothing) at `MIN_DISKS`.
    pub fn decrease_disks(&mut self) -> bool {
        self.num_disks > MIN_DISKS && self.reset(self.num_disks - 1).is_ok()
    }

    /// Handles a click on `tower` for select-then-drop play.
    ///
    /// With nothing selected, a non-empty tower becomes the selection. With a
    /// tower selected, clicking it again cancels, and clicking another tower
    /// applies the move between them. An illegal drop returns the error and
    /// keeps the selection so the player can try another tower.
    pub fn click_tower(&mut self, tower: usize) -> Result<ClickOutcome, PuzzleError> {
        match self.selected_tower {
            None => {
                if self.state.top(tower).is_some() {
                    self.selected_tower = Some(tower);
                    Ok(ClickOutcome::Selected(tower))
                } else {
                    Ok(ClickOutcome::Ignored)
                }
            }
            Some(source) if source == tower => {
                self.selected_tower = None;
                Ok(ClickOutcome::Deselected)
            }
            Some(source) => {
                let mv = Move::new(source, tower);
                self.apply(mv)?;
                Ok(ClickOutcome::Moved(mv))
            }
        }
    }

    /// Applies a solver's move path one move at a time.
    ///
    /// `on_step` runs after each move with the updated puzzle, which is where a
    /// player renders and paces the replay.
    ///
    /// # Panics
    /// Panics if any move is rejected. A solver path that does not replay means
    /// the move generator or a strategy is broken, which is not a player error.
    pub fn replay<F>(&mut self, moves: &[Move], mut on_step: F)
    where
        F: FnMut(&Puzzle, Move),
    {
        for (step, &mv) in moves.iter().enumerate() {
            if let Err(err) = self.apply(mv) {
                panic!(
                    "solver produced an unplayable path: step {} of {}: {} (state {})",
                    step + 1,
                    moves.len(),
                    err,
                    self.state
                );
            }
            log::debug!("replayed step {}: {} -> {}", step + 1, mv, self.state);
            on_step(self, mv);
        }
    }
}

fn check_disk_count(num_disks: usize) -> Result<(), PuzzleError> {
    if (MIN_DISKS..=MAX_DISKS).contains(&num_disks) {
        Ok(())
    } else {
        Err(PuzzleError::InvalidDiskCount(num_disks))
    }
}

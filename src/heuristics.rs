//! Heuristics and frontier priorities for the priority-queue strategies.
//!
//! Lower priorities are expanded first. Every function here has the
//! `PriorityFn` signature so the solver can plug them in per strategy.
use crate::engine::State;

/// Computes the frontier priority of a child node.
///
/// Arguments are the child's path length (moves from the initial state), the
/// child state, and the goal tower.
pub type PriorityFn = fn(usize, &State, usize) -> usize;

/// Counts the disks already resting on the goal tower.
///
/// Higher means closer to solved. The priority-queue strategies nevertheless
/// treat it as a cost to minimise, which is the long-standing behaviour of
/// this solver and decides which path they return.
///
/// # Examples
/// ```
/// use hanoi_solver::engine::State;
/// use hanoi_solver::heuristics::disks_on_goal;
///
/// let state = State::from_towers([vec![3], vec![], vec![2, 1]]).unwrap();
/// assert_eq!(disks_on_goal(&state, 2), 2);
/// assert_eq!(disks_on_goal(&state, 0), 1);
/// ```
pub fn disks_on_goal(state: &State, goal_tower: usize) -> usize {
    state.disks_on(goal_tower)
}

/// Priority used by "uniform-cost" and best-first search: the heuristic alone.
pub fn heuristic_priority(_path_len: usize, state: &State, goal_tower: usize) -> usize {
    disks_on_goal(state, goal_tower)
}

/// Priority used by A*: moves so far plus the heuristic.
pub fn path_plus_heuristic_priority(path_len: usize, state: &State, goal_tower: usize) -> usize {
    path_len + disks_on_goal(state, goal_tower)
}

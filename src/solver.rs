use crate::engine::{Move, Puzzle, State, GOAL_TOWER, NUM_TOWERS};
use crate::error::{ParseStrategyError, SolveError};
use crate::heuristics::{heuristic_priority, path_plus_heuristic_priority, PriorityFn};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// The five interchangeable ways of solving a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Closed-form recursive halving. Always optimal, needs no search.
    Dfs,
    /// FIFO frontier. Returns a shortest path.
    Bfs,
    /// Min-priority frontier keyed by `disks_on_goal` of the child.
    ///
    /// This is not textbook uniform-cost search: the heuristic stands in for
    /// path cost, so it behaves exactly like `BestFirst`.
    Ucs,
    /// Min-priority frontier keyed by path length plus `disks_on_goal`.
    AStar,
    /// Greedy min-priority frontier keyed by `disks_on_goal` of the child.
    BestFirst,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Dfs,
        Strategy::Bfs,
        Strategy::Ucs,
        Strategy::AStar,
        Strategy::BestFirst,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Dfs => "dfs",
            Strategy::Bfs => "bfs",
            Strategy::Ucs => "ucs",
            Strategy::AStar => "a_star",
            Strategy::BestFirst => "best_first",
        }
    }

    /// Frontier ordering for graph-search strategies. `None` means FIFO.
    fn priority_fn(&self) -> Option<PriorityFn> {
        match self {
            Strategy::Dfs | Strategy::Bfs => None,
            Strategy::Ucs | Strategy::BestFirst => Some(heuristic_priority),
            Strategy::AStar => Some(path_plus_heuristic_priority),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" => Ok(Strategy::Dfs),
            "bfs" => Ok(Strategy::Bfs),
            "ucs" => Ok(Strategy::Ucs),
            "a_star" | "a*" | "astar" | "a-star" => Ok(Strategy::AStar),
            "best_first" | "best-first" | "bestfirst" | "greedy" => Ok(Strategy::BestFirst),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Cooperative limits checked between node expansions. The default is unlimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_expansions: Option<usize>,
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    fn is_exceeded(&self, expanded: usize, started: Instant) -> bool {
        self.max_expansions.map_or(false, |max| expanded >= max)
            || self.time_limit.map_or(false, |limit| started.elapsed() >= limit)
    }
}

/// Represents a solution found by the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub strategy: Strategy,
    /// Moves from the initial state to a goal state, in replay order.
    pub moves: Vec<Move>,
    /// Nodes taken off the frontier and expanded. Always 0 for `Strategy::Dfs`.
    pub nodes_expanded: usize,
}

/// Solves from `initial` to `goal_tower` with no search limits.
pub fn solve(
    strategy: Strategy,
    initial: &State,
    goal_tower: usize,
) -> Result<Solution, SolveError> {
    solve_with_limits(strategy, initial, goal_tower, &SearchLimits::default())
}

/// Solves from `initial` to `goal_tower`.
///
/// # Returns
/// * `Ok(Solution)` whose moves, applied in order to `initial`, leave every
///   disk on `goal_tower`.
/// * `Err(SolveError::NoSolutionFound)` if the frontier empties first, which
///   for this puzzle only happens with an out-of-range goal tower.
/// * `Err(SolveError::LimitReached)` if `limits` stop a graph search early.
pub fn solve_with_limits(
    strategy: Strategy,
    initial: &State,
    goal_tower: usize,
    limits: &SearchLimits,
) -> Result<Solution, SolveError> {
    log::debug!(
        "solving {} disks with {} towards tower {} from {}",
        initial.num_disks(),
        strategy,
        goal_tower,
        initial
    );

    let solution = match strategy {
        Strategy::Dfs => solve_dfs(initial, goal_tower)?,
        _ => frontier_search(strategy, initial, goal_tower, limits)?,
    };

    log::debug!(
        "{} found {} moves after expanding {} nodes",
        strategy,
        solution.moves.len(),
        solution.nodes_expanded
    );
    Ok(solution)
}

/// Solves a snapshot of the puzzle's live state towards `GOAL_TOWER`.
///
/// The puzzle itself is never touched; replay the returned moves with
/// `Puzzle::replay`.
pub fn solve_puzzle(
    puzzle: &Puzzle,
    strategy: Strategy,
    limits: &SearchLimits,
) -> Result<Solution, SolveError> {
    let snapshot = puzzle.state().clone();
    solve_with_limits(strategy, &snapshot, GOAL_TOWER, limits)
}

/// Moves `count` disks from `source` to `target` using `auxiliary`.
///
/// Returns the classic `2^count - 1` move sequence.
///
/// # Examples
/// ```
/// use hanoi_solver::solver::tower_moves;
///
/// let moves = tower_moves(2, 0, 2, 1);
/// let pairs: Vec<(usize, usize)> = moves.iter().map(|m| (m.source, m.target)).collect();
/// assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
/// ```
pub fn tower_moves(count: usize, source: usize, target: usize, auxiliary: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    push_tower_moves(count, source, target, auxiliary, &mut moves);
    moves
}

fn push_tower_moves(
    count: usize,
    source: usize,
    target: usize,
    auxiliary: usize,
    moves: &mut Vec<Move>,
) {
    match count {
        0 => {}
        1 => moves.push(Move::new(source, target)),
        _ => {
            push_tower_moves(count - 1, source, auxiliary, target, moves);
            moves.push(Move::new(source, target));
            push_tower_moves(count - 1, auxiliary, target, source, moves);
        }
    }
}

fn solve_dfs(initial: &State, goal_tower: usize) -> Result<Solution, SolveError> {
    if goal_tower >= NUM_TOWERS {
        return Err(SolveError::NoSolutionFound { expanded: 0 });
    }

    let num_disks = initial.num_disks();
    let stacked_on = (0..NUM_TOWERS).find(|&t| initial.disks_on(t) == num_disks);
    let moves = match stacked_on {
        Some(source) if source == goal_tower => Vec::new(),
        Some(source) => tower_moves(num_disks, source, goal_tower, spare_tower(source, goal_tower)),
        None => {
            // locations[disk] is the tower currently holding that disk
            let mut locations = vec![0; num_disks + 1];
            for (tower, disks) in initial.towers().iter().enumerate() {
                for &disk in disks {
                    locations[disk] = tower;
                }
            }
            let mut moves = Vec::new();
            gather(num_disks, goal_tower, &mut locations, &mut moves);
            moves
        }
    };

    Ok(Solution {
        strategy: Strategy::Dfs,
        moves,
        nodes_expanded: 0,
    })
}

/// Brings disks `1..=disk` onto `target` from any legal layout.
fn gather(disk: usize, target: usize, locations: &mut [usize], moves: &mut Vec<Move>) {
    if disk == 0 {
        return;
    }
    let from = locations[disk];
    if from == target {
        gather(disk - 1, target, locations, moves);
        return;
    }
    let spare = spare_tower(from, target);
    gather(disk - 1, spare, locations, moves);
    moves.push(Move::new(from, target));
    locations[disk] = target;
    gather(disk - 1, target, locations, moves);
}

fn spare_tower(a: usize, b: usize) -> usize {
    (0..NUM_TOWERS).sum::<usize>() - a - b
}

/// The move that produced a node, and the link of the node it was made from.
struct Link {
    parent: Option<usize>,
    mv: Move,
}

struct Node {
    state: State,
    link: Option<usize>, // index into the search's links; None for the root
    depth: usize,
}

/// Walks back-pointers from a node to the root and returns the moves in
/// replay order.
fn reconstruct_path(links: &[Link], mut link: Option<usize>) -> Vec<Move> {
    let mut moves = Vec::new();
    while let Some(i) = link {
        moves.push(links[i].mv);
        link = links[i].parent;
    }
    moves.reverse();
    moves
}

/// A frontier entry ordered so that `BinaryHeap` pops the lowest priority
/// first, and among equal priorities the earliest pushed.
struct Queued {
    priority: usize,
    seq: usize,
    node: Node,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Queued {}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

enum Frontier {
    Fifo(VecDeque<Node>),
    Priority { heap: BinaryHeap<Queued>, next_seq: usize },
}

impl Frontier {
    fn new(ordered: bool) -> Self {
        if ordered {
            Frontier::Priority {
                heap: BinaryHeap::new(),
                next_seq: 0,
            }
        } else {
            Frontier::Fifo(VecDeque::new())
        }
    }

    fn push(&mut self, node: Node, priority: usize) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(node),
            Frontier::Priority { heap, next_seq } => {
                heap.push(Queued {
                    priority,
                    seq: *next_seq,
                    node,
                });
                *next_seq += 1;
            }
        }
    }

    fn pop(&mut self) -> Option<Node> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Priority { heap, .. } => heap.pop().map(|queued| queued.node),
        }
    }
}

/// Shared expansion loop for BFS, UCS, A* and best-first search.
///
/// States are marked visited when they are pushed, so no state is queued twice
/// and no returned path revisits a state. The goal test runs when a node is
/// popped. Nodes carry a back-pointer instead of their whole path, and the
/// path is rebuilt only for the goal node.
fn frontier_search(
    strategy: Strategy,
    initial: &State,
    goal_tower: usize,
    limits: &SearchLimits,
) -> Result<Solution, SolveError> {
    let started = Instant::now();
    let priority_fn = strategy.priority_fn();
    let mut frontier = Frontier::new(priority_fn.is_some());
    let mut visited: HashSet<State> = HashSet::new();
    let mut links: Vec<Link> = Vec::new();
    let mut expanded = 0;

    visited.insert(initial.clone());
    frontier.push(
        Node {
            state: initial.clone(),
            link: None,
            depth: 0,
        },
        0,
    );

    while let Some(node) = frontier.pop() {
        if node.state.is_goal(goal_tower) {
            return Ok(Solution {
                strategy,
                moves: reconstruct_path(&links, node.link),
                nodes_expanded: expanded,
            });
        }

        if limits.is_exceeded(expanded, started) {
            log::warn!(
                "{} stopped after expanding {} nodes ({} states seen)",
                strategy,
                expanded,
                visited.len()
            );
            return Err(SolveError::LimitReached { expanded });
        }

        expanded += 1;
        log::trace!("{} expanding {} at depth {}", strategy, node.state, node.depth);

        for (mv, child) in node.state.children() {
            if !visited.insert(child.clone()) {
                continue;
            }
            links.push(Link {
                parent: node.link,
                mv,
            });
            let depth = node.depth + 1;
            let priority = priority_fn.map_or(0, |f| f(depth, &child, goal_tower));
            frontier.push(
                Node {
                    state: child,
                    link: Some(links.len() - 1),
                    depth,
                },
                priority,
            );
        }
    }

    Err(SolveError::NoSolutionFound { expanded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MAX_DISKS, MIN_DISKS};

    fn replay_on(state: &State, moves: &[Move]) -> State {
        moves
            .iter()
            .fold(state.clone(), |s, &mv| s.apply(mv).unwrap())
    }

    #[test]
    fn test_dfs_canonical_three_disks() {
        let solution = solve(Strategy::Dfs, &State::new(3), GOAL_TOWER).unwrap();
        let expected: Vec<Move> = [(0, 2), (0, 1), (2, 1), (0, 2), (1, 0), (1, 2), (0, 2)]
            .into_iter()
            .map(Move::from)
            .collect();
        assert_eq!(solution.moves, expected);
        assert_eq!(
            replay_on(&State::new(3), &solution.moves).to_string(),
            "[[], [], [3, 2, 1]]"
        );
    }

    #[test]
    fn test_dfs_is_optimal_for_all_disk_counts() {
        for n in MIN_DISKS..=MAX_DISKS {
            let puzzle = Puzzle::with_disks(n).unwrap();
            let solution = solve_puzzle(&puzzle, Strategy::Dfs, &SearchLimits::default()).unwrap();
            assert_eq!(solution.moves.len() as u64, puzzle.minimum_moves());
            assert!(replay_on(puzzle.state(), &solution.moves).is_goal(GOAL_TOWER));
        }
    }

    #[test]
    fn test_dfs_from_other_tower() {
        let start = State::from_towers([vec![], vec![3, 2, 1], vec![]]).unwrap();
        let solution = solve(Strategy::Dfs, &start, 0).unwrap();
        assert_eq!(solution.moves, tower_moves(3, 1, 0, 2));
        assert!(replay_on(&start, &solution.moves).is_goal(0));
    }

    #[test]
    fn test_every_strategy_solves_canonical_start() {
        for n in MIN_DISKS..=MAX_DISKS {
            let start = State::new(n);
            for strategy in Strategy::ALL {
                let solution = solve(strategy, &start, GOAL_TOWER).unwrap();
                assert_eq!(solution.strategy, strategy);
                assert!(
                    replay_on(&start, &solution.moves).is_goal(GOAL_TOWER),
                    "{} failed for {} disks",
                    strategy,
                    n
                );
            }
        }
    }

    #[test]
    fn test_every_strategy_solves_random_starts() {
        for seed in 0..20 {
            let start = State::random(5, seed);
            for strategy in Strategy::ALL {
                let solution = solve(strategy, &start, GOAL_TOWER).unwrap();
                let mut puzzle = Puzzle::from_state(start.clone()).unwrap();
                puzzle.replay(&solution.moves, |_, _| {});
                assert!(puzzle.is_solved(), "{} failed from {}", strategy, start);
            }
        }
    }

    #[test]
    fn test_bfs_is_never_longer_than_other_strategies() {
        for seed in 0..20 {
            let start = State::random(5, seed);
            let bfs = solve(Strategy::Bfs, &start, GOAL_TOWER).unwrap();
            for strategy in Strategy::ALL {
                let other = solve(strategy, &start, GOAL_TOWER).unwrap();
                assert!(bfs.moves.len() <= other.moves.len());
            }
            let dfs = solve(Strategy::Dfs, &start, GOAL_TOWER).unwrap();
            assert_eq!(bfs.moves.len(), dfs.moves.len());
        }
    }

    #[test]
    fn test_bfs_canonical_is_optimal() {
        let solution = solve(Strategy::Bfs, &State::new(4), GOAL_TOWER).unwrap();
        assert_eq!(solution.moves.len(), 15);
        assert!(solution.nodes_expanded > 0);
    }

    #[test]
    fn test_paths_never_repeat_states() {
        let start = State::new(5);
        for strategy in Strategy::ALL {
            let solution = solve(strategy, &start, GOAL_TOWER).unwrap();
            let mut seen = HashSet::new();
            let mut current = start.clone();
            seen.insert(current.clone());
            for &mv in &solution.moves {
                current = current.apply(mv).unwrap();
                assert!(seen.insert(current.clone()), "{} revisits {}", strategy, current);
            }
        }
    }

    #[test]
    fn test_ucs_and_best_first_agree() {
        for seed in 0..10 {
            let start = State::random(4, seed);
            let ucs = solve(Strategy::Ucs, &start, GOAL_TOWER).unwrap();
            let best_first = solve(Strategy::BestFirst, &start, GOAL_TOWER).unwrap();
            assert_eq!(ucs.moves, best_first.moves);
            assert_eq!(ucs.nodes_expanded, best_first.nodes_expanded);
        }
    }

    #[test]
    fn test_a_star_adds_path_length_to_priority() {
        let start = State::random(5, 1);
        assert_eq!(start.to_string(), "[[4, 3], [2, 1], [5]]");

        let a_star = solve(Strategy::AStar, &start, GOAL_TOWER).unwrap();
        let ucs = solve(Strategy::Ucs, &start, GOAL_TOWER).unwrap();
        assert_eq!(a_star.moves.len(), 15);
        assert_eq!(ucs.moves.len(), 16);
        assert_ne!(a_star.moves, ucs.moves);
        assert!(replay_on(&start, &a_star.moves).is_goal(GOAL_TOWER));

        let child = start.apply(Move::new(1, 0)).unwrap();
        let a_star_priority = Strategy::AStar.priority_fn().unwrap();
        let ucs_priority = Strategy::Ucs.priority_fn().unwrap();
        assert_eq!(a_star_priority(3, &child, GOAL_TOWER), 4);
        assert_eq!(ucs_priority(3, &child, GOAL_TOWER), 1);
    }

    #[test]
    fn test_already_solved_returns_empty_path() {
        let solved = State::from_towers([vec![], vec![], vec![3, 2, 1]]).unwrap();
        for strategy in Strategy::ALL {
            let solution = solve(strategy, &solved, GOAL_TOWER).unwrap();
            assert!(solution.moves.is_empty());
            assert_eq!(solution.nodes_expanded, 0);
        }
    }

    #[test]
    fn test_unreachable_goal_exhausts_frontier() {
        let start = State::new(3);
        for strategy in Strategy::ALL {
            let result = solve(strategy, &start, NUM_TOWERS);
            assert!(
                matches!(result, Err(SolveError::NoSolutionFound { .. })),
                "{} did not report no solution",
                strategy
            );
        }
        // all 27 states are expanded before giving up
        assert_eq!(
            solve(Strategy::Bfs, &start, NUM_TOWERS),
            Err(SolveError::NoSolutionFound { expanded: 27 })
        );
    }

    #[test]
    fn test_expansion_limit_stops_search() {
        let limits = SearchLimits {
            max_expansions: Some(3),
            time_limit: None,
        };
        for strategy in [Strategy::Bfs, Strategy::Ucs, Strategy::AStar, Strategy::BestFirst] {
            assert_eq!(
                solve_with_limits(strategy, &State::new(5), GOAL_TOWER, &limits),
                Err(SolveError::LimitReached { expanded: 3 })
            );
        }
        // closed-form recursion needs no expansions
        assert!(solve_with_limits(Strategy::Dfs, &State::new(5), GOAL_TOWER, &limits).is_ok());
    }

    #[test]
    fn test_zero_time_limit_stops_search() {
        let limits = SearchLimits {
            max_expansions: None,
            time_limit: Some(Duration::ZERO),
        };
        let result = solve_with_limits(Strategy::Bfs, &State::new(4), GOAL_TOWER, &limits);
        assert_eq!(result, Err(SolveError::LimitReached { expanded: 0 }));
    }

    #[test]
    fn test_solve_puzzle_leaves_puzzle_untouched() {
        let mut puzzle = Puzzle::with_disks(4).unwrap();
        puzzle.apply(Move::new(0, 1)).unwrap();
        let before = puzzle.state().clone();

        let solution = solve_puzzle(&puzzle, Strategy::AStar, &SearchLimits::default()).unwrap();
        assert_eq!(puzzle.state(), &before);
        assert_eq!(puzzle.moves(), 1);

        puzzle.replay(&solution.moves, |_, _| {});
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.moves() as usize, 1 + solution.moves.len());
    }

    #[test]
    fn test_priority_queue_pops_lowest_then_oldest() {
        let mut frontier = Frontier::new(true);
        for (priority, disks) in [(2, 1), (1, 2), (1, 3), (0, 4)] {
            frontier.push(
                Node {
                    state: State::new(disks),
                    link: None,
                    depth: 0,
                },
                priority,
            );
        }
        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop())
            .map(|node| node.state.num_disks())
            .collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_reconstruct_path_follows_parents() {
        let links = vec![
            Link {
                parent: None,
                mv: Move::new(0, 2),
            },
            Link {
                parent: None,
                mv: Move::new(0, 1),
            },
            Link {
                parent: Some(0),
                mv: Move::new(0, 1),
            },
            Link {
                parent: Some(2),
                mv: Move::new(2, 1),
            },
        ];
        assert_eq!(
            reconstruct_path(&links, Some(3)),
            vec![Move::new(0, 2), Move::new(0, 1), Move::new(2, 1)]
        );
        assert_eq!(reconstruct_path(&links, Some(1)), vec![Move::new(0, 1)]);
        assert!(reconstruct_path(&links, None).is_empty());
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("A*".parse::<Strategy>(), Ok(Strategy::AStar));
        assert_eq!("Best-First".parse::<Strategy>(), Ok(Strategy::BestFirst));
        assert!("ida".parse::<Strategy>().is_err());
    }
}

use crate::action::Action;
use crate::engine::{Board, Owner};
use crate::heuristics::score;
use crate::successors::SearchNode;
use log::{debug, info};
use std::collections::HashSet;

/// Depth cap used when none is configured.
pub const DEFAULT_MAX_DEPTH: u32 = 250;

/// Tuning knobs for [`solve_iddfs`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Largest depth limit tried before giving up.
    pub max_depth: u32,
    /// Remember expanded boards that failed at a given remaining depth and skip them when
    /// they come up again.
    pub transposition_cache: bool,
    /// Upper bound on remembered failures. Once full, new failures are not recorded.
    pub max_cache_entries: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            transposition_cache: false,
            max_cache_entries: 1_000_000,
        }
    }
}

/// Counters collected during a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Depth limits tried, including the successful one.
    pub iterations: u32,
    /// Nodes reached, root included, summed over all iterations.
    pub nodes_visited: u64,
    /// Nodes whose successors were generated.
    pub nodes_expanded: u64,
    /// Nodes rejected by the depth limit or the score threshold.
    pub cutoffs: u64,
    /// Nodes skipped thanks to the transposition cache.
    pub cache_hits: u64,
}

/// Represents a solution found by the solver.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Actions from the initial board to a board with no opposing pieces, in play order.
    /// Empty when the opponent had no pieces to begin with.
    pub actions: Vec<Action>,
    /// The depth limit at which the solution was found.
    pub depth: u32,
    pub stats: SearchStats,
}

/// Searches for a sequence of `owner`'s actions that removes every opposing piece.
///
/// Runs iterative deepening: depth limits `0, 1, 2, ...` up to `config.max_depth`, each a fresh
/// depth-first search from the root. Below the root a node is cut off when its [`score`] exceeds
/// the score of its parent, so every step along a solution keeps `owner` at least as close to
/// the enemy. Only `owner` moves; the opponent stays put.
///
/// Returns `None` when no solution exists within `config.max_depth`.
///
/// # Examples
/// ```
/// use expendibots::action::Action;
/// use expendibots::engine::{Board, Owner, Pile};
/// use expendibots::solver::{solve_iddfs, SearchConfig};
/// let board = Board::from_piles(&[Pile(1, 3, 3)], &[Pile(1, 4, 4)]).unwrap();
/// let solution = solve_iddfs(&board, Owner::White, &SearchConfig::default()).unwrap();
/// assert_eq!(solution.actions, vec![Action::Explode { at: (3, 3) }]);
/// ```
pub fn solve_iddfs(initial_board: &Board, owner: Owner, config: &SearchConfig) -> Option<Solution> {
    let root = SearchNode::root(initial_board.clone());
    let root_score = score(&root.board, owner);
    let mut search = Search::new(owner, config);

    info!(
        "searching for {} with max depth {} (root score {})",
        owner, config.max_depth, root_score
    );

    for depth in 0..=config.max_depth {
        search.stats.iterations += 1;
        let mut path = Vec::new();
        let found = search.try_depth(&root, depth, root_score, &mut path);
        debug!(
            "depth {}: visited {} expanded {} cutoffs {} cache hits {}",
            depth,
            search.stats.nodes_visited,
            search.stats.nodes_expanded,
            search.stats.cutoffs,
            search.stats.cache_hits
        );
        if found {
            // Actions were collected while unwinding, deepest first.
            path.reverse();
            info!("found a {}-action solution at depth {}", path.len(), depth);
            return Some(Solution {
                actions: path,
                depth,
                stats: search.stats,
            });
        }
    }

    info!("no solution within depth {}", config.max_depth);
    None
}

struct Search<'a> {
    owner: Owner,
    config: &'a SearchConfig,
    stats: SearchStats,
    failed: HashSet<(Board, u32)>,
}

impl<'a> Search<'a> {
    fn new(owner: Owner, config: &'a SearchConfig) -> Self {
        Search {
            owner,
            config,
            stats: SearchStats::default(),
            failed: HashSet::new(),
        }
    }

    /// Depth-limited search below `node`. On success the actions from `node` down to the goal
    /// have been pushed onto `path`, deepest first.
    fn try_depth(
        &mut self,
        node: &SearchNode,
        remaining_depth: u32,
        threshold: u32,
        path: &mut Vec<Action>,
    ) -> bool {
        self.stats.nodes_visited += 1;

        // The goal only asks that the opponent is gone, even if our own pieces went with it.
        if node.board.piece_count(self.owner.opponent()) == 0 {
            path.extend(node.action);
            return true;
        }

        let node_score = score(&node.board, self.owner);
        if remaining_depth == 0 || node_score > threshold {
            self.stats.cutoffs += 1;
            return false;
        }

        // A node that got past the cutoff fails or succeeds regardless of the threshold it was
        // reached with, so (board, remaining_depth) is enough to identify a failure.
        let key = (node.board.clone(), remaining_depth);
        if self.config.transposition_cache && self.failed.contains(&key) {
            self.stats.cache_hits += 1;
            return false;
        }

        self.stats.nodes_expanded += 1;
        for child in node.successors(self.owner) {
            if self.try_depth(&child, remaining_depth - 1, node_score, path) {
                path.extend(node.action);
                return true;
            }
        }

        if self.config.transposition_cache && self.failed.len() < self.config.max_cache_entries {
            self.failed.insert(key);
        }
        false
    }
}

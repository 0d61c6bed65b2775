//! Successor generation and the search-tree node type.
//!
//! - `expand`: every board one action away for a given side, deduplicated by board contents.
//! - `SearchNode`: a board snapshot, the action that produced it, and lazily stored children.
//! - `explore`: a breadth-limited graph expansion that uses a known-state set to avoid adding
//!   a board twice. The iterative-deepening solver does not use it.
use crate::action::Action;
use crate::engine::{Axis, Board, Owner};
use log::trace;
use std::collections::HashSet;

/// Enumerates every distinct board reachable by one action of `owner`, with the action used.
///
/// For each stack of `n` pieces, every count `1..=n` is tried at every displacement in
/// `-n..=n` (except 0) along both axes, each on a fresh copy of `board`. Rejected slides and
/// slides that leave the board unchanged are skipped. One explosion per stack is added after
/// its slides. When two actions reach the same board only the first, in that enumeration order,
/// is kept.
///
/// # Examples
/// ```
/// use expendibots::engine::{Board, Owner, Pile};
/// use expendibots::successors::expand;
/// let board = Board::from_piles(&[Pile(1, 3, 3)], &[]).unwrap();
/// // Four one-square slides and one explosion.
/// assert_eq!(expand(&board, Owner::White).len(), 5);
/// ```
pub fn expand(board: &Board, owner: Owner) -> Vec<(Board, Action)> {
    let mut seen: HashSet<Board> = HashSet::new();
    let mut successors = Vec::new();

    for (stack_size, x, y) in board.owners_and_positions(owner) {
        let reach = stack_size as i32;
        for count in 1..=stack_size {
            for displacement in (-reach..=reach).filter(|&d| d != 0) {
                for axis in [Axis::Horizontal, Axis::Vertical] {
                    let mut next = board.clone();
                    if let Err(err) = next.slide((x, y), count, displacement, axis) {
                        trace!(
                            "rejected slide of {} from ({}, {}) by {} {:?}: {}",
                            count,
                            x,
                            y,
                            displacement,
                            axis,
                            err
                        );
                        continue;
                    }
                    if next == *board {
                        continue;
                    }
                    let to = match axis {
                        Axis::Horizontal => ((x as i32 + displacement) as usize, y),
                        Axis::Vertical => (x, (y as i32 + displacement) as usize),
                    };
                    let action = Action::Slide {
                        count,
                        from: (x, y),
                        to,
                    };
                    if seen.insert(next.clone()) {
                        successors.push((next, action));
                    }
                }
            }
        }

        let mut next = board.clone();
        // (x, y) comes from the board scan, so it is always in range.
        if next.explode(x, y).is_ok() && seen.insert(next.clone()) {
            successors.push((next, Action::Explode { at: (x, y) }));
        }
    }

    successors
}

/// A node of the search tree.
///
/// The board is a snapshot owned by the node and never mutated after creation.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub board: Board,
    /// `None` for the root.
    pub action: Option<Action>,
    /// Filled only by [`SearchNode::expand_children`] and [`explore`]. The solver walks
    /// [`SearchNode::successors`] instead and leaves this empty.
    pub children: Vec<SearchNode>,
}

impl SearchNode {
    pub fn root(board: Board) -> Self {
        SearchNode {
            board,
            action: None,
            children: Vec::new(),
        }
    }

    /// Child nodes for every successor of this node's board, without storing them.
    pub fn successors(&self, owner: Owner) -> Vec<SearchNode> {
        expand(&self.board, owner)
            .into_iter()
            .map(|(board, action)| SearchNode {
                board,
                action: Some(action),
                children: Vec::new(),
            })
            .collect()
    }

    /// Stores as children the successors whose boards are not yet in `known`, marking them known.
    ///
    /// Returns the number of children added by this call.
    pub fn expand_children(&mut self, owner: Owner, known: &mut HashSet<Board>) -> usize {
        let before = self.children.len();
        for child in self.successors(owner) {
            if known.insert(child.board.clone()) {
                self.children.push(child);
            }
        }
        self.children.len() - before
    }

    /// Number of nodes in the subtree rooted here, this node included.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(SearchNode::subtree_size).sum::<usize>()
    }
}

/// Expands the tree under `root` for `depth` plies of `owner`'s moves.
///
/// The root's board is added to `known` first. A board already in `known` is never added as a
/// new child, so every board appears at most once in the resulting tree. Returns the number of
/// nodes added.
pub fn explore(
    root: &mut SearchNode,
    owner: Owner,
    depth: u32,
    known: &mut HashSet<Board>,
) -> usize {
    known.insert(root.board.clone());
    explore_level(root, owner, depth, known)
}

fn explore_level(
    node: &mut SearchNode,
    owner: Owner,
    depth: u32,
    known: &mut HashSet<Board>,
) -> usize {
    if depth == 0 {
        return 0;
    }
    let mut added = node.expand_children(owner, known);
    for child in node.children.iter_mut() {
        added += explore_level(child, owner, depth - 1, known);
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Cell, Pile};

    fn white(piles: &[Pile]) -> Board {
        Board::from_piles(piles, &[]).unwrap()
    }

    #[test]
    fn test_expand_single_piece() {
        let board = white(&[Pile(1, 3, 3)]);
        let successors = expand(&board, Owner::White);
        assert_eq!(successors.len(), 5);
        assert_eq!(
            successors.last().unwrap().1,
            Action::Explode { at: (3, 3) }
        );
        assert!(successors.iter().all(|(_, action)| match action {
            Action::Slide { count, from, .. } => *count == 1 && *from == (3, 3),
            Action::Explode { .. } => true,
        }));
    }

    #[test]
    fn test_expand_two_stack_in_centre_and_corner() {
        // 2 counts x 4 displacements x 2 axes, plus the explosion.
        assert_eq!(expand(&white(&[Pile(2, 3, 3)]), Owner::White).len(), 17);
        // Only the two positive displacements fit from the corner.
        assert_eq!(expand(&white(&[Pile(2, 0, 0)]), Owner::White).len(), 9);
    }

    #[test]
    fn test_expand_collapses_identical_boards() {
        // Both explosions wipe the board, so only one is kept.
        let board = white(&[Pile(1, 3, 3), Pile(1, 4, 3)]);
        let successors = expand(&board, Owner::White);
        assert_eq!(successors.len(), 9);
        let explosions: Vec<_> = successors
            .iter()
            .filter(|(_, a)| matches!(a, Action::Explode { .. }))
            .collect();
        assert_eq!(explosions.len(), 1);
        assert_eq!(explosions[0].1, Action::Explode { at: (3, 3) });

        let distinct: HashSet<&Board> = successors.iter().map(|(b, _)| b).collect();
        assert_eq!(distinct.len(), successors.len());
    }

    #[test]
    fn test_expand_skips_blocked_slides() {
        let board = Board::from_piles(&[Pile(1, 3, 3)], &[Pile(1, 4, 3)]).unwrap();
        let successors = expand(&board, Owner::White);
        assert_eq!(successors.len(), 4);
        assert!(!successors.iter().any(|(_, a)| matches!(
            a,
            Action::Slide { to: (4, 3), .. }
        )));
    }

    #[test]
    fn test_expand_only_moves_requested_side() {
        let board = Board::from_piles(&[Pile(1, 0, 0)], &[Pile(1, 7, 7)]).unwrap();
        for (next, _) in expand(&board, Owner::Black) {
            assert_eq!(next.cell_at(0, 0).unwrap(), Cell::Stack(Owner::White, 1));
        }
        assert!(expand(&Board::new_empty(), Owner::White).is_empty());
    }

    #[test]
    fn test_every_successor_replays_from_its_action() {
        for seed in 0..10 {
            let board = Board::new_random_with_seed(seed, 3, 3);
            for (next, action) in expand(&board, Owner::White) {
                assert_ne!(next, board);
                let mut replayed = board.clone();
                action.apply(&mut replayed).unwrap();
                assert_eq!(replayed, next, "seed {} action {}", seed, action);
            }
        }
    }

    #[test]
    fn test_expand_children_respects_known_states() {
        let mut root = SearchNode::root(white(&[Pile(1, 3, 3)]));
        let mut known = HashSet::new();
        assert_eq!(root.expand_children(Owner::White, &mut known), 5);
        assert_eq!(root.expand_children(Owner::White, &mut known), 0);
        assert_eq!(root.children.len(), 5);
        assert!(root.children.iter().all(|c| c.action.is_some()));
    }

    #[test]
    fn test_explore_never_repeats_a_board() {
        let mut root = SearchNode::root(white(&[Pile(1, 3, 3)]));
        let mut known = HashSet::new();
        let added = explore(&mut root, Owner::White, 2, &mut known);

        assert_eq!(root.subtree_size(), added + 1);
        assert_eq!(known.len(), added + 1);
        // Moving back to (3, 3) recreates the root, which is already known.
        assert!(root.children[0]
            .children
            .iter()
            .all(|c| c.board != root.board));
    }

    #[test]
    fn test_explore_depth_zero_adds_nothing() {
        let mut root = SearchNode::root(white(&[Pile(2, 3, 3)]));
        let mut known = HashSet::new();
        assert_eq!(explore(&mut root, Owner::White, 0, &mut known), 0);
        assert!(root.children.is_empty());
        assert_eq!(known.len(), 1);
    }
}

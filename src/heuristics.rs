use crate::action::Action;
use crate::engine::{Board, Owner};
use crate::successors::expand;

/// Scores how far `owner`'s pieces are from the opponent's.
///
/// Sums, over every pair of a friendly stack and an enemy stack, the friendly stack's size times
/// the Manhattan distance between the two squares. Lower means the friendly pieces are bunched
/// up against the enemy. The value is not an admissible distance-to-goal estimate: the solver
/// only uses it as a threshold that a child may not exceed. A board with no friendly or no enemy
/// stacks scores 0.
///
/// # Arguments
/// * `board`: The board to score.
/// * `owner`: The side whose pieces are being measured.
///
/// # Examples
/// ```
/// use expendibots::engine::{Board, Owner, Pile};
/// use expendibots::heuristics::score;
/// let board = Board::from_piles(&[Pile(2, 0, 0)], &[Pile(1, 3, 4), Pile(1, 1, 1)]).unwrap();
/// assert_eq!(score(&board, Owner::White), 2 * 7 + 2 * 2);
/// ```
pub fn score(board: &Board, owner: Owner) -> u32 {
    let friendly = board.owners_and_positions(owner);
    let enemy = board.owners_and_positions(owner.opponent());

    let mut total = 0;
    for &(count, fx, fy) in &friendly {
        for &(_, ex, ey) in &enemy {
            let distance = fx.abs_diff(ex) + fy.abs_diff(ey);
            total += count as u32 * distance as u32;
        }
    }
    total
}

/// Number of enemy pieces removed by going from `before` to `after`.
pub fn enemy_pieces_removed(before: &Board, after: &Board, owner: Owner) -> u32 {
    let enemy = owner.opponent();
    before
        .piece_count(enemy)
        .saturating_sub(after.piece_count(enemy))
}

/// Chooses an action with the Greedy Closing (GC) strategy.
///
/// Every successor is scored with [`score`] and the lowest wins. Ties keep the first successor
/// in enumeration order. A successor that wins outright is always preferred, and one that loses
/// every friendly piece without winning is never chosen.
///
/// # Returns
/// `Some((score_after_action, action))`, or `None` when `owner` has no usable action.
pub fn choose_action_greedy(board: &Board, owner: Owner) -> Option<(u32, Action)> {
    let mut best: Option<(u32, Action)> = None;
    for (next, action) in expand(board, owner) {
        if next.piece_count(owner.opponent()) == 0 {
            return Some((0, action));
        }
        if next.piece_count(owner) == 0 {
            continue;
        }
        let next_score = score(&next, owner);
        if best.map_or(true, |(best_score, _)| next_score < best_score) {
            best = Some((next_score, action));
        }
    }
    best
}

/// Chooses an action with the Boom First (BF) strategy.
///
/// Picks the explosion that removes the most enemy pieces while losing no more friendly pieces
/// than it removes. If no explosion qualifies, falls back to [`choose_action_greedy`].
///
/// # Returns
/// `Some((value, action))`, where `value` is the number of enemy pieces removed for an
/// explosion or the greedy score otherwise. `None` when `owner` has no stacks.
pub fn choose_action_boom_first(board: &Board, owner: Owner) -> Option<(u32, Action)> {
    let mut best: Option<(u32, Action)> = None;
    for (next, action) in expand(board, owner) {
        if !matches!(action, Action::Explode { .. }) {
            continue;
        }
        let removed = enemy_pieces_removed(board, &next, owner);
        let lost = board.piece_count(owner) - next.piece_count(owner);
        if removed == 0 || lost > removed {
            continue;
        }
        if best.map_or(true, |(best_removed, _)| removed > best_removed) {
            best = Some((removed, action));
        }
    }
    best.or_else(|| choose_action_greedy(board, owner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Pile;

    #[test]
    fn test_score_sums_weighted_distances() {
        let board = Board::from_piles(
            &[Pile(2, 0, 0), Pile(1, 7, 7)],
            &[Pile(1, 3, 4), Pile(3, 1, 1)],
        )
        .unwrap();
        // (0,0)x2: 7 and 2; (7,7)x1: 7 and 12.
        assert_eq!(score(&board, Owner::White), 2 * 7 + 2 * 2 + 7 + 12);
        // Enemy counts weight the other direction.
        assert_eq!(score(&board, Owner::Black), 7 + 7 + 3 * 2 + 3 * 12);
    }

    #[test]
    fn test_score_is_zero_without_opponents_or_pieces() {
        let only_white = Board::from_piles(&[Pile(3, 2, 2)], &[]).unwrap();
        assert_eq!(score(&only_white, Owner::White), 0);
        assert_eq!(score(&only_white, Owner::Black), 0);
        assert_eq!(score(&Board::new_empty(), Owner::White), 0);
    }

    #[test]
    fn test_score_drops_when_closing_in() {
        let far = Board::from_piles(&[Pile(1, 0, 3)], &[Pile(1, 5, 3)]).unwrap();
        let near = Board::from_piles(&[Pile(1, 1, 3)], &[Pile(1, 5, 3)]).unwrap();
        assert!(score(&near, Owner::White) < score(&far, Owner::White));
    }

    #[test]
    fn test_enemy_pieces_removed() {
        let before = Board::from_piles(&[Pile(1, 3, 3)], &[Pile(2, 4, 4)]).unwrap();
        let mut after = before.clone();
        after.explode(3, 3).unwrap();
        assert_eq!(enemy_pieces_removed(&before, &after, Owner::White), 2);
    }

    #[test]
    fn test_choose_action_greedy_takes_the_win() {
        let board = Board::from_piles(&[Pile(1, 3, 3)], &[Pile(1, 4, 4)]).unwrap();
        assert_eq!(
            choose_action_greedy(&board, Owner::White),
            Some((0, Action::Explode { at: (3, 3) }))
        );
    }

    #[test]
    fn test_choose_action_greedy_closes_distance() {
        let board = Board::from_piles(&[Pile(1, 0, 0)], &[Pile(1, 6, 0)]).unwrap();
        let (after, action) = choose_action_greedy(&board, Owner::White).unwrap();
        assert_eq!(after, 5);
        assert_eq!(
            action,
            Action::Slide {
                count: 1,
                from: (0, 0),
                to: (1, 0)
            }
        );
        assert_eq!(choose_action_greedy(&Board::new_empty(), Owner::White), None);
    }

    #[test]
    fn test_choose_action_boom_first() {
        // Exploding (3, 3) trades one white piece for three black ones.
        let board = Board::from_piles(
            &[Pile(1, 3, 3), Pile(1, 0, 7)],
            &[Pile(3, 4, 4), Pile(1, 7, 0)],
        )
        .unwrap();
        assert_eq!(
            choose_action_boom_first(&board, Owner::White),
            Some((3, Action::Explode { at: (3, 3) }))
        );

        // Nothing to blow up next to white: falls back to greedy.
        let quiet = Board::from_piles(&[Pile(1, 0, 0)], &[Pile(1, 6, 0)]).unwrap();
        assert_eq!(
            choose_action_boom_first(&quiet, Owner::White),
            choose_action_greedy(&quiet, Owner::White)
        );
    }
}

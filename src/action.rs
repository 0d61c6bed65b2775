//! The two kinds of action a player can take.

use crate::engine::{Axis, Board, Coord};
use crate::error::BoardError;
use std::fmt;

/// A single move: slide part of a stack along a row or column, or blow a stack up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move `count` pieces from `from` to `to`, which share a row or a column.
    Slide { count: u8, from: Coord, to: Coord },
    /// Detonate the stack at `at`.
    Explode { at: Coord },
}

impl Action {
    /// Square the action is played from.
    pub fn origin(&self) -> Coord {
        match self {
            Action::Slide { from, .. } => *from,
            Action::Explode { at } => *at,
        }
    }

    /// Splits a slide into the axis it travels along and its signed length.
    ///
    /// Explosions report `(Axis::Horizontal, 0)`.
    ///
    /// # Errors
    /// `NotOrthogonal` when a slide's endpoints share neither a row nor a column.
    pub fn axis_and_displacement(&self) -> Result<(Axis, i32), BoardError> {
        match *self {
            Action::Explode { .. } => Ok((Axis::Horizontal, 0)),
            Action::Slide { from, to, .. } => {
                let dx = to.0 as i32 - from.0 as i32;
                let dy = to.1 as i32 - from.1 as i32;
                match (dx, dy) {
                    (dx, 0) => Ok((Axis::Horizontal, dx)),
                    (0, dy) => Ok((Axis::Vertical, dy)),
                    _ => Err(BoardError::NotOrthogonal { from, to }),
                }
            }
        }
    }

    /// Applies the action to `board` in place using the raw board primitives.
    ///
    /// No turn or distance rules are checked here; see [`crate::engine::Game::play`].
    ///
    /// # Examples
    /// ```
    /// use expendibots::action::Action;
    /// use expendibots::engine::{Board, Cell, Owner, Pile};
    /// let mut board = Board::from_piles(&[Pile(2, 0, 0)], &[]).unwrap();
    /// Action::Slide { count: 1, from: (0, 0), to: (0, 2) }.apply(&mut board).unwrap();
    /// assert_eq!(board.cell_at(0, 2).unwrap(), Cell::Stack(Owner::White, 1));
    /// ```
    pub fn apply(&self, board: &mut Board) -> Result<(), BoardError> {
        match *self {
            Action::Slide { count, from, .. } => {
                let (axis, displacement) = self.axis_and_displacement()?;
                board.slide(from, count, displacement, axis)
            }
            Action::Explode { at } => board.explode(at.0, at.1).map(|_| ()),
        }
    }
}

impl fmt::Display for Action {
    /// `MOVE <n> from (<x1>, <y1>) to (<x2>, <y2>)` or `BOOM at (<x>, <y>)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Slide { count, from, to } => write!(
                f,
                "MOVE {} from ({}, {}) to ({}, {})",
                count, from.0, from.1, to.0, to.1
            ),
            Action::Explode { at } => write!(f, "BOOM at ({}, {})", at.0, at.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Cell, Owner, Pile};
    use assert_matches::assert_matches;

    #[test]
    fn test_display() {
        let slide = Action::Slide {
            count: 2,
            from: (3, 4),
            to: (3, 6),
        };
        assert_eq!(slide.to_string(), "MOVE 2 from (3, 4) to (3, 6)");
        assert_eq!(Action::Explode { at: (5, 1) }.to_string(), "BOOM at (5, 1)");
    }

    #[test]
    fn test_axis_and_displacement() {
        let left = Action::Slide {
            count: 1,
            from: (4, 2),
            to: (1, 2),
        };
        assert_eq!(left.axis_and_displacement().unwrap(), (Axis::Horizontal, -3));

        let up = Action::Slide {
            count: 1,
            from: (4, 2),
            to: (4, 3),
        };
        assert_eq!(up.axis_and_displacement().unwrap(), (Axis::Vertical, 1));

        let diagonal = Action::Slide {
            count: 1,
            from: (4, 2),
            to: (5, 3),
        };
        assert_matches!(
            diagonal.axis_and_displacement(),
            Err(BoardError::NotOrthogonal { from: (4, 2), to: (5, 3) })
        );
    }

    #[test]
    fn test_apply_explode_and_blocked_slide() {
        let mut board =
            Board::from_piles(&[Pile(1, 1, 1)], &[Pile(1, 1, 2), Pile(1, 5, 5)]).unwrap();
        let blocked = Action::Slide {
            count: 1,
            from: (1, 1),
            to: (1, 2),
        };
        assert_matches!(
            blocked.apply(&mut board),
            Err(BoardError::BlockedByOpponent { .. })
        );

        Action::Explode { at: (1, 1) }.apply(&mut board).unwrap();
        assert_eq!(board.cell_at(1, 2).unwrap(), Cell::Empty);
        assert_eq!(board.cell_at(5, 5).unwrap(), Cell::Stack(Owner::Black, 1));
        assert_eq!(Action::Explode { at: (5, 5) }.origin(), (5, 5));
    }
}

//! Core game engine for Expendibots.
//!
//! This module defines the game's fundamental components:
//! - `Owner` and `Cell`: the two colours and the contents of one square (empty or a stack).
//! - `Board`: the 8x8 grid of stacks with the two mutating primitives, `slide` and `explode`,
//!   plus the piece-enumeration queries used by move generation and the heuristic.
//! - `Game`: an interactive session over a board, enforcing the movement rules for one player
//!   and keeping a history for undo.
use crate::action::Action;
use crate::error::{BoardError, Error, Result};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;

/// A `(x, y)` square on the board, both in `0..BOARD_SIZE`.
pub type Coord = (usize, usize);

/// Offsets of the 8 squares surrounding a cell.
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One of the two players' colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Owner {
    White,
    Black,
}

impl Owner {
    /// Returns the other colour.
    pub fn opponent(self) -> Owner {
        match self {
            Owner::White => Owner::Black,
            Owner::Black => Owner::White,
        }
    }

    /// Single-character tag used in board text: `w` or `b`.
    pub fn to_char(self) -> char {
        match self {
            Owner::White => 'w',
            Owner::Black => 'b',
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::White => write!(f, "white"),
            Owner::Black => write!(f, "black"),
        }
    }
}

/// Contents of a single square.
///
/// A stack always holds at least one piece: use [`Cell::stack`] to build one and a zero count
/// collapses to `Cell::Empty`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Stack(Owner, u8),
}

impl Cell {
    /// Builds a stack, normalising a zero count to `Cell::Empty`.
    pub fn stack(owner: Owner, count: u8) -> Cell {
        if count == 0 {
            Cell::Empty
        } else {
            Cell::Stack(owner, count)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn owner(&self) -> Option<Owner> {
        match self {
            Cell::Empty => None,
            Cell::Stack(owner, _) => Some(*owner),
        }
    }

    /// Number of pieces in the cell, 0 when empty.
    pub fn count(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Stack(_, count) => *count,
        }
    }

    /// Text token for the cell: `.` for empty, otherwise colour tag and count (`w3`, `b1`).
    pub fn token(&self) -> String {
        match self {
            Cell::Empty => ".".to_string(),
            Cell::Stack(owner, count) => format!("{}{}", owner.to_char(), count),
        }
    }
}

/// Axis along which a slide travels. `Horizontal` changes `x`, `Vertical` changes `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A pile in an input position: `Pile(count, x, y)`.
///
/// Fields are signed so that malformed input survives deserialisation and can be rejected
/// with [`Error::InvalidPosition`] by [`Board::from_piles`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile(pub i64, pub i64, pub i64);

/// The 8x8 game board.
///
/// Cells are indexed `grid[x][y]`. Equality and hashing are structural over the whole grid, so
/// two independently built boards with the same contents are interchangeable as set keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Board::new_empty()
    }
}

impl Board {
    /// Creates a board with every cell empty.
    ///
    /// # Examples
    /// ```
    /// use expendibots::engine::{Board, Cell};
    /// let board = Board::new_empty();
    /// assert_eq!(board.cell_at(0, 0).unwrap(), Cell::Empty);
    /// assert_eq!(board.occupied_cells(), 0);
    /// ```
    pub fn new_empty() -> Self {
        Board {
            grid: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The usual opening: twelve single white pieces on the two bottom rows and twelve black
    /// pieces on the two top rows, in columns 0, 1, 3, 4, 6 and 7.
    pub fn standard() -> Self {
        let mut board = Board::new_empty();
        for x in [0, 1, 3, 4, 6, 7] {
            for y in [0, 1] {
                board.grid[x][y] = Cell::Stack(Owner::White, 1);
            }
            for y in [6, 7] {
                board.grid[x][y] = Cell::Stack(Owner::Black, 1);
            }
        }
        board
    }

    /// Creates a reproducible random position.
    ///
    /// `white_stacks` and `black_stacks` stacks of 1 to 3 pieces are dropped on distinct random
    /// squares. The same seed always gives the same board. The total number of stacks is capped
    /// at the number of squares.
    pub fn new_random_with_seed(seed: u64, white_stacks: usize, black_stacks: usize) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut squares: Vec<Coord> = (0..BOARD_SIZE)
            .flat_map(|x| (0..BOARD_SIZE).map(move |y| (x, y)))
            .collect();
        squares.shuffle(&mut rng);

        let owners = std::iter::repeat(Owner::White)
            .take(white_stacks)
            .chain(std::iter::repeat(Owner::Black).take(black_stacks));

        let mut board = Board::new_empty();
        for (owner, (x, y)) in owners.zip(squares) {
            board.grid[x][y] = Cell::Stack(owner, rng.gen_range(1..=3u8));
        }
        board
    }

    /// Builds a board from per-colour pile lists.
    ///
    /// Each pile is `(count, x, y)`. Rejects coordinates outside the board, counts below 1,
    /// two piles on the same square, and more than 255 pieces of one colour, all as
    /// [`Error::InvalidPosition`].
    ///
    /// # Examples
    /// ```
    /// use expendibots::engine::{Board, Cell, Owner, Pile};
    /// let board = Board::from_piles(&[Pile(2, 3, 4)], &[Pile(1, 0, 7)]).unwrap();
    /// assert_eq!(board.cell_at(3, 4).unwrap(), Cell::Stack(Owner::White, 2));
    /// assert!(Board::from_piles(&[Pile(1, 8, 0)], &[]).is_err());
    /// ```
    pub fn from_piles(white: &[Pile], black: &[Pile]) -> Result<Self> {
        let mut board = Board::new_empty();
        for (owner, piles) in [(Owner::White, white), (Owner::Black, black)] {
            let mut total: u32 = 0;
            for &Pile(count, x, y) in piles {
                let in_board = |v: i64| (0..BOARD_SIZE as i64).contains(&v);
                if !in_board(x) || !in_board(y) {
                    return Err(Error::invalid_position(format!(
                        "{} pile at ({}, {}) is outside the board",
                        owner, x, y
                    )));
                }
                if !(1..=u8::MAX as i64).contains(&count) {
                    return Err(Error::invalid_position(format!(
                        "{} pile at ({}, {}) has count {}",
                        owner, x, y, count
                    )));
                }
                let (x, y) = (x as usize, y as usize);
                if let Cell::Stack(other, _) = board.grid[x][y] {
                    return Err(Error::invalid_position(format!(
                        "{} pile at ({}, {}) overlaps a {} pile",
                        owner, x, y, other
                    )));
                }
                total += count as u32;
                if total > u8::MAX as u32 {
                    return Err(Error::invalid_position(format!(
                        "{} has more than {} pieces",
                        owner,
                        u8::MAX
                    )));
                }
                board.grid[x][y] = Cell::Stack(owner, count as u8);
            }
        }
        Ok(board)
    }

    /// Returns the cell at `(x, y)`, or `OutOfRange` if either coordinate is off the board.
    pub fn cell_at(&self, x: usize, y: usize) -> std::result::Result<Cell, BoardError> {
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return Err(BoardError::OutOfRange { x, y });
        }
        Ok(self.grid[x][y])
    }

    /// Owner of the stack at `(x, y)`, `None` for an empty square.
    pub fn owner_at(&self, x: usize, y: usize) -> std::result::Result<Option<Owner>, BoardError> {
        self.cell_at(x, y).map(|cell| cell.owner())
    }

    /// Returns an immutable reference to the underlying grid, indexed `[x][y]`.
    pub fn get_grid(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.grid
    }

    /// Moves `count` pieces from `from` by `displacement` squares along `axis`, in place.
    ///
    /// The destination is `from` shifted along one axis only. An empty source, a zero count or
    /// a zero displacement leave the board untouched and succeed. On success the pieces land on
    /// an empty square or merge into a friendly stack, and a source emptied to zero becomes
    /// `Cell::Empty`. On failure the board is not modified.
    ///
    /// # Errors
    /// - `OutOfRange` if `from` is off the board.
    /// - `InsufficientPieces` if `count` exceeds the source stack.
    /// - `OutOfBounds` if the destination is off the board.
    /// - `BlockedByOpponent` if the destination holds the other colour.
    ///
    /// # Examples
    /// ```
    /// use expendibots::engine::{Axis, Board, Cell, Owner, Pile};
    /// let mut board = Board::from_piles(&[Pile(1, 3, 4)], &[]).unwrap();
    /// board.slide((3, 4), 1, 1, Axis::Horizontal).unwrap();
    /// assert_eq!(board.cell_at(4, 4).unwrap(), Cell::Stack(Owner::White, 1));
    /// assert_eq!(board.cell_at(3, 4).unwrap(), Cell::Empty);
    /// ```
    pub fn slide(
        &mut self,
        from: Coord,
        count: u8,
        displacement: i32,
        axis: Axis,
    ) -> std::result::Result<(), BoardError> {
        let (x, y) = from;
        let (owner, available) = match self.cell_at(x, y)? {
            Cell::Empty => return Ok(()),
            Cell::Stack(owner, available) => (owner, available),
        };
        if displacement == 0 || count == 0 {
            return Ok(());
        }
        if count > available {
            return Err(BoardError::InsufficientPieces {
                requested: count,
                available,
            });
        }

        let (dx, dy) = match axis {
            Axis::Horizontal => (displacement as isize, 0),
            Axis::Vertical => (0, displacement as isize),
        };
        let (tx, ty) = match offset(from, dx, dy) {
            Some(to) => to,
            None => {
                return Err(BoardError::OutOfBounds {
                    x: x as isize + dx,
                    y: y as isize + dy,
                })
            }
        };

        // Piece totals are capped at u8::MAX per colour, so a merge cannot overflow.
        let arriving = match self.grid[tx][ty] {
            Cell::Empty => count,
            Cell::Stack(other, held) if other == owner => held + count,
            Cell::Stack(other, _) => {
                return Err(BoardError::BlockedByOpponent {
                    x: tx,
                    y: ty,
                    owner: other,
                })
            }
        };

        self.grid[tx][ty] = Cell::Stack(owner, arriving);
        self.grid[x][y] = Cell::stack(owner, available - count);
        Ok(())
    }

    /// Detonates the square at `(x, y)`, in place.
    ///
    /// The square is cleared whether or not it held a stack, then every occupied square in its
    /// 8-neighbourhood is detonated in turn, regardless of colour, until the chain dies out.
    /// Runs as a worklist flood fill, so stack depth does not grow with the chain.
    ///
    /// Returns the number of stacks destroyed.
    ///
    /// # Examples
    /// ```
    /// use expendibots::engine::{Board, Pile};
    /// let white = [Pile(1, 3, 1)];
    /// let black = [Pile(1, 4, 1), Pile(1, 6, 1)];
    /// let mut board = Board::from_piles(&white, &black).unwrap();
    /// assert_eq!(board.explode(3, 1).unwrap(), 2);
    /// assert_eq!(board.occupied_cells(), 1);
    /// ```
    pub fn explode(&mut self, x: usize, y: usize) -> std::result::Result<usize, BoardError> {
        let start = self.cell_at(x, y)?;
        let mut destroyed = usize::from(!start.is_empty());
        self.grid[x][y] = Cell::Empty;

        let mut pending: Vec<Coord> = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        self.push_occupied_neighbours((x, y), &mut pending);

        while let Some((cx, cy)) = pending.pop() {
            // Already cleared by another branch of the chain.
            if self.grid[cx][cy].is_empty() {
                continue;
            }
            self.grid[cx][cy] = Cell::Empty;
            destroyed += 1;
            self.push_occupied_neighbours((cx, cy), &mut pending);
        }
        Ok(destroyed)
    }

    fn push_occupied_neighbours(&self, at: Coord, pending: &mut Vec<Coord>) {
        for (nx, ny) in neighbours(at) {
            if !self.grid[nx][ny].is_empty() {
                pending.push((nx, ny));
            }
        }
    }

    /// Every stack belonging to `owner` as `(count, x, y)`, scanning `x` then `y`.
    ///
    /// # Examples
    /// ```
    /// use expendibots::engine::{Board, Owner, Pile};
    /// let board = Board::from_piles(&[Pile(1, 5, 3), Pile(2, 3, 4)], &[Pile(1, 0, 0)]).unwrap();
    /// assert_eq!(board.owners_and_positions(Owner::White), vec![(2, 3, 4), (1, 5, 3)]);
    /// ```
    pub fn owners_and_positions(&self, owner: Owner) -> Vec<(u8, usize, usize)> {
        let mut stacks = Vec::new();
        for x in 0..BOARD_SIZE {
            for y in 0..BOARD_SIZE {
                if let Cell::Stack(o, count) = self.grid[x][y] {
                    if o == owner {
                        stacks.push((count, x, y));
                    }
                }
            }
        }
        stacks
    }

    /// Total number of pieces `owner` has on the board.
    pub fn piece_count(&self, owner: Owner) -> u32 {
        self.grid
            .iter()
            .flatten()
            .filter(|cell| cell.owner() == Some(owner))
            .map(|cell| cell.count() as u32)
            .sum()
    }

    /// Number of squares holding a stack of `owner`.
    pub fn stack_count(&self, owner: Owner) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|cell| cell.owner() == Some(owner))
            .count()
    }

    /// Number of non-empty squares, both colours.
    pub fn occupied_cells(&self) -> usize {
        self.grid.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }

    /// Renders the board as text with an optional highlighted square.
    ///
    /// Column numbers run along the top, `y = 7` is the first row printed. Stacks show as
    /// `w3`/`b1`, empty squares as `.`, and the highlighted square is wrapped in brackets.
    pub fn to_string_with_highlight(&self, pos: Option<Coord>) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for x in 0..BOARD_SIZE {
            output.push_str(&format!(" {:^2} ", x));
        }
        output.push('\n');

        for y in (0..BOARD_SIZE).rev() {
            output.push_str(&format!("{} ", y));
            for x in 0..BOARD_SIZE {
                let token = self.grid[x][y].token();
                if pos == Some((x, y)) {
                    output.push_str(&format!("[{:^2}]", token));
                } else {
                    output.push_str(&format!(" {:^2} ", token));
                }
            }
            if y > 0 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}

/// `at` shifted by `(dx, dy)`, or `None` if that leaves the board.
pub(crate) fn offset(at: Coord, dx: isize, dy: isize) -> Option<Coord> {
    let nx = at.0 as isize + dx;
    let ny = at.1 as isize + dy;
    let range = 0..BOARD_SIZE as isize;
    if range.contains(&nx) && range.contains(&ny) {
        Some((nx as usize, ny as usize))
    } else {
        None
    }
}

/// In-bounds squares of the 8-neighbourhood around `at`.
pub fn neighbours(at: Coord) -> impl Iterator<Item = Coord> {
    NEIGHBOUR_OFFSETS
        .iter()
        .filter_map(move |&(dx, dy)| offset(at, dx, dy))
}

/// An interactive game session over a [`Board`].
///
/// Unlike the raw board primitives, `play` enforces the movement rules for the acting player:
/// only their own stacks may act, and a stack of `n` pieces slides at most `n` squares.
/// Each accepted action is pushed onto a history so it can be undone.
///
/// # Examples
/// ```
/// use expendibots::action::Action;
/// use expendibots::engine::{Board, Game, Owner, Pile};
/// let board = Board::from_piles(&[Pile(1, 3, 3)], &[Pile(1, 4, 4)]).unwrap();
/// let mut game = Game::new_with_board(board);
/// game.play(Owner::White, Action::Explode { at: (3, 3) }).unwrap();
/// assert!(game.is_won_by(Owner::White));
/// assert!(game.undo_last_action());
/// assert_eq!(game.steps(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    steps: u32,
    history: Vec<(Board, Option<Action>)>,
}

impl Game {
    /// Starts a session from the standard opening.
    pub fn new() -> Self {
        Game::new_with_board(Board::standard())
    }

    /// Starts a session from `initial_board`.
    pub fn new_with_board(initial_board: Board) -> Self {
        Game {
            board: initial_board.clone(),
            steps: 0,
            history: vec![(initial_board, None)],
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of actions played so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Actions played so far, oldest first.
    pub fn actions(&self) -> Vec<Action> {
        self.history.iter().filter_map(|(_, action)| *action).collect()
    }

    /// Plays `action` for `owner` after checking it against the movement rules.
    ///
    /// # Errors
    /// `Error::IllegalAction` when the acting square is not one of `owner`'s stacks, the slide
    /// is longer than the stack is tall, or the slide does not move. Board-level failures
    /// (`BlockedByOpponent`, `InsufficientPieces`, ...) surface as `Error::Board`. The game is
    /// unchanged on error.
    pub fn play(&mut self, owner: Owner, action: Action) -> Result<()> {
        let acting = action.origin();
        let cell = self.board.cell_at(acting.0, acting.1)?;
        let stack_size = match cell {
            Cell::Stack(o, n) if o == owner => n,
            _ => {
                return Err(Error::illegal_action(format!(
                    "no {} stack at ({}, {})",
                    owner, acting.0, acting.1
                )))
            }
        };

        if let Action::Slide { count, from, to } = action {
            let (_, displacement) = action.axis_and_displacement()?;
            if displacement == 0 {
                return Err(Error::illegal_action("a slide must leave its square"));
            }
            if displacement.unsigned_abs() > stack_size as u32 {
                return Err(Error::illegal_action(format!(
                    "a stack of {} cannot travel {} squares",
                    stack_size,
                    displacement.unsigned_abs()
                )));
            }
            if count == 0 {
                return Err(Error::illegal_action(format!(
                    "slide from {:?} to {:?} moves no pieces",
                    from, to
                )));
            }
        }

        let mut next = self.board.clone();
        action.apply(&mut next)?;
        self.board = next;
        self.steps += 1;
        self.history.push((self.board.clone(), Some(action)));
        Ok(())
    }

    /// Reverts the last action. Returns `false` when nothing has been played.
    pub fn undo_last_action(&mut self) -> bool {
        if self.history.len() < 2 {
            return false;
        }
        self.history.pop();
        match self.history.last() {
            Some((previous, _)) => {
                self.board = previous.clone();
                self.steps -= 1;
                true
            }
            None => false,
        }
    }

    /// `owner` has removed every opposing piece.
    pub fn is_won_by(&self, owner: Owner) -> bool {
        self.board.piece_count(owner.opponent()) == 0
    }

    /// At least one side has no pieces left.
    pub fn is_over(&self) -> bool {
        self.is_won_by(Owner::White) || self.is_won_by(Owner::Black)
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

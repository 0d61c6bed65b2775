use crate::engine::{Board, Owner, Pile, BOARD_SIZE};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A position as described in an input file: the piles of each colour as `[count, x, y]`.
///
/// ```json
/// {"white": [[1, 5, 3], [1, 3, 4]], "black": [[2, 4, 6], [1, 3, 1], [1, 5, 1]]}
/// ```
///
/// A missing colour is read as having no piles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSpec {
    #[serde(default)]
    pub white: Vec<Pile>,
    #[serde(default)]
    pub black: Vec<Pile>,
}

impl PositionSpec {
    /// Builds the board, validating every pile.
    pub fn to_board(&self) -> Result<Board> {
        Board::from_piles(&self.white, &self.black)
    }

    /// Describes `board` as pile lists, scanning `x` then `y`.
    pub fn from_board(board: &Board) -> Self {
        let piles = |owner: Owner| -> Vec<Pile> {
            board
                .owners_and_positions(owner)
                .into_iter()
                .map(|(count, x, y)| Pile(count as i64, x as i64, y as i64))
                .collect()
        };
        PositionSpec {
            white: piles(Owner::White),
            black: piles(Owner::Black),
        }
    }
}

/// Parses a JSON position and builds the board.
///
/// # Errors
/// `Error::Json` for malformed JSON and `Error::InvalidPosition` for piles off the board, with
/// a count below 1, or sharing a square.
///
/// # Examples
/// ```
/// use expendibots::engine::{Cell, Owner};
/// use expendibots::utils::position_from_json;
/// let board = position_from_json(r#"{"white": [[1,5,3]], "black": [[2,4,6]]}"#).unwrap();
/// assert_eq!(board.cell_at(4, 6).unwrap(), Cell::Stack(Owner::Black, 2));
/// assert!(position_from_json(r#"{"white": [[1,9,3]]}"#).is_err());
/// ```
pub fn position_from_json(json: &str) -> Result<Board> {
    let spec: PositionSpec = serde_json::from_str(json)?;
    spec.to_board()
}

/// Reads and parses a JSON position file.
pub fn load_position_file(path: &Path) -> Result<Board> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        operation: format!("read position file {}", path.display()),
        source,
    })?;
    position_from_json(&content)
}

/// Parses an array of row strings into a `Board`.
///
/// Row `i` of the input is `y = i` on the board. Each row holds up to `BOARD_SIZE`
/// whitespace-separated tokens, one per column starting at `x = 0`:
/// - `.`: empty square
/// - `wN` / `bN`: a white or black stack of `N` pieces (`W`/`B` also accepted)
///
/// Missing rows and short rows are filled with empty squares.
///
/// # Returns
/// * `Ok(Board)` if parsing succeeds.
/// * `Err(String)` if there are too many rows or tokens, a token is not recognised, or the
///   resulting piles are not a valid position.
///
/// # Examples
/// ```
/// use expendibots::engine::{Cell, Owner};
/// use expendibots::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["w1 . b2", ". w3"]).unwrap();
/// assert_eq!(board.cell_at(0, 0).unwrap(), Cell::Stack(Owner::White, 1));
/// assert_eq!(board.cell_at(2, 0).unwrap(), Cell::Stack(Owner::Black, 2));
/// assert_eq!(board.cell_at(1, 1).unwrap(), Cell::Stack(Owner::White, 3));
/// assert_eq!(board.cell_at(0, 1).unwrap(), Cell::Empty);
///
/// assert!(board_from_str_array(&["x1"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> std::result::Result<Board, String> {
    if s.len() > BOARD_SIZE {
        return Err(format!(
            "Invalid number of rows. Expected at most {}, found {}",
            BOARD_SIZE,
            s.len()
        ));
    }

    let mut spec = PositionSpec::default();
    for (y, row_str) in s.iter().enumerate() {
        let tokens: Vec<&str> = row_str.split_whitespace().collect();
        if tokens.len() > BOARD_SIZE {
            return Err(format!(
                "Row {} is too long. Expected at most {} tokens, found {}",
                y,
                BOARD_SIZE,
                tokens.len()
            ));
        }

        for (x, token) in tokens.into_iter().enumerate() {
            if token == "." {
                continue;
            }
            let mut chars = token.chars();
            let piles = match chars.next() {
                Some('w') | Some('W') => &mut spec.white,
                Some('b') | Some('B') => &mut spec.black,
                _ => {
                    return Err(format!(
                        "Unrecognized token '{}' in row {} col {}",
                        token, y, x
                    ))
                }
            };
            let count: i64 = chars.as_str().parse().map_err(|_| {
                format!("Unrecognized token '{}' in row {} col {}", token, y, x)
            })?;
            piles.push(Pile(count, x as i64, y as i64));
        }
    }

    spec.to_board().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Cell;
    use assert_matches::assert_matches;
    use std::io::Write;

    const REFERENCE_JSON: &str =
        r#"{"white": [[1,5,3],[1,3,4]], "black": [[2,4,6],[1,3,1],[1,5,1]]}"#;

    #[test]
    fn test_position_from_json_reference() {
        let board = position_from_json(REFERENCE_JSON).unwrap();
        assert_eq!(board.occupied_cells(), 5);
        assert_eq!(board.cell_at(5, 3).unwrap(), Cell::Stack(Owner::White, 1));
        assert_eq!(board.cell_at(3, 4).unwrap(), Cell::Stack(Owner::White, 1));
        assert_eq!(board.cell_at(4, 6).unwrap(), Cell::Stack(Owner::Black, 2));
        assert_eq!(board.cell_at(3, 1).unwrap(), Cell::Stack(Owner::Black, 1));
        assert_eq!(board.cell_at(5, 1).unwrap(), Cell::Stack(Owner::Black, 1));
    }

    #[test]
    fn test_position_from_json_missing_colour() {
        let board = position_from_json(r#"{"black": [[3,0,0]]}"#).unwrap();
        assert_eq!(board.piece_count(Owner::White), 0);
        assert_eq!(board.piece_count(Owner::Black), 3);
    }

    #[test]
    fn test_position_from_json_errors() {
        assert_matches!(position_from_json("{not json"), Err(Error::Json(_)));
        assert_matches!(
            position_from_json(r#"{"white": [[1,2]]}"#),
            Err(Error::Json(_))
        );
        assert_matches!(
            position_from_json(r#"{"white": [[1,2,3]], "black": [[1,2,3]]}"#),
            Err(Error::InvalidPosition { .. })
        );
        assert_matches!(
            position_from_json(r#"{"white": [[1,-1,3]]}"#),
            Err(Error::InvalidPosition { .. })
        );
    }

    #[test]
    fn test_position_spec_round_trip_through_board() {
        let board = position_from_json(REFERENCE_JSON).unwrap();
        let spec = PositionSpec::from_board(&board);
        assert_eq!(spec.white, vec![Pile(1, 3, 4), Pile(1, 5, 3)]);
        assert_eq!(spec.to_board().unwrap(), board);
    }

    #[test]
    fn test_load_position_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", REFERENCE_JSON).unwrap();
        let board = load_position_file(file.path()).unwrap();
        assert_eq!(board.occupied_cells(), 5);

        let missing = file.path().with_extension("missing");
        assert_matches!(load_position_file(&missing), Err(Error::Io { .. }));
    }

    #[test]
    fn test_board_from_str_array_valid() {
        let board = board_from_str_array(&[
            "w1 . . . . . . b12",
            ".",
            ". . B3",
        ])
        .unwrap();
        assert_eq!(board.cell_at(0, 0).unwrap(), Cell::Stack(Owner::White, 1));
        assert_eq!(board.cell_at(7, 0).unwrap(), Cell::Stack(Owner::Black, 12));
        assert_eq!(board.cell_at(2, 2).unwrap(), Cell::Stack(Owner::Black, 3));
        assert_eq!(board.occupied_cells(), 3);
    }

    #[test]
    fn test_board_from_str_array_invalid_token() {
        let result = board_from_str_array(&["w1 x2"]);
        assert!(result.unwrap_err().contains("Unrecognized token 'x2'"));
        let result = board_from_str_array(&["wz"]);
        assert!(result.unwrap_err().contains("Unrecognized token 'wz'"));
        let result = board_from_str_array(&["w0"]);
        assert!(result.unwrap_err().contains("invalid position"));
    }

    #[test]
    fn test_board_from_str_array_row_too_long() {
        let result = board_from_str_array(&[". . . . . . . . w1"]);
        assert!(result.unwrap_err().contains("Row 0 is too long"));
    }

    #[test]
    fn test_board_from_str_array_too_many_rows() {
        let rows = vec!["."; BOARD_SIZE + 1];
        let result = board_from_str_array(&rows);
        assert!(result.unwrap_err().contains("Invalid number of rows"));
    }

    #[test]
    fn test_board_from_str_array_empty_input() {
        let board = board_from_str_array(&[]).unwrap();
        assert_eq!(board, Board::new_empty());
    }
}

//! # Expendibots Solver Library
//!
//! This library provides the game rules for Expendibots, a two-player game of stacked pieces on
//! an 8x8 board, and an iterative-deepening search that finds a sequence of one side's actions
//! removing every opposing piece while the opponent stays put.
//!
//! It is used by three binaries:
//! - `ai_solver`: Loads a JSON position and prints the actions that clear the opposing side.
//! - `human_player`: Plays white interactively against a stationary black side.
//! - `heuristic_evaluator`: Compares the solver against the greedy move choosers on random boards.
//!
//! ## Modules
//! - `engine`: The board (`Board`), its cells (`Cell`, `Owner`), the slide and explode
//!   primitives, and game state with undo (`Game`).
//! - `action`: The `Action` type and its textual form.
//! - `successors`: One-action successor generation and the search-tree node.
//! - `heuristics`: The distance score guiding the search and one-step move choosers.
//! - `solver`: `solve_iddfs`, the iterative-deepening search.
//! - `utils`: Position loading from JSON and a compact text form for tests.
//! - `error`: Error types shared by the modules above.
//! - `logging`: Logger setup for the binaries.

pub mod action;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod logging;
pub mod solver;
pub mod successors;
pub mod utils;

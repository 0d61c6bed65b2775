use clap::{Parser, ValueEnum};
use expendibots::engine::Owner;
use expendibots::logging::setup_logging;
use expendibots::solver::{solve_iddfs, SearchConfig, DEFAULT_MAX_DEPTH};
use expendibots::utils::load_position_file;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Owner {
    fn from(side: Side) -> Owner {
        match side {
            Side::White => Owner::White,
            Side::Black => Owner::Black,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON position file ({"white": [[n, x, y], ...], "black": [...]})
    position_file: PathBuf,

    /// Largest depth limit tried before giving up
    #[clap(short = 'd', long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Skip boards already known to fail at the same remaining depth
    #[clap(long)]
    transposition_cache: bool,

    /// Side to move
    #[clap(short, long, value_enum, default_value_t = Side::White)]
    side: Side,

    /// Log level or flexi_logger spec, overridden by RUST_LOG
    #[clap(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _logger = match setup_logging(&args.log_level) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Failed to start logger: {}", e);
            None
        }
    };

    let board = match load_position_file(&args.position_file) {
        Ok(board) => board,
        Err(e) => {
            error!("{}", e);
            eprintln!("Failed to load {}: {}", args.position_file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let owner = Owner::from(args.side);
    let config = SearchConfig {
        max_depth: args.max_depth,
        transposition_cache: args.transposition_cache,
        ..SearchConfig::default()
    };

    println!("Loaded position from {}\n", args.position_file.display());
    println!("Initial board state:\n{}\n", board);
    println!(
        "Searching for {} with depth limit {}...\n",
        owner, config.max_depth
    );

    match solve_iddfs(&board, owner, &config) {
        Some(solution) => {
            for action in &solution.actions {
                println!("{}", action);
            }
            let stats = solution.stats;
            println!(
                "\n{} actions (depth {}, {} iterations, {} nodes visited, {} expanded)",
                solution.actions.len(),
                solution.depth,
                stats.iterations,
                stats.nodes_visited,
                stats.nodes_expanded
            );
            ExitCode::SUCCESS
        }
        None => {
            println!("No solution found.");
            ExitCode::FAILURE
        }
    }
}

use clap::Parser;
use expendibots::action::Action;
use expendibots::engine::{Board, Game, Owner};
use expendibots::heuristics::{choose_action_boom_first, choose_action_greedy};
use expendibots::logging::setup_logging;
use expendibots::solver::{solve_iddfs, SearchConfig};
use log::{debug, warn};
use std::time::Instant;

type StrategyFn = fn(&Board, Owner) -> Option<(u32, Action)>;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Compare the solver with one-step strategies on random boards",
    long_about = None
)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(short = 'n', long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; board i uses start_seed + i
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// White stacks per board
    #[clap(long, default_value_t = 2)]
    white_stacks: usize,

    /// Black stacks per board
    #[clap(long, default_value_t = 2)]
    black_stacks: usize,

    /// Depth limit for the solver
    #[clap(short = 'd', long, default_value_t = 8)]
    max_depth: u32,

    /// Let the solver skip boards already known to fail
    #[clap(long)]
    transposition_cache: bool,

    /// Actions a one-step strategy may play before it counts as a failure
    #[clap(long, default_value_t = 40)]
    max_steps: u32,

    /// Log level or flexi_logger spec, overridden by RUST_LOG
    #[clap(long, default_value = "warn")]
    log_level: String,
}

#[derive(Default)]
struct Tally {
    solved: usize,
    total_actions: u64,
}

impl Tally {
    fn record(&mut self, actions: Option<u32>) {
        if let Some(n) = actions {
            self.solved += 1;
            self.total_actions += n as u64;
        }
    }

    fn report(&self, name: &str, boards: usize) {
        let rate = if boards == 0 {
            0.0
        } else {
            100.0 * self.solved as f64 / boards as f64
        };
        let avg = if self.solved == 0 {
            0.0
        } else {
            self.total_actions as f64 / self.solved as f64
        };
        println!(
            "Strategy {:<12}: solved {:>3}/{:<3} ({:>5.1}%), average actions {:.2}",
            name, self.solved, boards, rate, avg
        );
    }
}

/// Plays `strategy` for white until black is gone. Returns the number of actions on success.
fn play_out(board: &Board, strategy: StrategyFn, max_steps: u32) -> Option<u32> {
    let owner = Owner::White;
    let mut game = Game::new_with_board(board.clone());
    while !game.is_over() && game.steps() < max_steps {
        let (_, action) = strategy(game.board(), owner)?;
        if let Err(e) = game.play(owner, action) {
            warn!("strategy chose an unplayable action {}: {}", action, e);
            return None;
        }
    }
    game.is_won_by(owner).then(|| game.steps())
}

fn main() {
    let args = Args::parse();
    let _logger = setup_logging(&args.log_level).ok();

    let strategies: Vec<(&str, StrategyFn)> = vec![
        ("GC", choose_action_greedy),
        ("BF", choose_action_boom_first),
    ];
    let config = SearchConfig {
        max_depth: args.max_depth,
        transposition_cache: args.transposition_cache,
        ..SearchConfig::default()
    };

    let mut solver_tally = Tally::default();
    let mut strategy_tallies: Vec<Tally> = strategies.iter().map(|_| Tally::default()).collect();

    println!("Starting heuristic evaluation for {} boards...", args.boards);

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx as u64;
        let board = Board::new_random_with_seed(seed, args.white_stacks, args.black_stacks);
        println!("\nEvaluating Board {} (Seed: {})", board_idx, seed);
        debug!("board {}:\n{}", board_idx, board);

        let started = Instant::now();
        let solution = solve_iddfs(&board, Owner::White, &config);
        let solver_actions = solution.as_ref().map(|s| s.actions.len() as u32);
        println!(
            "  Strategy: {:<12}, Actions: {:<8}, Time: {:.2?}",
            "IDDFS",
            solver_actions.map_or("-".to_string(), |n| n.to_string()),
            started.elapsed()
        );
        solver_tally.record(solver_actions);

        for ((name, strategy), tally) in strategies.iter().zip(strategy_tallies.iter_mut()) {
            let actions = play_out(&board, *strategy, args.max_steps);
            println!(
                "  Strategy: {:<12}, Actions: {}",
                name,
                actions.map_or("-".to_string(), |n| n.to_string())
            );
            tally.record(actions);
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!("\n--- Success Rates ---");
    solver_tally.report("IDDFS", args.boards);
    for ((name, _), tally) in strategies.iter().zip(&strategy_tallies) {
        tally.report(name, args.boards);
    }
}

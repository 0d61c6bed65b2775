use clap::Parser;
use expendibots::action::Action;
use expendibots::engine::{Game, Owner};
use expendibots::logging::setup_logging;
use expendibots::solver::{solve_iddfs, SearchConfig};
use expendibots::utils::load_position_file;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Depth limit for hints, kept low so the prompt stays responsive.
const HINT_MAX_DEPTH: u32 = 6;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Play white against a black side that never moves",
    long_about = None
)]
struct Args {
    /// Optional JSON position file; the standard opening is used otherwise
    position_file: Option<PathBuf>,

    /// Log level or flexi_logger spec, overridden by RUST_LOG
    #[clap(long, default_value = "warn")]
    log_level: String,
}

fn parse_numbers(parts: &[&str]) -> Option<Vec<usize>> {
    parts.iter().map(|p| p.parse::<usize>().ok()).collect()
}

/// Parses `move n x1 y1 x2 y2` or `boom x y`.
fn parse_action(input: &str) -> Result<Action, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    match parts.split_first() {
        Some((&"move", rest)) if rest.len() == 5 => {
            let n = parse_numbers(rest).ok_or("Invalid input: 'move' takes five numbers.")?;
            let count = u8::try_from(n[0]).map_err(|_| format!("Cannot move {} pieces.", n[0]))?;
            Ok(Action::Slide {
                count,
                from: (n[1], n[2]),
                to: (n[3], n[4]),
            })
        }
        Some((&"boom", rest)) if rest.len() == 2 => {
            let n = parse_numbers(rest).ok_or("Invalid input: 'boom' takes two numbers.")?;
            Ok(Action::Explode { at: (n[0], n[1]) })
        }
        _ => Err(
            "Invalid input format. Use 'move n x1 y1 x2 y2', 'boom x y', 'h', 'u', or 'q'."
                .to_string(),
        ),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _logger = setup_logging(&args.log_level).ok();

    let mut game = match &args.position_file {
        Some(path) => match load_position_file(path) {
            Ok(board) => Game::new_with_board(board),
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Game::new(),
    };
    let owner = Owner::White;
    println!("Welcome to Expendibots! You play {}.", owner);

    loop {
        println!("---------------------");
        println!(
            "Steps: {}, {} pieces: {}, {} pieces: {}",
            game.steps(),
            owner,
            game.board().piece_count(owner),
            owner.opponent(),
            game.board().piece_count(owner.opponent())
        );
        println!("{}", game.board());

        if game.is_over() {
            println!();
            println!("---------------------");
            if game.is_won_by(owner) {
                println!("You cleared the board in {} steps!", game.steps());
            } else {
                println!("No {} pieces left. Game over.", owner);
            }
            println!("---------------------");
            break;
        }

        print!(
            "Enter an action ('move n x1 y1 x2 y2' or 'boom x y'), \
             'h' for a hint, 'u' to undo, 'q' to quit: "
        );
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => {
                if game.undo_last_action() {
                    println!("Action undone.");
                } else {
                    println!("Cannot undo further (no actions played).");
                }
            }
            "h" => {
                let config = SearchConfig {
                    max_depth: HINT_MAX_DEPTH,
                    ..SearchConfig::default()
                };
                match solve_iddfs(game.board(), owner, &config) {
                    Some(solution) => match solution.actions.first() {
                        Some(action) => println!(
                            "Hint: {} ({} actions to clear the board)",
                            action,
                            solution.actions.len()
                        ),
                        None => println!("Hint: the board is already clear."),
                    },
                    None => println!("No hint within {} actions.", HINT_MAX_DEPTH),
                }
            }
            other => match parse_action(other) {
                Ok(action) => match game.play(owner, action) {
                    Ok(()) => println!("Played {}.", action),
                    Err(e) => println!("Invalid action: {}", e),
                },
                Err(message) => println!("{}", message),
            },
        }
    }
    ExitCode::SUCCESS
}

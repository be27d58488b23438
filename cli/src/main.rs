use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use zapador_core::{Coord, GameError, Outcome, Session, format_elapsed};

mod render;

#[derive(Parser, Debug)]
#[command(name = "zapador", about = "Terminal minesweeper", version)]
struct Args {
    /// Difficulty preset: easy, medium or hard
    #[arg(short, long, default_value = "easy")]
    difficulty: String,
}

fn print_help() {
    println!("Commands:");
    println!("  ROW COL     - reveal, or flag while flag mode is on (1-based)");
    println!("  r ROW COL   - reveal cell");
    println!("  f ROW COL   - toggle flag");
    println!("  m           - toggle flag mode");
    println!("  n           - new game");
    println!("  d NAME      - switch difficulty (easy, medium, hard)");
    println!("  s           - show game stats");
    println!("  q           - quit");
    println!("  h           - show this help");
}

fn parse_coords(row: &str, col: &str) -> Option<(Coord, Coord)> {
    let row: Coord = row.parse().ok()?;
    let col: Coord = col.parse().ok()?;
    // shown 1-based, stored 0-based
    Some((row.checked_sub(1)?, col.checked_sub(1)?))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut session = Session::new(&args.difficulty)
        .with_context(|| format!("cannot start on difficulty {:?}", args.difficulty))?;
    log::debug!(
        "session opened on {} ({:?})",
        args.difficulty,
        session.difficulty()
    );

    println!("zapador - type 'h' for help");
    let mut input = String::new();
    let mut announced = false;

    loop {
        println!();
        print!("{}", render::board_to_string(session.game()));
        println!("{}", render::status_line(&session));

        if let Some(completion) = session.completion() {
            if !announced {
                println!(
                    "{} (in {})",
                    completion.message,
                    format_elapsed(completion.elapsed_secs)
                );
                println!("Type 'n' for a new game.");
                announced = true;
            }
        }

        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let result = match parts.as_slice() {
            ["q" | "quit" | "exit"] => break,
            ["h" | "help"] => {
                print_help();
                continue;
            }
            ["m"] => {
                let on = session.toggle_flag_mode();
                println!("flag mode {}", if on { "on" } else { "off" });
                continue;
            }
            ["n" | "new"] => {
                session.new_game();
                announced = false;
                continue;
            }
            ["d", name] => match session.set_difficulty(name) {
                Ok(()) => {
                    announced = false;
                    continue;
                }
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            },
            ["s" | "stats"] => {
                let stats = session.stats();
                println!(
                    "{} {} ({:?}): {} revealed, {} flagged, {} mines, {}",
                    stats.difficulty,
                    stats.board_size,
                    stats.status,
                    stats.revealed_cells,
                    stats.flagged_cells,
                    stats.total_mines,
                    format_elapsed(stats.elapsed_secs),
                );
                continue;
            }
            ["r", row, col] => match parse_coords(row, col) {
                Some(coords) => session.reveal(coords),
                None => {
                    println!("Use 1-based coordinates");
                    continue;
                }
            },
            ["f", row, col] => match parse_coords(row, col) {
                Some(coords) => session.toggle_flag(coords),
                None => {
                    println!("Use 1-based coordinates");
                    continue;
                }
            },
            [row, col] => match parse_coords(row, col) {
                Some(coords) => session.interact(coords),
                None => {
                    println!("Unknown command {:?}. Type 'h' for help.", line);
                    continue;
                }
            },
            _ => {
                println!("Unknown command {:?}. Type 'h' for help.", line);
                continue;
            }
        };

        match result {
            Ok(update) => {
                if update.outcome == Outcome::NoChange {
                    println!("No change.");
                }
            }
            Err(GameError::InvalidCoords) => println!("Out of bounds."),
            Err(err) => println!("{}", err),
        }
    }

    Ok(())
}

//! Threadboard CLI
//!
//! Usage:
//!   threadboard layout <BOARD> --focus <NODE>
//!   threadboard simulate <BOARD> [--frames N]
//!
//! Board files are TOML (`[[nodes]]` / `[[connectors]]` tables); results are
//! printed as JSON on stdout.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use threadboard::board::{Board, NodeBoxes};
use threadboard::layout::layout;
use threadboard::physics::StringPhysics;

#[derive(Parser)]
#[command(name = "threadboard")]
#[command(about = "String physics and cluster layout for investigation boards")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rearrange the board around a focal node and print the new positions
    Layout {
        /// Board file (TOML)
        board: PathBuf,

        /// Node id to center the layout on
        #[arg(short, long)]
        focus: String,
    },

    /// Run the string simulation and print the resulting polylines
    Simulate {
        /// Board file (TOML)
        board: PathBuf,

        /// Number of frames to advance
        #[arg(short = 'n', long, default_value_t = 120)]
        frames: u32,
    },
}

#[derive(Serialize)]
struct LayoutReport {
    positions: BTreeMap<String, [f64; 2]>,
    degraded_nodes: u32,
    satellite_fallbacks: u32,
}

#[derive(Serialize)]
struct StrandReport {
    id: String,
    points: Vec<[f64; 2]>,
    stress: f64,
    awake: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Layout { board, focus } => {
            let board = load_board(&board);
            if board.node(&focus).is_none() {
                eprintln!("Error: focal node '{focus}' is not on the board");
                process::exit(1);
            }

            let outcome = layout(&board.nodes, &board.connectors, &focus);
            if !outcome.is_clean() {
                eprintln!(
                    "Warning: {} degraded placement(s), {} satellite fallback(s)",
                    outcome.degraded_nodes, outcome.satellite_fallbacks
                );
            }

            let report = LayoutReport {
                positions: outcome
                    .positions
                    .iter()
                    .map(|(id, p)| (id.clone(), [p.x, p.y]))
                    .collect(),
                degraded_nodes: outcome.degraded_nodes,
                satellite_fallbacks: outcome.satellite_fallbacks,
            };
            print_json(&report);
        }

        Command::Simulate { board, frames } => {
            let board = load_board(&board);
            let boxes = NodeBoxes::from_nodes(&board.nodes);

            let mut physics = StringPhysics::new();
            for conn in &board.connectors {
                physics.register(conn, &boxes);
            }
            for _ in 0..frames {
                physics.step(&boxes);
            }

            let strands: Vec<StrandReport> = board
                .connectors
                .iter()
                .filter_map(|conn| {
                    physics.polyline(&conn.id).map(|view| StrandReport {
                        id: conn.id.clone(),
                        points: view.points.iter().map(|p| [p.x, p.y]).collect(),
                        stress: view.stress,
                        awake: physics.is_awake(&conn.id),
                    })
                })
                .collect();
            print_json(&strands);
        }
    }
}

fn load_board(path: &PathBuf) -> Board {
    match Board::from_file(path) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error loading board '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            process::exit(1);
        }
    }
}

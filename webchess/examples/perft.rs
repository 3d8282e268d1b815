/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use webchess::{print_perft, Game};

/// Compute total number of states reachable from a position, given a depth.
#[derive(Debug, Parser)]
struct Cli {
    /// Depth to run the perft.
    depth: usize,

    /// The FEN string of the position to run the perft.
    #[arg(required = false)]
    fen: Option<String>,

    /// List of moves to apply to the position before running the perft, such as `e2e4 e7e5`.
    #[arg(required = false)]
    moves: Vec<String>,

    /// If set, perform a splitperft, displaying the number of nodes reachable after each move available from the root.
    #[arg(short, long, default_value = "false")]
    split: bool,

    /// Node count the perft should reach; the result is reported as a pass or a failure.
    #[arg(short, long)]
    expect: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    // Parse args appropriately
    let mut game = if let Some(fen) = &args.fen {
        Game::from_fen(fen).with_context(|| format!("Failed to load FEN {fen:?}"))?
    } else {
        Game::default()
    };

    // Apply moves, if any were provided
    for mv_str in &args.moves {
        game.apply_uci(mv_str)
            .with_context(|| format!("Failed to apply {mv_str:?} to {game}"))?;
    }
    log::info!("Running perft({}) on {game}", args.depth);

    let total_nodes = if args.split {
        print_perft::<true>(&mut game, args.depth)
    } else {
        print_perft::<false>(&mut game, args.depth)
    };

    if let Some(expected) = args.expect {
        if total_nodes == expected {
            println!("\n{}", "PASS".green().bold());
        } else {
            println!(
                "\n{}: expected {expected} nodes, found {total_nodes}",
                "FAIL".red().bold()
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

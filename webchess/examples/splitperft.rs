/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::Context;
use webchess::{print_perft, Game};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    // Print usage if insufficient arguments provided
    if args.len() < 2 {
        println!("Usage: {} <depth> [fen] [moves]", args[0]);
        std::process::exit(1);
    }

    // Parse args appropriately
    let depth = args[1].parse().context(format!(
        "Failed to parse {:?} as depth value. Expected integer.",
        args[1]
    ))?;
    let mut game = if let Some(fen) = args.get(2) {
        Game::from_fen(fen)?
    } else {
        Game::default()
    };

    // Apply moves, if any were provided
    if args.len() > 3 {
        for mv_str in args[3].split_ascii_whitespace() {
            game.apply_uci(mv_str)?;
        }
    }

    print_perft::<true>(&mut game, depth);

    Ok(())
}

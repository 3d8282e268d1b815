/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use super::{Game, Move};

/// Counts the leaf nodes of the legal move tree of `game`, `depth` plies deep.
///
/// Moves are made and unmade in place, so `game` is unchanged afterwards.
///
/// # Example
/// ```
/// # use webchess::{perft, Game};
/// let mut game = Game::new();
/// assert_eq!(perft(&mut game, 0), 1);
/// assert_eq!(perft(&mut game, 1), 20);
/// assert_eq!(perft(&mut game, 2), 400);
/// ```
pub fn perft(game: &mut Game, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = game.legal_moves();

    // Bulk counting at the last ply
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        game.make_move(mv);
        nodes += perft(game, depth - 1);
        game.unmake_move(mv);
    }

    nodes
}

/// Counts the nodes reachable after each legal move from the root, sorted by the move's text.
///
/// The counts sum to [`perft`] at the same depth. Useful for finding the move a generator gets wrong.
///
/// # Example
/// ```
/// # use webchess::{perft, splitperft, Game};
/// let mut game = Game::new();
/// let split = splitperft(&mut game, 2);
/// assert_eq!(split.len(), 20);
/// assert_eq!(split[0].0.to_string(), "a2a3");
/// assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), perft(&mut game, 2));
/// ```
pub fn splitperft(game: &mut Game, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let mut split = game
        .legal_moves()
        .into_iter()
        .map(|mv| {
            game.make_move(mv);
            let nodes = perft(game, depth - 1);
            game.unmake_move(mv);
            (mv, nodes)
        })
        .collect::<Vec<_>>();

    split.sort_by_cached_key(|(mv, _)| mv.to_string());
    split
}

/// Runs a perft on `game` to `depth`, printing the node count, elapsed time, and speed.
///
/// If `SPLIT` is set, the count below each root move is printed first.
pub fn print_perft<const SPLIT: bool>(game: &mut Game, depth: usize) -> u64 {
    println!("Computing PERFT({depth}) of the following position:\n{game:?}\n");

    let now = Instant::now();
    let total_nodes = if SPLIT {
        let split = splitperft(game, depth);
        for (mv, nodes) in &split {
            println!("{mv}: {nodes}");
        }
        println!();
        split.iter().map(|(_, nodes)| nodes).sum()
    } else {
        perft(game, depth)
    };
    let elapsed = now.elapsed();

    // Compute nodes-per-second metrics
    let nps = total_nodes as f32 / elapsed.as_secs_f32();
    let m_nps = nps / 1_000_000.0;

    println!("  Total Nodes:\t{total_nodes}");
    println!(" Elapsed Time:\t{elapsed:.1?}");
    println!("  Nodes / Sec:\t{nps:.0}");
    println!("M Nodes / Sec:\t{m_nps:.1}");

    total_nodes
}

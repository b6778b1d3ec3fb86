//! Per-root-move node counts, for cross-checking generator determinism.

use std::time::Instant;

use cotulenh_engine::board::Board;

fn main() {
    let mut args = std::env::args().skip(1);
    let fen = args.next();
    let depth: usize = args
        .next()
        .and_then(|d| d.parse().ok())
        .unwrap_or(2);

    let mut board = match fen {
        Some(fen) => Board::from_fen(&fen),
        None => Board::new(),
    };

    println!("Perft divide at depth {depth}");
    let start = Instant::now();
    let mut total = 0u64;
    let root_moves = board.generate_moves();
    for mv in &root_moves {
        let san = board.move_to_san(mv);
        board.make_move(mv).expect("root move is legal");
        let count = board.perft(depth - 1);
        board.undo().expect("just played");
        println!("  {san}: {count}");
        total += count;
    }
    let elapsed = start.elapsed();
    println!("Total: {total} in {elapsed:?}");
}

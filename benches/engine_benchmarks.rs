//! Benchmarks for move generation, application, and parsing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cotulenh_engine::board::{Board, DEFAULT_FEN};

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let mut startpos = Board::new();
    group.bench_function("startpos", |b| {
        b.iter(|| {
            // defeat the move cache so generation itself is measured
            startpos.clear();
            startpos.load(DEFAULT_FEN).unwrap();
            black_box(startpos.generate_moves())
        })
    });

    // a middlegame with stacks and an extended air-defense field
    let mut middlegame = Board::from_fen(
        "5c5/3fmhmf3/1nais1sia2/n1etg1gte2/11/2(NF)8/6T4/11/N2TG1G1E2/1NAIS1SIA2/3FMHMF3/5C5 r - - 4 3",
    );
    group.bench_function("middlegame", |b| {
        b.iter(|| {
            let fen = middlegame.to_fen();
            middlegame.load(&fen).unwrap();
            black_box(middlegame.generate_moves())
        })
    });

    group.finish();
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(10);

    let mut board = Board::new();
    for depth in 1..=2 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| board.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_make_undo(c: &mut Criterion) {
    let mut board = Board::new();
    let moves = board.generate_moves();
    let mv = moves.first().expect("start position has moves").clone();

    c.bench_function("make_undo", |b| {
        b.iter(|| {
            board.make_move(black_box(&mv)).unwrap();
            board.undo().unwrap();
        })
    });
}

fn bench_fen(c: &mut Criterion) {
    let board = Board::new();
    let fen = board.to_fen();

    c.bench_function("fen_parse", |b| {
        b.iter(|| black_box(Board::from_fen(black_box(&fen))))
    });
    c.bench_function("fen_serialize", |b| b.iter(|| black_box(board.to_fen())));
}

criterion_group!(benches, bench_movegen, bench_perft, bench_make_undo, bench_fen);
criterion_main!(benches);

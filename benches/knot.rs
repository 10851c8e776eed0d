use criterion::{black_box, criterion_group, criterion_main, Criterion};
use knot3::{Direction, Knot, KnotMetaData, scramble};

fn scrambled_knot(moves: usize) -> Knot {
    let mut knot = Knot::default();
    scramble(&mut knot, moves, 42);
    knot
}

fn benchmark_try_move(c: &mut Criterion) {
    let mut knot = scrambled_knot(200);
    let ids: Vec<_> = knot.iter().take(3).map(|e| e.id()).collect();
    for id in ids {
        knot.add_to_selection(id);
    }

    c.bench_function("try_move_scrambled_200", |b| {
        b.iter(|| {
            for direction in Direction::ALL {
                black_box(knot.try_move(direction, 2));
            }
        })
    });
}

fn benchmark_equality(c: &mut Criterion) {
    let knot = scrambled_knot(400);
    let mut edges = knot.edges().to_vec();
    edges.rotate_left(knot.len() / 2);
    let other = Knot::new(KnotMetaData::new("rotated"), edges).expect("rotation of a valid knot");

    c.bench_function("equality_scrambled_400", |b| {
        b.iter(|| black_box(knot == other))
    });
}

fn benchmark_scramble(c: &mut Criterion) {
    c.bench_function("scramble_100", |b| {
        b.iter(|| {
            let mut knot = Knot::default();
            black_box(scramble(&mut knot, 100, 7))
        })
    });
}

criterion_group!(benches, benchmark_try_move, benchmark_equality, benchmark_scramble);
criterion_main!(benches);

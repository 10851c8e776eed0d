use crate::direction::Direction;
use crate::knot::Knot;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

/// Longest run of edges moved by a single scramble step.
const MAX_RUN: usize = 3;
/// Largest distance of a single scramble step.
const MAX_DISTANCE: i32 = 2;

/// Applies `moves` random legal moves to `knot`, seeded for reproducibility.
///
/// Returns the number of moves actually applied, which is lower than `moves`
/// only if too many random attempts were rejected. The selection is cleared
/// afterwards.
pub fn scramble(knot: &mut Knot, moves: usize, seed: u64) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    scramble_with(knot, moves, &mut rng)
}

/// Like [`scramble`], drawing from a caller-provided generator.
pub fn scramble_with<R: Rng>(knot: &mut Knot, moves: usize, rng: &mut R) -> usize {
    let max_attempts = attempt_limit(moves);
    let mut applied = 0;
    let mut attempts = 0;

    while applied < moves && attempts < max_attempts {
        attempts += 1;
        let n = knot.len();
        let start = rng.gen_range(0..n);
        let run = rng.gen_range(1..=MAX_RUN.min(n - 1));

        knot.clear_selection();
        for k in 0..run {
            let id = knot.edges()[(start + k) % n].id();
            knot.add_to_selection(id);
        }

        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        let distance = rng.gen_range(1..=MAX_DISTANCE);
        if knot.move_selection(direction, distance) {
            applied += 1;
        }
    }
    knot.clear_selection();

    debug!(name = %knot.name(), applied, attempts, edges = knot.len(), "scrambled knot");
    applied
}

fn attempt_limit(moves: usize) -> usize {
    moves.saturating_mul(100) // Safety limit
}

/// Seed for scrambles that should differ between runs.
pub fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}

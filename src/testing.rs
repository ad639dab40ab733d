use rand::distr::StandardUniform;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::locate::GridDirection;
use crate::utils::linspace;

/// Fixed random seed to support repeatable testing
const SEED: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Get a random number generator with a const seed for repeatable testing
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// Generate `n` random numbers using provided generator
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    std::iter::repeat_with(|| rng.random::<T>())
        .take(n)
        .collect()
}

/// Evenly spaced grid from `start` to `stop` with uniform noise of total
/// width `noise` on every point, stored in the requested direction.
///
/// Keep `noise` below the spacing so the grid stays strictly monotonic.
pub fn noisy_grid(
    rng: &mut StdRng,
    n: usize,
    start: f64,
    stop: f64,
    noise: f64,
    direction: GridDirection,
) -> Vec<f64> {
    let mut x = linspace(start, stop, n);
    let dx = randn::<f64>(rng, n);
    x.iter_mut()
        .zip(dx)
        .for_each(|(x, d)| *x += (d - 0.5) * noise);
    if direction == GridDirection::Descending {
        x.reverse();
    }
    x
}

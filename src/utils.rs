//! Convenience methods for constructing grids in a way that echoes,
//! but does not exactly match, methods common in scripting languages.
use itertools::Itertools;
use num_traits::Float;

/// Generates evenly spaced values from start to stop,
/// including the endpoint. `stop < start` gives a descending grid.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let dx: T = (stop - start) / T::from(n - 1).unwrap_or_else(T::one);
            let mut x: Vec<T> = (0..n)
                .map(|i| start + T::from(i).unwrap_or_else(T::nan) * dx)
                .collect();
            // Pin the endpoint against accumulated roundoff
            x[n - 1] = stop;
            x
        }
    }
}

/// Generates values evenly spaced in the logarithm from start to stop,
/// including the endpoint, like pressure levels of an atmosphere.
/// Both ends must be strictly positive.
pub fn logspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    let mut x: Vec<T> = linspace(start.ln(), stop.ln(), n)
        .into_iter()
        .map(T::exp)
        .collect();
    if let Some(first) = x.first_mut() {
        *first = start;
    }
    if let Some(last) = x.last_mut() {
        *last = stop;
    }
    x
}

/// Generates a meshgrid in C ordering (x0, y0, z0, x0, y0, z1, ..., x0, yn, zn)
pub fn meshgrid<T>(x: Vec<&Vec<T>>) -> Vec<Vec<T>>
where
    T: Float,
{
    x.into_iter()
        .multi_cartesian_product()
        .map(|xx| xx.iter().map(|y| **y).collect())
        .collect()
}

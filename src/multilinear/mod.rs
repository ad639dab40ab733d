//! Multilinear interpolation by precomputed weights.
//!
//! Interpolation is split into three stages that can be reused separately:
//! locating each query value on its reference axis ([`crate::locate`]),
//! turning grid positions into 2^N corner weights ([`interpweights`] and
//! friends), and applying the weights to a field ([`interp`] and friends).
//! Weights depend only on the grids, so one set serves every field that
//! shares them.
//!
//! Each stage comes in three protocols:
//!
//! | Protocol  | Positions per axis         | Output                        |
//! |-----------|----------------------------|-------------------------------|
//! | pointwise | one                        | a scalar                      |
//! | sequence  | `M`, same `M` on each axis | `M` values                    |
//! | grid      | any number on each axis    | the outer product, in C order |
//!
//! With `std`, [`interpn_seq`] and [`interpn_grid`] run all three stages in
//! one call for a rank chosen at runtime.
//!
//! ```rust
//! use gridpos::multilinear;
//!
//! // Descending pressure levels and ascending latitudes
//! let p = [10.0_f64, 1.0];
//! let lat = [0.0_f64, 10.0];
//! let f = [1.0, 2.0, 3.0, 4.0];
//!
//! let grids = [&p[..], &lat[..]];
//! let obs = [&[5.5][..], &[5.0][..]];
//! let out = multilinear::interpn_seq_alloc(&grids, &f, &obs).unwrap();
//! assert_eq!(out, vec![2.5]);
//! ```
mod corners;
mod field;
mod grid;
mod pointwise;
mod sequence;
mod weights;

pub use corners::{Corner, Corners};
pub use field::Field;
pub use grid::interp_grid;
pub use pointwise::{interp, interp_point};
pub use sequence::interp_seq;
pub use weights::{check_weights, interpweights, interpweights_grid, interpweights_seq, n_weights};

#[cfg(feature = "rayon")]
pub use grid::interp_grid_par;

#[cfg(feature = "std")]
pub use grid::interp_grid_alloc;
#[cfg(feature = "std")]
pub use sequence::interp_seq_alloc;
#[cfg(feature = "std")]
pub use weights::{interpweights_grid_alloc, interpweights_seq_alloc};

#[cfg(feature = "std")]
pub use chain::{
    interpn_grid, interpn_grid_alloc, interpn_grid_with, interpn_seq, interpn_seq_alloc,
    interpn_seq_with,
};

#[cfg(feature = "std")]
mod chain {
    use num_traits::Float;

    use super::{interp_grid, interp_seq, interpweights_grid_alloc, interpweights_seq_alloc, Field};
    use crate::config::LocatorConfig;
    use crate::error::{Error, Result};
    use crate::position::GridPos;
    use crate::locate::Locator;

    /// Largest rank handled by the runtime dispatch.
    const MAX_NDIMS: usize = 7;

    /// Interpolate a field given on the reference `grids` at a sequence of
    /// points, one coordinate array per axis in `obs`.
    /// Assumes C-style ordering of vals (z(x0, y0), z(x0, y1), ..., z(x0, yn), z(x1, y0), ...).
    ///
    /// Grids may be ascending or descending, independently per axis.
    /// Queries may extrapolate by half of the outermost grid spacing.
    ///
    /// This is a convenience function. Reusing weights across fields, or
    /// using the exact rank through the staged functions, avoids repeating
    /// the grid search and the allocations made here.
    ///
    /// # Errors
    /// * If `grids`, `obs` and the size of `vals` disagree, or the rank is above 7
    /// * If any grid is malformed
    /// * If any query value is outside the extrapolation envelope of its axis
    pub fn interpn_seq<T: Float>(grids: &[&[T]], vals: &[T], obs: &[&[T]], out: &mut [T]) -> Result<()> {
        interpn_seq_with(LocatorConfig::default(), grids, vals, obs, out)
    }

    /// [`interpn_seq`] with an explicit locator configuration.
    ///
    /// # Errors
    /// * As for [`interpn_seq`], and if the configuration is invalid
    pub fn interpn_seq_with<T: Float>(
        config: LocatorConfig<T>,
        grids: &[&[T]],
        vals: &[T],
        obs: &[&[T]],
        out: &mut [T],
    ) -> Result<()> {
        // A fixed rank keeps every per-point index array on the stack
        match check_rank(grids, obs)? {
            1 => seq_fixed::<T, 1>(config, grids, vals, obs, out),
            2 => seq_fixed::<T, 2>(config, grids, vals, obs, out),
            3 => seq_fixed::<T, 3>(config, grids, vals, obs, out),
            4 => seq_fixed::<T, 4>(config, grids, vals, obs, out),
            5 => seq_fixed::<T, 5>(config, grids, vals, obs, out),
            6 => seq_fixed::<T, 6>(config, grids, vals, obs, out),
            7 => seq_fixed::<T, 7>(config, grids, vals, obs, out),
            n => Err(rank_error(n)),
        }
    }

    /// Interpolate a field given on the reference `grids` onto the new grid
    /// spanned by the per-axis coordinates in `obs`. The output is in C
    /// order with shape `[obs[0].len(), ..., obs[N-1].len()]`.
    ///
    /// # Errors
    /// * As for [`interpn_seq`]
    pub fn interpn_grid<T: Float>(grids: &[&[T]], vals: &[T], obs: &[&[T]], out: &mut [T]) -> Result<()> {
        interpn_grid_with(LocatorConfig::default(), grids, vals, obs, out)
    }

    /// [`interpn_grid`] with an explicit locator configuration.
    ///
    /// # Errors
    /// * As for [`interpn_seq`], and if the configuration is invalid
    pub fn interpn_grid_with<T: Float>(
        config: LocatorConfig<T>,
        grids: &[&[T]],
        vals: &[T],
        obs: &[&[T]],
        out: &mut [T],
    ) -> Result<()> {
        match check_rank(grids, obs)? {
            1 => grid_fixed::<T, 1>(config, grids, vals, obs, out),
            2 => grid_fixed::<T, 2>(config, grids, vals, obs, out),
            3 => grid_fixed::<T, 3>(config, grids, vals, obs, out),
            4 => grid_fixed::<T, 4>(config, grids, vals, obs, out),
            5 => grid_fixed::<T, 5>(config, grids, vals, obs, out),
            6 => grid_fixed::<T, 6>(config, grids, vals, obs, out),
            7 => grid_fixed::<T, 7>(config, grids, vals, obs, out),
            n => Err(rank_error(n)),
        }
    }

    /// Evaluate [`interpn_seq`], allocating a new Vec for the output.
    ///
    /// # Errors
    /// * As for [`interpn_seq`]
    pub fn interpn_seq_alloc<T: Float>(grids: &[&[T]], vals: &[T], obs: &[&[T]]) -> Result<Vec<T>> {
        let mut out = vec![T::zero(); obs.first().map_or(0, |o| o.len())];
        interpn_seq(grids, vals, obs, &mut out)?;
        Ok(out)
    }

    /// Evaluate [`interpn_grid`], allocating a new Vec for the output.
    ///
    /// # Errors
    /// * As for [`interpn_seq`]
    pub fn interpn_grid_alloc<T: Float>(grids: &[&[T]], vals: &[T], obs: &[&[T]]) -> Result<Vec<T>> {
        let mut out = vec![T::zero(); obs.iter().map(|o| o.len()).product()];
        interpn_grid(grids, vals, obs, &mut out)?;
        Ok(out)
    }

    fn check_rank<T>(grids: &[&[T]], obs: &[&[T]]) -> Result<usize> {
        let ndims = grids.len();
        if obs.len() != ndims {
            return Err(Error::mismatch("query axes", ndims, obs.len()));
        }
        Ok(ndims)
    }

    fn rank_error(ndims: usize) -> Error {
        tracing::debug!(ndims, max = MAX_NDIMS, "unsupported rank");
        Error::InvalidParameter {
            name: "ndims",
            value: ndims as f64,
        }
    }

    fn seq_fixed<T: Float, const N: usize>(
        config: LocatorConfig<T>,
        grids: &[&[T]],
        vals: &[T],
        obs: &[&[T]],
        out: &mut [T],
    ) -> Result<()> {
        let (field, gps) = prepare::<T, N>(config, grids, vals, obs)?;
        let gp: [&[GridPos<T>]; N] = core::array::from_fn(|k| &gps[k][..]);
        let itw = interpweights_seq_alloc(&gp)?;
        interp_seq(out, &itw, &field, &gp)
    }

    fn grid_fixed<T: Float, const N: usize>(
        config: LocatorConfig<T>,
        grids: &[&[T]],
        vals: &[T],
        obs: &[&[T]],
        out: &mut [T],
    ) -> Result<()> {
        let (field, gps) = prepare::<T, N>(config, grids, vals, obs)?;
        let gp: [&[GridPos<T>]; N] = core::array::from_fn(|k| &gps[k][..]);
        let itw = interpweights_grid_alloc(&gp)?;
        interp_grid(out, &itw, &field, &gp)
    }

    /// Build the field view and locate every axis of the queries.
    #[allow(clippy::type_complexity)]
    fn prepare<'a, T: Float, const N: usize>(
        config: LocatorConfig<T>,
        grids: &[&[T]],
        vals: &'a [T],
        obs: &[&[T]],
    ) -> Result<(Field<'a, T, N>, [Vec<GridPos<T>>; N])> {
        let dims: [usize; N] = core::array::from_fn(|k| grids[k].len());
        let field = Field::new(dims, vals)?;

        let mut gps: [Vec<GridPos<T>>; N] = core::array::from_fn(|_| Vec::new());
        for k in 0..N {
            let locator = Locator::new(grids[k], config).map_err(|e| e.on_axis(k))?;
            gps[k] = locator.locate_alloc(obs[k]).map_err(|e| e.on_axis(k))?;
        }
        Ok((field, gps))
    }
}

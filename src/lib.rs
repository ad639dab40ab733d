//! Grid positions and multilinear interpolation on rectilinear grids, no-std
//! compatible. Without `std` the crate still needs `alloc` for `tracing`.
//!
//! Interpolation is split into reusable stages:
//!
//! 1. [`gridpos`] locates each query value on a reference axis, producing a
//!    [`GridPos`]: the index of the bracketing cell and the fractional
//!    distances across it. Reference grids may be ascending or descending,
//!    and queries may extrapolate by a bounded fraction of the outermost
//!    grid spacing.
//! 2. [`multilinear::interpweights`] and friends combine one position per
//!    axis into the 2^N weights of the surrounding hyper-box corners.
//! 3. [`multilinear::interp`] and friends apply the weights to a field.
//!
//! Positions and weights depend only on the grids, so they can be computed
//! once and reused for every field defined on the same grids. The
//! [`polynomial`] module offers a higher-order alternative in one
//! dimension.
//!
//! # Performance Scalings
//! Each output point reads 2^ndims field values, which is the floor
//! for multilinear interpolation.
//!
//! The locator walks its bracket from one query to the next instead of
//! searching from scratch. Sorted or slowly varying queries, like points
//! along a path, cost O(1) each on average; arbitrary order degrades to
//! O(gridsize) per query.
//!
//! | Stage                       | RAM       | Cost per output point           |
//! |-----------------------------|-----------|---------------------------------|
//! | locate                      | O(1)      | O(1) sorted, O(gridsize) worst  |
//! | multilinear::interpweights  | O(2^ndims)| O(2^ndims)                      |
//! | multilinear::interp         | O(1)      | O(ndims 2^ndims)                |
//! | polynomial::interp_poly     | O(1)      | O(order^2)                      |
//!
//! # Example: Reusing Weights Across Fields
//! ```rust
//! use gridpos::{gridpos, GridPos};
//! use gridpos::multilinear::{interp_seq, interpweights_seq, Field};
//!
//! // Descending pressure levels and ascending latitudes
//! let p = [100.0_f64, 10.0, 1.0];
//! let lat = [0.0_f64, 10.0];
//!
//! // Points along a path
//! let p_path = [50.0_f64, 5.5];
//! let lat_path = [2.0_f64, 5.0];
//!
//! let mut gp_p = [GridPos::at_index(0); 2];
//! let mut gp_lat = [GridPos::at_index(0); 2];
//! gridpos(&mut gp_p, &p, &p_path).unwrap();
//! gridpos(&mut gp_lat, &lat, &lat_path).unwrap();
//! let gp = [&gp_p[..], &gp_lat[..]];
//!
//! let mut itw = [0.0; 2 * 4];
//! interpweights_seq(&mut itw, &gp).unwrap();
//!
//! // Two fields on the same grids, rows by pressure
//! let temperature = [280.0, 290.0, 250.0, 255.0, 220.0, 222.0];
//! let humidity = [0.5, 0.7, 0.2, 0.3, 0.0, 0.1];
//!
//! let mut out = [0.0; 2];
//! for vals in [&temperature, &humidity] {
//!     let field = Field::matrix(3, 2, vals).unwrap();
//!     interp_seq(&mut out, &itw, &field, &gp).unwrap();
//! }
//! assert!((out[1] - 0.15).abs() < 1e-12);
//! ```
//!
//! # Example: One-Shot Grid Interpolation
//! ```rust
//! use gridpos::multilinear;
//!
//! let x = [1.0_f64, 2.0, 3.0];
//! let y = [5.0_f64, 6.0, 7.0];
//!
//! let out = multilinear::interpn_grid_alloc(&[&x[..]], &y, &[&[2.5][..]]).unwrap();
//! assert_eq!(out, vec![6.5]);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

pub mod config;
pub use config::{GridScale, LocatorConfig, TieBreak, DEFAULT_EXTPOLFAC, FD_TOL, SUM_CHECK_EPSILON};

pub mod error;
pub use error::{Error, GridDefect, Result};

pub mod position;
pub use position::GridPos;

pub mod locate;
pub use locate::{
    check_grid, check_interpolation_grid_one, check_interpolation_grids, gridpos, gridpos_extpol,
    gridpos_one, GridDirection, Locator,
};
#[cfg(feature = "std")]
pub use locate::gridpos_alloc;

pub mod multilinear;

pub mod polynomial;

#[cfg(feature = "std")]
pub mod utils;

#[cfg(all(test, feature = "std"))]
pub(crate) mod testing;

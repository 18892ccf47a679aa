//! Spatial discretization of the box.

use ndarray as nd;
use crate::error::GridError;

pub type GridResult<T> = Result<T, GridError>;

/// Uniform discretization of the domain `[0, L]` with hard walls at both
/// ends.
///
/// Immutable once constructed; every other component is sized against it.
/// The coordinates are `x[i] = i dx` with `dx = L / (N - 1)`, so the first
/// and last points sit exactly on the walls.
#[derive(Clone, Debug)]
pub struct Grid {
    // domain length
    l: f64,
    // point count
    n: usize,
    // grid spacing
    dx: f64,
    // coordinate array
    x: nd::Array1<f64>,
}

impl Grid {
    /// Create a new `Grid` spanning `[0, l]` with `n` points.
    pub fn new(l: f64, n: usize) -> GridResult<Self> {
        GridError::check_length(l)?;
        GridError::check_points(n)?;
        let x: nd::Array1<f64> = nd::Array1::linspace(0.0, l, n);
        let dx = l / (n - 1) as f64;
        Ok(Self { l, n, dx, x })
    }

    /// Get the domain length.
    pub fn get_length(&self) -> f64 { self.l }

    /// Get the number of grid points.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.n }

    /// Get the grid spacing.
    pub fn get_dx(&self) -> f64 { self.dx }

    /// Get a reference to the coordinate array.
    pub fn get_x(&self) -> &nd::Array1<f64> { &self.x }

    /// Suggest a time step on the accuracy scale set by the grid spacing.
    ///
    /// Crank-Nicolson is unconditionally stable, so this is not a stability
    /// bound; larger steps only degrade phase accuracy for the fastest modes
    /// the grid can represent, whose energies go like `1/dx²`.
    pub fn default_dt(&self) -> f64 { self.dx * self.dx }
}

//! Sampled potential landscapes, plus builders for rectangular barriers.
//!
//! A [`PotentialField`] is nothing more than one real sample per grid point;
//! it knows nothing about boundary conditions or operators. What it does
//! track is a generation counter, bumped on every wholesale replacement of
//! its samples, so that operators derived from it can tell when they have
//! gone stale.
//!
//! The builders at the bottom return plain sampled arrays given a grid and
//! shape parameters; the field is agnostic to how its values were derived.

use ndarray as nd;
use crate::{ error::DimensionMismatch, grid::Grid, Arr1 };

/// Real-valued potential energy sampled at every grid point.
#[derive(Clone, Debug)]
pub struct PotentialField {
    V: nd::Array1<f64>,
    generation: u64,
}

impl PotentialField {
    /// Create a zero-filled (flat well) field sized to `grid`.
    pub fn zeros(grid: &Grid) -> Self {
        Self { V: nd::Array1::zeros(grid.len()), generation: 0 }
    }

    /// Create a field from bare samples, which must match the grid length.
    pub fn from_samples<S>(grid: &Grid, V: &Arr1<S>)
        -> Result<Self, DimensionMismatch>
    where S: nd::Data<Elem = f64>
    {
        DimensionMismatch::check(grid.len(), V)?;
        Ok(Self { V: V.to_owned(), generation: 0 })
    }

    /// Replace all samples in place.
    ///
    /// Any operator derived from this field beforehand is stale afterward
    /// and must be rebuilt before further propagation.
    pub fn assign<S>(&mut self, V: &Arr1<S>) -> Result<(), DimensionMismatch>
    where S: nd::Data<Elem = f64>
    {
        DimensionMismatch::check(self.V.len(), V)?;
        self.V.assign(V);
        self.generation += 1;
        Ok(())
    }

    /// Get a reference to the sample array.
    pub fn get_V(&self) -> &nd::Array1<f64> { &self.V }

    /// Get the number of samples.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.V.len() }

    /// Get the replacement counter compared against derived operators.
    pub fn generation(&self) -> u64 { self.generation }
}

/// Sample a rectangular barrier of the given height and width, centered at
/// `center`.
pub fn barrier(grid: &Grid, height: f64, width: f64, center: f64)
    -> nd::Array1<f64>
{
    grid.get_x().mapv(|xk| {
        if (xk - center).abs() < width / 2.0 { height } else { 0.0 }
    })
}

/// Sample a pair of equal rectangular barriers with the given center-to-center
/// separation, placed symmetrically about the middle of the box.
pub fn double_barrier(grid: &Grid, height: f64, width: f64, separation: f64)
    -> nd::Array1<f64>
{
    let mid = grid.get_length() / 2.0;
    let c1 = mid - separation / 2.0;
    let c2 = mid + separation / 2.0;
    grid.get_x().mapv(|xk| {
        if (xk - c1).abs() < width / 2.0 || (xk - c2).abs() < width / 2.0 {
            height
        } else {
            0.0
        }
    })
}

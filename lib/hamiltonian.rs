//! Discrete Hamiltonian for motion in the hard-walled box.
//!
//! See [`docs`][crate::docs] for the finite-difference background.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::DimensionMismatch,
    grid::Grid,
    potential::PotentialField,
    Arr1,
};

/// Symmetric tridiagonal form of `H = -½ ∂²/∂x² + V` in natural units
/// (ħ = m = 1) under hard-wall boundaries.
///
/// Interior rows carry `1/dx² + V[i]` on the main diagonal and `-1/(2 dx²)`
/// on the first off-diagonals, the standard second-order central difference
/// for the kinetic term. The wall rows and columns (i = 0 and i = N-1) are
/// zeroed so the walls never couple to the interior; together with the
/// re-pinning performed by the propagator this keeps `ψ[0] = ψ[N-1] = 0` for
/// all time regardless of the dynamics.
///
/// Both bands are real and the off-diagonal is shared between the sub- and
/// super-diagonal, so the operator is Hermitian by construction — the
/// property the unitarity of the Crank-Nicolson step rests on.
///
/// The operator records the generation of the [`PotentialField`] it was
/// built from; call [`rebuild`][Self::rebuild] after the field changes.
#[derive(Clone, Debug)]
pub struct Hamiltonian {
    // main diagonal; walls zeroed
    diag: nd::Array1<f64>,
    // off[i] couples points i and i + 1; off[0] and off[n - 2] zeroed
    off: nd::Array1<f64>,
    dx: f64,
    generation: u64,
}

impl Hamiltonian {
    /// Build the operator from a grid and a matching potential field.
    pub fn build(grid: &Grid, potential: &PotentialField)
        -> Result<Self, DimensionMismatch>
    {
        DimensionMismatch::check(grid.len(), potential.get_V())?;
        let n = grid.len();
        let mut new = Self {
            diag: nd::Array1::zeros(n),
            off: nd::Array1::zeros(n - 1),
            dx: grid.get_dx(),
            generation: 0,
        };
        new.fill(potential);
        Ok(new)
    }

    // derive all matrix elements from the potential samples
    fn fill(&mut self, potential: &PotentialField) {
        let n = self.diag.len();
        let ondx2 = self.dx.powi(2).recip();
        nd::Zip::indexed(&mut self.diag).and(potential.get_V())
            .for_each(|i, d, Vi| {
                *d = if i == 0 || i == n - 1 { 0.0 } else { ondx2 + *Vi };
            });
        self.off.fill(-ondx2 / 2.0);
        self.off[0] = 0.0;
        self.off[n - 2] = 0.0;
        self.generation = potential.generation();
    }

    /// Re-derive the matrix elements after the potential has been replaced.
    pub fn rebuild(&mut self, potential: &PotentialField)
        -> Result<(), DimensionMismatch>
    {
        DimensionMismatch::check(self.diag.len(), potential.get_V())?;
        self.fill(potential);
        Ok(())
    }

    /// Get the main diagonal.
    pub fn get_diag(&self) -> &nd::Array1<f64> { &self.diag }

    /// Get the first off-diagonal (sub and super are equal by symmetry).
    pub fn get_off(&self) -> &nd::Array1<f64> { &self.off }

    /// Get the number of rows.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.diag.len() }

    /// Get the generation of the potential this operator was derived from.
    pub fn generation(&self) -> u64 { self.generation }

    /// Return `true` if this operator is up to date with `potential`.
    pub fn is_current(&self, potential: &PotentialField) -> bool {
        self.generation == potential.generation()
    }

    /// Apply the operator to a state vector.
    ///
    /// The wall entries of the result are zero.
    ///
    /// *Panics if `q` is shorter than the operator*.
    pub fn apply<S>(&self, q: &Arr1<S>) -> nd::Array1<C64>
    where S: nd::Data<Elem = C64>
    {
        let n = self.diag.len();
        let mut hq: nd::Array1<C64> = nd::Array1::zeros(n);
        for i in 1..n - 1 {
            hq[i] = self.diag[i] * q[i]
                + self.off[i - 1] * q[i - 1]
                + self.off[i] * q[i + 1];
        }
        hq
    }
}

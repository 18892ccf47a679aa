//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;

/// Returned when an operation requiring a grid-sized array encounters an
/// array of a different length.
#[derive(Debug, Error)]
#[error("expected an array of length {expected}; got {found}")]
pub struct DimensionMismatch {
    /// The grid length.
    pub expected: usize,
    /// The offending array length.
    pub found: usize,
}

impl DimensionMismatch {
    pub(crate) fn check<S, A>(expected: usize, a: &nd::ArrayBase<S, nd::Ix1>)
        -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        let found = a.len();
        (found == expected).then_some(()).ok_or(Self { expected, found })
    }
}

/// Returned from [`Grid`][crate::grid::Grid] construction.
#[derive(Debug, Error)]
pub enum GridError {
    /// Returned when the domain length is not positive.
    #[error("domain lengths must be greater than 0; got {0}")]
    BadLength(f64),

    /// Returned when the grid has fewer than three points.
    #[error("grids must have at least 3 points; got {0}")]
    BadPoints(usize),
}

impl GridError {
    pub(crate) fn check_length(l: f64) -> Result<(), Self> {
        (l > 0.0).then_some(()).ok_or(Self::BadLength(l))
    }

    pub(crate) fn check_points(n: usize) -> Result<(), Self> {
        (n >= 3).then_some(()).ok_or(Self::BadPoints(n))
    }
}

/// Returned when an initial wavefunction fails validation at assignment.
///
/// Normalization is the state builder's job; the session checks it and
/// refuses rather than silently renormalizing.
#[derive(Debug, Error)]
pub enum StateError {
    /// [`DimensionMismatch`]
    #[error("dimension error: {0}")]
    Dimension(#[from] DimensionMismatch),

    /// Returned when a wall sample carries amplitude.
    #[error("wavefunctions must vanish at the walls; |psi[{0}]| = {1:e}")]
    WallLeak(usize, f64),

    /// Returned when the squared norm is off unity beyond tolerance.
    #[error("wavefunctions must arrive normalized; got squared norm {0}")]
    NotNormalized(f64),
}

/// Returned from propagator derivation and time stepping.
#[derive(Debug, Error)]
pub enum EvolveError {
    /// Returned when a non-positive time step is encountered.
    #[error("time steps must be greater than 0; got {0}")]
    BadTimeStep(f64),

    /// [`DimensionMismatch`]
    #[error("dimension error: {0}")]
    Dimension(#[from] DimensionMismatch),

    /// [`StateError`]
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Returned when the step operators predate the potential they are asked
    /// to evolve under; rebuild before stepping.
    #[error(
        "step operators were derived at potential generation {operator} but \
        the potential is at generation {potential}; rebuild before stepping"
    )]
    Stale {
        /// Generation recorded by the step operators.
        operator: u64,
        /// Current generation of the potential field.
        potential: u64,
    },

    /// Returned when the tridiagonal solve encounters a vanishing pivot.
    ///
    /// This cannot happen for operators derived from a correctly built
    /// Hermitian Hamiltonian; it indicates a construction bug upstream.
    #[error("tridiagonal solve hit a vanishing pivot at row {0}")]
    Singular(usize),
}

impl EvolveError {
    pub(crate) fn check_dt(dt: f64) -> Result<(), Self> {
        (dt > 0.0).then_some(()).ok_or(Self::BadTimeStep(dt))
    }
}

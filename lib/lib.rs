#![allow(non_snake_case)]

//! Provides constructs for automated solution of the one-dimensional,
//! time-dependent Schrödinger equation in a hard-walled box via
//! Crank-Nicolson time stepping on a finite-difference Hamiltonian.
//!
//! The pieces compose in one direction: a [`Grid`] fixes the spatial
//! discretization, a [`PotentialField`] samples an arbitrary landscape over
//! it, a [`Hamiltonian`] is the symmetric tridiagonal operator derived from
//! both, a [`Propagator`] carries the Crank-Nicolson step operators for one
//! time step choice, and a [`SimulationState`] owns the evolving
//! wavefunction and drives the loop, yielding read-only snapshots.
//!
//! The scheme is exactly unitary for Hermitian operators and unconditionally
//! stable, so norm conservation holds over arbitrarily many steps and
//! potentials far taller than the kinetic-energy scale are handled without
//! blowup; see [`docs`] for the theoretical background.
//!
//! ```
//! use qbox::{ Grid, PotentialField, SimulationState, states, utils };
//!
//! let grid = Grid::new(1.0, 401)?;
//! let dt = grid.default_dt();
//! let dx = grid.get_dx();
//! let field = PotentialField::zeros(&grid);
//! let q0 = states::gaussian(&grid, 0.5, 0.05, 25.0);
//! let mut sim = SimulationState::new(grid, field, &q0, dt)?;
//! sim.run(1000)?;
//! let norm2 = utils::wf_norm(sim.get_psi(), dx);
//! assert!((norm2 - 1.0).abs() < 1e-10);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod error;
pub mod grid;
pub mod potential;
pub mod hamiltonian;
pub mod timedep;
pub mod state;
pub mod states;
pub mod utils;

pub mod docs;

pub use grid::Grid;
pub use potential::PotentialField;
pub use hamiltonian::Hamiltonian;
pub use timedep::Propagator;
pub use state::{ Evolve, SimulationState, Snapshot };

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;

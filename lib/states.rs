//! Initial-state builders: Gaussian wavepackets and box eigenstates.
//!
//! Every builder returns a wavefunction normalized on the grid with both
//! wall samples pinned to exactly zero, so the results pass session
//! validation as-is. The session deliberately refuses to fix either
//! property up, so builders of your own must do the same; see
//! [`wf_normalized`][crate::utils::wf_normalized].

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ grid::Grid, utils::wf_normalized };

/// Sample a Gaussian wavepacket centered at `x0` with spatial width `sigma`
/// and mean momentum `k0`.
///
/// Keep the packet several widths away from both walls; the wall samples are
/// clipped to zero, and a packet overlapping a wall loses the tail (and the
/// momentum content) it would have carried there.
pub fn gaussian(grid: &Grid, x0: f64, sigma: f64, k0: f64) -> nd::Array1<C64> {
    let mut q: nd::Array1<C64> = grid.get_x().mapv(|xk| {
        let envelope = (-(xk - x0).powi(2) / (4.0 * sigma.powi(2))).exp();
        envelope * C64::cis(k0 * xk)
    });
    pin_walls(&mut q);
    wf_normalized(&q, grid.get_dx())
}

/// Sample the `nu`-th stationary state of the empty box,
/// `ψ(x) = √(2/L) sin(nu π x / L)`, counting from `nu = 1`.
///
/// The sampled sine is an exact eigenvector of the discrete Hamiltonian for
/// zero potential, so under propagation it only accumulates phase.
///
/// *Panics if `nu` is 0*.
pub fn eigenstate(grid: &Grid, nu: usize) -> nd::Array1<C64> {
    assert!(nu >= 1, "eigenstates are counted from 1");
    let l = grid.get_length();
    let kn = nu as f64 * PI / l;
    let amp = (2.0 / l).sqrt();
    let mut q: nd::Array1<C64> =
        grid.get_x().mapv(|xk| C64::from(amp * (kn * xk).sin()));
    pin_walls(&mut q);
    wf_normalized(&q, grid.get_dx())
}

/// Sample an equal-weight superposition of the `nu1`-th and `nu2`-th
/// stationary states of the empty box.
///
/// *Panics if either index is 0*.
pub fn superposition(grid: &Grid, nu1: usize, nu2: usize) -> nd::Array1<C64> {
    let q1 = eigenstate(grid, nu1);
    let q2 = eigenstate(grid, nu2);
    wf_normalized(&(&q1 + &q2), grid.get_dx())
}

// hard walls: end samples are exactly zero
fn pin_walls(q: &mut nd::Array1<C64>) {
    let n = q.len();
    q[0] = C64::new(0.0, 0.0);
    q[n - 1] = C64::new(0.0, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{ mean_momentum, wf_dot, wf_norm };

    fn test_grid() -> Grid { Grid::new(1.0, 501).unwrap() }

    #[test]
    fn builders_satisfy_the_session_invariants() {
        let grid = test_grid();
        let dx = grid.get_dx();
        let n = grid.len();
        for q in [
            gaussian(&grid, 0.3, 0.05, 40.0),
            eigenstate(&grid, 1),
            eigenstate(&grid, 4),
            superposition(&grid, 1, 3),
        ] {
            assert_eq!(q[0], C64::new(0.0, 0.0));
            assert_eq!(q[n - 1], C64::new(0.0, 0.0));
            let norm2 = wf_norm(&q, dx);
            assert!((norm2 - 1.0).abs() < 1e-12, "squared norm {norm2}");
        }
    }

    #[test]
    fn eigenstates_are_orthogonal() {
        let grid = test_grid();
        let dx = grid.get_dx();
        let q1 = eigenstate(&grid, 1);
        let q2 = eigenstate(&grid, 2);
        assert!(wf_dot(&q1, &q2, dx).norm() < 1e-10);
    }

    #[test]
    fn gaussian_carries_its_mean_momentum() {
        let grid = test_grid();
        let dx = grid.get_dx();
        let q = gaussian(&grid, 0.5, 0.05, 60.0);
        let kbar = mean_momentum(&q, dx);
        assert!(
            (kbar - 60.0).abs() < 1.0,
            "mean momentum {kbar} far from 60"
        );
    }
}

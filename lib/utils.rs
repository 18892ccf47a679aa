//! Integration, normalization, and observable helpers.
//!
//! Everything here treats a wavefunction as samples over a uniform grid and
//! integrates with the trapezoidal rule, consistent with the validation the
//! session performs. The momentum-space diagnostics at the bottom go through
//! a plain FFT; they assume the state has decayed to zero well inside both
//! walls, which holds for any state the box can sensibly evolve.

use std::f64::consts::TAU;
use ndarray::{ self as nd, Ix1 };
use num_complex::Complex64 as C64;
use num_traits::Num;
use rustfft as fft;
use crate::{ hamiltonian::Hamiltonian, Arr1 };

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: f64) -> A
where
    S: nd::Data<Elem = A>,
    A: Num + Copy + std::ops::Mul<f64, Output = A>,
{
    let n: usize = y.len();
    let mid = y.iter().skip(1).take(n - 2)
        .fold(A::zero(), |acc, yk| acc + *yk);
    ((y[0] + y[n - 1]) * 0.5 + mid) * dx
}

/// Calculate the squared norm `∫|ψ|² dx` of a wavefunction.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_norm<S>(q: &Arr1<S>, dx: f64) -> f64
where S: nd::Data<Elem = C64>
{
    trapz(&probability_density(q), dx)
}

/// Calculate the inner product `⟨q|p⟩` of two wavefunctions.
///
/// *Panics if the arrays differ in length or are shorter than 2*.
pub fn wf_dot<S, T>(q: &Arr1<S>, p: &Arr1<T>, dx: f64) -> C64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
{
    let integrand: nd::Array1<C64> = nd::Zip::from(q).and(p)
        .map_collect(|qk, pk| qk.conj() * *pk);
    trapz(&integrand, dx)
}

/// Renormalize a wavefunction in place.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_renormalize<S>(q: &mut Arr1<S>, dx: f64)
where S: nd::DataMut<Elem = C64>
{
    let norm = wf_norm(q, dx).sqrt();
    q.map_inplace(|qk| { *qk /= norm; });
}

/// Return a normalized copy of a wavefunction.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_normalized<S>(q: &Arr1<S>, dx: f64) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    let norm = wf_norm(q, dx).sqrt();
    q.mapv(|qk| qk / norm)
}

/// Calculate the probability density `|ψ|²`.
pub fn probability_density<S>(q: &Arr1<S>) -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    q.mapv(|qk| qk.norm_sqr())
}

/// Calculate the position expectation value `⟨x⟩`.
///
/// *Panics if the arrays differ in length or are shorter than 2*.
pub fn expectation_x<S, T>(x: &Arr1<T>, q: &Arr1<S>, dx: f64) -> f64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = f64>,
{
    let integrand: nd::Array1<f64> = nd::Zip::from(x).and(q)
        .map_collect(|xk, qk| xk * qk.norm_sqr());
    trapz(&integrand, dx)
}

/// Calculate the position variance `⟨(x - ⟨x⟩)²⟩`.
///
/// *Panics if the arrays differ in length or are shorter than 2*.
pub fn variance_x<S, T>(x: &Arr1<T>, q: &Arr1<S>, dx: f64) -> f64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = f64>,
{
    let mean = expectation_x(x, q, dx);
    let integrand: nd::Array1<f64> = nd::Zip::from(x).and(q)
        .map_collect(|xk, qk| (xk - mean).powi(2) * qk.norm_sqr());
    trapz(&integrand, dx)
}

/// Calculate the energy expectation value `⟨ψ|H|ψ⟩`.
///
/// The imaginary part vanishes for the Hermitian operators this crate
/// builds, so only the real part is returned.
///
/// *Panics if `q` does not match the operator size*.
pub fn expectation_energy<S>(h: &Hamiltonian, q: &Arr1<S>, dx: f64) -> f64
where S: nd::Data<Elem = C64>
{
    wf_dot(q, &h.apply(q), dx).re
}

/// Generate the angular-wavenumber coordinates accompanying an `n`-point FFT
/// over grid spacing `dx`, in FFT output order (non-negative branch first).
pub fn momentum_axis(n: usize, dx: f64) -> nd::Array1<f64> {
    let dk = TAU * (n as f64 * dx).recip();
    let m = if n % 2 == 0 { n / 2 } else { (n + 1) / 2 };
    (0..n)
        .map(|i| {
            if i < m { (i as f64) * dk } else { -((n - i) as f64) * dk }
        })
        .collect()
}

/// Calculate the momentum-space probability density `|φ(k)|²`, normalized to
/// unit total, in FFT output order; pair with [`momentum_axis`].
pub fn momentum_density<S>(q: &Arr1<S>) -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    let mut phi = q.to_owned();
    let mut plan = fft::FftPlanner::new();
    let fft_plan = plan.plan_fft_forward(phi.len());
    fft_plan.process(phi.as_slice_mut().unwrap());
    let mut density = phi.mapv(|pk| pk.norm_sqr());
    let total = density.sum();
    density /= total;
    density
}

/// Calculate the mean momentum `⟨k⟩` spectrally.
pub fn mean_momentum<S>(q: &Arr1<S>, dx: f64) -> f64
where S: nd::Data<Elem = C64>
{
    let density = momentum_density(q);
    let k = momentum_axis(q.len(), dx);
    (&k * &density).sum()
}

/// Calculate the mean kinetic energy `⟨k²⟩ / 2` spectrally.
pub fn mean_kinetic_energy<S>(q: &Arr1<S>, dx: f64) -> f64
where S: nd::Data<Elem = C64>
{
    let density = momentum_density(q);
    let k = momentum_axis(q.len(), dx);
    (&k * &k * &density).sum() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn trapz_is_exact_for_linear_functions() {
        let x: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.0, 101);
        let y = x.mapv(|xk| 3.0 * xk + 1.0);
        let integral: f64 = trapz(&y, 0.01);
        assert!((integral - 2.5).abs() < 1e-12);
    }

    #[test]
    fn renormalization_fixes_the_norm() {
        let grid = Grid::new(1.0, 101).unwrap();
        let dx = grid.get_dx();
        let mut q: nd::Array1<C64> = grid.get_x()
            .mapv(|xk| C64::from(xk * (1.0 - xk)));
        wf_renormalize(&mut q, dx);
        assert!((wf_norm(&q, dx) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn expectation_x_finds_the_center_of_symmetric_states() {
        let grid = Grid::new(2.0, 201).unwrap();
        let dx = grid.get_dx();
        let q: nd::Array1<C64> = grid.get_x()
            .mapv(|xk| C64::from((-((xk - 1.0) / 0.2).powi(2)).exp()));
        let xbar = expectation_x(grid.get_x(), &q, dx);
        assert!((xbar - 1.0).abs() < 1e-9);
    }

    #[test]
    fn momentum_axis_orders_branches_like_the_fft() {
        let k = momentum_axis(8, 0.5);
        let dk = TAU / 4.0;
        assert!((k[0] - 0.0).abs() < 1e-15);
        assert!((k[3] - 3.0 * dk).abs() < 1e-12);
        assert!((k[4] + 4.0 * dk).abs() < 1e-12);
        assert!((k[7] + dk).abs() < 1e-12);
    }

    #[test]
    fn momentum_density_integrates_to_one() {
        let grid = Grid::new(1.0, 256).unwrap();
        let q = crate::states::gaussian(&grid, 0.5, 0.05, 30.0);
        let density = momentum_density(&q);
        assert!((density.sum() - 1.0).abs() < 1e-12);
        assert!(density.iter().all(|dk| *dk >= 0.0));
    }
}

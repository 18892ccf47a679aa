//! Simulation sessions: ownership of the evolving wavefunction and
//! orchestration of repeated propagator steps.
//!
//! A [`SimulationState`] owns one of everything — grid, potential field,
//! Hamiltonian, propagator, wavefunction — so no operator can outlive or be
//! shared against the state it evolves. Consumers outside the session only
//! ever see [`Snapshot`] copies.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ DimensionMismatch, EvolveError, StateError },
    grid::Grid,
    hamiltonian::Hamiltonian,
    potential::PotentialField,
    timedep::{ EvolveResult, Propagator },
    utils::{ probability_density, wf_norm },
    Arr1,
};

// tolerance on the squared norm of an incoming wavefunction
const NORM_EPSILON: f64 = 1e-6;
// wall samples must vanish to this tolerance
const WALL_EPSILON: f64 = 1e-12;

/// Read-only copy of a session at one instant, handed to consumers that
/// animate or analyze the trajectory.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Elapsed time.
    pub time: f64,
    /// Completed step count.
    pub step: usize,
    /// Position coordinates.
    pub x: nd::Array1<f64>,
    /// Complex amplitudes.
    pub psi: nd::Array1<C64>,
    /// Probability density `|ψ|²`.
    pub density: nd::Array1<f64>,
    /// Potential samples.
    pub potential: nd::Array1<f64>,
}

/// Owns the evolving wavefunction together with the grid, the potential
/// field, and the operators derived from them.
///
/// The wavefunction is mutated only by [`step`][Self::step] (and the
/// conveniences built on it) and replaced only by [`reset`][Self::reset].
/// Each step is atomic: it either fully applies or fails leaving the
/// previous state intact, so interrupting a run between steps is always
/// safe.
#[derive(Clone, Debug)]
pub struct SimulationState {
    grid: Grid,
    potential: PotentialField,
    hamiltonian: Hamiltonian,
    propagator: Propagator,
    psi: nd::Array1<C64>,
    time: f64,
    step_count: usize,
}

impl SimulationState {
    /// Create a session from a grid, a potential field sized to it, an
    /// initial wavefunction, and a time step.
    ///
    /// The wavefunction must match the grid length, vanish at both walls,
    /// and arrive normalized; failing any of these is an error rather than a
    /// silent correction, since re-normalizing here would mask builder bugs.
    pub fn new<S>(
        grid: Grid,
        potential: PotentialField,
        psi0: &Arr1<S>,
        dt: f64,
    ) -> EvolveResult<Self>
    where S: nd::Data<Elem = C64>
    {
        let hamiltonian = Hamiltonian::build(&grid, &potential)?;
        let propagator = Propagator::derive(&hamiltonian, dt)?;
        let psi = Self::validate(&grid, psi0)?;
        Ok(Self {
            grid,
            potential,
            hamiltonian,
            propagator,
            psi,
            time: 0.0,
            step_count: 0,
        })
    }

    // check length, walls, and normalization; copy on success
    fn validate<S>(grid: &Grid, psi0: &Arr1<S>)
        -> Result<nd::Array1<C64>, StateError>
    where S: nd::Data<Elem = C64>
    {
        DimensionMismatch::check(grid.len(), psi0)?;
        let n = grid.len();
        for i in [0, n - 1] {
            let mag = psi0[i].norm();
            if mag > WALL_EPSILON {
                return Err(StateError::WallLeak(i, mag));
            }
        }
        let norm2 = wf_norm(psi0, grid.get_dx());
        if (norm2 - 1.0).abs() > NORM_EPSILON {
            return Err(StateError::NotNormalized(norm2));
        }
        Ok(psi0.to_owned())
    }

    /// Get the grid.
    pub fn get_grid(&self) -> &Grid { &self.grid }

    /// Get the potential field.
    pub fn get_potential(&self) -> &PotentialField { &self.potential }

    /// Get mutable access to the potential field.
    ///
    /// Replacing its samples leaves the derived operators stale; stepping
    /// before [`rebuild`][Self::rebuild] fails with [`EvolveError::Stale`].
    pub fn potential_mut(&mut self) -> &mut PotentialField {
        &mut self.potential
    }

    /// Get the Hamiltonian the step operators are derived from.
    pub fn get_hamiltonian(&self) -> &Hamiltonian { &self.hamiltonian }

    /// Get the current wavefunction.
    pub fn get_psi(&self) -> &nd::Array1<C64> { &self.psi }

    /// Get the elapsed time.
    pub fn get_time(&self) -> f64 { self.time }

    /// Get the number of completed steps.
    pub fn get_step_count(&self) -> usize { self.step_count }

    /// Get the time step.
    pub fn get_dt(&self) -> f64 { self.propagator.get_dt() }

    /// Re-derive the Hamiltonian and the step operators from the current
    /// potential samples, keeping the time step.
    pub fn rebuild(&mut self) -> EvolveResult<()> {
        self.hamiltonian.rebuild(&self.potential)?;
        self.propagator =
            Propagator::derive(&self.hamiltonian, self.propagator.get_dt())?;
        Ok(())
    }

    /// Re-derive the step operators for a new time step.
    pub fn set_dt(&mut self, dt: f64) -> EvolveResult<()> {
        self.propagator = Propagator::derive(&self.hamiltonian, dt)?;
        Ok(())
    }

    /// Replace the wavefunction, discarding prior history: elapsed time and
    /// step count return to zero.
    ///
    /// The replacement is validated exactly like the initial wavefunction.
    pub fn reset<S>(&mut self, psi0: &Arr1<S>) -> Result<(), StateError>
    where S: nd::Data<Elem = C64>
    {
        self.psi = Self::validate(&self.grid, psi0)?;
        self.time = 0.0;
        self.step_count = 0;
        Ok(())
    }

    /// Advance by a single time step.
    ///
    /// Fails with [`EvolveError::Stale`] if the potential has been replaced
    /// since the operators were last derived; the wavefunction is untouched
    /// on any failure.
    pub fn step(&mut self) -> EvolveResult<()> {
        let operator = self.propagator.generation();
        let potential = self.potential.generation();
        if operator != potential {
            return Err(EvolveError::Stale { operator, potential });
        }
        self.propagator.step(&mut self.psi)?;
        self.time += self.propagator.get_dt();
        self.step_count += 1;
        Ok(())
    }

    /// Advance by `n` steps without yielding snapshots.
    pub fn run(&mut self, n: usize) -> EvolveResult<()> {
        for _ in 0..n { self.step()?; }
        Ok(())
    }

    /// Copy out the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            step: self.step_count,
            x: self.grid.get_x().clone(),
            psi: self.psi.clone(),
            density: probability_density(&self.psi),
            potential: self.potential.get_V().clone(),
        }
    }

    /// Advance `n` steps, yielding a snapshot after every `sample_every`-th
    /// step (and after the final one if `n` is not a multiple).
    ///
    /// The returned sequence is lazy, finite, and non-restartable; dropping
    /// it early keeps whatever progress was already made. A step failure is
    /// yielded once, after which the sequence ends.
    pub fn evolve(&mut self, n: usize, sample_every: usize) -> Evolve<'_> {
        Evolve {
            sim: self,
            remaining: n,
            sample_every: sample_every.max(1),
            failed: false,
        }
    }

    /// Advance `n` steps, retaining the initial wavefunction and every
    /// `sample_every`-th one after that as the rows of an array; the first
    /// axis indexes time.
    pub fn evolve_history(&mut self, n: usize, sample_every: usize)
        -> EvolveResult<nd::Array2<C64>>
    {
        let sample_every = sample_every.max(1);
        let rows = 1 + n / sample_every + usize::from(n % sample_every != 0);
        let mut q: nd::Array2<C64> = nd::Array2::zeros((rows, self.grid.len()));
        q.slice_mut(nd::s![0, ..]).assign(&self.psi);
        let mut row = 1;
        let mut taken = 0;
        while taken < n {
            let chunk = sample_every.min(n - taken);
            self.run(chunk)?;
            taken += chunk;
            q.slice_mut(nd::s![row, ..]).assign(&self.psi);
            row += 1;
        }
        Ok(q)
    }
}

/// Lazy snapshot sequence produced by [`SimulationState::evolve`].
pub struct Evolve<'a> {
    sim: &'a mut SimulationState,
    remaining: usize,
    sample_every: usize,
    failed: bool,
}

impl Iterator for Evolve<'_> {
    type Item = EvolveResult<Snapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 { return None; }
        let chunk = self.sample_every.min(self.remaining);
        match self.sim.run(chunk) {
            Ok(()) => {
                self.remaining -= chunk;
                Some(Ok(self.sim.snapshot()))
            },
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ potential, states, utils };

    fn free_session(n: usize, x0: f64, sigma: f64, k0: f64) -> SimulationState {
        let grid = Grid::new(1.0, n).unwrap();
        let dt = grid.default_dt();
        let field = PotentialField::zeros(&grid);
        let q0 = states::gaussian(&grid, x0, sigma, k0);
        SimulationState::new(grid, field, &q0, dt).unwrap()
    }

    #[test]
    fn initial_state_validation() {
        let grid = Grid::new(1.0, 101).unwrap();
        let dt = grid.default_dt();
        let field = PotentialField::zeros(&grid);

        // wrong length
        let short: nd::Array1<C64> = nd::Array1::zeros(100);
        let err = SimulationState::new(
            grid.clone(), field.clone(), &short, dt).unwrap_err();
        assert!(matches!(
            err,
            EvolveError::State(StateError::Dimension(_)),
        ));

        // amplitude on a wall
        let mut leaky = states::gaussian(&grid, 0.5, 0.05, 0.0);
        leaky[0] = C64::new(1e-3, 0.0);
        let err = SimulationState::new(
            grid.clone(), field.clone(), &leaky, dt).unwrap_err();
        assert!(matches!(
            err,
            EvolveError::State(StateError::WallLeak(0, _)),
        ));

        // not normalized; must be refused, not corrected
        let half = states::gaussian(&grid, 0.5, 0.05, 0.0).mapv(|qk| 0.5 * qk);
        let err = SimulationState::new(
            grid.clone(), field, &half, dt).unwrap_err();
        assert!(matches!(
            err,
            EvolveError::State(StateError::NotNormalized(_)),
        ));
    }

    #[test]
    fn norm_is_conserved_over_ten_thousand_steps() {
        let mut sim = free_session(201, 0.3, 0.05, 10.0);
        let dx = sim.get_grid().get_dx();
        let before = utils::wf_norm(sim.get_psi(), dx);
        sim.run(10_000).unwrap();
        let after = utils::wf_norm(sim.get_psi(), dx);
        assert!(
            (after - before).abs() < 1e-8,
            "norm drifted from {before} to {after} over 10k steps"
        );
    }

    #[test]
    fn walls_hold_after_every_step() {
        let grid = Grid::new(1.0, 201).unwrap();
        let dt = grid.default_dt();
        let field = PotentialField::from_samples(
            &grid,
            &potential::barrier(&grid, 300.0, 0.1, 0.5),
        ).unwrap();
        let q0 = states::gaussian(&grid, 0.25, 0.05, 20.0);
        let n = grid.len();
        let mut sim = SimulationState::new(grid, field, &q0, dt).unwrap();
        for _ in 0..500 {
            sim.step().unwrap();
            assert_eq!(sim.get_psi()[0].norm(), 0.0);
            assert_eq!(sim.get_psi()[n - 1].norm(), 0.0);
        }
    }

    #[test]
    fn identical_runs_are_bit_identical() {
        let mut a = free_session(151, 0.4, 0.06, 15.0);
        let mut b = free_session(151, 0.4, 0.06, 15.0);
        a.run(2000).unwrap();
        b.run(2000).unwrap();
        assert_eq!(a.get_psi(), b.get_psi());
        assert_eq!(a.get_time(), b.get_time());
    }

    #[test]
    fn free_packet_spreads_monotonically() {
        // packet at rest in the middle, walls many widths away
        let mut sim = free_session(401, 0.5, 0.03, 0.0);
        let dx = sim.get_grid().get_dx();
        let x = sim.get_grid().get_x().clone();
        let mut last = utils::variance_x(&x, sim.get_psi(), dx);
        for _ in 0..10 {
            sim.run(50).unwrap();
            let var = utils::variance_x(&x, sim.get_psi(), dx);
            assert!(
                var > last,
                "variance failed to grow: {last} -> {var} at step {}",
                sim.get_step_count(),
            );
            last = var;
        }
    }

    #[test]
    fn energy_expectation_is_conserved() {
        let grid = Grid::new(1.0, 201).unwrap();
        let dt = grid.default_dt();
        let dx = grid.get_dx();
        let field = PotentialField::from_samples(
            &grid,
            &potential::barrier(&grid, 120.0, 0.1, 0.6),
        ).unwrap();
        let q0 = states::gaussian(&grid, 0.3, 0.05, 12.0);
        let mut sim = SimulationState::new(grid, field, &q0, dt).unwrap();
        let before =
            utils::expectation_energy(sim.get_hamiltonian(), sim.get_psi(), dx);
        sim.run(2000).unwrap();
        let after =
            utils::expectation_energy(sim.get_hamiltonian(), sim.get_psi(), dx);
        assert!(
            (after - before).abs() < 1e-6 * before.abs(),
            "energy drifted from {before} to {after}"
        );
    }

    #[test]
    fn eigenstate_density_is_stationary() {
        // the sampled sine is an exact eigenvector of the discrete operator,
        // so its density must not move at all
        let grid = Grid::new(1.0, 201).unwrap();
        let dt = grid.default_dt();
        let field = PotentialField::zeros(&grid);
        let q0 = states::eigenstate(&grid, 2);
        let d0 = probability_density(&q0);
        let mut sim = SimulationState::new(grid, field, &q0, dt).unwrap();
        sim.run(2000).unwrap();
        let d1 = probability_density(sim.get_psi());
        let drift = nd::Zip::from(&d0).and(&d1)
            .fold(0.0_f64, |acc, a, b| acc.max((a - b).abs()));
        assert!(drift < 1e-9, "eigenstate density drifted by {drift:e}");
    }

    #[test]
    fn barrier_transmission_is_strictly_partial() {
        // mean kinetic energy ~250; barrier height 350 sits moderately above
        let grid = Grid::new(1.0, 601).unwrap();
        let dt = grid.default_dt();
        let dx = grid.get_dx();
        let x = grid.get_x().clone();
        let field = PotentialField::from_samples(
            &grid,
            &potential::barrier(&grid, 350.0, 0.05, 0.5),
        ).unwrap();
        let q0 = states::gaussian(&grid, 0.25, 0.05, 20.0);
        let mut sim = SimulationState::new(grid, field, &q0, dt).unwrap();

        let past_barrier = |sim: &SimulationState| -> f64 {
            let density = probability_density(sim.get_psi());
            let integrand: nd::Array1<f64> = nd::Zip::from(&x).and(&density)
                .map_collect(|xk, dk| if *xk > 0.525 { *dk } else { 0.0 });
            utils::trapz(&integrand, dx)
        };

        assert!(past_barrier(&sim) < 1e-6, "packet started past the barrier");
        // run to t = 0.02: the packet reaches the barrier at t ~ 0.0125 and
        // the transmitted lobe clears it well before the far wall
        let steps = (0.02 / dt).round() as usize;
        sim.run(steps).unwrap();
        let transmitted = past_barrier(&sim);
        let total = utils::wf_norm(sim.get_psi(), dx);
        assert!(
            transmitted > 1e-4,
            "no measurable transmission: {transmitted:e}"
        );
        assert!(
            transmitted < 0.9 * total,
            "packet passed almost entirely: {transmitted} of {total}"
        );
    }

    #[test]
    fn stale_operators_are_rejected_until_rebuilt() {
        let mut sim = free_session(101, 0.5, 0.05, 0.0);
        sim.run(10).unwrap();
        let psi_before = sim.get_psi().clone();

        let V = potential::barrier(sim.get_grid(), 50.0, 0.2, 0.5);
        sim.potential_mut().assign(&V).unwrap();
        let err = sim.step().unwrap_err();
        assert!(matches!(
            err,
            EvolveError::Stale { operator: 0, potential: 1 },
        ));
        // the failed step must not have touched the state
        assert_eq!(sim.get_psi(), &psi_before);
        assert_eq!(sim.get_step_count(), 10);

        sim.rebuild().unwrap();
        sim.step().unwrap();
        assert_eq!(sim.get_step_count(), 11);
    }

    #[test]
    fn set_dt_rederives_the_step_operators() {
        let mut sim = free_session(101, 0.5, 0.05, 0.0);
        sim.run(5).unwrap();
        sim.set_dt(5e-5).unwrap();
        assert_eq!(sim.get_dt(), 5e-5);
        sim.run(5).unwrap();
        assert_eq!(sim.get_step_count(), 10);
        assert!(matches!(sim.set_dt(-1.0), Err(EvolveError::BadTimeStep(_))));
    }

    #[test]
    fn reset_discards_history() {
        let mut sim = free_session(101, 0.5, 0.05, 5.0);
        sim.run(100).unwrap();
        assert!(sim.get_time() > 0.0);

        let fresh = states::eigenstate(sim.get_grid(), 1);
        sim.reset(&fresh).unwrap();
        assert_eq!(sim.get_time(), 0.0);
        assert_eq!(sim.get_step_count(), 0);
        assert_eq!(sim.get_psi(), &fresh);
    }

    #[test]
    fn evolve_yields_sampled_snapshots() {
        let mut sim = free_session(101, 0.5, 0.05, 5.0);
        let snaps: Vec<Snapshot> = sim.evolve(100, 30)
            .collect::<EvolveResult<_>>()
            .unwrap();
        // 30, 60, 90, then the 10-step remainder
        assert_eq!(snaps.len(), 4);
        assert_eq!(snaps[0].step, 30);
        assert_eq!(snaps[3].step, 100);
        assert_eq!(sim.get_step_count(), 100);
        let dt = sim.get_dt();
        assert!((snaps[3].time - 100.0 * dt).abs() < 1e-12);
    }

    #[test]
    fn history_retains_sampled_rows() {
        let mut sim = free_session(101, 0.5, 0.05, 5.0);
        let q0 = sim.get_psi().clone();
        let q = sim.evolve_history(100, 25).unwrap();
        assert_eq!(q.shape(), &[5, 101]);
        assert_eq!(q.slice(nd::s![0, ..]), q0.view());
        assert_eq!(q.slice(nd::s![4, ..]), sim.get_psi().view());
    }
}

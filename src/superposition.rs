use std::{ f64::consts::PI, fs, io::Write, path::Path };
use anyhow::Result;
use qbox::{ states, utils, Grid, PotentialField, SimulationState };

// superposition of two box eigenstates: the density sloshes at the beat
// frequency set by the level splitting

const L: f64 = 1.0;
const N: usize = 500;
const DT: f64 = 1e-5;
const NU1: usize = 1;
const NU2: usize = 3;

fn main() -> Result<()> {
    let grid = Grid::new(L, N)?;
    let dx = grid.get_dx();
    let field = PotentialField::zeros(&grid);
    let q0 = states::superposition(&grid, NU1, NU2);
    let mut sim = SimulationState::new(grid, field, &q0, DT)?;

    // continuum level energies E_n = n²π²/2L² set the beat period
    let e = |nu: usize| (nu as f64 * PI / L).powi(2) / 2.0;
    let period = 2.0 * PI / (e(NU2) - e(NU1));
    println!("beat period: {period:.5}");
    println!(
        "energy: {:.4} (continuum {:.4})",
        utils::expectation_energy(sim.get_hamiltonian(), sim.get_psi(), dx),
        (e(NU1) + e(NU2)) / 2.0,
    );

    // two full beats, sampled 50 times per beat
    let steps = (2.0 * period / DT).round() as usize;
    let sample_every = (steps / 100).max(1);

    let outdir = Path::new("output");
    fs::create_dir_all(outdir)?;
    let mut f = fs::File::create(outdir.join("superposition.csv"))?;
    writeln!(f, "t,x_mean")?;

    for snap in sim.evolve(steps, sample_every) {
        let snap = snap?;
        let xbar = utils::expectation_x(&snap.x, &snap.psi, dx);
        println!("t = {:.5}  <x> = {:+.5}", snap.time, xbar);
        writeln!(f, "{},{}", snap.time, xbar)?;
    }
    Ok(())
}

use std::{ fs, io::Write, path::Path };
use anyhow::Result;
use ndarray as nd;
use qbox::{ potential, states, utils, Grid, PotentialField, SimulationState };

// quantum tunneling through a single barrier taller than the packet's mean
// kinetic energy

const L: f64 = 1.0;
const N: usize = 600;
const STEPS: usize = 8000;
const SAMPLE_EVERY: usize = 200;

const X0: f64 = 0.25;
const SIGMA: f64 = 0.05;
const K0: f64 = 20.0;
const BARRIER_HEIGHT: f64 = 350.0;
const BARRIER_WIDTH: f64 = 0.05;
const BARRIER_CENTER: f64 = 0.5;

fn main() -> Result<()> {
    let grid = Grid::new(L, N)?;
    let dt = grid.default_dt();
    let dx = grid.get_dx();
    let x = grid.get_x().clone();

    let field = PotentialField::from_samples(
        &grid,
        &potential::barrier(&grid, BARRIER_HEIGHT, BARRIER_WIDTH, BARRIER_CENTER),
    )?;
    let q0 = states::gaussian(&grid, X0, SIGMA, K0);
    println!("barrier height:      {BARRIER_HEIGHT:.1}");
    println!("mean kinetic energy: {:.1}", utils::mean_kinetic_energy(&q0, dx));

    let mut sim = SimulationState::new(grid, field, &q0, dt)?;

    let outdir = Path::new("output");
    fs::create_dir_all(outdir)?;
    let mut f = fs::File::create(outdir.join("tunneling.csv"))?;
    writeln!(f, "t,reflected,transmitted")?;

    let edge = BARRIER_CENTER + BARRIER_WIDTH / 2.0;
    for snap in sim.evolve(STEPS, SAMPLE_EVERY) {
        let snap = snap?;
        let transmitted = region_probability(&x, &snap.density, dx, |xk| xk > edge);
        let reflected = region_probability(&x, &snap.density, dx, |xk| {
            xk < BARRIER_CENTER - BARRIER_WIDTH / 2.0
        });
        println!(
            "t = {:.5}  reflected = {:.4}  transmitted = {:.4}",
            snap.time, reflected, transmitted,
        );
        writeln!(f, "{},{},{}", snap.time, reflected, transmitted)?;
    }
    Ok(())
}

// probability mass in the part of the box selected by `mask`
fn region_probability<F>(
    x: &nd::Array1<f64>,
    density: &nd::Array1<f64>,
    dx: f64,
    mask: F,
) -> f64
where F: Fn(f64) -> bool
{
    let integrand: nd::Array1<f64> = nd::Zip::from(x).and(density)
        .map_collect(|xk, dk| if mask(*xk) { *dk } else { 0.0 });
    utils::trapz(&integrand, dx)
}

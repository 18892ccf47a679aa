use std::{ fs, io::Write, path::Path };
use anyhow::Result;
use ndarray as nd;
use qbox::{ potential, states, utils, Grid, PotentialField, SimulationState };

// resonant trapping between two barriers: probability builds up in the
// cavity while the packet leaks through both walls of it

const L: f64 = 1.0;
const N: usize = 600;
const STEPS: usize = 10_000;
const SAMPLE_EVERY: usize = 250;

const X0: f64 = 0.15;
const SIGMA: f64 = 0.05;
const K0: f64 = 25.0;
const HEIGHT: f64 = 450.0;
const WIDTH: f64 = 0.03;
const SEPARATION: f64 = 0.15;

fn main() -> Result<()> {
    let grid = Grid::new(L, N)?;
    let dt = grid.default_dt();
    let dx = grid.get_dx();
    let x = grid.get_x().clone();

    let field = PotentialField::from_samples(
        &grid,
        &potential::double_barrier(&grid, HEIGHT, WIDTH, SEPARATION),
    )?;
    let q0 = states::gaussian(&grid, X0, SIGMA, K0);
    println!("barrier height:      {HEIGHT:.1}");
    println!("mean kinetic energy: {:.1}", utils::mean_kinetic_energy(&q0, dx));

    let mut sim = SimulationState::new(grid, field, &q0, dt)?;

    // cavity bounds, inside the inner barrier edges
    let lo = L / 2.0 - SEPARATION / 2.0 + WIDTH / 2.0;
    let hi = L / 2.0 + SEPARATION / 2.0 - WIDTH / 2.0;

    let outdir = Path::new("output");
    fs::create_dir_all(outdir)?;
    let mut f = fs::File::create(outdir.join("double_barrier.csv"))?;
    writeln!(f, "t,cavity,transmitted")?;

    for snap in sim.evolve(STEPS, SAMPLE_EVERY) {
        let snap = snap?;
        let cavity = masked_probability(&x, &snap.density, dx, |xk| {
            (lo..hi).contains(&xk)
        });
        let transmitted =
            masked_probability(&x, &snap.density, dx, |xk| xk > hi + WIDTH);
        println!(
            "t = {:.5}  cavity = {:.4}  transmitted = {:.4}",
            snap.time, cavity, transmitted,
        );
        writeln!(f, "{},{},{}", snap.time, cavity, transmitted)?;
    }
    Ok(())
}

fn masked_probability<F>(
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

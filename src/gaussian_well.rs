use std::{ fs, io::Write, path::Path };
use anyhow::Result;
use qbox::{ states, utils, Grid, PotentialField, SimulationState, Snapshot };

// Gaussian wavepacket bouncing in an empty hard-walled box

const L: f64 = 1.0;
const N: usize = 500;
const DT: f64 = 1e-4;
const STEPS: usize = 5000;
const SAMPLE_EVERY: usize = 25;

fn main() -> Result<()> {
    let grid = Grid::new(L, N)?;
    let dx = grid.get_dx();
    let field = PotentialField::zeros(&grid);
    let q0 = states::gaussian(&grid, 0.2, 0.05, 50.0);
    println!("mean momentum: {:.2}", utils::mean_momentum(&q0, dx));
    let mut sim = SimulationState::new(grid, field, &q0, DT)?;

    let outdir = Path::new("output");
    fs::create_dir_all(outdir)?;
    write_grid(&outdir.join("gaussian_well_grid.csv"), &sim.snapshot())?;

    let mut frames = fs::File::create(outdir.join("gaussian_well_frames.csv"))?;
    for snap in sim.evolve(STEPS, SAMPLE_EVERY) {
        let snap = snap?;
        let norm2: f64 = utils::trapz(&snap.density, dx);
        let xbar = utils::expectation_x(&snap.x, &snap.psi, dx);
        println!(
            "step {:5}  t = {:.4}  P = {:.9}  <x> = {:+.4}",
            snap.step, snap.time, norm2, xbar,
        );
        write_frame(&mut frames, &snap)?;
    }
    Ok(())
}

fn write_grid(path: &Path, snap: &Snapshot) -> Result<()> {
    let mut f = fs::File::create(path)?;
    writeln!(f, "x,V")?;
    for (xk, vk) in snap.x.iter().zip(&snap.potential) {
        writeln!(f, "{xk},{vk}")?;
    }
    Ok(())
}

// one row per frame: time, then |psi|^2 at every grid point
fn write_frame(f: &mut fs::File, snap: &Snapshot) -> Result<()> {
    write!(f, "{}", snap.time)?;
    for dk in snap.density.iter() {
        write!(f, ",{dk:e}")?;
    }
    writeln!(f)?;
    Ok(())
}

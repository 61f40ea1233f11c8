//! Command-line front end for nozzle cases.
//!
//! ```text
//! nozzle mesh case.toml            # write the .geo script and mesh it
//! nozzle run case.toml -d run_1    # stage, mesh, solve, post-process
//! nozzle post case.toml -d run_1   # post-process an existing run
//! nozzle thrust case.toml -d run_1 # thrust and surface summary only
//! ```
//!
//! Logging follows `RUST_LOG` and defaults to `info`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use twine_core::Model;
use twine_nozzle::{
    models::aero::nozzle::{
        Freestream, NozzleConfig, NozzlePipeline, NozzlePostProcessor, SurfacePatch,
        generate_nozzle_mesh, integrate_thrust, isentropic_reference, nozzle_script,
    },
    support::{
        gmsh::GmshMesher,
        su2::{Solution, Su2Mesh},
    },
};
use uom::si::{area::square_meter, force::newton, pressure::pascal};

#[derive(Parser, Debug)]
#[command(name = "nozzle", version, about = "Gmsh + SU2 nozzle analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the geometry script and mesh it.
    Mesh {
        #[command(flatten)]
        case: CaseArgs,
        /// Print the script instead of writing and meshing it.
        #[arg(long)]
        script_only: bool,
    },
    /// Stage, mesh, run SU2, and post-process.
    Run(CaseArgs),
    /// Post-process a finished run.
    Post(CaseArgs),
    /// Integrate thrust over the thrust marker of a finished run.
    Thrust {
        #[command(flatten)]
        case: CaseArgs,
        /// Marker to integrate over instead of `post.thrust_marker`.
        #[arg(long)]
        marker: Option<String>,
    },
}

#[derive(Args, Debug)]
struct CaseArgs {
    /// Case file (TOML).
    case: PathBuf,
    /// Run directory; defaults to the case file's directory.
    #[arg(short = 'd', long)]
    run_dir: Option<PathBuf>,
}

impl CaseArgs {
    fn load(&self) -> anyhow::Result<(NozzleConfig, PathBuf)> {
        let config = NozzleConfig::load(&self.case)
            .with_context(|| format!("loading {}", self.case.display()))?;
        let run_dir = match &self.run_dir {
            Some(dir) => dir.clone(),
            None => self
                .case
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        };
        Ok((config, run_dir))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Mesh { case, script_only } => {
            let (config, run_dir) = case.load()?;
            if script_only {
                print!("{}", nozzle_script(&config)?.as_str());
                return Ok(());
            }
            fs::create_dir_all(&run_dir)
                .with_context(|| format!("creating {}", run_dir.display()))?;
            let mesher = GmshMesher::new(&config.mesh.mesher);
            let mesh = generate_nozzle_mesh(&config, &run_dir, &mesher)?;
            println!("{}", mesh.display());
        }
        Command::Run(case) => {
            let (config, run_dir) = case.load()?;
            let responses = NozzlePipeline::from_config(config).call(&run_dir)?;
            print!("{responses}");
        }
        Command::Post(case) => {
            let (config, run_dir) = case.load()?;
            let responses = NozzlePostProcessor::new(config).call(&run_dir)?;
            print!("{responses}");
        }
        Command::Thrust { case, marker } => {
            let (config, run_dir) = case.load()?;
            thrust(&config, &run_dir, marker.as_deref())?;
        }
    }
    Ok(())
}

fn thrust(config: &NozzleConfig, run_dir: &Path, marker: Option<&str>) -> anyhow::Result<()> {
    let mesh = Su2Mesh::read(&run_dir.join(&config.su2.mesh_name))?;
    let solution = Solution::read(&run_dir.join(&config.su2.solution_name))?;
    let marker = marker.unwrap_or(&config.post.thrust_marker);

    let patch = SurfacePatch::extract(&mesh, &[marker])?;
    let freestream = Freestream {
        velocity: config.freestream_velocity()?,
        pressure: config.ambient_pressure(),
    };
    let thrust = integrate_thrust(&patch, &solution, freestream, config.post.thrust_integration)?;

    println!("marker     = {marker}");
    println!("facets     = {}", thrust.facets);
    println!("area       = {:.6e} m2", thrust.area.get::<square_meter>());
    println!("thrust     = {:.6e} N", thrust.force.get::<newton>());

    if let Some(estimate) = isentropic_reference(config)? {
        println!("ideal Me   = {:.4}", estimate.exit_mach);
        println!("ideal pe   = {:.6e} Pa", estimate.exit_pressure.get::<pascal>());
        println!("ideal F    = {:.6e} N", estimate.thrust.get::<newton>());
    }
    Ok(())
}

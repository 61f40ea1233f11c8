//! Axisymmetric exhaust nozzle models.
//!
//! This module provides [`twine_core::Model`] implementations that analyze a
//! nozzle with Gmsh and SU2. The computational core is in the internal
//! `core` module; the models here hold a [`NozzleConfig`] and delegate to it.
//!
//! - [`NozzlePipeline`] runs a whole case in a directory: staging, meshing,
//!   solving, and post-processing.
//! - [`NozzlePostProcessor`] reduces a directory SU2 has already run in.

mod core;

pub use self::core::{
    AreaRatioOverflow, ConfigError, Environment, Facet, Fluid, Freestream, GeometryError,
    Gradients, Inlet, IsentropicError, IsentropicEstimate, Mesh, MeshLayout, Method, Mission,
    NozzleConfig, NozzleError, OutputFormat, Post, QoiKind, QoiRequest, QoiValue, Responses,
    Su2, SurfacePatch, Thrust, ThrustIntegration, Wall, WallBSpline, WallSpline,
    generate_nozzle_mesh, integrate_thrust, isentropic_reference, nozzle_script, post_process,
    run_case, run_su2, stage_files, write_su2_config,
};

use std::path::PathBuf;

use twine_core::Model;

use crate::support::{
    gmsh::{GmshMesher, Mesher},
    su2::{Solver, Su2Solver},
};

/// Reduces a finished SU2 run to its quantities of interest.
///
/// The input is the run directory.
#[derive(Debug, Clone)]
pub struct NozzlePostProcessor {
    config: NozzleConfig,
}

impl NozzlePostProcessor {
    #[must_use]
    pub fn new(config: NozzleConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &NozzleConfig {
        &self.config
    }
}

impl Model for NozzlePostProcessor {
    type Input = PathBuf;
    type Output = Responses;
    type Error = NozzleError;

    fn call(&self, run_dir: &Self::Input) -> Result<Self::Output, Self::Error> {
        post_process(&self.config, run_dir)
    }
}

/// Runs a complete nozzle case in the input directory.
///
/// The mesher and solver are generic so tests and alternative installations
/// can substitute their own; [`NozzlePipeline::from_config`] builds the
/// Gmsh and SU2 executables named in the configuration.
#[derive(Debug, Clone)]
pub struct NozzlePipeline<M, S> {
    config: NozzleConfig,
    mesher: M,
    solver: S,
}

impl NozzlePipeline<GmshMesher, Su2Solver> {
    #[must_use]
    pub fn from_config(config: NozzleConfig) -> Self {
        let mesher = GmshMesher::new(&config.mesh.mesher);
        let solver = Su2Solver::new(&config.su2.executable)
            .with_processes(config.su2.processes)
            .with_mpi_launcher(&config.su2.mpi_launcher);
        Self::new(config, mesher, solver)
    }
}

impl<M, S> NozzlePipeline<M, S> {
    #[must_use]
    pub fn new(config: NozzleConfig, mesher: M, solver: S) -> Self {
        Self {
            config,
            mesher,
            solver,
        }
    }

    #[must_use]
    pub fn config(&self) -> &NozzleConfig {
        &self.config
    }
}

impl<M: Mesher, S: Solver> Model for NozzlePipeline<M, S> {
    type Input = PathBuf;
    type Output = Responses;
    type Error = NozzleError;

    fn call(&self, run_dir: &Self::Input) -> Result<Self::Output, Self::Error> {
        log::info!("running nozzle case in {}", run_dir.display());
        run_case(&self.config, run_dir, &self.mesher, &self.solver)
    }
}

use thiserror::Error;

use crate::support::{
    gmsh::MesherError,
    su2::{SolverError, Su2Error},
};

use super::{config::ConfigError, isentropic::IsentropicError};

/// Errors from meshing, solving, or post-processing a nozzle case.
#[derive(Debug, Error)]
pub enum NozzleError {
    #[error("invalid nozzle configuration")]
    Config(#[from] ConfigError),

    #[error("I/O error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No interior wall point lies at the thrust station.
    #[error("no interior wall point matches x_thrust = {x_thrust}")]
    ThrustStation { x_thrust: f64 },

    #[error("mesh generation failed")]
    Mesher(#[from] MesherError),

    #[error("SU2 run failed")]
    Solver(#[from] SolverError),

    #[error("SU2 file error")]
    Su2(#[from] Su2Error),

    /// The solution has fewer rows than the mesh has points.
    #[error("solution has {rows} rows but the mesh has {points} points")]
    SolutionSize { points: usize, rows: usize },

    #[error("surface has no facets")]
    EmptySurface,

    /// Averaged density below the vacuum threshold.
    #[error("facet {facet} has vanishing density {density:e}")]
    VanishingDensity { facet: usize, density: f64 },

    #[error("wall markers have zero total area")]
    ZeroWallArea,

    #[error("point ({x}, {y}) is outside the mesh")]
    OutsideMesh { x: f64, y: f64 },

    #[error("WALL_TEMPERATURE is not available from SU2")]
    WallTemperatureUnavailable,

    #[error("QoI {name} needs sample locations")]
    MissingLocations { name: String },

    /// The adjoint gradient doesn't fit the design vector.
    #[error("adjoint gradient has {found} entries; expected {expected} of {total}")]
    GradientSize {
        expected: usize,
        found: usize,
        total: usize,
    },

    #[error("isentropic estimate failed")]
    Isentropic(#[from] IsentropicError),
}

impl NozzleError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

//! Nozzle analysis core.
//!
//! A case runs in one directory: the wall is turned into a Gmsh script and
//! meshed, SU2 is configured from a template and run to a steady state, and
//! the restart file is read back and reduced to quantities of interest.
//! [`run_case`] strings the stages together; each stage is also usable on
//! its own.

mod cfd;
mod config;
mod error;
mod geo_script;
mod geometry;
mod isentropic;
mod mesh;
mod pipeline;
mod post_process;
mod probe;
mod qoi;
mod staging;
mod surface;
mod thrust;
mod wall;

#[cfg(test)]
pub(crate) mod test_support;

pub use cfd::{run_su2, write_su2_config};
pub use config::{
    ConfigError, Environment, Fluid, Gradients, Inlet, Method, Mesh, MeshLayout, Mission,
    NozzleConfig, OutputFormat, Post, QoiRequest, Su2, Wall, WallBSpline,
};
pub use error::NozzleError;
pub use geometry::{GeometryError, WallSpline};
pub use isentropic::{AreaRatioOverflow, IsentropicError, IsentropicEstimate};
pub use mesh::{generate_nozzle_mesh, nozzle_script};
pub use pipeline::{isentropic_reference, run_case};
pub use post_process::post_process;
pub use qoi::{QoiKind, QoiValue, Responses};
pub use staging::stage_files;
pub use surface::{Facet, SurfacePatch};
pub use thrust::{Freestream, Thrust, ThrustIntegration, integrate_thrust};

/// Tolerance for matching `x_thrust` to a wall point.
pub(crate) const THRUST_MATCH_TOL: f64 = 1e-6;

//! SU2 file formats and solver invocation.
//!
//! Covers the subset of SU2 I/O a nozzle analysis touches:
//!
//! - [`Su2Mesh`]: native `.su2` mesh with boundary markers
//! - [`Solution`]: ASCII restart/solution files (one row per mesh point)
//! - [`History`]: convergence history in CSV or Tecplot form
//! - [`Su2Config`]: `KEY= value` configuration files, edited in place
//! - [`read_gradients`]: discrete-adjoint gradient output
//! - [`Solver`]: the seam around `SU2_CFD`

mod config;
mod error;
mod gradients;
mod history;
mod mesh;
mod solution;
mod solver;

pub use config::Su2Config;
pub use error::Su2Error;
pub use gradients::read_gradients;
pub use history::{Convergence, History};
pub use mesh::{Element, ElementKind, Marker, Su2Mesh};
pub use solution::{Field, Solution};
pub use solver::{Solver, SolverError, Su2Solver};

/// Splits a data line on commas, tabs, and spaces, dropping empty tokens.
fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

/// Strips surrounding quotes and whitespace from a header name.
fn unquote(name: &str) -> &str {
    name.trim().trim_matches('"').trim()
}

/// Splits a quoted header line into names.
///
/// Names may contain spaces inside quotes (`"Res_Flow[0]"` never does, but
/// Tecplot titles do), so commas and tabs delimit; bare whitespace delimits
/// only when the line has neither.
fn header_names(line: &str) -> Vec<String> {
    let names: Vec<&str> = if line.contains(',') {
        line.split(',').collect()
    } else if line.contains('\t') {
        line.split('\t').collect()
    } else {
        line.split_whitespace().collect()
    };

    names
        .into_iter()
        .map(unquote)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

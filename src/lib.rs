//! # Twine Nozzle
//!
//! Nozzle analysis models and tooling for
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! The high-fidelity path writes a parametric Gmsh geometry script for an
//! axisymmetric nozzle, meshes it, drives SU2 to a steady state, and reduces
//! the resulting flow field to quantities of interest such as thrust and
//! area-averaged wall pressure.
//!
//! ## Crate layout
//!
//! - [`models`]: Nozzle [`twine_core::Model`] implementations.
//! - [`support`]: File formats, external process seams, and physical helpers
//!   used by models.
//!
//! ## External tools
//!
//! Gmsh and SU2 are treated as opaque executables. This crate only writes the
//! files they consume and reads the files they produce, so both the mesher and
//! the solver sit behind traits ([`support::gmsh::Mesher`],
//! [`support::su2::Solver`]) that tests replace with fakes.

pub mod models;
pub mod support;

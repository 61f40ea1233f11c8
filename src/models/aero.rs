//! Aerodynamic models.
//!
//! This module contains models for propulsive flow paths, starting with
//! axisymmetric exhaust nozzles analyzed by an external CFD solver.

pub mod nozzle;

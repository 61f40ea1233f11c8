//! Supporting utilities used by models.
//!
//! These modules are public because they're useful on their own (reading an
//! SU2 restart file, writing a Gmsh script), but their APIs are not stable.

pub mod constraint;
pub mod gas;
pub mod gmsh;
pub mod process;
pub mod su2;
pub mod units;

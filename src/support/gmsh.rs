//! Gmsh geometry scripts and mesher invocation.
//!
//! [`GeoScript`] accumulates `.geo` statements with explicit entity tags, the
//! way hand-written Gmsh scripts do. [`Mesher`] is the seam around the `gmsh`
//! executable; [`GmshMesher`] is the real implementation.
//!
//! ```
//! use twine_nozzle::support::gmsh::GeoScript;
//!
//! let mut geo = GeoScript::new();
//! geo.point(1, 0.0, 0.0, 0.3);
//! geo.point(2, 1.0, 0.0, 0.3);
//! geo.line(1, 1, 2);
//!
//! assert!(geo.as_str().starts_with("Point(1) = {0.000000, 0.000000, 0, 0.300000};\n"));
//! ```

mod mesher;
mod script;

pub use mesher::{GmshMesher, Mesher, MesherError};
pub use script::{BoundaryLayerField, BoxField, GeoScript};

use std::path::{Path, PathBuf};

use crate::support::gmsh::{GeoScript, Mesher};

use super::{
    NozzleError,
    config::{MeshLayout, NozzleConfig},
    geo_script::{self, GeoParams},
};

/// Builds the `.geo` script for `config` without writing it.
///
/// # Errors
///
/// Returns [`NozzleError`] if the wall is invalid or misses the thrust
/// station.
pub fn nozzle_script(config: &NozzleConfig) -> Result<GeoScript, NozzleError> {
    let (x, y) = config.wall.coordinates()?;
    let params = GeoParams {
        x: &x,
        y: &y,
        x_thrust: config.wall.x_thrust,
        hl: config.mesh.hl,
        method: config.method,
        bl_ds: config.mesh.bl_ds,
        bl_ratio: config.mesh.bl_ratio,
        bl_thickness: config.mesh.bl_thickness,
    };
    match config.mesh.layout {
        MeshLayout::Sharp => geo_script::sharp(&params),
        MeshLayout::RoundedEdges => geo_script::rounded_edges(&params),
    }
}

/// Writes the geometry script into `run_dir` and meshes it.
///
/// Returns the path of the mesh file.
///
/// # Errors
///
/// Returns [`NozzleError`] if the script can't be built or written, or if
/// the mesher fails.
pub fn generate_nozzle_mesh(
    config: &NozzleConfig,
    run_dir: &Path,
    mesher: &impl Mesher,
) -> Result<PathBuf, NozzleError> {
    let script = nozzle_script(config)?;
    let geo_path = run_dir.join(&config.mesh.geo_name);
    script
        .write(&geo_path)
        .map_err(|e| NozzleError::io(&geo_path, e))?;

    let mesh_path = run_dir.join(&config.su2.mesh_name);
    log::info!(
        "meshing {} ({:?} layout) into {}",
        geo_path.display(),
        config.mesh.layout,
        mesh_path.display()
    );
    mesher.mesh(&geo_path, &mesh_path)?;
    Ok(mesh_path)
}

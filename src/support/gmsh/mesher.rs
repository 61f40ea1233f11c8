use std::{ffi::OsString, path::Path};

use thiserror::Error;

use crate::support::process::{Invocation, ProcessError};

/// Errors from generating a mesh.
#[derive(Debug, Error)]
pub enum MesherError {
    #[error("mesher process failed")]
    Process(#[from] ProcessError),

    /// The mesher reported success but the output file is missing.
    #[error("mesher produced no output at {path}")]
    MissingOutput { path: String },
}

/// Turns a geometry script into a mesh file.
pub trait Mesher {
    /// Meshes `script`, writing the result to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`MesherError`] if meshing fails.
    fn mesh(&self, script: &Path, output: &Path) -> Result<(), MesherError>;
}

/// Runs the `gmsh` executable in batch mode, meshing in two dimensions.
///
/// The output format is inferred by Gmsh from the output extension, so an
/// output path ending in `.su2` produces an SU2 native mesh directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmshMesher {
    executable: OsString,
}

impl Default for GmshMesher {
    fn default() -> Self {
        Self::new("gmsh")
    }
}

impl GmshMesher {
    #[must_use]
    pub fn new(executable: impl Into<OsString>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub(crate) fn invocation(&self, script: &Path, output: &Path) -> Invocation {
        Invocation::new(&self.executable)
            .arg("-2")
            .arg(script)
            .arg("-o")
            .arg(output)
    }
}

impl Mesher for GmshMesher {
    fn mesh(&self, script: &Path, output: &Path) -> Result<(), MesherError> {
        self.invocation(script, output).run()?;

        if !output.exists() {
            return Err(MesherError::MissingOutput {
                path: output.display().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_invocation_meshes_in_two_dimensions() {
        let invocation =
            GmshMesher::default().invocation(Path::new("nozzle_tmp.geo"), Path::new("nozzle.su2"));
        assert_eq!(invocation.to_string(), "gmsh -2 nozzle_tmp.geo -o nozzle.su2");
    }

    #[test]
    fn custom_executable() {
        let invocation = GmshMesher::new("/opt/gmsh/bin/gmsh")
            .invocation(Path::new("a.geo"), Path::new("a.su2"));
        assert_eq!(invocation.to_string(), "/opt/gmsh/bin/gmsh -2 a.geo -o a.su2");
    }
}

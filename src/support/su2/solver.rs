use std::{ffi::OsString, path::Path};

use thiserror::Error;

use crate::support::process::{Invocation, ProcessError};

/// Errors from running the flow solver.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver process failed")]
    Process(#[from] ProcessError),

    #[error("run directory {path} does not exist")]
    MissingRunDir { path: String },
}

/// Runs a CFD case described by a configuration file.
pub trait Solver {
    /// Runs the case `config` (relative to `run_dir`) with `run_dir` as the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if the solver fails.
    fn solve(&self, config: &Path, run_dir: &Path) -> Result<(), SolverError>;
}

/// Runs `SU2_CFD`, optionally under an MPI launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Su2Solver {
    executable: OsString,
    processes: usize,
    mpi_launcher: OsString,
}

impl Default for Su2Solver {
    fn default() -> Self {
        Self {
            executable: OsString::from("SU2_CFD"),
            processes: 1,
            mpi_launcher: OsString::from("mpirun"),
        }
    }
}

impl Su2Solver {
    #[must_use]
    pub fn new(executable: impl Into<OsString>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    /// Runs with `processes` MPI ranks; one rank runs without a launcher.
    #[must_use]
    pub fn with_processes(mut self, processes: usize) -> Self {
        self.processes = processes.max(1);
        self
    }

    #[must_use]
    pub fn with_mpi_launcher(mut self, launcher: impl Into<OsString>) -> Self {
        self.mpi_launcher = launcher.into();
        self
    }

    pub(crate) fn invocation(&self, config: &Path, run_dir: &Path) -> Invocation {
        let invocation = if self.processes > 1 {
            Invocation::new(&self.mpi_launcher)
                .arg("-np")
                .arg(self.processes.to_string())
                .arg(&self.executable)
        } else {
            Invocation::new(&self.executable)
        };
        invocation.arg(config).current_dir(run_dir)
    }
}

impl Solver for Su2Solver {
    fn solve(&self, config: &Path, run_dir: &Path) -> Result<(), SolverError> {
        if !run_dir.is_dir() {
            return Err(SolverError::MissingRunDir {
                path: run_dir.display().to_string(),
            });
        }
        self.invocation(config, run_dir).run()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_run() {
        let invocation =
            Su2Solver::default().invocation(Path::new("nozzle.cfg"), Path::new("run"));
        assert_eq!(invocation.to_string(), "SU2_CFD nozzle.cfg");
        assert_eq!(invocation.working_dir.as_deref(), Some(Path::new("run")));
    }

    #[test]
    fn parallel_run_uses_launcher() {
        let invocation = Su2Solver::new("SU2_CFD_AD")
            .with_processes(8)
            .with_mpi_launcher("srun")
            .invocation(Path::new("nozzle.cfg"), Path::new("."));
        assert_eq!(invocation.to_string(), "srun -np 8 SU2_CFD_AD nozzle.cfg");
    }

    #[test]
    fn zero_processes_means_serial() {
        let invocation = Su2Solver::default()
            .with_processes(0)
            .invocation(Path::new("a.cfg"), Path::new("."));
        assert_eq!(invocation.to_string(), "SU2_CFD a.cfg");
    }

    #[test]
    fn missing_run_dir_is_reported() {
        let result = Su2Solver::default().solve(
            Path::new("nozzle.cfg"),
            Path::new("/definitely/not/a/run/dir"),
        );
        assert!(matches!(result, Err(SolverError::MissingRunDir { .. })));
    }
}

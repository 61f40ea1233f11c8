//! Invocation of external executables.
//!
//! Gmsh and SU2 are run as child processes with stdout and stderr captured.
//! A failed run keeps the tail of the combined output so the error is useful
//! without rerunning the tool by hand.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use thiserror::Error;

/// Number of trailing output lines retained in a [`ProcessError::Failed`].
const OUTPUT_TAIL_LINES: usize = 40;

/// Errors from running an external executable.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be started (missing from `PATH`, not executable).
    #[error("failed to launch `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The executable ran and exited unsuccessfully.
    #[error("`{command}` exited with {status}")]
    Failed {
        command: String,
        status: ExitStatus,
        /// Last lines of combined stdout/stderr.
        output_tail: String,
    },
}

/// A fully specified external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Runs the command to completion and returns its combined output.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] if the command can't be started or exits
    /// with a non-zero status.
    pub fn run(&self) -> Result<String, ProcessError> {
        log::info!("running {self}");

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| ProcessError::Spawn {
            command: self.to_string(),
            source,
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(ProcessError::Failed {
                command: self.to_string(),
                status: output.status,
                output_tail: tail(&combined, OUTPUT_TAIL_LINES),
            });
        }

        log::debug!("`{}` finished ({} bytes of output)", self, combined.len());
        Ok(combined)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

use thiserror::Error;

/// Errors from reading or writing SU2 files.
#[derive(Debug, Error)]
pub enum Su2Error {
    #[error("I/O error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed content at a specific line (1-based).
    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    /// A required section or keyword is absent.
    #[error("{file}: missing {what}")]
    Missing { file: String, what: String },

    #[error("unknown element type {0}")]
    UnknownElement(u32),

    #[error("no marker tagged `{0}`")]
    UnknownMarker(String),

    /// None of the accepted names for a column are present.
    #[error("no column named any of {candidates:?}")]
    UnknownColumn { candidates: Vec<String> },

    /// A point referenced by an element is missing from the point list or solution.
    #[error("point {index} out of range (have {count})")]
    PointOutOfRange { index: usize, count: usize },
}

impl Su2Error {
    pub(super) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(super) fn parse(file: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.to_owned(),
            line,
            message: message.into(),
        }
    }

    pub(super) fn missing(file: &str, what: impl Into<String>) -> Self {
        Self::Missing {
            file: file.to_owned(),
            what: what.into(),
        }
    }
}

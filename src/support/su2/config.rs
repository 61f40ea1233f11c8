use std::{fmt, fs, path::Path};

use super::Su2Error;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Comment, blank, or anything that isn't `KEY= value`; kept verbatim.
    Verbatim(String),
    Option { key: String, value: String },
}

/// An SU2 configuration file (`KEY= value` per line, `%` comments).
///
/// Options are edited in place so a template keeps its layout and comments
/// when written back out; new options are appended at the end.
///
/// ```
/// use twine_nozzle::support::su2::Su2Config;
///
/// let mut config = Su2Config::parse("% flow\nMACH_NUMBER= 0.5\n");
/// config.set("MACH_NUMBER", "0.9");
/// config.set("MESH_FILENAME", "nozzle.su2");
///
/// assert_eq!(config.to_string(), "% flow\nMACH_NUMBER= 0.9\nMESH_FILENAME= nozzle.su2\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Su2Config {
    lines: Vec<Line>,
}

impl Su2Config {
    /// Reads a configuration template from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error::Io`] if the file can't be read.
    pub fn read(path: &Path) -> Result<Self, Su2Error> {
        let text = fs::read_to_string(path).map_err(|e| Su2Error::io(path, e))?;
        Ok(Self::parse(&text))
    }

    #[must_use]
    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| {
                let trimmed = line.trim();
                if trimmed.starts_with('%') {
                    return Line::Verbatim(line.to_owned());
                }
                match trimmed.split_once('=') {
                    Some((key, value)) if !key.trim().is_empty() => Line::Option {
                        key: key.trim().to_owned(),
                        value: value.trim().to_owned(),
                    },
                    _ => Line::Verbatim(line.to_owned()),
                }
            })
            .collect();
        Self { lines }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Option { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Sets `key`, replacing every existing occurrence or appending it.
    pub fn set(&mut self, key: &str, value: impl fmt::Display) {
        let value = value.to_string();
        let mut found = false;
        for line in &mut self.lines {
            match line {
                Line::Option { key: k, value: v } if k == key => {
                    v.clone_from(&value);
                    found = true;
                }
                _ => {}
            }
        }
        if !found {
            self.lines.push(Line::Option {
                key: key.to_owned(),
                value,
            });
        }
    }

    /// Writes the configuration to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error::Io`] if the file can't be written.
    pub fn write(&self, path: &Path) -> Result<(), Su2Error> {
        fs::write(path, self.to_string()).map_err(|e| Su2Error::io(path, e))?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

impl fmt::Display for Su2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Verbatim(text) => writeln!(f, "{text}")?,
                Line::Option { key, value } => writeln!(f, "{key}= {value}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
% ------------- DIRECT, ADJOINT, AND LINEARIZED PROBLEM DEFINITION ------------%
SOLVER= EULER
MATH_PROBLEM= DIRECT

% ----------------------- FREESTREAM DEFINITION -------------------------------%
MACH_NUMBER= 0.5
FREESTREAM_PRESSURE= 101325.0
MARKER_EULER= ( 1, 2, 3 )
";

    #[test]
    fn preserves_layout_and_replaces_values() {
        let mut config = Su2Config::parse(TEMPLATE);
        config.set("MACH_NUMBER", 0.9);
        config.set("FREESTREAM_PRESSURE", 18_753.9);

        let text = config.to_string();
        assert!(text.starts_with("% ------------- DIRECT, ADJOINT"));
        assert!(text.contains("\n\n% ----------------------- FREESTREAM"));
        assert!(text.contains("MACH_NUMBER= 0.9\n"));
        assert!(text.contains("FREESTREAM_PRESSURE= 18753.9\n"));
        assert_eq!(config.get("MARKER_EULER"), Some("( 1, 2, 3 )"));
    }

    #[test]
    fn appends_new_keys() {
        let mut config = Su2Config::parse(TEMPLATE);
        config.set("MESH_FILENAME", "nozzle.su2");

        assert!(config.to_string().ends_with("MESH_FILENAME= nozzle.su2\n"));
        assert_eq!(config.get("MESH_FILENAME"), Some("nozzle.su2"));
        assert_eq!(config.get("GAMMA_VALUE"), None);
    }

    #[test]
    fn write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nozzle.cfg");

        let mut config = Su2Config::parse(TEMPLATE);
        config.set("SOLVER", "RANS");
        config.write(&path).unwrap();

        let read = Su2Config::read(&path).unwrap();
        assert_eq!(read.get("SOLVER"), Some("RANS"));
        assert_eq!(read, config);
    }
}

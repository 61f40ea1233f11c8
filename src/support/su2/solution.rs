use std::{fs, path::Path};

use super::{Su2Error, header_names, tokens};

/// Flow fields read from a solution file.
///
/// SU2 has renamed its output columns across releases, so each field is
/// looked up by a list of accepted names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Density,
    MomentumX,
    MomentumY,
    MomentumZ,
    Pressure,
    Temperature,
}

impl Field {
    /// Column names accepted for this field, most recent SU2 naming first.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Density => &["Density", "Conservative_1"],
            Self::MomentumX => &["Momentum_x", "X-Momentum", "Conservative_2"],
            Self::MomentumY => &["Momentum_y", "Y-Momentum", "Conservative_3"],
            // `Conservative_4` is energy in 2D and z-momentum in 3D.
            Self::MomentumZ => &["Momentum_z", "Z-Momentum"],
            Self::Pressure => &["Pressure"],
            Self::Temperature => &["Temperature"],
        }
    }
}

/// An ASCII SU2 solution or restart file.
///
/// Row `i` holds the values at mesh point `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Solution {
    /// Reads a solution from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error`] on I/O failure or malformed content.
    pub fn read(path: &Path) -> Result<Self, Su2Error> {
        let text = fs::read_to_string(path).map_err(|e| Su2Error::io(path, e))?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parses solution text; `file` labels error messages.
    ///
    /// Older restart files end with `KEY= value` metadata lines, which
    /// terminate the data block.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error`] on malformed content.
    pub fn parse(text: &str, file: &str) -> Result<Self, Su2Error> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| Su2Error::missing(file, "header line"))?;
        let names = header_names(header);

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            if line.contains('=') {
                break;
            }
            let row: Vec<f64> = tokens(line)
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|_| Su2Error::parse(file, line_no, "non-numeric value"))?;

            if row.len() < names.len() {
                return Err(Su2Error::parse(
                    file,
                    line_no,
                    format!("expected {} values, found {}", names.len(), row.len()),
                ));
            }
            rows.push(row);
        }

        Ok(Self { names, rows })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of points (rows).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column matching any of `candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error::UnknownColumn`] if none match.
    pub fn column_named(&self, candidates: &[&str]) -> Result<usize, Su2Error> {
        candidates
            .iter()
            .find_map(|candidate| self.names.iter().position(|name| name == candidate))
            .ok_or_else(|| Su2Error::UnknownColumn {
                candidates: candidates.iter().map(|&c| c.to_owned()).collect(),
            })
    }

    /// Column index of `field`.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error::UnknownColumn`] if the file lacks the field.
    pub fn column(&self, field: Field) -> Result<usize, Su2Error> {
        self.column_named(field.aliases())
    }

    /// All values at one point.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error::PointOutOfRange`] if `point` has no row.
    pub fn row(&self, point: usize) -> Result<&[f64], Su2Error> {
        self.rows
            .get(point)
            .map(Vec::as_slice)
            .ok_or(Su2Error::PointOutOfRange {
                index: point,
                count: self.rows.len(),
            })
    }
}

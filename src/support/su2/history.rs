use std::{fs, path::Path};

use super::{Su2Error, header_names, tokens};

/// A convergence history, stored by column.
///
/// Both SU2 history layouts are accepted:
///
/// - CSV: a quoted header line followed by comma-separated rows.
/// - Tecplot: `TITLE`/`VARIABLES=`/`ZONE` lines followed by rows.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

/// Residual behavior over a run, in SU2's log10 residual units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    pub initial: f64,
    pub last: f64,
    /// `initial - last`; positive when the residual dropped.
    pub reduction: f64,
}

impl Convergence {
    /// Density residual of the flow solver.
    pub const FLOW_RESIDUAL: &'static [&'static str] = &["Res_Flow[0]", "rms[Rho]"];

    /// Adjoint density residual of the discrete adjoint solver.
    pub const ADJOINT_RESIDUAL: &'static [&'static str] = &["Res_AdjFlow[0]", "rms[A_Rho]"];

    #[must_use]
    pub fn new(initial: f64, last: f64) -> Self {
        Self {
            initial,
            last,
            reduction: initial - last,
        }
    }

    /// True when the final residual is above the initial one.
    #[must_use]
    pub fn diverged(&self) -> bool {
        self.reduction < 0.0
    }
}

impl History {
    /// Reads a history file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error`] on I/O failure or malformed content.
    pub fn read(path: &Path) -> Result<Self, Su2Error> {
        let text = fs::read_to_string(path).map_err(|e| Su2Error::io(path, e))?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parses history text; `file` labels error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error`] on malformed content.
    pub fn parse(text: &str, file: &str) -> Result<Self, Su2Error> {
        let mut names: Option<Vec<String>> = None;
        let mut columns: Vec<Vec<f64>> = Vec::new();

        for (line_no, line) in text.lines().enumerate().map(|(i, l)| (i + 1, l.trim())) {
            if line.is_empty() {
                continue;
            }

            if names.is_none() {
                let header = match tecplot_variables(line) {
                    Some(variables) => header_names(variables),
                    None if is_tecplot_preamble(line) => continue,
                    None => header_names(line),
                };
                columns = vec![Vec::new(); header.len()];
                names = Some(header);
                continue;
            }

            if is_tecplot_preamble(line) {
                continue;
            }

            let row: Vec<f64> = tokens(line)
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|_| Su2Error::parse(file, line_no, "non-numeric value"))?;

            if row.len() < columns.len() {
                return Err(Su2Error::parse(
                    file,
                    line_no,
                    format!("expected {} values, found {}", columns.len(), row.len()),
                ));
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        let names = names.ok_or_else(|| Su2Error::missing(file, "header line"))?;
        Ok(Self { names, columns })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of recorded iterations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first column matching any of `candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error::UnknownColumn`] if none match.
    pub fn column(&self, candidates: &[&str]) -> Result<&[f64], Su2Error> {
        candidates
            .iter()
            .find_map(|candidate| self.names.iter().position(|name| name == candidate))
            .map(|index| self.columns[index].as_slice())
            .ok_or_else(|| Su2Error::UnknownColumn {
                candidates: candidates.iter().map(|&c| c.to_owned()).collect(),
            })
    }

    /// First and last values of the residual column among `candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error`] if the column is missing or has no rows.
    pub fn convergence(&self, candidates: &[&str]) -> Result<Convergence, Su2Error> {
        let column = self.column(candidates)?;
        match (column.first(), column.last()) {
            (Some(&initial), Some(&last)) => Ok(Convergence::new(initial, last)),
            _ => Err(Su2Error::missing("history", format!("rows for {candidates:?}"))),
        }
    }
}

fn tecplot_variables(line: &str) -> Option<&str> {
    let (key, rest) = line.split_once('=')?;
    key.trim()
        .eq_ignore_ascii_case("VARIABLES")
        .then_some(rest)
}

fn is_tecplot_preamble(line: &str) -> bool {
    let upper = line.to_ascii_uppercase();
    upper.starts_with("TITLE") || upper.starts_with("ZONE") || upper.starts_with("VARIABLES")
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const CSV: &str = "\
\"Iteration\",\"CL\",\"CD\",\"Res_Flow[0]\",\"Res_Flow[1]\"
0, 0.0, 0.0, -1.25, -0.5
1, 0.0, 0.0, -2.00, -1.0
2, 0.0, 0.0, -6.75, -5.5
";

    const TECPLOT: &str = "\
TITLE = \"SU2 Simulation\"
VARIABLES = \"Iteration\",\"rms[Rho]\",\"rms[RhoU]\"
ZONE T= \"Convergence history\"
0, -0.8, -0.2
10, -3.1, -2.4
";

    #[test]
    fn csv_flow_residual() {
        let history = History::parse(CSV, "history.csv").unwrap();
        assert_eq!(history.len(), 3);

        let convergence = history.convergence(Convergence::FLOW_RESIDUAL).unwrap();
        assert_relative_eq!(convergence.initial, -1.25);
        assert_relative_eq!(convergence.last, -6.75);
        assert_relative_eq!(convergence.reduction, 5.5);
        assert!(!convergence.diverged());
    }

    #[test]
    fn tecplot_with_newer_column_names() {
        let history = History::parse(TECPLOT, "history.dat").unwrap();
        assert_eq!(history.names(), ["Iteration", "rms[Rho]", "rms[RhoU]"]);

        let convergence = history.convergence(Convergence::FLOW_RESIDUAL).unwrap();
        assert_relative_eq!(convergence.reduction, 2.3, epsilon = 1e-12);
    }

    #[test]
    fn rising_residual_is_diverged() {
        let convergence = Convergence::new(-4.0, -1.5);
        assert!(convergence.diverged());
        assert_relative_eq!(convergence.reduction, -2.5);
    }

    #[test]
    fn adjoint_column_missing() {
        let history = History::parse(CSV, "history.csv").unwrap();
        assert!(matches!(
            history.convergence(Convergence::ADJOINT_RESIDUAL),
            Err(Su2Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn header_only_history_has_no_convergence() {
        let history = History::parse("\"Iteration\",\"rms[Rho]\"\n", "empty.csv").unwrap();
        assert!(history.is_empty());
        assert!(history.convergence(Convergence::FLOW_RESIDUAL).is_err());
    }
}

use std::{fs, path::Path};

use super::{Su2Error, tokens};

/// Reads the gradient column of an SU2 discrete-adjoint gradient file.
///
/// Each data line is `index, gradient[, step]`. Header and Tecplot lines
/// are skipped; the result is in file order.
///
/// # Errors
///
/// Returns [`Su2Error`] if the file can't be read, a data line has no
/// gradient column, or no gradients are present.
pub fn read_gradients(path: &Path) -> Result<Vec<f64>, Su2Error> {
    let text = fs::read_to_string(path).map_err(|e| Su2Error::io(path, e))?;
    let file = path.display().to_string();
    parse_gradients(&text, &file)
}

fn parse_gradients(text: &str, file: &str) -> Result<Vec<f64>, Su2Error> {
    let mut gradients = Vec::new();

    for (line_no, line) in text.lines().enumerate().map(|(i, l)| (i + 1, l.trim())) {
        let mut fields = tokens(line);
        let Some(Ok(_index)) = fields.next().map(str::parse::<f64>) else {
            continue;
        };
        let gradient = fields
            .next()
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| Su2Error::parse(file, line_no, "missing gradient value"))?;
        gradients.push(gradient);
    }

    if gradients.is_empty() {
        return Err(Su2Error::missing(file, "gradient values"));
    }
    Ok(gradients)
}

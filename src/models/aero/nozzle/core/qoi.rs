use std::{collections::BTreeMap, fmt};

use crate::support::su2::Convergence;

/// Quantities of interest a flow solution can be reduced to.
///
/// Requests are named freely (`THRUST`, `THRUST_2`, `WALL_PRES_AVG_AFT`) and
/// classified by the first known name they contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QoiKind {
    Thrust,
    WallPressureAverage,
    WallTemperatureAverage,
    /// Wall temperature profile; SU2 doesn't provide one.
    WallTemperature,
    WallPressure,
    Pressure,
    Velocity,
    Su2Residual,
}

impl QoiKind {
    /// Matched in order, so `WALL_PRESSURE` is checked before `PRESSURE`.
    const PATTERNS: [(&'static str, Self); 8] = [
        ("THRUST", Self::Thrust),
        ("WALL_PRES_AVG", Self::WallPressureAverage),
        ("WALL_TEMP_AVG", Self::WallTemperatureAverage),
        ("WALL_TEMPERATURE", Self::WallTemperature),
        ("WALL_PRESSURE", Self::WallPressure),
        ("PRESSURE", Self::Pressure),
        ("VELOCITY", Self::Velocity),
        ("SU2_RESIDUAL", Self::Su2Residual),
    ];

    #[must_use]
    pub fn classify(name: &str) -> Option<Self> {
        Self::PATTERNS
            .iter()
            .find(|(pattern, _)| name.contains(pattern))
            .map(|&(_, kind)| kind)
    }

    /// Whether this quantity is read from the flow field.
    #[must_use]
    pub fn needs_flow(self) -> bool {
        !matches!(self, Self::Su2Residual)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QoiValue {
    Scalar(f64),
    /// One value per requested location.
    Profile(Vec<f64>),
    /// One `(x, y, z)` vector per requested location.
    Vectors(Vec<[f64; 3]>),
}

impl QoiValue {
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for QoiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value:.6e}"),
            Self::Profile(values) => {
                let values: Vec<String> = values.iter().map(|v| format!("{v:.6e}")).collect();
                write!(f, "[{}]", values.join(", "))
            }
            Self::Vectors(vectors) => {
                let vectors: Vec<String> = vectors
                    .iter()
                    .map(|[x, y, z]| format!("({x:.6e}, {y:.6e}, {z:.6e})"))
                    .collect();
                write!(f, "[{}]", vectors.join(", "))
            }
        }
    }
}

/// Quantities of interest extracted from one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Responses {
    /// `None` marks a quantity that couldn't be trusted (diverged run).
    pub values: BTreeMap<String, Option<QoiValue>>,
    /// Adjoint gradients by quantity name.
    pub gradients: BTreeMap<String, Vec<f64>>,
    pub convergence: Convergence,
}

impl Responses {
    #[must_use]
    pub fn new(convergence: Convergence) -> Self {
        Self {
            values: BTreeMap::new(),
            gradients: BTreeMap::new(),
            convergence,
        }
    }

    /// The value of `name`, if it was computed.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QoiValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(QoiValue::as_scalar)
    }
}

impl fmt::Display for Responses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.values {
            match value {
                Some(value) => writeln!(f, "{name} = {value}")?,
                None => writeln!(f, "{name} = None")?,
            }
        }
        for (name, gradient) in &self.gradients {
            writeln!(f, "d({name}) = {}", QoiValue::Profile(gradient.clone()))?;
        }
        Ok(())
    }
}

//! Problem formulation for the area–Mach inversion.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};

use super::error::AreaRatioOverflow;

/// Isentropic area ratio `A/A*` at a given Mach number.
#[derive(Debug, Clone, Copy)]
pub(super) struct AreaMachModel {
    gamma: f64,
}

/// A Mach number with its area ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct AreaMach {
    pub mach: f64,
    pub area_ratio: f64,
}

impl AreaMachModel {
    pub(super) fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    /// `A/A* = (1/M)·[(2/(γ+1))·(1 + (γ−1)/2·M²)]^((γ+1)/(2(γ−1)))`
    pub(super) fn area_ratio(&self, mach: f64) -> f64 {
        let g = self.gamma;
        let base = 2.0 / (g + 1.0) * (1.0 + 0.5 * (g - 1.0) * mach * mach);
        base.powf((g + 1.0) / (2.0 * (g - 1.0))) / mach
    }
}

impl Model for AreaMachModel {
    type Input = f64;
    type Output = AreaMach;
    type Error = AreaRatioOverflow;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let mach = *input;
        let area_ratio = self.area_ratio(mach);
        if !area_ratio.is_finite() {
            return Err(AreaRatioOverflow { mach });
        }
        Ok(AreaMach { mach, area_ratio })
    }
}

/// Residual `A/A*(M) − target`.
#[derive(Debug, Clone, Copy)]
pub(super) struct AreaMachProblem {
    target: f64,
}

impl AreaMachProblem {
    pub(super) fn new(target: f64) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for AreaMachProblem {
    type Input = f64;
    type Output = AreaMach;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.area_ratio - self.target])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn sonic_throat_has_unit_area_ratio() {
        let model = AreaMachModel::new(1.4);
        assert_relative_eq!(model.area_ratio(1.0), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn tabulated_air_value() {
        // Isentropic tables, γ = 1.4: A/A* = 1.6875 at M = 2.
        let model = AreaMachModel::new(1.4);
        assert_relative_eq!(model.area_ratio(2.0), 1.687_5, epsilon = 1e-12);
    }

    #[test]
    fn overflow_is_a_model_error() {
        let model = AreaMachModel::new(1.000_001);
        assert_eq!(model.call(&100.0), Err(AreaRatioOverflow { mach: 100.0 }));
    }
}

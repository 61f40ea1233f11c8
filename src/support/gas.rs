//! Calorically perfect gas model.
//!
//! [`PerfectGas`] is the working-fluid model used throughout the nozzle
//! analysis: an ideal gas equation of state with constant heat capacities.
//! SU2 is configured with the same `gamma` and `R`, so the freestream velocity
//! and ambient density computed here are consistent with the solver.
//!
//! # Assumptions
//!
//! - Ideal gas equation of state: `p = ρ·R·T`
//! - Calorically perfect: `cp` and `cv` are constant

mod air;

use thiserror::Error;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{MassDensity, Pressure, SpecificHeatCapacity, ThermodynamicTemperature, Velocity},
    ratio::ratio,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    velocity::meter_per_second,
};

pub use air::Air;

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    units::{SpecificGasConstant, gas_constant_times_temperature},
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerfectGasParametersError {
    #[error("invalid gas constant R: {r:?}")]
    GasConstant { r: SpecificGasConstant },
    #[error("invalid cp: {cp:?}")]
    Cp { cp: SpecificHeatCapacity },
    #[error("invalid ratio of specific heats: gamma={gamma} (must be > 1)")]
    Gamma { gamma: f64 },
    #[error("non-physical heat capacities: cv = cp - R must be > 0; cp={cp:?}, R={r:?}, cv={cv:?}")]
    NonPhysicalCv {
        r: SpecificGasConstant,
        cp: SpecificHeatCapacity,
        cv: SpecificHeatCapacity,
    },
}

/// Constant parameters for the [`PerfectGas`] model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGasParameters {
    pub gas_constant: SpecificGasConstant,
    pub cp: SpecificHeatCapacity,
}

impl PerfectGasParameters {
    #[must_use]
    pub fn new(gas_constant: SpecificGasConstant, cp: SpecificHeatCapacity) -> Self {
        Self { gas_constant, cp }
    }

    /// Builds parameters from `R` and the ratio of specific heats.
    ///
    /// Uses `cp = γ·R / (γ − 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectGasParametersError::Gamma`] if `gamma` is not greater than one.
    pub fn from_gamma(
        gas_constant: SpecificGasConstant,
        gamma: f64,
    ) -> Result<Self, PerfectGasParametersError> {
        if StrictlyPositive::check(&(gamma - 1.0)).is_err() {
            return Err(PerfectGasParametersError::Gamma { gamma });
        }
        Ok(Self {
            gas_constant,
            cp: gas_constant * (gamma / (gamma - 1.0)),
        })
    }
}

/// Fluid constants required by the [`PerfectGas`] model.
pub trait PerfectGasFluid {
    /// Returns the constant parameters for use with [`PerfectGas`].
    fn parameters() -> PerfectGasParameters;
}

/// Perfect gas model (constant `cp`/`cv`) using the ideal gas equation of state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGas {
    r: SpecificGasConstant,
    cp: SpecificHeatCapacity,
    cv: SpecificHeatCapacity,
}

impl PerfectGas {
    /// Creates a perfect gas model from explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectGasParametersError`] if `R` or `cp` is not strictly
    /// positive or if `cv = cp - R` is non-physical.
    pub fn new(parameters: PerfectGasParameters) -> Result<Self, PerfectGasParametersError> {
        let PerfectGasParameters { gas_constant, cp } = parameters;

        if StrictlyPositive::check(&gas_constant.get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectGasParametersError::GasConstant { r: gas_constant });
        }

        if StrictlyPositive::check(&cp.get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectGasParametersError::Cp { cp });
        }

        let cv = cp - gas_constant;
        if StrictlyPositive::check(&cv.get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectGasParametersError::NonPhysicalCv {
                r: gas_constant,
                cp,
                cv,
            });
        }

        Ok(Self {
            r: gas_constant,
            cp,
            cv,
        })
    }

    /// Creates a perfect gas model using constants defined by `Fluid`.
    ///
    /// # Errors
    ///
    /// See [`PerfectGas::new`].
    pub fn of<Fluid: PerfectGasFluid>() -> Result<Self, PerfectGasParametersError> {
        Self::new(Fluid::parameters())
    }

    #[must_use]
    pub fn gas_constant(&self) -> SpecificGasConstant {
        self.r
    }

    #[must_use]
    pub fn cp(&self) -> SpecificHeatCapacity {
        self.cp
    }

    #[must_use]
    pub fn cv(&self) -> SpecificHeatCapacity {
        self.cv
    }

    /// Ratio of specific heats, `γ = cp / cv`.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        (self.cp / self.cv).get::<ratio>()
    }

    /// Computes density with `ρ = p / (R·T)`.
    #[must_use]
    pub fn density(&self, temperature: ThermodynamicTemperature, pressure: Pressure) -> MassDensity {
        pressure / gas_constant_times_temperature(self.r, temperature)
    }

    /// Computes the speed of sound with `a = √(γ·R·T)`.
    #[must_use]
    pub fn speed_of_sound(&self, temperature: ThermodynamicTemperature) -> Velocity {
        let rt = gas_constant_times_temperature(self.r, temperature);
        let a_squared = self.gamma() * rt.get::<joule_per_kilogram>();
        Velocity::new::<meter_per_second>(a_squared.sqrt())
    }
}

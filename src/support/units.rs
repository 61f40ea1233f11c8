//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for physical quantities at every public boundary.
//! This module adds the few quantities the nozzle models need that
//! [`uom`] doesn't name.

use uom::{
    si::{
        ISQ, Quantity, SI,
        f64::{AvailableEnergy, TemperatureInterval, ThermodynamicTemperature},
        temperature_interval, thermodynamic_temperature,
    },
    typenum::{N1, N2, P2, Z0},
};

/// Specific gas constant, J/kg·K in SI.
pub type SpecificGasConstant = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Computes `R·T`, the ideal gas `p/ρ`, in J/kg.
///
/// [`SpecificGasConstant`] carries a temperature-interval dimension, so the
/// absolute temperature is taken in kelvin explicitly.
#[must_use]
pub fn gas_constant_times_temperature(
    gas_constant: SpecificGasConstant,
    temperature: ThermodynamicTemperature,
) -> AvailableEnergy {
    let kelvin = temperature.get::<thermodynamic_temperature::kelvin>();
    gas_constant * TemperatureInterval::new::<temperature_interval::kelvin>(kelvin)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        available_energy::joule_per_kilogram, specific_heat_capacity::joule_per_kilogram_kelvin,
        thermodynamic_temperature::kelvin,
    };

    #[test]
    fn rt_of_air_at_room_temperature() {
        let r = SpecificGasConstant::new::<joule_per_kilogram_kelvin>(287.053);
        let t = ThermodynamicTemperature::new::<kelvin>(300.0);

        let rt = gas_constant_times_temperature(r, t);

        assert_relative_eq!(rt.get::<joule_per_kilogram>(), 86_115.9, epsilon = 1e-9);
    }
}

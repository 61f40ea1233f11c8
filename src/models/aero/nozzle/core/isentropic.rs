//! Quasi-one-dimensional isentropic estimate of nozzle performance.
//!
//! The estimate assumes a choked throat at the narrowest wall radius and
//! fully supersonic, shock-free expansion to the exit. It is a sanity
//! reference logged beside the CFD thrust, not a substitute for it.

mod config;
mod error;
mod problem;

pub use config::IsentropicConfig;
pub use error::{AreaRatioOverflow, IsentropicError};

use std::f64::consts::PI;

use twine_solvers::equation::bisection;
use uom::si::{
    f64::{Force, MassRate, Pressure, ThermodynamicTemperature, Velocity},
    force::newton,
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use crate::support::gas::PerfectGas;

use problem::{AreaMachModel, AreaMachProblem};

/// Area ratios this close to one are treated as a sonic exit.
const SONIC_AREA_TOL: f64 = 1e-9;

/// Nozzle inlet stagnation state and the surroundings it exhausts into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsentropicInputs {
    pub total_pressure: Pressure,
    pub total_temperature: ThermodynamicTemperature,
    pub ambient_pressure: Pressure,
    pub freestream_velocity: Velocity,
}

/// Ideal exit state and thrust.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsentropicEstimate {
    pub area_ratio: f64,
    pub exit_mach: f64,
    pub exit_pressure: Pressure,
    pub exit_temperature: ThermodynamicTemperature,
    pub exit_velocity: Velocity,
    pub mass_flow: MassRate,
    /// `ṁ·(Ue − U0) + (pe − P0)·Ae` over the full axisymmetric exit.
    pub thrust: Force,
}

/// Estimates ideal thrust for an axisymmetric wall given as radii `y`
/// (inlet to exit).
///
/// # Errors
///
/// Returns [`IsentropicError`] if the wall has no positive radius or the
/// area–Mach inversion fails.
pub fn estimate(
    y: &[f64],
    gas: &PerfectGas,
    inputs: IsentropicInputs,
    config: IsentropicConfig,
) -> Result<IsentropicEstimate, IsentropicError> {
    let throat = y.iter().copied().fold(f64::INFINITY, f64::min);
    let exit = y.last().copied().unwrap_or(0.0);
    if throat <= 0.0 || !throat.is_finite() {
        return Err(IsentropicError::Throat { min_radius: throat });
    }

    let area_ratio = (exit / throat).powi(2);
    let exit_mach = supersonic_mach(gas.gamma(), area_ratio, config)?;

    let g = gas.gamma();
    let stagnation = 1.0 + 0.5 * (g - 1.0) * exit_mach * exit_mach;
    let pt = inputs.total_pressure.get::<pascal>();
    let pe = pt / stagnation.powf(g / (g - 1.0));
    let te = inputs.total_temperature.get::<kelvin>() / stagnation;

    let exit_temperature = ThermodynamicTemperature::new::<kelvin>(te);
    let exit_pressure = Pressure::new::<pascal>(pe);
    let ue = exit_mach * gas.speed_of_sound(exit_temperature).get::<meter_per_second>();
    let rho = gas
        .density(exit_temperature, exit_pressure)
        .get::<kilogram_per_cubic_meter>();

    let exit_area = PI * exit * exit;
    let mass_flow = rho * ue * exit_area;
    let u0 = inputs.freestream_velocity.get::<meter_per_second>();
    let p0 = inputs.ambient_pressure.get::<pascal>();
    let thrust = mass_flow * (ue - u0) + (pe - p0) * exit_area;

    let estimate = IsentropicEstimate {
        area_ratio,
        exit_mach,
        exit_pressure,
        exit_temperature,
        exit_velocity: Velocity::new::<meter_per_second>(ue),
        mass_flow: MassRate::new::<kilogram_per_second>(mass_flow),
        thrust: Force::new::<newton>(thrust),
    };
    log::info!(
        "isentropic estimate: Ae/A* = {area_ratio:.4}, Me = {exit_mach:.4}, pe = {pe:.1} Pa, \
         F = {thrust:.1} N"
    );
    Ok(estimate)
}

/// Supersonic Mach number with `A/A* = area_ratio`.
///
/// # Errors
///
/// Returns [`IsentropicError`] if bisection fails or doesn't converge.
pub fn supersonic_mach(
    gamma: f64,
    area_ratio: f64,
    config: IsentropicConfig,
) -> Result<f64, IsentropicError> {
    if area_ratio <= 1.0 + SONIC_AREA_TOL {
        return Ok(1.0);
    }

    let model = AreaMachModel::new(gamma);
    let problem = AreaMachProblem::new(area_ratio);

    // Keep the bracket end evaluable.
    let mut upper = config.max_mach;
    while model.area_ratio(upper).is_infinite() && upper > 2.0 {
        upper = 1.0 + 0.5 * (upper - 1.0);
    }

    let solution = bisection::solve(
        &model,
        &problem,
        [1.0, upper],
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // An overflowed area ratio means the trial Mach is far past the
            // root, so the residual is positive there.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(IsentropicError::MaxIters {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    Ok(solution.snapshot.output.mach)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;

    use crate::support::{gas::PerfectGasParameters, units::SpecificGasConstant};

    fn air() -> PerfectGas {
        let r = SpecificGasConstant::new::<joule_per_kilogram_kelvin>(287.06);
        PerfectGas::new(PerfectGasParameters::from_gamma(r, 1.4).unwrap()).unwrap()
    }

    #[test]
    fn inverts_tabulated_area_ratio() {
        let mach = supersonic_mach(1.4, 1.687_5, IsentropicConfig::default()).unwrap();
        assert_relative_eq!(mach, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn straight_wall_exits_sonic() {
        let mach = supersonic_mach(1.4, 1.0, IsentropicConfig::default()).unwrap();
        assert_relative_eq!(mach, 1.0);
    }

    #[test]
    fn overflowing_trials_are_steered_away() {
        // γ close to one makes the area ratio overflow well before M = 100.
        let gamma = 1.001;
        let target = AreaMachModel::new(gamma).area_ratio(3.0);

        let mach = supersonic_mach(gamma, target, IsentropicConfig::default()).unwrap();
        assert_relative_eq!(mach, 3.0, epsilon = 1e-8);
    }

    #[test]
    fn ideal_exit_state_and_thrust() {
        let gas = air();
        let radius_throat = 0.3;
        let radius_exit = radius_throat * 1.687_5_f64.sqrt();
        let inputs = IsentropicInputs {
            total_pressure: Pressure::new::<pascal>(100_000.0),
            total_temperature: ThermodynamicTemperature::new::<kelvin>(600.0),
            ambient_pressure: Pressure::new::<pascal>(12_780.0),
            freestream_velocity: Velocity::new::<meter_per_second>(0.0),
        };

        let estimate = estimate(
            &[0.4, radius_throat, 0.35, radius_exit],
            &gas,
            inputs,
            IsentropicConfig::default(),
        )
        .unwrap();

        // Isentropic tables at M = 2: p/pt = 0.12780, T/Tt = 0.55556.
        assert_relative_eq!(estimate.exit_mach, 2.0, epsilon = 1e-9);
        let (pe, te) = (
            estimate.exit_pressure.get::<pascal>(),
            estimate.exit_temperature.get::<kelvin>(),
        );
        assert_relative_eq!(pe, 12_780.0, max_relative = 1e-4);
        assert_relative_eq!(te, 600.0 / 1.8, epsilon = 1e-6);

        // Matched exit pressure and no flight speed: thrust is ṁ·Ue.
        let ue = estimate.exit_velocity.get::<meter_per_second>();
        assert_relative_eq!(ue, 2.0 * (1.4 * 287.06 * 600.0 / 1.8_f64).sqrt(), epsilon = 1e-6);
        assert_relative_eq!(
            estimate.thrust.get::<newton>(),
            estimate.mass_flow.get::<kilogram_per_second>() * ue,
            max_relative = 1e-3
        );
    }

    #[test]
    fn rejects_wall_without_radius() {
        let result = estimate(
            &[0.4, 0.0, 0.3],
            &air(),
            IsentropicInputs {
                total_pressure: Pressure::new::<pascal>(1e5),
                total_temperature: ThermodynamicTemperature::new::<kelvin>(600.0),
                ambient_pressure: Pressure::new::<pascal>(1e4),
                freestream_velocity: Velocity::new::<meter_per_second>(0.0),
            },
            IsentropicConfig::default(),
        );
        assert!(matches!(result, Err(IsentropicError::Throat { .. })));
    }
}

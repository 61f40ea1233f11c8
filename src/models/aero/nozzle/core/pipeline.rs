//! End-to-end nozzle analysis: stage, mesh, solve, reduce.

use std::path::Path;

use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    force::newton,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::{gmsh::Mesher, su2::Solver};

use super::{
    NozzleError,
    cfd::run_su2,
    config::NozzleConfig,
    isentropic::{self, IsentropicConfig, IsentropicEstimate, IsentropicInputs},
    mesh::generate_nozzle_mesh,
    post_process::post_process,
    qoi::Responses,
    staging::stage_files,
};

/// Runs a complete case in `run_dir`.
///
/// The files listed in `su2.stage` are linked in from `su2.template_dir`
/// (or the working directory), the mesh is generated, SU2 is configured and
/// run, and the flow field is reduced to the requested quantities. When an
/// `[inlet]` is given the isentropic estimate is logged beside the result.
///
/// # Errors
///
/// Returns [`NozzleError`] from whichever stage fails first.
pub fn run_case(
    config: &NozzleConfig,
    run_dir: &Path,
    mesher: &impl Mesher,
    solver: &impl Solver,
) -> Result<Responses, NozzleError> {
    let source_dir = config.su2.template_dir.as_deref().unwrap_or(Path::new("."));
    stage_files(source_dir, &config.su2.stage, run_dir)?;

    generate_nozzle_mesh(config, run_dir, mesher)?;
    run_su2(config, run_dir, solver)?;
    let responses = post_process(config, run_dir)?;

    match isentropic_reference(config) {
        Ok(Some(estimate)) => log::info!(
            "thrust: CFD {} vs isentropic {:.1} N",
            responses
                .scalar("THRUST")
                .map_or_else(|| String::from("n/a"), |thrust| format!("{thrust:.1} N")),
            estimate.thrust.get::<newton>()
        ),
        Ok(None) => {}
        Err(error) => log::warn!("isentropic estimate unavailable: {error}"),
    }

    Ok(responses)
}

/// Isentropic estimate for the case's wall, if `[inlet]` conditions are set.
///
/// # Errors
///
/// Returns [`NozzleError`] if the wall or fluid is invalid or the estimate
/// fails.
pub fn isentropic_reference(
    config: &NozzleConfig,
) -> Result<Option<IsentropicEstimate>, NozzleError> {
    let Some(inlet) = config.inlet else {
        return Ok(None);
    };

    let (_, y) = config.wall.coordinates()?;
    let inputs = IsentropicInputs {
        total_pressure: Pressure::new::<pascal>(inlet.total_pressure),
        total_temperature: ThermodynamicTemperature::new::<kelvin>(inlet.total_temperature),
        ambient_pressure: config.ambient_pressure(),
        freestream_velocity: config.freestream_velocity()?,
    };
    let estimate = isentropic::estimate(&y, &config.gas()?, inputs, IsentropicConfig::default())?;
    Ok(Some(estimate))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use approx::assert_relative_eq;

    use crate::{
        models::aero::nozzle::core::test_support::{
            CASE, DIVERGED_HISTORY, FakeMesher, FakeSolver, HISTORY, TEMPLATE,
        },
        support::su2::Su2Config,
    };

    fn staged_case(templates: &Path) -> NozzleConfig {
        fs::write(templates.join("nozzle_template.cfg"), TEMPLATE).unwrap();
        fs::write(templates.join("restart.dat"), "restart\n").unwrap();
        let text = format!(
            "{CASE}\n[su2]\ntemplate_dir = '{}'\nstage = [\"restart.dat\"]\n",
            templates.display()
        );
        NozzleConfig::from_toml_str(&text).unwrap()
    }

    #[test]
    fn runs_every_stage_in_order() {
        let templates = tempfile::tempdir().unwrap();
        let config = staged_case(templates.path());
        let run = tempfile::tempdir().unwrap();
        let run_dir = run.path().join("case");

        let responses =
            run_case(&config, &run_dir, &FakeMesher, &FakeSolver { history: HISTORY }).unwrap();

        assert!(run_dir.join("restart.dat").exists());
        assert!(run_dir.join("nozzle_tmp.geo").exists());
        let su2 = Su2Config::read(&run_dir.join("nozzle.cfg")).unwrap();
        assert_eq!(su2.get("SOLVER"), Some("EULER"));
        assert_eq!(su2.get("CFL_NUMBER"), Some("5.0"));

        assert_relative_eq!(responses.scalar("SU2_RESIDUAL").unwrap(), 5.5, epsilon = 1e-12);
        assert_relative_eq!(responses.scalar("WALL_PRES_AVG").unwrap(), 25_000.0, epsilon = 1e-9);
        assert_relative_eq!(responses.scalar("WALL_TEMP_AVG").unwrap(), 300.0, epsilon = 1e-9);
        assert!(responses.scalar("THRUST").is_some());
    }

    #[test]
    fn diverged_solver_still_reports_residual() {
        let templates = tempfile::tempdir().unwrap();
        let config = staged_case(templates.path());
        let run = tempfile::tempdir().unwrap();

        let solver = FakeSolver {
            history: DIVERGED_HISTORY,
        };
        let responses = run_case(&config, run.path(), &FakeMesher, &solver).unwrap();

        assert!(responses.scalar("THRUST").is_none());
        assert_relative_eq!(responses.scalar("SU2_RESIDUAL").unwrap(), -1.5, epsilon = 1e-12);
    }

    #[test]
    fn reference_needs_inlet_conditions() {
        let config = NozzleConfig::from_toml_str(CASE).unwrap();
        assert!(isentropic_reference(&config).unwrap().is_none());

        let text = format!("{CASE}\n[inlet]\ntotal_pressure = 60000.0\ntotal_temperature = 600.0\n");
        let config = NozzleConfig::from_toml_str(&text).unwrap();
        let estimate = isentropic_reference(&config).unwrap().unwrap();

        // Throat radius 0.30, exit radius 0.36.
        assert_relative_eq!(estimate.area_ratio, 1.44, epsilon = 1e-12);
        assert!(estimate.exit_mach > 1.0);
        assert!(estimate.exit_pressure.get::<pascal>() < 60_000.0);
    }
}

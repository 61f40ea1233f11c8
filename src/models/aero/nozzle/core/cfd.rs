use std::path::{Path, PathBuf};

use crate::support::su2::{Solver, Su2Config};

use super::{
    NozzleError,
    config::{Method, NozzleConfig},
};

/// Fills an SU2 configuration from the case.
///
/// Generated options replace their template values in place; the case's
/// `su2.overrides` are applied last and win.
pub fn apply_case(su2: &mut Su2Config, config: &NozzleConfig) {
    let (solver, turbulence) = match config.method {
        Method::Euler => ("EULER", "NONE"),
        Method::Rans => ("RANS", "SA"),
    };

    su2.set("SOLVER", solver);
    su2.set("KIND_TURB_MODEL", turbulence);
    su2.set("MESH_FILENAME", &config.su2.mesh_name);
    su2.set("MACH_NUMBER", config.mission.mach);
    su2.set("FREESTREAM_PRESSURE", config.environment.pressure);
    su2.set("FREESTREAM_TEMPERATURE", config.environment.temperature);
    su2.set("GAMMA_VALUE", config.fluid.gamma);
    su2.set("GAS_CONSTANT", config.fluid.gas_constant);
    su2.set("RESTART_FILENAME", &config.su2.solution_name);
    su2.set("SOLUTION_FILENAME", &config.su2.solution_name);
    su2.set("CONV_FILENAME", &config.su2.history_name);
    su2.set("TABULAR_FORMAT", config.su2.output_format.su2_name());
    su2.set("OUTPUT_FILES", "(RESTART_ASCII)");

    for (key, value) in &config.su2.overrides {
        su2.set(key, value);
    }
}

/// Path of the SU2 template: under `su2.template_dir` if set, else `run_dir`.
#[must_use]
pub fn template_path(config: &NozzleConfig, run_dir: &Path) -> PathBuf {
    config
        .su2
        .template_dir
        .as_deref()
        .unwrap_or(run_dir)
        .join(&config.su2.template)
}

/// Writes the case's SU2 configuration into `run_dir`.
///
/// # Errors
///
/// Returns [`NozzleError::Su2`] if the template can't be read or the
/// configuration can't be written.
pub fn write_su2_config(config: &NozzleConfig, run_dir: &Path) -> Result<PathBuf, NozzleError> {
    let mut su2 = Su2Config::read(&template_path(config, run_dir))?;
    apply_case(&mut su2, config);

    let path = run_dir.join(&config.su2.config_name);
    su2.write(&path)?;
    Ok(path)
}

/// Writes the SU2 configuration and runs the solver in `run_dir`.
///
/// The solver is handed the configuration's name, relative to `run_dir`.
///
/// # Errors
///
/// Returns [`NozzleError`] if the configuration can't be written or the
/// solver fails.
pub fn run_su2(
    config: &NozzleConfig,
    run_dir: &Path,
    solver: &impl Solver,
) -> Result<PathBuf, NozzleError> {
    let path = write_su2_config(config, run_dir)?;
    log::info!("running SU2 on {}", path.display());
    solver.solve(Path::new(&config.su2.config_name), run_dir)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use crate::models::aero::nozzle::core::test_support::{CASE, TEMPLATE};

    #[test]
    fn case_values_replace_template_values() {
        let text = format!(
            "{CASE}\n[su2]\noutput_format = \"tecplot\"\n\n\
             [su2.overrides]\nEXT_ITER = \"500\"\nMACH_NUMBER = \"0.85\"\n"
        );
        let config = NozzleConfig::from_toml_str(&text).unwrap();

        let mut su2 = Su2Config::parse(TEMPLATE);
        apply_case(&mut su2, &config);

        assert_eq!(su2.get("SOLVER"), Some("EULER"));
        assert_eq!(su2.get("KIND_TURB_MODEL"), Some("NONE"));
        assert_eq!(su2.get("FREESTREAM_PRESSURE"), Some("18753.9"));
        assert_eq!(su2.get("FREESTREAM_TEMPERATURE"), Some("216.65"));
        assert_eq!(su2.get("GAMMA_VALUE"), Some("1.4"));
        assert_eq!(su2.get("TABULAR_FORMAT"), Some("TECPLOT"));
        assert_eq!(su2.get("EXT_ITER"), Some("500"));
        // Overrides win over generated values.
        assert_eq!(su2.get("MACH_NUMBER"), Some("0.85"));
        assert!(su2.to_string().starts_with("% Nozzle template"));
    }

    #[test]
    fn rans_selects_turbulence_model() {
        let text = CASE.replace("method = \"euler\"", "method = \"rans\"");
        let config = NozzleConfig::from_toml_str(&text).unwrap();

        let mut su2 = Su2Config::default();
        apply_case(&mut su2, &config);
        assert_eq!(su2.get("SOLVER"), Some("RANS"));
        assert_eq!(su2.get("KIND_TURB_MODEL"), Some("SA"));
    }

    #[test]
    fn writes_config_from_run_dir_template() {
        let config = NozzleConfig::from_toml_str(CASE).unwrap();
        let run = tempfile::tempdir().unwrap();
        fs::write(run.path().join("nozzle_template.cfg"), TEMPLATE).unwrap();

        let path = write_su2_config(&config, run.path()).unwrap();

        assert_eq!(path, run.path().join("nozzle.cfg"));
        let written = Su2Config::read(&path).unwrap();
        assert_eq!(written.get("MESH_FILENAME"), Some("nozzle.su2"));
        assert_eq!(written.get("CONV_FILENAME"), Some("history"));
    }

    #[test]
    fn missing_template_is_an_error() {
        let config = NozzleConfig::from_toml_str(CASE).unwrap();
        let run = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_su2_config(&config, run.path()),
            Err(NozzleError::Su2(_))
        ));
    }
}

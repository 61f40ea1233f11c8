//! Nozzle case configuration.
//!
//! A case is described by a TOML file:
//!
//! ```toml
//! method = "euler"
//!
//! [environment]
//! pressure = 18753.9     # Pa
//! temperature = 216.65   # K
//!
//! [mission]
//! mach = 0.9
//!
//! [wall]
//! x = [0.0, 0.3, 0.6, 0.9]
//! y = [0.44, 0.30, 0.33, 0.36]
//! x_thrust = 0.6
//!
//! [mesh]
//! hl = [0.1, 0.07, 0.06, 0.006, 0.0108]
//!
//! [[qoi]]
//! name = "THRUST"
//! ```
//!
//! Every other table (`fluid`, `su2`, `post`, `inlet`, `gradients`) is
//! optional.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature, Velocity},
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{ConstraintError, NonNegative, StrictlyPositive},
    gas::{PerfectGas, PerfectGasParameters, PerfectGasParametersError},
    units::SpecificGasConstant,
};

use super::{
    THRUST_MATCH_TOL,
    geometry::{GeometryError, WallSpline, interp},
    thrust::ThrustIntegration,
};

/// Errors from loading or validating a [`NozzleConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration")]
    Parse(#[from] toml::de::Error),

    /// A numeric setting violates its constraint.
    #[error("`{field}` is invalid")]
    Constraint {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error("invalid working fluid")]
    Gas(#[from] PerfectGasParametersError),

    #[error("wall needs matching x and y coordinates (at least 2); got {x} x and {y} y")]
    WallCoordinates { x: usize, y: usize },

    #[error("invalid wall spline")]
    Geometry(#[from] GeometryError),
}

/// Flow model solved by SU2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Euler,
    Rans,
}

/// SU2 history file layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tecplot,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tecplot => "dat",
        }
    }

    /// Value of SU2's `TABULAR_FORMAT` option.
    #[must_use]
    pub fn su2_name(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Tecplot => "TECPLOT",
        }
    }
}

/// Mesh topology written to the `.geo` script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeshLayout {
    /// Sharp trailing edge; far-field box to `x = 1.5`.
    Sharp,
    /// Rounded lip and trailing edge; far-field box to `x = 4.5`.
    #[default]
    RoundedEdges,
}

/// Ambient (freestream static) conditions.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Environment {
    /// Pa.
    pub pressure: f64,
    /// K.
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Mission {
    pub mach: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Fluid {
    pub gamma: f64,
    /// J/kg·K.
    pub gas_constant: f64,
}

impl Default for Fluid {
    fn default() -> Self {
        Self {
            gamma: 1.4,
            gas_constant: 287.06,
        }
    }
}

/// Nozzle inlet total conditions, used by the isentropic estimate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Inlet {
    /// Pa.
    pub total_pressure: f64,
    /// K.
    pub total_temperature: f64,
}

/// Inner wall, ordered from inlet to exit.
///
/// Given either as explicit `x`/`y` coordinates or as a B-spline that is
/// sampled; a sampled wall gets an extra point at `x_thrust`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wall {
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<f64>,
    /// Axial position of the thrust integration line; must match a wall point.
    pub x_thrust: f64,
    pub bspline: Option<WallBSpline>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WallBSpline {
    pub knots: Vec<f64>,
    /// All x control values, then all y control values.
    pub coefs: Vec<f64>,
    #[serde(default = "WallBSpline::default_samples")]
    pub samples: usize,
}

impl WallBSpline {
    fn default_samples() -> usize {
        100
    }
}

impl Wall {
    /// Wall coordinates used for meshing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the spline is invalid or the coordinate
    /// lists don't match.
    pub fn coordinates(&self) -> Result<(Vec<f64>, Vec<f64>), ConfigError> {
        let (x, y) = match &self.bspline {
            None => (self.x.clone(), self.y.clone()),
            Some(spline) => {
                let (mut x, mut y) =
                    WallSpline::new(spline.knots.clone(), &spline.coefs)?.sample(spline.samples)?;
                if !x.iter().any(|&xi| (xi - self.x_thrust).abs() < THRUST_MATCH_TOL) {
                    let at = x.partition_point(|&xi| xi < self.x_thrust);
                    let y_thrust = interp(self.x_thrust, &x, &y);
                    x.insert(at, self.x_thrust);
                    y.insert(at, y_thrust);
                }
                (x, y)
            }
        };

        if x.len() != y.len() || x.len() < 2 {
            return Err(ConfigError::WallCoordinates {
                x: x.len(),
                y: y.len(),
            });
        }
        Ok((x, y))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mesh {
    /// Characteristic element lengths of the refinement boxes.
    pub hl: [f64; 5],
    #[serde(default)]
    pub layout: MeshLayout,
    /// First cell height of the boundary layer (RANS only).
    #[serde(default = "Mesh::default_bl_ds")]
    pub bl_ds: f64,
    #[serde(default = "Mesh::default_bl_ratio")]
    pub bl_ratio: f64,
    #[serde(default = "Mesh::default_bl_thickness")]
    pub bl_thickness: f64,
    #[serde(default = "Mesh::default_geo_name")]
    pub geo_name: String,
    #[serde(default = "Mesh::default_mesher")]
    pub mesher: String,
}

impl Mesh {
    fn default_bl_ds() -> f64 {
        7e-6
    }

    fn default_bl_ratio() -> f64 {
        1.3
    }

    fn default_bl_thickness() -> f64 {
        0.02
    }

    fn default_geo_name() -> String {
        String::from("nozzle_tmp.geo")
    }

    fn default_mesher() -> String {
        String::from("gmsh")
    }
}

/// SU2 case files and invocation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Su2 {
    pub mesh_name: String,
    /// ASCII restart written by SU2 and read back for post-processing.
    pub solution_name: String,
    /// History file stem; the extension follows `output_format`.
    pub history_name: String,
    pub output_format: OutputFormat,
    /// Configuration template, relative to `template_dir`.
    pub template: PathBuf,
    pub config_name: String,
    /// Directory holding the template and the files in `stage`.
    pub template_dir: Option<PathBuf>,
    /// Files symlinked into the run directory before SU2 runs.
    pub stage: Vec<PathBuf>,
    pub executable: String,
    pub processes: usize,
    pub mpi_launcher: String,
    /// Extra `KEY= value` options applied after the generated ones.
    pub overrides: BTreeMap<String, String>,
}

impl Default for Su2 {
    fn default() -> Self {
        Self {
            mesh_name: String::from("nozzle.su2"),
            solution_name: String::from("nozzle.dat"),
            history_name: String::from("history"),
            output_format: OutputFormat::Csv,
            template: PathBuf::from("nozzle_template.cfg"),
            config_name: String::from("nozzle.cfg"),
            template_dir: None,
            stage: Vec::new(),
            executable: String::from("SU2_CFD"),
            processes: 1,
            mpi_launcher: String::from("mpirun"),
            overrides: BTreeMap::new(),
        }
    }
}

/// Markers and methods used to reduce the flow field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Post {
    pub thrust_marker: String,
    pub thrust_integration: ThrustIntegration,
    /// Markers averaged for `WALL_PRES_AVG` and `WALL_TEMP_AVG`. Defaults
    /// to the inner wall of the generated layouts.
    pub wall_markers: Vec<String>,
    /// Marker sampled for `WALL_PRESSURE` profiles.
    pub wall_profile_marker: String,
}

impl Default for Post {
    fn default() -> Self {
        Self {
            thrust_marker: String::from("9"),
            thrust_integration: ThrustIntegration::default(),
            wall_markers: vec![String::from("1")],
            wall_profile_marker: String::from("1"),
        }
    }
}

/// A requested quantity of interest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QoiRequest {
    pub name: String,
    /// Axial sample locations (wall profiles).
    #[serde(default)]
    pub x: Vec<f64>,
    /// `(x, y)` sample locations (field probes).
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
}

/// Discrete-adjoint thrust gradients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gradients {
    /// Length of the full design-variable gradient.
    pub derivative_dvs: usize,
    /// Leading design variables that move the wall; the adjoint covers these.
    pub wall_dvs: usize,
    #[serde(default = "Gradients::default_file")]
    pub file: String,
    /// Adjoint history stem; the extension follows `su2.output_format`.
    #[serde(default = "Gradients::default_history")]
    pub history_name: String,
}

impl Gradients {
    fn default_file() -> String {
        String::from("of_grad.dat")
    }

    fn default_history() -> String {
        String::from("history_adj")
    }
}

/// A complete nozzle case.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NozzleConfig {
    #[serde(default)]
    pub method: Method,
    pub environment: Environment,
    pub mission: Mission,
    #[serde(default)]
    pub fluid: Fluid,
    pub inlet: Option<Inlet>,
    pub wall: Wall,
    pub mesh: Mesh,
    #[serde(default)]
    pub su2: Su2,
    #[serde(default)]
    pub post: Post,
    #[serde(default)]
    pub qoi: Vec<QoiRequest>,
    pub gradients: Option<Gradients>,
}

impl NozzleConfig {
    /// Loads and validates a case file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded case from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a case from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if parsing or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks physical and geometric invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("environment.pressure", self.environment.pressure)?;
        positive("environment.temperature", self.environment.temperature)?;
        NonNegative::new(self.mission.mach).map_err(|source| ConfigError::Constraint {
            field: "mission.mach",
            source,
        })?;
        self.gas()?;

        if let Some(inlet) = &self.inlet {
            positive("inlet.total_pressure", inlet.total_pressure)?;
            positive("inlet.total_temperature", inlet.total_temperature)?;
        }

        self.wall.coordinates()?;

        for hl in self.mesh.hl {
            positive("mesh.hl", hl)?;
        }
        positive("mesh.bl_ds", self.mesh.bl_ds)?;
        positive("mesh.bl_ratio", self.mesh.bl_ratio)?;
        positive("mesh.bl_thickness", self.mesh.bl_thickness)?;

        Ok(())
    }

    /// The working fluid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Gas`] if `gamma` or `R` is non-physical.
    pub fn gas(&self) -> Result<PerfectGas, ConfigError> {
        let r = SpecificGasConstant::new::<joule_per_kilogram_kelvin>(self.fluid.gas_constant);
        let parameters = PerfectGasParameters::from_gamma(r, self.fluid.gamma)?;
        Ok(PerfectGas::new(parameters)?)
    }

    #[must_use]
    pub fn ambient_pressure(&self) -> Pressure {
        Pressure::new::<pascal>(self.environment.pressure)
    }

    #[must_use]
    pub fn ambient_temperature(&self) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(self.environment.temperature)
    }

    /// Freestream velocity `U0 = M0·√(γ·R·T0)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Gas`] if the working fluid is non-physical.
    pub fn freestream_velocity(&self) -> Result<Velocity, ConfigError> {
        let gas = self.gas()?;
        Ok(gas.speed_of_sound(self.ambient_temperature()) * self.mission.mach)
    }

    /// File name of the flow history.
    #[must_use]
    pub fn history_file(&self) -> String {
        format!(
            "{}.{}",
            self.su2.history_name,
            self.su2.output_format.extension()
        )
    }

    /// File name of the adjoint history, if gradients are requested.
    #[must_use]
    pub fn adjoint_history_file(&self) -> Option<String> {
        self.gradients.as_ref().map(|gradients| {
            format!(
                "{}.{}",
                gradients.history_name,
                self.su2.output_format.extension()
            )
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    StrictlyPositive::new(value)
        .map(|_| ())
        .map_err(|source| ConfigError::Constraint { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::velocity::meter_per_second;

    use crate::models::aero::nozzle::core::test_support::CASE;

    #[test]
    fn parses_case_with_defaults() {
        let config = NozzleConfig::from_toml_str(CASE).unwrap();

        assert_eq!(config.method, Method::Euler);
        assert_eq!(config.mesh.layout, MeshLayout::RoundedEdges);
        assert_relative_eq!(config.mesh.bl_ds, 7e-6);
        assert_eq!(config.su2.mesh_name, "nozzle.su2");
        assert_eq!(config.post.wall_markers, ["1"]);
        assert_eq!(config.history_file(), "history.csv");
        assert_eq!(config.qoi.len(), 4);
        assert!(config.gradients.is_none());
    }

    #[test]
    fn freestream_velocity_from_mach() {
        let config = NozzleConfig::from_toml_str(CASE).unwrap();
        let u0 = config.freestream_velocity().unwrap();

        let expected = 0.9 * (1.4 * 287.06 * 216.65_f64).sqrt();
        assert_relative_eq!(u0.get::<meter_per_second>(), expected, epsilon = 1e-9);
    }

    #[test]
    fn tecplot_history_and_adjoint_names() {
        let text = format!(
            "{CASE}\n[su2]\noutput_format = \"tecplot\"\n\n\
             [gradients]\nderivative_dvs = 12\nwall_dvs = 5\n"
        );
        let config = NozzleConfig::from_toml_str(&text).unwrap();

        assert_eq!(config.history_file(), "history.dat");
        assert_eq!(config.adjoint_history_file().as_deref(), Some("history_adj.dat"));
        assert_eq!(config.gradients.unwrap().file, "of_grad.dat");
    }

    #[test]
    fn rejects_non_physical_environment() {
        let text = CASE.replace("pressure = 18753.9", "pressure = -1.0");
        assert!(matches!(
            NozzleConfig::from_toml_str(&text),
            Err(ConfigError::Constraint {
                field: "environment.pressure",
                source: ConstraintError::Negative,
            })
        ));
    }

    #[test]
    fn rejects_gamma_at_or_below_one() {
        let text = format!("{CASE}\n[fluid]\ngamma = 1.0\n");
        assert!(matches!(
            NozzleConfig::from_toml_str(&text),
            Err(ConfigError::Gas(PerfectGasParametersError::Gamma { .. }))
        ));
    }

    #[test]
    fn rejects_mismatched_wall() {
        let text = CASE.replace("y = [0.4244, 0.30, 0.33, 0.36]", "y = [0.4244, 0.30]");
        assert!(matches!(
            NozzleConfig::from_toml_str(&text),
            Err(ConfigError::WallCoordinates { x: 4, y: 2 })
        ));
    }

    #[test]
    fn sampled_spline_wall_gains_thrust_station() {
        let text = CASE
            .replace("x = [0.0, 0.3, 0.6, 0.9]\n", "")
            .replace("y = [0.4244, 0.30, 0.33, 0.36]\n", "")
            .replace("x_thrust = 0.6", "x_thrust = 0.5")
            + "\n[wall.bspline]\n\
               knots = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]\n\
               coefs = [0.0, 0.3, 0.6, 0.9, 0.42, 0.30, 0.33, 0.36]\n\
               samples = 4\n";
        let config = NozzleConfig::from_toml_str(&text).unwrap();

        let (x, y) = config.wall.coordinates().unwrap();
        assert_eq!(x.len(), 5);
        assert_eq!(y.len(), 5);
        assert!(x.iter().any(|&xi| xi == 0.5));
        assert!(x.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn missing_required_table_is_a_parse_error() {
        let text = CASE.replace("[mission]\nmach = 0.9\n", "");
        assert!(matches!(
            NozzleConfig::from_toml_str(&text),
            Err(ConfigError::Parse(_))
        ));
    }
}

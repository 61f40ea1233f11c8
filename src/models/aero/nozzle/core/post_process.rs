//! Reduces a finished SU2 run to the requested quantities of interest.

use std::path::Path;

use uom::si::{force::newton, pressure::pascal, thermodynamic_temperature::kelvin};

use crate::support::su2::{Convergence, Field, History, Solution, Su2Mesh, read_gradients};

use super::{
    NozzleError,
    config::{NozzleConfig, QoiRequest},
    probe::{Probe, wall_profile},
    qoi::{QoiKind, QoiValue, Responses},
    surface::SurfacePatch,
    thrust::{Freestream, integrate_thrust},
    wall::{WallAverages, average_wall},
};

/// Mesh and solution, read on first use.
struct FlowField<'a> {
    config: &'a NozzleConfig,
    run_dir: &'a Path,
    loaded: Option<(Su2Mesh, Solution)>,
    wall: Option<WallAverages>,
}

impl<'a> FlowField<'a> {
    fn new(config: &'a NozzleConfig, run_dir: &'a Path) -> Self {
        Self {
            config,
            run_dir,
            loaded: None,
            wall: None,
        }
    }

    fn get(&mut self) -> Result<(&Su2Mesh, &Solution), NozzleError> {
        let loaded = match self.loaded.take() {
            Some(loaded) => loaded,
            None => self.read()?,
        };
        let (mesh, solution) = &*self.loaded.insert(loaded);
        Ok((mesh, solution))
    }

    fn read(&self) -> Result<(Su2Mesh, Solution), NozzleError> {
        let mesh = Su2Mesh::read(&self.run_dir.join(&self.config.su2.mesh_name))?;
        let solution = Solution::read(&self.run_dir.join(&self.config.su2.solution_name))?;
        if solution.len() < mesh.points.len() {
            return Err(NozzleError::SolutionSize {
                points: mesh.points.len(),
                rows: solution.len(),
            });
        }
        log::debug!(
            "read {} points and {} solution rows from {}",
            mesh.points.len(),
            solution.len(),
            self.run_dir.display()
        );
        Ok((mesh, solution))
    }

    fn wall(&mut self) -> Result<WallAverages, NozzleError> {
        if let Some(wall) = self.wall {
            return Ok(wall);
        }
        let markers = self.config.post.wall_markers.clone();
        let (mesh, solution) = self.get()?;
        let wall = average_wall(&SurfacePatch::extract(mesh, &markers)?, solution)?;
        log::info!(
            "wall average over markers {markers:?}: P = {:.2} Pa, T = {:.2} K",
            wall.pressure.get::<pascal>(),
            wall.temperature.get::<kelvin>()
        );
        self.wall = Some(wall);
        Ok(wall)
    }
}

/// Computes every requested quantity from the files in `run_dir`.
///
/// A run whose density residual rose is treated as diverged: its flow
/// quantities are recorded as `None`, while `SU2_RESIDUAL` still reports the
/// (negative) reduction. Unknown quantity names are skipped with a warning.
///
/// # Errors
///
/// Returns [`NozzleError`] if a file can't be read, a quantity can't be
/// computed, or `WALL_TEMPERATURE` is requested.
pub fn post_process(config: &NozzleConfig, run_dir: &Path) -> Result<Responses, NozzleError> {
    let history = History::read(&run_dir.join(config.history_file()))?;
    let convergence = history.convergence(Convergence::FLOW_RESIDUAL)?;
    log::info!(
        "flow convergence: final density residual = {:.2}, reduction = {:.2}",
        convergence.last,
        convergence.reduction
    );

    let mut responses = Responses::new(convergence);
    let mut flow = FlowField::new(config, run_dir);

    for request in &config.qoi {
        let Some(kind) = QoiKind::classify(&request.name) else {
            log::warn!("QoI {} is not supported; skipping", request.name);
            continue;
        };

        if kind == QoiKind::WallTemperature {
            return Err(NozzleError::WallTemperatureUnavailable);
        }

        let value = if kind.needs_flow() && convergence.diverged() {
            log::warn!("CFD solution diverged; {} is set to None", request.name);
            None
        } else {
            Some(evaluate(kind, request, config, &mut flow, convergence)?)
        };
        responses.values.insert(request.name.clone(), value);

        if kind == QoiKind::Thrust {
            if let Some(gradient) = adjoint_gradient(config, run_dir)? {
                responses.gradients.insert(request.name.clone(), gradient);
            }
        }
    }

    Ok(responses)
}

fn evaluate(
    kind: QoiKind,
    request: &QoiRequest,
    config: &NozzleConfig,
    flow: &mut FlowField<'_>,
    convergence: Convergence,
) -> Result<QoiValue, NozzleError> {
    let value = match kind {
        QoiKind::Thrust => {
            let freestream = Freestream {
                velocity: config.freestream_velocity()?,
                pressure: config.ambient_pressure(),
            };
            let (mesh, solution) = flow.get()?;
            let patch = SurfacePatch::extract(mesh, &[&config.post.thrust_marker])?;
            let thrust =
                integrate_thrust(&patch, solution, freestream, config.post.thrust_integration)?;
            QoiValue::Scalar(thrust.force.get::<newton>())
        }
        QoiKind::WallPressureAverage => QoiValue::Scalar(flow.wall()?.pressure.get::<pascal>()),
        QoiKind::WallTemperatureAverage => {
            QoiValue::Scalar(flow.wall()?.temperature.get::<kelvin>())
        }
        QoiKind::WallPressure => {
            if request.x.is_empty() {
                return Err(missing_locations(request));
            }
            let (mesh, solution) = flow.get()?;
            QoiValue::Profile(wall_profile(
                mesh,
                solution,
                &config.post.wall_profile_marker,
                Field::Pressure,
                &request.x,
            )?)
        }
        QoiKind::Pressure => {
            if request.points.is_empty() {
                return Err(missing_locations(request));
            }
            let (mesh, solution) = flow.get()?;
            let probe = Probe::new(mesh, solution);
            QoiValue::Profile(
                request
                    .points
                    .iter()
                    .map(|&[x, y]| probe.sample(Field::Pressure, x, y))
                    .collect::<Result<_, _>>()?,
            )
        }
        QoiKind::Velocity => {
            if request.points.is_empty() {
                return Err(missing_locations(request));
            }
            let (mesh, solution) = flow.get()?;
            let probe = Probe::new(mesh, solution);
            QoiValue::Vectors(
                request
                    .points
                    .iter()
                    .map(|&[x, y]| probe.velocity(x, y))
                    .collect::<Result<_, _>>()?,
            )
        }
        QoiKind::Su2Residual => QoiValue::Scalar(convergence.reduction),
        QoiKind::WallTemperature => return Err(NozzleError::WallTemperatureUnavailable),
    };
    log::debug!("{} = {value}", request.name);
    Ok(value)
}

fn missing_locations(request: &QoiRequest) -> NozzleError {
    NozzleError::MissingLocations {
        name: request.name.clone(),
    }
}

/// Thrust gradient from the discrete adjoint, if requested and converged.
///
/// The adjoint only covers the wall design variables, which lead the design
/// vector; the remaining entries are zero.
fn adjoint_gradient(
    config: &NozzleConfig,
    run_dir: &Path,
) -> Result<Option<Vec<f64>>, NozzleError> {
    let (Some(request), Some(history_file)) = (&config.gradients, config.adjoint_history_file())
    else {
        return Ok(None);
    };

    let history = History::read(&run_dir.join(history_file))?;
    let adjoint = history.convergence(Convergence::ADJOINT_RESIDUAL)?;
    if adjoint.diverged() {
        log::warn!(
            "discrete adjoint is not converged (residual {:.2} -> {:.2}); \
             use finite differences instead",
            adjoint.initial,
            adjoint.last
        );
        return Ok(None);
    }
    log::info!("discrete adjoint is converged");

    let wall_gradient = read_gradients(&run_dir.join(&request.file))?;
    if wall_gradient.len() != request.wall_dvs || request.wall_dvs > request.derivative_dvs {
        return Err(NozzleError::GradientSize {
            expected: request.wall_dvs,
            found: wall_gradient.len(),
            total: request.derivative_dvs,
        });
    }

    let mut gradient = vec![0.0; request.derivative_dvs];
    gradient[..wall_gradient.len()].copy_from_slice(&wall_gradient);
    Ok(Some(gradient))
}

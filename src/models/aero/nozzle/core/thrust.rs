//! Momentum-flux thrust integration over a surface patch.
//!
//! Thrust through a station is the integral of
//! `ρu·(u − U0) + (p − P0)` over the station's surface. The mesh covers half
//! the nozzle, so the integral is doubled.

use serde::Deserialize;
use uom::si::{
    area::square_meter,
    f64::{Area, Force, Pressure, Velocity},
    force::newton,
    pressure::pascal,
    velocity::meter_per_second,
};

use crate::support::su2::{Field, Solution};

use super::{NozzleError, surface::SurfacePatch};

/// Densities below this are treated as vacuum and rejected.
const MIN_DENSITY: f64 = 1e-30;

/// How flow values are combined over each facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThrustIntegration {
    /// Average density, x-momentum, and pressure over the facet vertices,
    /// then evaluate the flux once per facet.
    #[default]
    CellAveraged,
    /// Evaluate the flux magnitude at each vertex, including the cross-flow
    /// momentum term, and give each vertex an equal share of the facet.
    VertexLumped,
}

/// Freestream reference state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Freestream {
    pub velocity: Velocity,
    pub pressure: Pressure,
}

/// Integrated thrust and what it was integrated over.
///
/// In a 2D mesh the patch is made of segments, so `area` is a length and
/// `force` is per unit depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thrust {
    pub force: Force,
    pub area: Area,
    pub facets: usize,
}

/// Vertex state needed by the flux.
#[derive(Debug, Clone, Copy)]
struct VertexFlow {
    density: f64,
    momentum_x: f64,
    momentum_z: f64,
    pressure: f64,
}

/// Integrates thrust over `patch`.
///
/// # Errors
///
/// Returns [`NozzleError::EmptySurface`] for a patch without facets,
/// [`NozzleError::VanishingDensity`] where the density is effectively zero,
/// and [`NozzleError::Su2`] if the solution lacks a required field.
pub fn integrate_thrust(
    patch: &SurfacePatch,
    solution: &Solution,
    freestream: Freestream,
    method: ThrustIntegration,
) -> Result<Thrust, NozzleError> {
    if patch.is_empty() {
        return Err(NozzleError::EmptySurface);
    }

    let flows = vertex_flows(patch, solution)?;
    let u0 = freestream.velocity.get::<meter_per_second>();
    let p0 = freestream.pressure.get::<pascal>();

    let mut force = 0.0;
    for (index, facet) in patch.facets.iter().enumerate() {
        let measure = patch.measure(facet);
        let vertices = facet.vertices();

        force += match method {
            ThrustIntegration::CellAveraged => {
                let n = vertices.len() as f64;
                let (rho, rho_u, p) = vertices.iter().fold((0.0, 0.0, 0.0), |acc, &v| {
                    let flow = &flows[v];
                    (
                        acc.0 + flow.density / n,
                        acc.1 + flow.momentum_x / n,
                        acc.2 + flow.pressure / n,
                    )
                });
                if rho < MIN_DENSITY {
                    return Err(NozzleError::VanishingDensity {
                        facet: index,
                        density: rho,
                    });
                }
                let u = rho_u / rho;
                measure * (rho_u * (u - u0) + p - p0)
            }
            ThrustIntegration::VertexLumped => {
                let share = measure / vertices.len() as f64;
                let mut sum = 0.0;
                for &v in vertices {
                    let flow = &flows[v];
                    if flow.density < MIN_DENSITY {
                        return Err(NozzleError::VanishingDensity {
                            facet: index,
                            density: flow.density,
                        });
                    }
                    let u = flow.momentum_x / flow.density;
                    let w = flow.momentum_z / flow.density;
                    let axial = flow.momentum_x * (u - u0) + flow.pressure - p0;
                    let cross = flow.momentum_x * w;
                    sum += share * axial.hypot(cross);
                }
                sum
            }
        };
    }

    let thrust = Thrust {
        force: Force::new::<newton>(2.0 * force),
        area: Area::new::<square_meter>(patch.total_measure()),
        facets: patch.facets.len(),
    };
    log::info!(
        "thrust {:.6} N over {} facets (area {:.6} m^2)",
        thrust.force.get::<newton>(),
        thrust.facets,
        thrust.area.get::<square_meter>()
    );
    Ok(thrust)
}

fn vertex_flows(
    patch: &SurfacePatch,
    solution: &Solution,
) -> Result<Vec<VertexFlow>, NozzleError> {
    let density = solution.column(Field::Density)?;
    let momentum_x = solution.column(Field::MomentumX)?;
    let pressure = solution.column(Field::Pressure)?;
    // Absent in 2D solutions.
    let momentum_z = solution.column(Field::MomentumZ).ok();

    patch
        .nodes
        .iter()
        .map(|&node| -> Result<VertexFlow, NozzleError> {
            let row = solution.row(node)?;
            Ok(VertexFlow {
                density: row[density],
                momentum_x: row[momentum_x],
                momentum_z: momentum_z.map_or(0.0, |column| row[column]),
                pressure: row[pressure],
            })
        })
        .collect()
}

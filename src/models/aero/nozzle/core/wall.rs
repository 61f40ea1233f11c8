use uom::si::{
    area::square_meter,
    f64::{Area, Pressure, ThermodynamicTemperature},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::su2::{Field, Solution};

use super::{NozzleError, surface::SurfacePatch};

/// Area-weighted wall state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallAverages {
    pub area: Area,
    pub pressure: Pressure,
    pub temperature: ThermodynamicTemperature,
}

/// Averages pressure and temperature over `patch`, weighting each facet by
/// its area and using the mean of its vertex values.
///
/// # Errors
///
/// Returns [`NozzleError::ZeroWallArea`] if the patch has no area, or
/// [`NozzleError::Su2`] if the solution lacks pressure or temperature.
pub fn average_wall(
    patch: &SurfacePatch,
    solution: &Solution,
) -> Result<WallAverages, NozzleError> {
    let pressure = solution.column(Field::Pressure)?;
    let temperature = solution.column(Field::Temperature)?;

    let mut area = 0.0;
    let mut p_sum = 0.0;
    let mut t_sum = 0.0;
    for facet in &patch.facets {
        let vertices = facet.vertices();
        let n = vertices.len() as f64;
        let (mut p, mut t) = (0.0, 0.0);
        for &v in vertices {
            let row = solution.row(patch.nodes[v])?;
            p += row[pressure] / n;
            t += row[temperature] / n;
        }

        let measure = patch.measure(facet);
        area += measure;
        p_sum += measure * p;
        t_sum += measure * t;
    }

    if area <= 0.0 {
        return Err(NozzleError::ZeroWallArea);
    }

    Ok(WallAverages {
        area: Area::new::<square_meter>(area),
        pressure: Pressure::new::<pascal>(p_sum / area),
        temperature: ThermodynamicTemperature::new::<kelvin>(t_sum / area),
    })
}

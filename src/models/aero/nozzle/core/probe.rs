//! Sampling the flow field at points and along the wall.

use nalgebra::Vector2;

use crate::support::su2::{Field, Solution, Su2Mesh};

use super::{NozzleError, geometry::interp};

/// Barycentric coordinates below this are still inside a triangle.
const INSIDE_TOL: f64 = 1e-10;

/// Linear interpolation of solution fields inside a 2D mesh.
#[derive(Debug)]
pub struct Probe<'a> {
    mesh: &'a Su2Mesh,
    solution: &'a Solution,
    triangles: Vec<[usize; 3]>,
}

impl<'a> Probe<'a> {
    #[must_use]
    pub fn new(mesh: &'a Su2Mesh, solution: &'a Solution) -> Self {
        Self {
            mesh,
            solution,
            triangles: mesh.planar_triangles(),
        }
    }

    /// The triangle containing `(x, y)` and its barycentric weights.
    #[must_use]
    pub fn locate(&self, x: f64, y: f64) -> Option<([usize; 3], [f64; 3])> {
        let p = Vector2::new(x, y);
        self.triangles.iter().find_map(|&triangle| {
            let [a, b, c] = triangle.map(|i| self.mesh.points[i].xy().coords);
            let (ab, ac, ap) = (b - a, c - a, p - a);
            let det = ab.perp(&ac);
            if det == 0.0 {
                return None;
            }
            let l1 = ap.perp(&ac) / det;
            let l2 = ab.perp(&ap) / det;
            let l0 = 1.0 - l1 - l2;
            [l0, l1, l2]
                .iter()
                .all(|&l| l >= -INSIDE_TOL)
                .then_some((triangle, [l0, l1, l2]))
        })
    }

    /// Interpolates `field` at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`NozzleError::OutsideMesh`] if no triangle contains the
    /// point, or [`NozzleError::Su2`] if the field is missing.
    pub fn sample(&self, field: Field, x: f64, y: f64) -> Result<f64, NozzleError> {
        let column = self.solution.column(field)?;
        self.interpolate(column, x, y)
    }

    /// Velocity `(ρu/ρ, ρv/ρ, 0)` at `(x, y)`.
    ///
    /// # Errors
    ///
    /// See [`Probe::sample`].
    pub fn velocity(&self, x: f64, y: f64) -> Result<[f64; 3], NozzleError> {
        let rho = self.sample(Field::Density, x, y)?;
        let rho_u = self.sample(Field::MomentumX, x, y)?;
        let rho_v = self.sample(Field::MomentumY, x, y)?;
        Ok([rho_u / rho, rho_v / rho, 0.0])
    }

    fn interpolate(&self, column: usize, x: f64, y: f64) -> Result<f64, NozzleError> {
        let (triangle, weights) = self
            .locate(x, y)
            .ok_or(NozzleError::OutsideMesh { x, y })?;

        let mut value = 0.0;
        for (node, weight) in triangle.into_iter().zip(weights) {
            value += weight * self.solution.row(node)?[column];
        }
        Ok(value)
    }
}

/// Interpolates `field` in `x` along the vertices of marker `tag`.
///
/// Vertices are sorted by `x`; locations past either end take the end value.
///
/// # Errors
///
/// Returns [`NozzleError::Su2`] if the marker or field is missing, and
/// [`NozzleError::EmptySurface`] if the marker has no vertices.
pub fn wall_profile(
    mesh: &Su2Mesh,
    solution: &Solution,
    tag: &str,
    field: Field,
    locations: &[f64],
) -> Result<Vec<f64>, NozzleError> {
    let column = solution.column(field)?;

    let mut nodes: Vec<usize> = mesh
        .marker(tag)?
        .elements
        .iter()
        .flat_map(|element| element.nodes.iter().copied())
        .collect();
    nodes.sort_unstable();
    nodes.dedup();
    if nodes.is_empty() {
        return Err(NozzleError::EmptySurface);
    }

    let mut samples = nodes
        .iter()
        .map(|&node| -> Result<(f64, f64), NozzleError> {
            Ok((mesh.points[node].x, solution.row(node)?[column]))
        })
        .collect::<Result<Vec<_>, _>>()?;
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (xs, values): (Vec<f64>, Vec<f64>) = samples.into_iter().unzip();

    Ok(locations.iter().map(|&x| interp(x, &xs, &values)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::aero::nozzle::core::test_support::{mesh, solution};

    #[test]
    fn samples_linear_fields_exactly() {
        let (mesh, solution) = (mesh(), solution());
        let probe = Probe::new(&mesh, &solution);

        let pressure = |x, y| probe.sample(Field::Pressure, x, y).unwrap();

        assert_relative_eq!(pressure(0.25, 0.1), 21_500.0, epsilon = 1e-9);
        assert_relative_eq!(
            probe.sample(Field::Temperature, 0.75, 0.3).unwrap(),
            325.0,
            epsilon = 1e-9
        );

        // Mesh vertices and edges are inside.
        assert_relative_eq!(pressure(1.0, 0.4), 26_000.0, epsilon = 1e-9);
        assert_relative_eq!(pressure(0.5, 0.3), 24_000.0, epsilon = 1e-9);
    }

    #[test]
    fn velocity_from_momentum() {
        let (mesh, solution) = (mesh(), solution());
        let velocity = Probe::new(&mesh, &solution).velocity(0.6, 0.2).unwrap();

        assert_relative_eq!(velocity[0], 300.0, epsilon = 1e-9);
        assert_relative_eq!(velocity[1], 0.0);
        assert_relative_eq!(velocity[2], 0.0);
    }

    #[test]
    fn outside_point_is_named() {
        let (mesh, solution) = (mesh(), solution());
        let probe = Probe::new(&mesh, &solution);

        let error = probe.sample(Field::Pressure, 1.5, 0.1).unwrap_err();
        assert!(matches!(error, NozzleError::OutsideMesh { x, y } if x == 1.5 && y == 0.1));
        assert!(error.to_string().contains("(1.5, 0.1)"));
    }

    #[test]
    fn wall_profile_interpolates_and_clamps() {
        let (mesh, solution) = (mesh(), solution());
        let profile =
            wall_profile(&mesh, &solution, "1", Field::Pressure, &[-1.0, 0.0, 0.25, 1.0, 2.0])
                .unwrap();

        let expected = [24_000.0, 24_000.0, 24_500.0, 26_000.0, 26_000.0];
        for (value, expected) in profile.iter().zip(expected) {
            assert_relative_eq!(*value, expected, epsilon = 1e-9);
        }
    }
}

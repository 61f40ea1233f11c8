//! Parametric Gmsh scripts for the nozzle flow domain.
//!
//! The domain is the upper half plane around an axisymmetric nozzle: the
//! symmetry axis along `y = 0`, a far-field box, the nozzle outer surface
//! from the lip at `(0.1548, 0.4244)` to the trailing edge, and the inner
//! wall from the exit back to the inlet at `x = 0`.
//!
//! Wall points are written exit-first. The wall is split into two B-splines
//! at the point whose `x` matches the thrust station, and a vertical line from
//! that point down to the axis becomes the thrust integration marker (9) for
//! Euler meshes.
//!
//! Physical line tags, shared by both layouts:
//!
//! | Tag | Boundary |
//! |-----|----------|
//! | 1 | inner nozzle wall |
//! | 2 | trailing edge |
//! | 3 | nozzle exterior |
//! | 4 | far-field inflow |
//! | 5 | far-field top |
//! | 6 | domain outlet |
//! | 7 | symmetry axis |
//! | 8 | nozzle inlet |
//! | 9 | thrust integration line (Euler only) |

use crate::support::gmsh::{BoundaryLayerField, BoxField, GeoScript};

use super::{NozzleError, THRUST_MATCH_TOL, config::Method, geometry::interp};

/// Point size hint. Sizes come from background fields, so this is nominal.
const SIZE_NOMINAL: f64 = 0.3;
const SIZE_FAR: f64 = 0.3;
const SIZE_CURVE: f64 = 0.005;

/// Nozzle lip, where the outer surface starts.
const LIP: [f64; 2] = [0.1548, 0.4244];
const FAR_FIELD_X_MIN: f64 = -0.67;
const FAR_FIELD_Y_MAX: f64 = 2.5;
const SHARP_OUTLET_X: f64 = 1.5;
const ROUNDED_OUTLET_X: f64 = 4.5;

/// Trailing-edge thickness.
const TRAILING_EDGE: f64 = 0.012;
/// Longest distance over which a corner is rounded.
const ROUNDING: f64 = 0.05;

/// Inputs shared by both layouts.
#[derive(Debug, Clone, Copy)]
pub struct GeoParams<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub x_thrust: f64,
    pub hl: [f64; 5],
    pub method: Method,
    pub bl_ds: f64,
    pub bl_ratio: f64,
    pub bl_thickness: f64,
}

impl GeoParams<'_> {
    fn length(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    /// Trailing-edge tip, one trailing-edge thickness above the wall exit.
    fn tip(&self) -> [f64; 2] {
        [self.length(), self.y[self.y.len() - 1] + TRAILING_EDGE]
    }

    /// The wall index matching the thrust station.
    ///
    /// The matched point must be interior so both wall splines have at
    /// least two points.
    fn thrust_index(&self) -> Result<usize, NozzleError> {
        let n = self.x.len();
        self.x
            .iter()
            .position(|&x| (x - self.x_thrust).abs() < THRUST_MATCH_TOL)
            .filter(|&i| i > 0 && i < n - 1)
            .ok_or(NozzleError::ThrustStation {
                x_thrust: self.x_thrust,
            })
    }

    /// Refinement boxes common to both layouts, indexed into `hl`.
    fn refinement_boxes(&self) -> Vec<BoxField> {
        let [hl1, hl2, hl3, hl4, hl5] = self.hl;
        [
            (100.0, 0.8, hl3),
            (100.0, 0.5, hl1),
            (100.0, 0.5, hl5),
            (0.3, 0.37, hl4),
            (100.0, 0.8, hl2),
            (self.length() + 0.04, 0.5, hl4),
        ]
        .into_iter()
        .map(|(x_max, y_max, v_in)| BoxField {
            x_min: -100.0,
            x_max,
            y_min: -10.0,
            y_max,
            v_in,
            v_out: SIZE_FAR,
        })
        .collect()
    }

    fn boundary_layer(&self, edges: Vec<i64>, nodes: Vec<i64>) -> BoundaryLayerField {
        BoundaryLayerField {
            edges,
            nodes,
            h_far: 1.0,
            h_wall_n: self.bl_ds,
            h_wall_t: 0.3,
            ratio: self.bl_ratio,
            thickness: self.bl_thickness,
        }
    }
}

/// Writes box fields, then a `Min` field over them as the background field.
///
/// Returns the next free field id.
fn size_fields(geo: &mut GeoScript, boxes: &[BoxField]) -> i64 {
    let mut ids = Vec::with_capacity(boxes.len());
    for (id, field) in (1..).zip(boxes) {
        geo.box_field(id, field);
        ids.push(id);
    }
    let min_id = ids.len() as i64 + 1;
    geo.min_field(min_id, &ids);
    geo.background_field(min_id);
    min_id + 1
}

/// Sharp trailing edge, far field to `x = 1.5`.
///
/// # Errors
///
/// Returns [`NozzleError::ThrustStation`] if no interior wall point matches
/// `x_thrust`.
pub fn sharp(params: &GeoParams<'_>) -> Result<GeoScript, NozzleError> {
    let thrust = params.thrust_index()?;
    let n = params.x.len();
    let tip = params.tip();
    let band_y = LIP[1] + 0.25 * tip[1];

    let mut geo = GeoScript::new();
    geo.point(1, 0.0, 0.0, SIZE_NOMINAL);
    geo.point(2, params.x_thrust, 0.0, SIZE_NOMINAL);
    geo.point(3, SHARP_OUTLET_X, 0.0, SIZE_NOMINAL);
    geo.point(4, SHARP_OUTLET_X, FAR_FIELD_Y_MAX, SIZE_FAR);
    geo.point(5, FAR_FIELD_X_MIN, FAR_FIELD_Y_MAX, SIZE_FAR);
    geo.point(6, FAR_FIELD_X_MIN, LIP[1], SIZE_NOMINAL);
    geo.point(7, LIP[0], LIP[1], SIZE_NOMINAL);
    geo.point(8, tip[0], tip[1], SIZE_NOMINAL);
    geo.point(9, SHARP_OUTLET_X, tip[1], SIZE_NOMINAL);
    geo.point(10, SHARP_OUTLET_X, band_y, SIZE_NOMINAL);
    geo.point(11, FAR_FIELD_X_MIN, band_y, SIZE_NOMINAL);

    // Exit-first wall points starting at tag 12.
    let wall_id = |i: usize| 12 + (n - 1 - i) as i64;
    for i in (0..n).rev() {
        geo.point(wall_id(i), params.x[i], params.y[i], SIZE_NOMINAL);
    }
    let (exit_id, thrust_id, inlet_id) = (wall_id(n - 1), wall_id(thrust), wall_id(0));
    log::debug!("thrust station x={} at point {thrust_id}", params.x[thrust]);

    for (id, (start, end)) in (1..).zip([
        (1, 2),
        (2, 3),
        (3, 9),
        (9, 10),
        (10, 4),
        (4, 5),
        (5, 11),
        (11, 6),
        (6, 7),
        (7, 8),
        (8, exit_id),
    ]) {
        geo.line(id, start, end);
    }
    geo.bspline(12, &(exit_id..=thrust_id).collect::<Vec<_>>());
    geo.bspline(15, &(thrust_id..=inlet_id).collect::<Vec<_>>());
    geo.line(13, inlet_id, 1);

    geo.line_loop(14, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15, 13]);
    geo.plane_surface(14, &[14]);

    let next_field = size_fields(&mut geo, &params.refinement_boxes());

    match params.method {
        Method::Rans => {
            let layer = params.boundary_layer(vec![9, 10, 11, 12, 15], vec![6, inlet_id]);
            geo.boundary_layer_field(next_field, &layer);
            sharp_markers(&mut geo);
            geo.physical_surface(21, &[14]);
        }
        Method::Euler => {
            geo.delete_surface(14);
            geo.line(16, thrust_id, 2);
            geo.line_loop(17, &[16, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
            geo.plane_surface(18, &[17]);
            geo.line_loop(19, &[1, -16, 15, 13]);
            geo.plane_surface(20, &[19]);
            geo.physical_surface(21, &[20, 18]);
            sharp_markers(&mut geo);
            geo.physical_line(9, &[16]);
        }
    }

    Ok(geo)
}

fn sharp_markers(geo: &mut GeoScript) {
    geo.physical_line(1, &[12, 15]);
    geo.physical_line(2, &[11]);
    geo.physical_line(3, &[9, 10]);
    geo.physical_line(4, &[7, 8]);
    geo.physical_line(5, &[6]);
    geo.physical_line(6, &[3, 4, 5]);
    geo.physical_line(7, &[1, 2]);
    geo.physical_line(8, &[13]);
}

/// Rounded lip and trailing edge, far field to `x = 4.5`.
///
/// Wall points within the rounding length of the exit are replaced by the
/// trailing-edge round, so the thrust station must lie upstream of it.
///
/// # Errors
///
/// Returns [`NozzleError::ThrustStation`] if no interior wall point upstream
/// of the trailing-edge round matches `x_thrust`.
pub fn rounded_edges(params: &GeoParams<'_>) -> Result<GeoScript, NozzleError> {
    let thrust = params.thrust_index()?;
    let length = params.length();
    let tip = params.tip();
    let band_y = LIP[1] + 0.25 * tip[1];

    let mut geo = GeoScript::new();
    geo.point(1, 0.0, 0.0, SIZE_NOMINAL);
    geo.point(2, params.x_thrust, 0.0, SIZE_NOMINAL);
    geo.point(3, ROUNDED_OUTLET_X, 0.0, SIZE_NOMINAL);
    geo.point(4, ROUNDED_OUTLET_X, FAR_FIELD_Y_MAX, SIZE_FAR);
    geo.point(5, FAR_FIELD_X_MIN, FAR_FIELD_Y_MAX, SIZE_FAR);
    geo.point(6, FAR_FIELD_X_MIN, LIP[1], SIZE_NOMINAL);

    // Lip round.
    let alpha = (tip[1] - LIP[1]).atan2(tip[0] - LIP[0]).abs();
    let (dx, dy) = (ROUNDING * alpha.cos(), ROUNDING * alpha.sin());
    geo.point(7, LIP[0] - ROUNDING, LIP[1], SIZE_NOMINAL);
    geo.point(8, LIP[0], LIP[1], SIZE_NOMINAL);
    geo.point(9, LIP[0] + dx, LIP[1] - dy, SIZE_NOMINAL);

    // Upper trailing-edge corner.
    geo.point(10, tip[0] - dx, tip[1] + dy, SIZE_NOMINAL);
    geo.point(11, tip[0], tip[1], SIZE_CURVE);
    geo.point(12, tip[0], tip[1] - TRAILING_EDGE / 2.0, SIZE_CURVE);

    // Lower trailing-edge corner, rejoining the inner wall at `x_round`.
    let x_round = tip[0] - ROUNDING.min((length - params.x_thrust) / 2.0);
    let y_round = interp(x_round, params.x, params.y);
    geo.point(14, length, tip[1] - TRAILING_EDGE, SIZE_CURVE);
    geo.point(15, x_round, y_round, SIZE_CURVE);

    geo.point(16, ROUNDED_OUTLET_X, tip[1], SIZE_NOMINAL);
    geo.point(17, ROUNDED_OUTLET_X, band_y, SIZE_NOMINAL);
    geo.point(18, FAR_FIELD_X_MIN, band_y, SIZE_NOMINAL);

    // Exit-first wall points upstream of the round, starting at tag 19.
    let kept: Vec<usize> = (0..params.x.len())
        .rev()
        .filter(|&i| params.x[i] < x_round)
        .collect();
    if !kept.contains(&thrust) {
        return Err(NozzleError::ThrustStation {
            x_thrust: params.x_thrust,
        });
    }
    let mut wall_ids = Vec::with_capacity(kept.len());
    let mut thrust_id = 0;
    for (id, &i) in (19..).zip(&kept) {
        geo.point(id, params.x[i], params.y[i], SIZE_NOMINAL);
        wall_ids.push(id);
        if i == thrust {
            thrust_id = id;
        }
    }
    let inlet_id = wall_ids[wall_ids.len() - 1];
    log::debug!("thrust station x={} at point {thrust_id}", params.x[thrust]);

    for (id, (start, end)) in (1..).zip([
        (1, 2),
        (2, 3),
        (3, 16),
        (16, 17),
        (17, 4),
        (4, 5),
        (5, 18),
        (18, 6),
        (6, 7),
        (9, 10),
    ]) {
        geo.line(id, start, end);
    }
    geo.bspline(12, &[7, 8, 9]);
    geo.bspline(13, &[10, 11, 12]);
    geo.bspline(14, &[12, 14, 15]);

    let mut exit_spline = vec![15];
    exit_spline.extend(wall_ids.iter().copied().take_while(|&id| id <= thrust_id));
    geo.bspline(15, &exit_spline);
    geo.bspline(16, &(thrust_id..=inlet_id).collect::<Vec<_>>());
    geo.line(17, inlet_id, 1);

    geo.line_loop(18, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 12, 10, 13, 14, 15, 16, 17]);
    geo.plane_surface(18, &[18]);

    let mut boxes = params.refinement_boxes();
    boxes.push(BoxField {
        x_min: length - TRAILING_EDGE / 2.0,
        x_max: length + TRAILING_EDGE,
        y_min: tip[1] - 1.5 * TRAILING_EDGE,
        y_max: tip[1] + 0.5 * TRAILING_EDGE,
        v_in: params.hl[3] / 3.0,
        v_out: SIZE_FAR,
    });
    let next_field = size_fields(&mut geo, &boxes);

    match params.method {
        Method::Rans => {
            let layer =
                params.boundary_layer(vec![9, 12, 10, 13, 14, 15, 16], vec![6, inlet_id]);
            geo.boundary_layer_field(next_field, &layer);
            rounded_markers(&mut geo);
            geo.physical_surface(24, &[18]);
        }
        Method::Euler => {
            geo.delete_surface(18);
            geo.line(19, thrust_id, 2);
            // Flow downstream of the thrust line.
            geo.line_loop(20, &[19, 2, 3, 4, 5, 6, 7, 8, 9, 12, 10, 13, 14, 15]);
            geo.plane_surface(21, &[20]);
            // Flow inside the nozzle, upstream of the thrust line.
            geo.line_loop(22, &[1, -19, 16, 17]);
            geo.plane_surface(23, &[22]);
            geo.physical_surface(24, &[21, 23]);
            rounded_markers(&mut geo);
            geo.physical_line(9, &[19]);
        }
    }

    Ok(geo)
}

fn rounded_markers(geo: &mut GeoScript) {
    geo.physical_line(1, &[15, 16]);
    geo.physical_line(2, &[13, 14]);
    geo.physical_line(3, &[9, 12, 10]);
    geo.physical_line(4, &[7, 8]);
    geo.physical_line(5, &[6]);
    geo.physical_line(6, &[3, 4, 5]);
    geo.physical_line(7, &[1, 2]);
    geo.physical_line(8, &[17]);
}

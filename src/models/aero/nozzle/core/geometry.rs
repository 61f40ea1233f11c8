//! Inner wall geometry.

use thiserror::Error;

/// Spline degree of the wall parameterization.
const DEGREE: usize = 3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("coefficient vector must hold x then y control values; got {0} values")]
    OddCoefficients(usize),

    #[error("a cubic B-spline with {controls} control points needs {expected} knots, got {knots}")]
    KnotCount {
        controls: usize,
        knots: usize,
        expected: usize,
    },

    #[error("knots must be nondecreasing (knot {index})")]
    DecreasingKnots { index: usize },

    #[error("need at least 2 samples, got {0}")]
    TooFewSamples(usize),
}

/// A clamped cubic B-spline wall in the `(x, r)` plane.
///
/// Coefficients are given the way nozzle parameterizations store them: all
/// `x` control values followed by all `y` control values.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSpline {
    knots: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl WallSpline {
    /// Builds a spline from its knot vector and stacked coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the knot count doesn't equal
    /// `controls + 4` or the knots decrease.
    pub fn new(knots: Vec<f64>, coefs: &[f64]) -> Result<Self, GeometryError> {
        if coefs.len() % 2 != 0 || coefs.is_empty() {
            return Err(GeometryError::OddCoefficients(coefs.len()));
        }
        let controls = coefs.len() / 2;
        let expected = controls + DEGREE + 1;
        if knots.len() != expected || controls <= DEGREE {
            return Err(GeometryError::KnotCount {
                controls,
                knots: knots.len(),
                expected,
            });
        }
        if let Some(index) = knots.windows(2).position(|w| w[1] < w[0]) {
            return Err(GeometryError::DecreasingKnots { index: index + 1 });
        }

        let (x, y) = coefs.split_at(controls);
        Ok(Self {
            knots,
            x: x.to_vec(),
            y: y.to_vec(),
        })
    }

    /// Parameter range `[t_p, t_n]` over which the spline is defined.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[DEGREE], self.knots[self.x.len()])
    }

    /// Evaluates the wall at parameter `u` (clamped to the domain).
    #[must_use]
    pub fn point(&self, u: f64) -> [f64; 2] {
        let (lo, hi) = self.domain();
        let u = u.clamp(lo, hi);
        let span = self.span(u);
        [self.de_boor(&self.x, span, u), self.de_boor(&self.y, span, u)]
    }

    /// Samples `n` points uniformly in parameter space, endpoints included.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewSamples`] if `n < 2`.
    pub fn sample(&self, n: usize) -> Result<(Vec<f64>, Vec<f64>), GeometryError> {
        if n < 2 {
            return Err(GeometryError::TooFewSamples(n));
        }
        let (lo, hi) = self.domain();
        let step = (hi - lo) / (n - 1) as f64;

        Ok((0..n)
            .map(|i| {
                let u = if i == n - 1 { hi } else { lo + step * i as f64 };
                let [x, y] = self.point(u);
                (x, y)
            })
            .unzip())
    }

    /// Knot span `k` with `t_k <= u < t_{k+1}`, using the last nonempty span at `u = t_n`.
    fn span(&self, u: f64) -> usize {
        let n = self.x.len();
        (DEGREE..n)
            .rev()
            .find(|&k| self.knots[k] <= u && self.knots[k] < self.knots[k + 1])
            .unwrap_or(DEGREE)
    }

    fn de_boor(&self, control: &[f64], k: usize, u: f64) -> f64 {
        let t = &self.knots;
        let mut d = [0.0; DEGREE + 1];
        for (j, dj) in d.iter_mut().enumerate() {
            *dj = control[j + k - DEGREE];
        }

        for r in 1..=DEGREE {
            for j in (r..=DEGREE).rev() {
                let left = t[j + k - DEGREE];
                let denom = t[j + 1 + k - r] - left;
                let alpha = if denom == 0.0 { 0.0 } else { (u - left) / denom };
                d[j] = (1.0 - alpha) * d[j - 1] + alpha * d[j];
            }
        }
        d[DEGREE]
    }
}

/// Piecewise-linear interpolation of `ys(xs)` at `x`, held constant outside
/// the data range.
///
/// `xs` must be increasing.
#[must_use]
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    match n {
        0 => return f64::NAN,
        1 => return ys[0],
        _ => {}
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    let i = xs[..n].partition_point(|&xi| xi <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    if x1 == x0 {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const COEFS: [f64; 36] = [
        0.0000, 0.0000, 0.1500, 0.1700, 0.1900, 0.2124, 0.2269, 0.2734, 0.3218, 0.3218, 0.3230,
        0.3343, 0.3474, 0.4392, 0.4828, 0.5673, 0.6700, 0.6700, 0.3255, 0.3255, 0.3255, 0.3255,
        0.3255, 0.3238, 0.2981, 0.2817, 0.2787, 0.2787, 0.2787, 0.2797, 0.2807, 0.2936, 0.2978,
        0.3049, 0.3048, 0.3048,
    ];

    fn knots() -> Vec<f64> {
        let mut knots = vec![0.0; 4];
        knots.extend((1..15).map(f64::from));
        knots.extend([15.0; 4]);
        knots
    }

    #[test]
    fn clamped_spline_interpolates_end_control_points() {
        let spline = WallSpline::new(knots(), &COEFS).unwrap();
        let (x, y) = spline.sample(100).unwrap();

        assert_eq!(x.len(), 100);
        assert_relative_eq!(x[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(y[0], 0.3255, epsilon = 1e-12);
        assert_relative_eq!(x[99], 0.67, epsilon = 1e-12);
        assert_relative_eq!(y[99], 0.3048, epsilon = 1e-12);
        assert!(x.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn constant_control_polygon_gives_constant_wall() {
        let coefs = [0.0, 1.0, 2.0, 3.0, 4.0, 0.42, 0.42, 0.42, 0.42, 0.42];
        let knots = vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0];
        let spline = WallSpline::new(knots, &coefs).unwrap();

        for u in [0.0, 0.1, 0.5, 0.77, 1.0] {
            assert_relative_eq!(spline.point(u)[1], 0.42, epsilon = 1e-14);
        }
    }

    #[test]
    fn single_segment_is_a_bezier_curve() {
        // Four control points with knots [0,0,0,0,1,1,1,1] give a cubic Bézier.
        let coefs = [0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 1.0, 0.0];
        let spline = WallSpline::new(vec![0., 0., 0., 0., 1., 1., 1., 1.], &coefs).unwrap();

        let [x, y] = spline.point(0.5);
        assert_relative_eq!(x, 1.5, epsilon = 1e-14);
        assert_relative_eq!(y, 0.75, epsilon = 1e-14);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(
            WallSpline::new(knots(), &COEFS[..35]),
            Err(GeometryError::OddCoefficients(35))
        );
        assert!(matches!(
            WallSpline::new(knots()[1..].to_vec(), &COEFS),
            Err(GeometryError::KnotCount { controls: 18, .. })
        ));

        let mut decreasing = knots();
        decreasing[10] = 2.0;
        assert_eq!(
            WallSpline::new(decreasing, &COEFS),
            Err(GeometryError::DecreasingKnots { index: 10 })
        );

        let spline = WallSpline::new(knots(), &COEFS).unwrap();
        assert_eq!(spline.sample(1), Err(GeometryError::TooFewSamples(1)));
    }

    #[test]
    fn interp_matches_linear_and_clamps() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [10.0, 20.0, 0.0];

        assert_relative_eq!(interp(0.5, &xs, &ys), 15.0);
        assert_relative_eq!(interp(2.0, &xs, &ys), 10.0);
        assert_relative_eq!(interp(1.0, &xs, &ys), 20.0);
        assert_relative_eq!(interp(-4.0, &xs, &ys), 10.0);
        assert_relative_eq!(interp(9.0, &xs, &ys), 0.0);
    }
}

use crate::error::{FuzzyError, FuzzyResult};

/// A fuzzy set shape, evaluated pointwise to a membership degree in [0, 1].
///
/// The set of shapes is closed, so polymorphism is a single dispatch over the
/// tag rather than a trait object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MembershipFunction {
    /// Triangle with feet at `a` and `c` and apex at `b`.
    Triangular { a: f64, b: f64, c: f64 },
    /// Trapezoid with feet at `a` and `d` and plateau on `[b, c]`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// Bell curve `exp(-(x - mean)^2 / (2 sigma^2))`.
    Gaussian { mean: f64, sigma: f64 },
}

impl MembershipFunction {
    /// Requires `a <= b <= c`. `a == b` or `b == c` degenerates the
    /// corresponding ramp into a step (a right/left triangle).
    pub fn triangular(a: f64, b: f64, c: f64) -> FuzzyResult<Self> {
        if !(a <= b && b <= c) {
            return Err(FuzzyError::InvalidParameter(format!(
                "triangular requires a <= b <= c, got ({a}, {b}, {c})"
            )));
        }

        Ok(Self::Triangular { a, b, c })
    }

    /// Requires `a <= b <= c <= d`. Zero-width ramps are steps, as with
    /// [`MembershipFunction::triangular`].
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> FuzzyResult<Self> {
        if !(a <= b && b <= c && c <= d) {
            return Err(FuzzyError::InvalidParameter(format!(
                "trapezoidal requires a <= b <= c <= d, got ({a}, {b}, {c}, {d})"
            )));
        }

        Ok(Self::Trapezoidal { a, b, c, d })
    }

    /// Requires `sigma > 0`.
    pub fn gaussian(mean: f64, sigma: f64) -> FuzzyResult<Self> {
        if !(sigma > 0.) {
            return Err(FuzzyError::InvalidParameter(format!(
                "gaussian requires sigma > 0, got {sigma}"
            )));
        }

        Ok(Self::Gaussian { mean, sigma })
    }

    /// Membership degree at `x`. Pure; always in [0, 1].
    ///
    /// The apex/plateau test comes before the ramp tests so that degenerate
    /// zero-width ramps never divide by zero.
    pub fn evaluate(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => {
                if x == b {
                    1.
                } else if x <= a || x >= c {
                    0.
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            },
            Self::Trapezoidal { a, b, c, d } => {
                if (b..=c).contains(&x) {
                    1.
                } else if x <= a || x >= d {
                    0.
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            },
            Self::Gaussian { mean, sigma } => {
                let z = (x - mean) / sigma;

                (-z * z / 2.).exp()
            },
        }
    }

    /// Interval outside of which the degree is exactly zero, when one exists.
    /// Gaussians only decay asymptotically, so they have no finite support.
    pub fn support(&self) -> Option<(f64, f64)> {
        match *self {
            Self::Triangular { a, c, .. } => Some((a, c)),
            Self::Trapezoidal { a, d, .. } => Some((a, d)),
            Self::Gaussian { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangular_ramps_and_support() {
        let mf = MembershipFunction::triangular(0., 5., 10.).unwrap();

        assert_eq!(mf.evaluate(-1.), 0.);
        assert_eq!(mf.evaluate(0.), 0.);
        assert_eq!(mf.evaluate(2.5), 0.5);
        assert_eq!(mf.evaluate(5.), 1.);
        assert_eq!(mf.evaluate(7.5), 0.5);
        assert_eq!(mf.evaluate(10.), 0.);
        assert_eq!(mf.evaluate(11.), 0.);
        assert_eq!(mf.support(), Some((0., 10.)));
    }

    #[test]
    fn degenerate_triangles_are_steps() {
        // Left shoulder: apex sits on the left foot.
        let left = MembershipFunction::triangular(0., 0., 5.).unwrap();

        assert_eq!(left.evaluate(0.), 1.);
        assert_eq!(left.evaluate(2.5), 0.5);
        assert_eq!(left.evaluate(5.), 0.);

        let right = MembershipFunction::triangular(5., 10., 10.).unwrap();

        assert_eq!(right.evaluate(10.), 1.);
        assert_eq!(right.evaluate(7.5), 0.5);
        assert_eq!(right.evaluate(5.), 0.);
    }

    #[test]
    fn trapezoidal_plateau_is_one() {
        let mf = MembershipFunction::trapezoidal(0., 2., 8., 10.).unwrap();

        assert_eq!(mf.evaluate(1.), 0.5);
        assert_eq!(mf.evaluate(2.), 1.);
        assert_eq!(mf.evaluate(5.), 1.);
        assert_eq!(mf.evaluate(8.), 1.);
        assert_eq!(mf.evaluate(9.), 0.5);
        assert_eq!(mf.evaluate(10.), 0.);
        assert_eq!(mf.evaluate(12.), 0.);
    }

    #[test]
    fn trapezoidal_degenerate_ramps() {
        let mf = MembershipFunction::trapezoidal(0., 0., 5., 5.).unwrap();

        assert_eq!(mf.evaluate(0.), 1.);
        assert_eq!(mf.evaluate(5.), 1.);
        assert_eq!(mf.evaluate(5.1), 0.);
    }

    #[test]
    fn gaussian_peak_and_decay() {
        let mf = MembershipFunction::gaussian(5., 1.).unwrap();

        assert_eq!(mf.evaluate(5.), 1.);
        assert!(mf.evaluate(5.5) > mf.evaluate(6.));
        assert!(mf.evaluate(4.5) > mf.evaluate(4.));
        assert!(mf.evaluate(6.) > 0.5);
        assert!(mf.evaluate(10.) < 1e-5);
        assert_eq!(mf.support(), None);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(
            MembershipFunction::triangular(5., 1., 10.),
            Err(FuzzyError::InvalidParameter(_))
        ));
        assert!(matches!(
            MembershipFunction::trapezoidal(0., 3., 2., 10.),
            Err(FuzzyError::InvalidParameter(_))
        ));
        assert!(matches!(
            MembershipFunction::gaussian(0., 0.),
            Err(FuzzyError::InvalidParameter(_))
        ));
        assert!(matches!(
            MembershipFunction::gaussian(0., -1.),
            Err(FuzzyError::InvalidParameter(_))
        ));
    }
}

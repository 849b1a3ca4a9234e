use crate::linspace::Linspace;

/// Number of samples used to discretize an output domain for aggregation and
/// centroid defuzzification when the engine is not configured otherwise.
/// Resolution trades accuracy for cost; cost per inference is bounded by
/// rules x samples.
pub const DEFAULT_RESOLUTION: usize = 500;

/// Centroid of an already-sampled aggregated fuzzy set:
/// `sum(x_i * mu_i) / sum(mu_i)`.
///
/// Returns `None` when every sample is zero, meaning no rule contributed any
/// membership and the crisp value is undefined.
pub fn centroid_of_samples(samples: &[(f64, f64)]) -> Option<f64> {
    let mut numerator = 0.;
    let mut denominator = 0.;

    for (x, mu) in samples {
        numerator += x * mu;
        denominator += mu;
    }

    if denominator > 0. {
        Some(numerator / denominator)
    } else {
        None
    }
}

/// Samples `mu` over `n` evenly spaced points of `[lo, hi]` and takes the
/// centroid of the result.
pub fn centroid(mu: impl Fn(f64) -> f64, lo: f64, hi: f64, n: usize) -> Option<f64> {
    let samples: Vec<(f64, f64)> = Linspace::new(lo, hi, n).map(|x| (x, mu(x))).collect();

    centroid_of_samples(&samples)
}

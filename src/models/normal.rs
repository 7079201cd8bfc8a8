use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Standard normal cumulative distribution N(x).
///
/// statrs evaluates this through `erfc`: absolute error stays around 1e-11
/// near the center and the tails keep their relative accuracy instead of
/// collapsing to 0 or 1 early.
#[inline]
pub fn cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Standard normal density: 1/sqrt(2*pi) * exp(-x^2/2).
#[inline]
pub fn pdf(x: f64) -> f64 {
    Normal::standard().pdf(x)
}

//! Black-Scholes-Merton European option pricing.
//!
//! d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
//! d2 = d1 - sigma * sqrt(T)
//!
//! Call = S*N(d1) - K*e^(-rT)*N(d2)
//! Put  = K*e^(-rT)*N(-d2) - S*N(-d1)
//!
//! Pure functions of their inputs: no state, no I/O, safe to call from any thread.
//! Vega and rho are per unit of sigma / r; theta is per year.

use crate::errors::{Field, PricingError, PricingOutcome, Violation, Violations};
use crate::models::normal;
use crate::state::{OptionParameters, OptionType, PricingResult, QuotePair};

/// Check every input constraint, collecting all failures.
pub fn validate(params: &OptionParameters) -> PricingOutcome<()> {
    let mut violations = Violations::new();

    let mut check = |field: Field, value: f64, ok: bool, constraint: &'static str| {
        if !(ok && value.is_finite()) {
            violations.push(Violation { field, value, constraint });
        }
    };

    check(Field::Spot, params.spot, params.spot > 0.0, "finite and > 0");
    check(Field::Strike, params.strike, params.strike > 0.0, "finite and > 0");
    check(Field::TimeToExpiry, params.time_to_expiry, params.time_to_expiry >= 0.0, "finite and >= 0");
    // exp(-rT) must not overflow; a bad T is reported on its own field
    let t = params.time_to_expiry;
    let discount_ok = !(t.is_finite() && t >= 0.0) || (-params.rate * t).exp().is_finite();
    check(Field::Rate, params.rate, discount_ok, "finite, with exp(-rate * time_to_expiry) finite");
    check(Field::Volatility, params.volatility, params.volatility >= 0.0, "finite and >= 0");

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PricingError::InvalidInput { violations })
    }
}

/// Payoff if exercised now.
#[inline]
pub fn intrinsic_value(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// How the option is priced once inputs are validated.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Regime {
    /// T = 0
    Expired,
    /// sigma*sqrt(T) is zero or subnormal: the terminal spot is the forward
    Deterministic,
    /// Total variance overflows f64: the sigma -> infinity limit
    Unbounded,
    /// General case; d1/d2 may be +-inf when moneyness dwarfs sigma*sqrt(T)
    Diffusive { d1: f64, d2: f64 },
}

fn regime(params: &OptionParameters) -> Regime {
    let t = params.time_to_expiry;
    if t == 0.0 {
        return Regime::Expired;
    }

    let sigma_sqrt_t = params.volatility * t.sqrt();
    if sigma_sqrt_t < f64::MIN_POSITIVE {
        return Regime::Deterministic;
    }

    let half_variance = 0.5 * sigma_sqrt_t * sigma_sqrt_t;
    if !half_variance.is_finite() {
        return Regime::Unbounded;
    }

    // S/K itself can overflow or underflow for extreme but valid inputs
    let ratio = params.spot / params.strike;
    let log_moneyness = if ratio.is_normal() {
        ratio.ln()
    } else {
        params.spot.ln() - params.strike.ln()
    };

    let d1 = (log_moneyness + params.rate * t + half_variance) / sigma_sqrt_t;
    Regime::Diffusive {
        d1,
        d2: d1 - sigma_sqrt_t,
    }
}

/// (d1, d2), or None where they are undefined or infinite
/// (T = 0, sigma = 0, or f64 range exhausted). Assumes validated inputs.
#[inline]
pub fn d1_d2(params: &OptionParameters) -> Option<(f64, f64)> {
    match regime(params) {
        Regime::Diffusive { d1, d2 } if d1.is_finite() && d2.is_finite() => Some((d1, d2)),
        _ => None,
    }
}

/// Price and Greeks for one option.
pub fn evaluate(params: &OptionParameters) -> PricingOutcome<PricingResult> {
    validate(params)?;
    Ok(evaluate_unchecked(params))
}

/// Call and put on the same inputs; `params.option_type` is ignored.
pub fn evaluate_pair(params: &OptionParameters) -> PricingOutcome<QuotePair> {
    validate(params)?;

    let call = evaluate_unchecked(&params.with_type(OptionType::Call));
    let put = evaluate_unchecked(&params.with_type(OptionType::Put));
    let d = d1_d2(params);

    Ok(QuotePair {
        spot: params.spot,
        strike: params.strike,
        time_to_expiry: params.time_to_expiry,
        rate: params.rate,
        volatility: params.volatility,
        d1: d.map(|(d1, _)| d1),
        d2: d.map(|(_, d2)| d2),
        call,
        put,
    })
}

fn evaluate_unchecked(params: &OptionParameters) -> PricingResult {
    match regime(params) {
        Regime::Expired => at_expiry(params),
        Regime::Deterministic => deterministic(params),
        Regime::Unbounded => unbounded(params),
        Regime::Diffusive { d1, d2 } => closed_form(params, d1, d2),
    }
}

/// T = 0: intrinsic value, nothing left to hedge or discount.
/// At-the-money counts as out of the money.
fn at_expiry(params: &OptionParameters) -> PricingResult {
    let (s, k) = (params.spot, params.strike);
    let delta = match params.option_type {
        OptionType::Call if s > k => 1.0,
        OptionType::Put if s < k => -1.0,
        _ => 0.0,
    };

    PricingResult {
        price: intrinsic_value(params.option_type, s, k),
        delta,
        gamma: 0.0,
        theta: 0.0,
        vega: 0.0,
        rho: 0.0,
    }
}

/// sigma = 0, T > 0: the terminal spot is the forward, so the option is
/// worth its discounted intrinsic value. Only the discount factor moves.
fn deterministic(params: &OptionParameters) -> PricingResult {
    let (s, t, r) = (params.spot, params.time_to_expiry, params.rate);
    let pv_strike = params.strike * (-r * t).exp();

    let (price, delta, theta, rho) = match params.option_type {
        OptionType::Call if s > pv_strike => (s - pv_strike, 1.0, -r * pv_strike, t * pv_strike),
        OptionType::Put if s < pv_strike => (pv_strike - s, -1.0, r * pv_strike, -t * pv_strike),
        _ => (0.0, 0.0, 0.0, 0.0),
    };

    PricingResult {
        price,
        delta,
        gamma: 0.0,
        theta,
        vega: 0.0,
        rho,
    }
}

/// Variance beyond f64 range: N(d1) = 1 and N(d2) = 0, so the call is worth
/// the spot and the put the discounted strike. Only the put keeps rate exposure.
fn unbounded(params: &OptionParameters) -> PricingResult {
    let (s, t, r) = (params.spot, params.time_to_expiry, params.rate);
    let pv_strike = params.strike * (-r * t).exp();

    let (price, delta, theta, rho) = match params.option_type {
        OptionType::Call => (s, 1.0, 0.0, 0.0),
        OptionType::Put => (pv_strike, 0.0, r * pv_strike, -t * pv_strike),
    };

    PricingResult {
        price,
        delta,
        gamma: 0.0,
        theta,
        vega: 0.0,
        rho,
    }
}

fn closed_form(params: &OptionParameters, d1: f64, d2: f64) -> PricingResult {
    let (s, k, t, r, sigma) = (
        params.spot,
        params.strike,
        params.time_to_expiry,
        params.rate,
        params.volatility,
    );

    let sqrt_t = t.sqrt();
    let pv_strike = k * (-r * t).exp();
    let phi_d1 = normal::pdf(d1);

    // Shared by both sides. phi(d1) underflows to 0 long before the
    // denominator does; a true gamma past f64::MAX saturates.
    let gamma = if phi_d1 > 0.0 {
        (phi_d1 / s / (sigma * sqrt_t)).min(f64::MAX)
    } else {
        0.0
    };
    let vega = s * phi_d1 * sqrt_t;
    let time_decay = -s * phi_d1 * sigma / (2.0 * sqrt_t);

    let (price, delta, theta, rho) = match params.option_type {
        OptionType::Call => {
            let n_d1 = normal::cdf(d1);
            let n_d2 = normal::cdf(d2);
            (
                s * n_d1 - pv_strike * n_d2,
                n_d1,
                time_decay - r * pv_strike * n_d2,
                t * pv_strike * n_d2,
            )
        }
        OptionType::Put => {
            let n_md1 = normal::cdf(-d1);
            let n_md2 = normal::cdf(-d2);
            (
                pv_strike * n_md2 - s * n_md1,
                normal::cdf(d1) - 1.0,
                time_decay + r * pv_strike * n_md2,
                -t * pv_strike * n_md2,
            )
        }
    };

    PricingResult {
        // Cancellation deep out of the money can leave a few ulps below zero
        price: price.max(0.0),
        delta,
        gamma,
        theta,
        vega,
        rho,
    }
}

use crate::errors::{Field, PricingError, PricingOutcome, Violation, Violations};
use crate::models::black_scholes::{evaluate_pair, validate};
use crate::state::{CurvePoint, OptionParameters};

/// Evenly spaced spots from `center * lower` to `center * upper`, both ends included.
/// One point yields just the lower end.
pub fn spot_grid(center: f64, lower: f64, upper: f64, points: usize) -> Vec<f64> {
    let lo = center * lower;
    let hi = center * upper;

    match points {
        0 => Vec::new(),
        1 => vec![lo],
        n => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

/// Price call and put at every spot, holding strike, expiry, rate and vol fixed.
///
/// All or nothing: the first invalid spot rejects the whole sweep.
/// `base.spot` and `base.option_type` are ignored.
pub fn sweep_spot<I>(base: &OptionParameters, spots: I) -> PricingOutcome<Vec<CurvePoint>>
where
    I: IntoIterator<Item = f64>,
{
    let spots = spots.into_iter();
    let mut curve = Vec::with_capacity(spots.size_hint().0);

    for spot in spots {
        let quote = evaluate_pair(&base.with_spot(spot))?;
        curve.push(CurvePoint {
            spot,
            call: quote.call,
            put: quote.put,
        });
    }

    Ok(curve)
}

/// Sweep bounds as multiples of spot: 0 < lower <= upper, both finite.
pub fn validate_range(lower: f64, upper: f64) -> PricingOutcome<()> {
    let mut violations = Violations::new();

    if !(lower > 0.0 && lower.is_finite()) {
        violations.push(Violation { field: Field::CurveLower, value: lower, constraint: "finite and > 0" });
    }
    if !(upper.is_finite() && upper >= lower) {
        violations.push(Violation {
            field: Field::CurveUpper,
            value: upper,
            constraint: "finite and >= curve_lower",
        });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PricingError::InvalidInput { violations })
    }
}

/// The dashboard's default sweep: `points` spots around the current spot.
pub fn curve_around_spot(
    params: &OptionParameters,
    lower: f64,
    upper: f64,
    points: usize,
) -> PricingOutcome<Vec<CurvePoint>> {
    // The center must be valid even when the grid is empty
    validate(params)?;
    validate_range(lower, upper)?;
    sweep_spot(params, spot_grid(params.spot, lower, upper, points))
}

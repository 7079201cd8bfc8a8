use crate::errors::PricingOutcome;
use crate::models::{black_scholes, sensitivity};
use crate::state::{
    AppState, CurvePoint, CurveQuery, OptionParameters, ParamsQuery, PerfCounters, PricingResult,
    QuotePair,
};

/// A resolved sweep, ready to serialize.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Curve {
    pub strike: f64,
    pub current_spot: f64,
    pub points: Vec<CurvePoint>,
}

/// Single-option evaluation with the inputs that produced it.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Evaluation {
    pub params: OptionParameters,
    pub result: PricingResult,
    pub quoted: QuotedGreeks,
}

/// Greeks in screen units: per vol/rate point and per calendar day.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct QuotedGreeks {
    pub vega_per_point: f64,
    pub rho_per_point: f64,
    pub theta_per_day: f64,
}

impl From<&PricingResult> for QuotedGreeks {
    fn from(r: &PricingResult) -> Self {
        Self {
            vega_per_point: r.vega_per_point(),
            rho_per_point: r.rho_per_point(),
            theta_per_day: r.theta_per_day(),
        }
    }
}

/// Call + put for the requested inputs (defaults fill the gaps).
pub fn quote(state: &AppState, query: &ParamsQuery) -> PricingOutcome<QuotePair> {
    let params = query.resolve(&state.config.defaults);
    let outcome = black_scholes::evaluate_pair(&params);
    record(state, &outcome, 1, "quote");
    outcome
}

pub fn evaluate(state: &AppState, query: &ParamsQuery) -> PricingOutcome<Evaluation> {
    let params = query.resolve(&state.config.defaults);
    let outcome = black_scholes::evaluate(&params).map(|result| Evaluation {
        params,
        quoted: QuotedGreeks::from(&result),
        result,
    });
    record(state, &outcome, 1, "evaluate");
    outcome
}

/// Price-vs-spot sweep. Requested points are capped at the configured maximum.
pub fn curve(state: &AppState, query: &CurveQuery) -> PricingOutcome<Curve> {
    let settings = &state.config.curve;
    let params = query.params().resolve(&state.config.defaults);
    let points = query.points.unwrap_or(settings.points).min(settings.max_points);
    let lower = query.lower.unwrap_or(settings.lower);
    let upper = query.upper.unwrap_or(settings.upper);

    let outcome = sensitivity::curve_around_spot(&params, lower, upper, points).map(|points| Curve {
        strike: params.strike,
        current_spot: params.spot,
        points,
    });

    let priced = match &outcome {
        Ok(c) => {
            PerfCounters::bump(&state.counters.curves_built);
            tracing::debug!(points, lower, upper, spot = params.spot, "curve built");
            c.points.len() as u64
        }
        Err(_) => 0,
    };
    record(state, &outcome, priced, "curve");
    outcome
}

/// `priced` is the number of call/put pairs the request produced.
fn record<T>(state: &AppState, outcome: &PricingOutcome<T>, priced: u64, kind: &'static str) {
    match outcome {
        Ok(_) => PerfCounters::add(&state.counters.evaluations, priced),
        Err(e) => {
            PerfCounters::bump(&state.counters.validation_failures);
            tracing::warn!(kind, error = %e, "rejected pricing request");
        }
    }
}

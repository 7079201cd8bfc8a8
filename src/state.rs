use crate::config::{AppConfig, DefaultParams};
use crate::errors::Violation;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Option Type ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

// ── Engine inputs (stack, no alloc) ──

/// One evaluation request. Built fresh per call and never mutated;
/// `with_*` return a modified copy.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OptionParameters {
    pub spot: f64,
    pub strike: f64,
    /// Years until expiry
    pub time_to_expiry: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Annualized volatility
    pub volatility: f64,
    pub option_type: OptionType,
}

impl OptionParameters {
    #[inline]
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            rate,
            volatility,
            option_type,
        }
    }

    #[inline]
    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    #[inline]
    pub fn with_type(self, option_type: OptionType) -> Self {
        Self { option_type, ..self }
    }
}

// ── Engine outputs ──

/// Price and Greeks from one evaluation.
///
/// Units: vega is dV/dsigma and rho is dV/dr, both per unit (1.00 = 100%).
/// Theta is -dV/dT per year. Use the `*_per_point` / `theta_per_day`
/// helpers for the usual quoting conventions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[repr(C)]
pub struct PricingResult {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl PricingResult {
    /// Value change for a one-point (0.01) move in volatility.
    #[inline]
    pub fn vega_per_point(&self) -> f64 {
        self.vega / 100.0
    }

    /// Value change for a one-point (0.01) move in the rate.
    #[inline]
    pub fn rho_per_point(&self) -> f64 {
        self.rho / 100.0
    }

    /// Calendar-day decay.
    #[inline]
    pub fn theta_per_day(&self) -> f64 {
        self.theta / 365.0
    }
}

/// Call and put for the same market inputs, as the dashboard shows them.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct QuotePair {
    pub spot: f64,
    pub strike: f64,
    pub time_to_expiry: f64,
    pub rate: f64,
    pub volatility: f64,
    /// None when T = 0 or sigma = 0
    pub d1: Option<f64>,
    pub d2: Option<f64>,
    pub call: PricingResult,
    pub put: PricingResult,
}

/// One point of a price-vs-spot sweep.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CurvePoint {
    pub spot: f64,
    pub call: PricingResult,
    pub put: PricingResult,
}

// ── Inputs from the dashboard (query string or WS message) ──

/// Parameter overrides. Anything left out falls back to the configured defaults.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct ParamsQuery {
    pub spot: Option<f64>,
    pub strike: Option<f64>,
    pub expiry: Option<f64>,
    pub rate: Option<f64>,
    pub vol: Option<f64>,
    pub option_type: Option<OptionType>,
}

impl ParamsQuery {
    pub fn resolve(&self, defaults: &DefaultParams) -> OptionParameters {
        OptionParameters::new(
            self.spot.unwrap_or(defaults.spot),
            self.strike.unwrap_or(defaults.strike),
            self.expiry.unwrap_or(defaults.time_to_expiry),
            self.rate.unwrap_or(defaults.rate),
            self.vol.unwrap_or(defaults.volatility),
            self.option_type.unwrap_or(OptionType::Call),
        )
    }
}

/// Sweep request: market overrides plus grid shape.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct CurveQuery {
    pub spot: Option<f64>,
    pub strike: Option<f64>,
    pub expiry: Option<f64>,
    pub rate: Option<f64>,
    pub vol: Option<f64>,
    pub points: Option<usize>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl CurveQuery {
    pub fn params(&self) -> ParamsQuery {
        ParamsQuery {
            spot: self.spot,
            strike: self.strike,
            expiry: self.expiry,
            rate: self.rate,
            vol: self.vol,
            option_type: None,
        }
    }
}

// ── Messages over the WebSocket ──

/// Client -> server. Sent every time a dashboard control changes.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Evaluate {
        #[serde(flatten)]
        params: ParamsQuery,
    },
    Curve {
        #[serde(flatten)]
        query: CurveQuery,
    },
}

/// Server -> client.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum WsMessage {
    #[serde(rename = "quote")]
    Quote { quote: QuotePair, timestamp: String },

    #[serde(rename = "curve")]
    Curve {
        strike: f64,
        current_spot: f64,
        points: Vec<CurvePoint>,
        timestamp: String,
    },

    #[serde(rename = "error")]
    Error {
        message: String,
        violations: Vec<Violation>,
    },
}

// ── Performance Counters (lock-free) ──

pub struct PerfCounters {
    pub evaluations: AtomicU64,
    pub curves_built: AtomicU64,
    pub validation_failures: AtomicU64,
    pub ws_sessions: AtomicU64,
    pub ws_messages_sent: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            evaluations: AtomicU64::new(0),
            curves_built: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            ws_sessions: AtomicU64::new(0),
            ws_messages_sent: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }
}

// ── Application shared state (immutable config + atomics, no locks) ──

pub struct AppState {
    pub config: AppConfig,
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            counters: PerfCounters::new(),
        })
    }
}

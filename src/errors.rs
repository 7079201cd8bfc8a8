use smallvec::SmallVec;

/// Input fields of an evaluation, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Spot,
    Strike,
    TimeToExpiry,
    Rate,
    Volatility,
    /// Lower multiple of spot for a sweep
    CurveLower,
    CurveUpper,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Strike => write!(f, "strike"),
            Self::TimeToExpiry => write!(f, "time_to_expiry"),
            Self::Rate => write!(f, "rate"),
            Self::Volatility => write!(f, "volatility"),
            Self::CurveLower => write!(f, "curve_lower"),
            Self::CurveUpper => write!(f, "curve_upper"),
        }
    }
}

/// One broken input constraint. Stack-allocated, Copy.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Violation {
    pub field: Field,
    pub value: f64,
    pub constraint: &'static str,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must be {} (got {})", self.field, self.constraint, self.value)
    }
}

/// Every violation found in one request. At most one per field.
pub type Violations = SmallVec<[Violation; 5]>;

/// Pricing engine failures. Raised before any formula is evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("invalid input: {}", join_violations(.violations))]
    InvalidInput { violations: Violations },
}

impl PricingError {
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidInput { violations } => violations,
        }
    }

    /// True if `field` is among the rejected inputs.
    pub fn rejects(&self, field: Field) -> bool {
        self.violations().iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type PricingOutcome<T> = Result<T, PricingError>;

/// Service-level error types.
/// Pricing failures are recoverable and reported to the caller;
/// config failures halt startup.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),
}

pub type EngineResult<T> = Result<T, EngineError>;

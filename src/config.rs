use crate::errors::{EngineError, EngineResult};
use std::path::PathBuf;

/// Market inputs the dashboard opens with.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct DefaultParams {
    pub spot: f64,
    pub strike: f64,
    pub time_to_expiry: f64,
    pub rate: f64,
    pub volatility: f64,
}

impl Default for DefaultParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 1.0,
            rate: 0.05,
            volatility: 0.20,
        }
    }
}

/// Shape of the price-vs-spot sweep, as multiples of the current spot.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CurveSettings {
    pub points: usize,
    pub lower: f64,
    pub upper: f64,
    /// Hard cap on caller-requested points
    pub max_points: usize,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            points: 50,
            lower: 0.5,
            upper: 1.5,
            max_points: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub dashboard_dir: PathBuf,
    pub defaults: DefaultParams,
    pub curve: CurveSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3001,
            dashboard_dir: PathBuf::from("dashboard/dist"),
            defaults: DefaultParams::default(),
            curve: CurveSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = parse_env("SERVER_PORT", "3001")?;

        let defaults = DefaultParams {
            spot: parse_env("DEFAULT_SPOT", "100.0")?,
            strike: parse_env("DEFAULT_STRIKE", "100.0")?,
            time_to_expiry: parse_env("DEFAULT_EXPIRY", "1.0")?,
            rate: parse_env("DEFAULT_RATE", "0.05")?,
            volatility: parse_env("DEFAULT_VOLATILITY", "0.20")?,
        };

        let curve = CurveSettings {
            points: parse_env("CURVE_POINTS", "50")?,
            lower: parse_env("CURVE_LOWER", "0.5")?,
            upper: parse_env("CURVE_UPPER", "1.5")?,
            max_points: parse_env("MAX_CURVE_POINTS", "1000")?,
        };

        let cfg = Self {
            server_port,
            dashboard_dir: PathBuf::from(env_var_or("DASHBOARD_DIR", "dashboard/dist")),
            defaults,
            curve,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the dashboard could never price with.
    pub fn validate(&self) -> EngineResult<()> {
        crate::models::black_scholes::evaluate_pair(&self.default_params())?;

        let c = &self.curve;
        crate::models::sensitivity::validate_range(c.lower, c.upper)
            .map_err(|e| EngineError::Config(format!("CURVE_LOWER/CURVE_UPPER: {e}")))?;
        if c.points == 0 || c.points > c.max_points {
            return Err(EngineError::Config(format!(
                "CURVE_POINTS must be in 1..={} (got {})",
                c.max_points, c.points
            )));
        }
        Ok(())
    }

    /// Defaults as a call evaluation request.
    pub fn default_params(&self) -> crate::state::OptionParameters {
        crate::state::ParamsQuery::default().resolve(&self.defaults)
    }
}

fn parse_env<T>(key: &str, default: &str) -> EngineResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_var_or(key, default)
        .parse::<T>()
        .map_err(|e| EngineError::Config(format!("{key}: {e}")))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

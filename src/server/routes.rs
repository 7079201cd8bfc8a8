use crate::errors::PricingError;
use crate::server::service::{self, Curve, Evaluation};
use crate::state::{AppState, CurveQuery, ParamsQuery, QuotePair};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

/// Invalid inputs become 422 with every violated field listed.
#[derive(Debug)]
pub struct ApiError(pub PricingError);

impl From<PricingError> for ApiError {
    fn from(e: PricingError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "violations": self.0.violations(),
        });
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

/// GET /api/quote -- call and put side by side
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ParamsQuery>,
) -> Result<Json<QuotePair>, ApiError> {
    Ok(Json(service::quote(&state, &query)?))
}

/// GET /api/evaluate -- one option (option_type defaults to call)
pub async fn get_evaluate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ParamsQuery>,
) -> Result<Json<Evaluation>, ApiError> {
    Ok(Json(service::evaluate(&state, &query)?))
}

/// GET /api/curve -- price and Greeks across a spot sweep
pub async fn get_curve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CurveQuery>,
) -> Result<Json<Curve>, ApiError> {
    Ok(Json(service::curve(&state, &query)?))
}

/// GET /api/defaults -- initial control values for the dashboard
pub async fn get_defaults(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "params": state.config.defaults,
        "curve": state.config.curve,
    }))
}

/// GET /api/counters -- performance counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    use portable_atomic::Ordering::Relaxed;
    Json(serde_json::json!({
        "evaluations": state.counters.evaluations.load(Relaxed),
        "curves_built": state.counters.curves_built.load(Relaxed),
        "validation_failures": state.counters.validation_failures.load(Relaxed),
        "ws_sessions": state.counters.ws_sessions.load(Relaxed),
        "ws_messages_sent": state.counters.ws_messages_sent.load(Relaxed),
    }))
}

use crate::errors::PricingError;
use crate::server::service;
use crate::state::{AppState, ClientMessage, ParamsQuery, PerfCounters, WsMessage};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session = uuid::Uuid::new_v4();
    PerfCounters::bump(&state.counters.ws_sessions);
    tracing::info!(%session, "dashboard connected");

    let (mut sender, mut receiver) = socket.split();
    let (reply_tx, mut reply_rx) = mpsc::channel::<WsMessage>(64);

    // Initial quote for the default controls
    let initial = respond(&state, ClientMessage::Evaluate { params: ParamsQuery::default() });
    if reply_tx.send(initial).await.is_err() {
        return;
    }

    // Forward replies to this client
    let send_state = state.clone();
    let send_task = tokio::spawn(async move {
        while let Some(ws_msg) = reply_rx.recv().await {
            match serde_json::to_string(&ws_msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                    PerfCounters::bump(&send_state.counters.ws_messages_sent);
                }
                Err(e) => tracing::error!(error = %e, "failed to serialize ws reply"),
            }
        }
    });

    // Every control change re-prices; one reply per request
    let recv_state = state.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let text = match msg {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) | Err(_) => break,
                _ => continue,
            };

            let reply = match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(request) => respond(&recv_state, request),
                Err(e) => {
                    tracing::debug!(%session, error = %e, "unparseable ws message");
                    WsMessage::Error {
                        message: format!("bad request: {e}"),
                        violations: Vec::new(),
                    }
                }
            };

            if reply_tx.send(reply).await.is_err() {
                break;
            }
        }
    });

    // Wait for either task to finish (client disconnected)
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    tracing::info!(%session, "dashboard disconnected");
}

/// Run one client request through the engine.
pub fn respond(state: &AppState, request: ClientMessage) -> WsMessage {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match request {
        ClientMessage::Evaluate { params } => match service::quote(state, &params) {
            Ok(quote) => WsMessage::Quote { quote, timestamp },
            Err(e) => error_message(e),
        },
        ClientMessage::Curve { query } => match service::curve(state, &query) {
            Ok(curve) => WsMessage::Curve {
                strike: curve.strike,
                current_spot: curve.current_spot,
                points: curve.points,
                timestamp,
            },
            Err(e) => error_message(e),
        },
    }
}

fn error_message(e: PricingError) -> WsMessage {
    WsMessage::Error {
        message: e.to_string(),
        violations: e.violations().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn parse(json: &str) -> ClientMessage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_evaluate_message_reprices() {
        let state = AppState::new(AppConfig::default());
        let reply = respond(&state, parse(r#"{"type":"evaluate","spot":120,"vol":0.3}"#));
        match reply {
            WsMessage::Quote { quote, .. } => {
                assert_eq!(quote.spot, 120.0);
                assert_eq!(quote.volatility, 0.3);
                assert!(quote.call.price > 20.0);
            }
            other => panic!("expected quote, got {other:?}"),
        }
    }

    #[test]
    fn test_curve_message() {
        let state = AppState::new(AppConfig::default());
        let reply = respond(&state, parse(r#"{"type":"curve","points":5}"#));
        match reply {
            WsMessage::Curve { points, current_spot, .. } => {
                assert_eq!(points.len(), 5);
                assert_eq!(current_spot, 100.0);
            }
            other => panic!("expected curve, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_input_reply() {
        let state = AppState::new(AppConfig::default());
        let reply = respond(&state, parse(r#"{"type":"evaluate","strike":0}"#));
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["violations"][0]["field"], "strike");
    }

    #[test]
    fn test_unknown_message_type_fails_to_parse() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"subscribe"}"#).is_err());
    }
}

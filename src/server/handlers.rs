//! Request handlers for the JSON API.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use super::AppState;
use crate::pipeline::GenerateError;

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        match self {
            GenerateError::UnknownTool {
                ref tool_name,
                ref reason,
            } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "success": false,
                    "error": "unknown_tool",
                    "message": self.to_string(),
                    "toolName": tool_name,
                    "reason": reason,
                })),
            )
                .into_response(),
            GenerateError::InvalidInput => bad_request(&self.to_string()),
            GenerateError::Failed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": self.to_string(),
                })),
            )
                .into_response(),
        }
    }
}

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// `POST /auto-generate` with `{"toolName": "..."}`.
pub async fn auto_generate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return bad_request("Tool name is required");
    };
    let Some(tool_name) = body
        .get("toolName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return bad_request("Tool name is required");
    };

    match state.generator.auto_generate(tool_name).await {
        Ok(result) => {
            info!("Auto-generate '{}' finished (success={})", tool_name, result.success);
            Json(result).into_response()
        }
        Err(e) => {
            match &e {
                GenerateError::UnknownTool { reason, .. } => {
                    warn!("Unknown tool '{}': {}", tool_name, reason)
                }
                other => error!("Auto-generation API error: {}", other),
            }
            e.into_response()
        }
    }
}

/// `GET /api/quotas`: usage of every metered service.
pub async fn api_quotas(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.quota.get_all_quotas().await)
}

fn translation_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Translation failed" })),
    )
        .into_response()
}

/// `POST /translate` with `{"content": {"key": "English text", ...}}`.
///
/// String values and lists of strings are translated; other values are
/// echoed back unchanged.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let content = match payload {
        Ok(Json(Value::Object(mut body))) => match body.remove("content") {
            Some(Value::Object(content)) => content,
            _ => return bad_request("Invalid content format"),
        },
        _ => return bad_request("Invalid content format"),
    };

    let mut texts = BTreeMap::new();
    let mut lists = BTreeMap::new();
    let mut out = Map::new();
    for (key, value) in content {
        match value {
            Value::String(text) => {
                texts.insert(key, text);
            }
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_string) => {
                let items: Vec<String> = items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect();
                lists.insert(key, items);
            }
            other => {
                out.insert(key, other);
            }
        }
    }

    match state.translator.translate_content(texts).await {
        Ok(translated) => {
            for (key, text) in translated {
                out.insert(key, Value::String(text));
            }
        }
        Err(e) => {
            error!("Translation API error: {}", e);
            return translation_failed();
        }
    }

    for (key, items) in lists {
        match state.translator.batch_translate(&items).await {
            Ok(translated) => {
                out.insert(
                    key,
                    Value::Array(translated.into_iter().map(Value::String).collect()),
                );
            }
            Err(e) => {
                error!("Translation API error: {}", e);
                return translation_failed();
            }
        }
    }

    Json(Value::Object(out)).into_response()
}

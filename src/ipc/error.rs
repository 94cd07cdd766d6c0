use serde::Serialize;
use serde_json::json;

use crate::api::{ApiError, ApiResult};

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn api_err(id: &str, e: &ApiError) -> serde_json::Value {
    if e.status() >= 500 {
        tracing::error!(request_id = id, code = e.code(), error = %e, "request failed");
    }
    err(id, e.code(), e.to_string(), e.details())
}

/// Envelope for a handler result, serializing the success value as `result`.
pub fn reply<T: Serialize>(id: &str, result: ApiResult<T>) -> serde_json::Value {
    match result {
        Ok(v) => match serde_json::to_value(v) {
            Ok(v) => ok(id, v),
            Err(e) => err(id, "internal", e.to_string(), None),
        },
        Err(e) => api_err(id, &e),
    }
}

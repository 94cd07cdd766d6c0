use rusqlite::Connection;
use serde_json::Value;

use super::error::{api_err, err};
use super::types::{AppState, Request};
use crate::api::ApiError;

pub fn db_conn<'a>(state: &'a AppState, req: &Request) -> Result<&'a Connection, Value> {
    state
        .db
        .as_ref()
        .ok_or_else(|| api_err(&req.id, &ApiError::NoWorkspace))
}

pub fn required_str(req: &Request, key: &str) -> Result<String, Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// The request body travels under `params.input`.
pub fn input(req: &Request) -> &Value {
    req.params.get("input").unwrap_or(&Value::Null)
}

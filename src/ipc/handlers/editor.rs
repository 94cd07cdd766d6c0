use crate::editor::{self, EditorConfig};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::Value;

fn handle_editor_config(_state: &mut AppState, req: &Request) -> serde_json::Value {
    match serde_json::to_value(EditorConfig::default()) {
        Ok(cfg) => ok(&req.id, cfg),
        Err(e) => err(&req.id, "internal", e.to_string(), None),
    }
}

/// `answer` absent or null means the prompt was dismissed.
fn handle_editor_link_prompt(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let previous_href = match req.params.get("previousHref") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => return err(&req.id, "bad_params", "previousHref must be string", None),
    };
    let answer = match req.params.get("answer") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => return err(&req.id, "bad_params", "answer must be string or null", None),
    };

    let mut result = match serde_json::to_value(editor::resolve_link_prompt(answer)) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "internal", e.to_string(), None),
    };
    result["defaultValue"] = Value::String(editor::link_prompt_default(previous_href));
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "editor.config" => Some(handle_editor_config(state, req)),
        "editor.linkPrompt" => Some(handle_editor_link_prompt(state, req)),
        _ => None,
    }
}

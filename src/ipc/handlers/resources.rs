use crate::api;
use crate::ipc::error::reply;
use crate::ipc::helpers::{db_conn, input, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_resources_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    reply(
        &req.id,
        api::create_resource(conn, input(req)).map(|resource| json!({ "resource": resource })),
    )
}

fn handle_resources_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let resource_id = match required_str(req, "resourceId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    reply(&req.id, api::delete_resource(conn, &resource_id).map(|()| json!({ "ok": true })))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "resources.create" => Some(handle_resources_create(state, req)),
        "resources.delete" => Some(handle_resources_delete(state, req)),
        _ => None,
    }
}

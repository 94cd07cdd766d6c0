use crate::api;
use crate::ipc::error::reply;
use crate::ipc::helpers::{db_conn, input, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_lessons_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    reply(&req.id, api::list_lessons(conn).map(|lessons| json!({ "lessons": lessons })))
}

fn handle_lessons_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let lesson_id = match required_str(req, "lessonId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    reply(&req.id, api::get_lesson(conn, &lesson_id).map(|lesson| json!({ "lesson": lesson })))
}

fn handle_lessons_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    reply(
        &req.id,
        api::create_lesson(conn, input(req)).map(|lesson| json!({ "lesson": lesson })),
    )
}

fn handle_lessons_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let lesson_id = match required_str(req, "lessonId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    reply(
        &req.id,
        api::update_lesson(conn, &lesson_id, input(req)).map(|lesson| json!({ "lesson": lesson })),
    )
}

fn handle_lessons_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let lesson_id = match required_str(req, "lessonId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    reply(&req.id, api::delete_lesson(conn, &lesson_id).map(|()| json!({ "ok": true })))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "lessons.list" => Some(handle_lessons_list(state, req)),
        "lessons.open" => Some(handle_lessons_open(state, req)),
        "lessons.create" => Some(handle_lessons_create(state, req)),
        "lessons.update" => Some(handle_lessons_update(state, req)),
        "lessons.delete" => Some(handle_lessons_delete(state, req)),
        _ => None,
    }
}

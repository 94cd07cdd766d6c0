mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar, temp_dir};

#[test]
fn resources_attach_in_creation_order_and_cascade() {
    let workspace_dir = temp_dir("lessond-resources");
    let workspace = workspace_dir.path();
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, workspace);

    let lesson = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "lessons.create",
        json!({ "input": { "date": "2026-03-01", "title": "RAG" } }),
    );
    let lesson_id = lesson["lesson"]["id"].as_str().expect("id").to_string();

    let first = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "resources.create",
        json!({ "input": { "lessonId": lesson_id, "name": " Slides ", "url": " https://slides.example/rag " } }),
    );
    assert_eq!(first["resource"]["name"], "Slides");
    assert_eq!(first["resource"]["url"], "https://slides.example/rag");
    assert_eq!(first["resource"]["lessonId"], json!(lesson_id));
    let first_id = first["resource"]["id"].as_str().expect("id").to_string();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "resources.create",
        json!({ "input": { "lessonId": lesson_id, "name": "Notebook", "url": "https://colab.example/nb" } }),
    );

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "lessons.open",
        json!({ "lessonId": lesson_id }),
    );
    let names: Vec<&str> = opened["lesson"]["resources"]
        .as_array()
        .expect("resources")
        .iter()
        .map(|r| r["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Slides", "Notebook"]);

    let removed = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "resources.delete",
        json!({ "resourceId": first_id }),
    );
    assert_eq!(removed, json!({ "ok": true }));
    let error = request_err(
        &mut stdin,
        &mut reader,
        "6",
        "resources.delete",
        json!({ "resourceId": first_id }),
    );
    assert_eq!(error["code"], "not_found");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "lessons.delete",
        json!({ "lessonId": lesson_id }),
    );
    let error = request_err(
        &mut stdin,
        &mut reader,
        "8",
        "resources.create",
        json!({ "input": { "lessonId": lesson_id, "name": "Late", "url": "https://late.example" } }),
    );
    assert_eq!(error["code"], "not_found");
    assert_eq!(error["details"]["entity"], "lesson");
}

#[test]
fn resources_reject_bad_urls_and_names() {
    let workspace_dir = temp_dir("lessond-resources-invalid");
    let workspace = workspace_dir.path();
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, workspace);

    let lesson = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "lessons.create",
        json!({ "input": { "date": "2026-03-08", "title": "Evals" } }),
    );
    let lesson_id = lesson["lesson"]["id"].as_str().expect("id").to_string();

    let error = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "resources.create",
        json!({ "input": { "lessonId": lesson_id, "name": "Docs", "url": "docs.example.com" } }),
    );
    assert_eq!(error["code"], "bad_params");
    assert_eq!(error["message"], "Datos inválidos.");
    assert_eq!(error["details"]["issues"][0]["field"], "url");

    let error = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "resources.create",
        json!({ "input": { "lessonId": lesson_id, "name": "  ", "url": "https://docs.example" } }),
    );
    assert_eq!(error["details"]["issues"][0]["field"], "name");

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "lessons.open",
        json!({ "lessonId": lesson_id }),
    );
    assert_eq!(opened["lesson"]["resources"], json!([]));
}

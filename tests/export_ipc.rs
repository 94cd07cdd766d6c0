mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar, temp_dir};

#[test]
fn export_html_and_email_for_a_lesson() {
    let workspace_dir = temp_dir("lessond-export");
    let workspace = workspace_dir.path();
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, workspace);

    let lesson = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "lessons.create",
        json!({ "input": {
            "date": "2026-04-12",
            "title": "Fine-tuning & <LoRA>",
            "contentHtml": "<p>Plan <em>del</em> día</p>"
        } }),
    );
    let lesson_id = lesson["lesson"]["id"].as_str().expect("id").to_string();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "resources.create",
        json!({ "input": { "lessonId": lesson_id, "name": "Paper", "url": "https://arxiv.example/lora" } }),
    );

    let html = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "export.html",
        json!({ "lessonId": lesson_id }),
    );
    assert_eq!(html["filename"], "2026-04-12-fine-tuning-lora-.html");
    let doc = html["html"].as_str().expect("html");
    assert!(doc.starts_with("<!doctype html>"));
    assert!(doc.contains("<title>Fine-tuning &amp; &lt;LoRA&gt;</title>"));
    assert!(doc.contains("<strong>Fecha:</strong> 2026-04-12"));
    assert!(doc.contains("<p>Plan <em>del</em> día</p>"));
    assert!(doc.contains(
        "<li><a href=\"https://arxiv.example/lora\">Paper</a> — https://arxiv.example/lora</li>"
    ));

    let email = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "export.email",
        json!({ "lessonId": lesson_id }),
    );
    assert_eq!(email["subject"], "Domingos IA: 2026-04-12 - Fine-tuning & <LoRA>");
    assert_eq!(
        email["text"],
        "Domingos IA: 2026-04-12 - Fine-tuning & <LoRA>\n\nPaper: https://arxiv.example/lora"
    );
    assert!(email["html"]
        .as_str()
        .expect("html")
        .starts_with("<h2>Fine-tuning &amp; &lt;LoRA&gt;</h2><p>Plan"));
    assert!(email["fallback"]
        .as_str()
        .expect("fallback")
        .starts_with("Domingos IA: 2026-04-12 - Fine-tuning & <LoRA>\n\n<h2>"));

    let error = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "export.html",
        json!({ "lessonId": "missing" }),
    );
    assert_eq!(error["code"], "not_found");
}

#[test]
fn editor_config_describes_the_toolbar() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let cfg = request_ok(&mut stdin, &mut reader, "1", "editor.config", json!({}));
    assert_eq!(cfg["headingLevels"], json!([1, 2, 3]));
    assert_eq!(cfg["linkOpenOnClick"], false);
    assert_eq!(cfg["linkAutolink"], true);
    assert_eq!(cfg["emptyDocument"], "<p></p>");
    assert_eq!(cfg["placeholder"], "Contenido de la clase...");
    let toolbar = cfg["toolbar"].as_array().expect("toolbar");
    assert!(!toolbar.is_empty());
    assert!(toolbar.iter().all(|b| b["label"].is_string() && b["command"].is_string()));
}

#[test]
fn editor_link_prompt_resolves_answers() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let fresh = request_ok(&mut stdin, &mut reader, "1", "editor.linkPrompt", json!({}));
    assert_eq!(fresh, json!({ "action": "keep", "defaultValue": "https://" }));

    let cleared = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "editor.linkPrompt",
        json!({ "previousHref": "https://old.example", "answer": "" }),
    );
    assert_eq!(cleared["action"], "unset");
    assert_eq!(cleared["defaultValue"], "https://old.example");

    let set = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "editor.linkPrompt",
        json!({ "answer": "https://new.example" }),
    );
    assert_eq!(set["action"], "set");
    assert_eq!(set["href"], "https://new.example");

    let error = request_err(
        &mut stdin,
        &mut reader,
        "4",
        "editor.linkPrompt",
        json!({ "answer": 7 }),
    );
    assert_eq!(error["code"], "bad_params");
}

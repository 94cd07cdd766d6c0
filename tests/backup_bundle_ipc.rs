mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar, temp_dir};

#[test]
fn workspace_bundle_round_trip_restores_lessons() {
    let source_dir = temp_dir("lessond-backup-src");
    let source = source_dir.path();
    let target_dir = temp_dir("lessond-backup-dst");
    let target = target_dir.path();
    let bundle = source.join("out").join("lessons-backup.zip");

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, source);

    let lesson = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "lessons.create",
        json!({ "input": { "date": "2026-06-14", "title": "Backup me" } }),
    );
    let lesson_id = lesson["lesson"]["id"].as_str().expect("id").to_string();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "resources.create",
        json!({ "input": { "lessonId": lesson_id, "name": "Site", "url": "https://site.example" } }),
    );

    let exported = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "backup.exportWorkspaceBundle",
        json!({ "outPath": bundle.to_string_lossy() }),
    );
    assert_eq!(exported["bundleFormat"], "lessond-workspace-v1");
    assert_eq!(exported["entryCount"], 3);
    assert_eq!(exported["dbSha256"].as_str().expect("sha").len(), 64);
    assert!(bundle.is_file());

    select_workspace(&mut stdin, &mut reader, target);
    let empty = request_ok(&mut stdin, &mut reader, "4", "lessons.list", json!({}));
    assert_eq!(empty["lessons"], json!([]));

    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "backup.importWorkspaceBundle",
        json!({ "inPath": bundle.to_string_lossy() }),
    );
    assert_eq!(imported["bundleFormatDetected"], "lessond-workspace-v1");

    let restored = request_ok(&mut stdin, &mut reader, "6", "lessons.list", json!({}));
    assert_eq!(restored["lessons"][0]["id"], json!(lesson_id));
    assert_eq!(restored["lessons"][0]["resources"][0]["name"], "Site");
}

#[test]
fn backup_import_rejects_missing_and_foreign_files() {
    let workspace_dir = temp_dir("lessond-backup-bad");
    let workspace = workspace_dir.path();
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let error = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "backup.exportWorkspaceBundle",
        json!({ "outPath": workspace.join("x.zip").to_string_lossy() }),
    );
    assert_eq!(error["code"], "no_workspace");

    select_workspace(&mut stdin, &mut reader, workspace);

    let error = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "backup.importWorkspaceBundle",
        json!({ "inPath": workspace.join("nope.zip").to_string_lossy() }),
    );
    assert_eq!(error["code"], "not_found");

    let junk = workspace.join("notes.txt");
    std::fs::write(&junk, "not a backup").expect("write junk");
    let error = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "backup.importWorkspaceBundle",
        json!({ "inPath": junk.to_string_lossy() }),
    );
    assert_eq!(error["code"], "io_failed");

    // The workspace database is reopened after a failed import.
    let listed = request_ok(&mut stdin, &mut reader, "4", "lessons.list", json!({}));
    assert_eq!(listed["lessons"], json!([]));
}

#[test]
fn importing_the_live_database_is_refused_and_keeps_data() {
    let workspace_dir = temp_dir("lessond-backup-self");
    let workspace = workspace_dir.path();
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, workspace);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "lessons.create",
        json!({ "input": { "date": "2026-06-21", "title": "Still here" } }),
    );

    let error = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "backup.importWorkspaceBundle",
        json!({ "inPath": workspace.join("lessons.sqlite3").to_string_lossy() }),
    );
    assert_eq!(error["code"], "io_failed");

    let listed = request_ok(&mut stdin, &mut reader, "3", "lessons.list", json!({}));
    assert_eq!(listed["lessons"][0]["title"], "Still here");
}

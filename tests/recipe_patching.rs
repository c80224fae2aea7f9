//! Recipe patching through the public library API

use bitbar_workflow::recipe::{
    find_action_index, load_recipe, parse_recipe, patch_upload_step, serialize_recipe,
    write_recipe, APPLICATION_FILENAME, TEST_FILENAME, UPLOAD_FILE_ACTION,
};
use bitbar_workflow::{PatchOutcome, UploadArtifacts, WorkflowError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Artifacts {
    _dir: TempDir,
    app: PathBuf,
    test: PathBuf,
}

fn artifacts() -> Artifacts {
    let dir = TempDir::new().unwrap();
    let app = dir.path().join("Testdroid.apk");
    let test = dir.path().join("mozilla-docker-1.0.zip");
    fs::write(&app, b"apk").unwrap();
    fs::write(&test, b"zip").unwrap();
    Artifacts {
        _dir: dir,
        app,
        test,
    }
}

#[test]
fn test_insert_upload_step_end_to_end() {
    let files = artifacts();
    let mut recipe =
        parse_recipe("- action: start\n- action: finalize_a\n- action: finalize_b\n").unwrap();

    let outcome = patch_upload_step(
        &mut recipe,
        &UploadArtifacts::new()
            .with_application(&files.app)
            .with_test(&files.test),
    )
    .unwrap();

    assert_eq!(outcome, PatchOutcome::Inserted { index: 1 });
    assert_eq!(
        recipe.actions(),
        vec!["start", UPLOAD_FILE_ACTION, "finalize_a", "finalize_b"]
    );
    let upload = &recipe.steps()[1];
    assert_eq!(
        upload.argument(APPLICATION_FILENAME),
        Some(files.app.to_string_lossy().as_ref())
    );
    assert_eq!(
        upload.argument(TEST_FILENAME),
        Some(files.test.to_string_lossy().as_ref())
    );
}

#[test]
fn test_existing_step_keeps_position_and_other_arguments() {
    let files = artifacts();
    let text = "\
- action: start
- action: upload_file
  arguments:
    application_filename: old.apk
    test_filename: old.zip
    project_name: mozilla
- action: configure
  arguments:
    timeout: 3600
- action: finalize_a
";
    let mut recipe = parse_recipe(text).unwrap();

    let outcome =
        patch_upload_step(&mut recipe, &UploadArtifacts::new().with_test(&files.test)).unwrap();

    assert_eq!(outcome, PatchOutcome::Updated { index: 1 });
    assert_eq!(recipe.len(), 4);
    let upload = &recipe.steps()[1];
    assert_eq!(upload.argument(APPLICATION_FILENAME), Some("old.apk"));
    assert_eq!(upload.argument("project_name"), Some("mozilla"));
    assert_eq!(
        upload.argument(TEST_FILENAME),
        Some(files.test.to_string_lossy().as_ref())
    );

    // Non-string arguments of other steps survive a round trip.
    let reparsed = parse_recipe(&serialize_recipe(&recipe).unwrap()).unwrap();
    assert_eq!(reparsed, recipe);
}

#[test]
fn test_patching_twice_equals_patching_once() {
    let files = artifacts();
    let upload = UploadArtifacts::new()
        .with_application(&files.app)
        .with_test(&files.test);
    let mut once = parse_recipe("- action: a\n- action: b\n- action: c\n").unwrap();
    patch_upload_step(&mut once, &upload).unwrap();

    let mut twice = once.clone();
    let outcome = patch_upload_step(&mut twice, &upload).unwrap();

    assert_eq!(outcome, PatchOutcome::Updated { index: 1 });
    assert_eq!(once, twice);
}

#[test]
fn test_upload_step_at_first_position_is_found() {
    let mut recipe =
        parse_recipe("- action: upload_file\n- action: finalize_a\n- action: finalize_b\n")
            .unwrap();
    let files = artifacts();

    assert_eq!(find_action_index(&recipe, UPLOAD_FILE_ACTION), Some(0));
    let outcome =
        patch_upload_step(&mut recipe, &UploadArtifacts::new().with_test(&files.test)).unwrap();

    assert_eq!(outcome, PatchOutcome::Updated { index: 0 });
    assert_eq!(recipe.len(), 3);
}

#[test]
fn test_load_patch_write_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recipe.yml");
    fs::write(
        &path,
        "- action: start\n  retries: 2\n- action: finalize_a\n- action: finalize_b\n",
    )
    .unwrap();
    let files = artifacts();

    let mut recipe = load_recipe(&path).unwrap();
    patch_upload_step(&mut recipe, &UploadArtifacts::new().with_test(&files.test)).unwrap();
    write_recipe(&recipe, &path).unwrap();

    let written: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written[0]["retries"].as_u64(), Some(2));
    assert_eq!(written[1]["action"].as_str(), Some("upload_file"));
}

#[test]
fn test_missing_artifact_is_reported() {
    let mut recipe = parse_recipe("- action: start\n").unwrap();
    let before = recipe.clone();

    let err = patch_upload_step(
        &mut recipe,
        &UploadArtifacts::new().with_application("/nonexistent/Testdroid.apk"),
    )
    .unwrap_err();

    assert!(matches!(err, WorkflowError::MissingArtifactFile(_)));
    assert_eq!(recipe, before);
}

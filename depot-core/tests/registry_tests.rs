use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use depot_core::{
    registry::{list_project_ids_at, load_project_at, save_project_at},
    Layout, Project, ProjectId, RegistryError, WatchedArtifact,
};

fn write_config(layout: &Layout, id: &str, body: &str) {
    let dir = layout.projects_dir();
    fs::create_dir_all(&dir).expect("projects dir");
    fs::write(dir.join(format!("{id}.json")), body).expect("write config");
}

#[rstest]
#[case("app", true)]
#[case("my-app_2", true)]
#[case("", false)]
#[case(".", false)]
#[case("..", false)]
#[case("a/b", false)]
#[case("a\\b", false)]
fn project_id_validation(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(ProjectId::parse(raw).is_ok(), valid, "id {raw:?}");
}

#[test]
fn loads_hand_written_config_with_labels() {
    let root = TempDir::new().expect("root");
    let layout = Layout::new(root.path());
    write_config(
        &layout,
        "app",
        r#"{
            "watch": [
                {"path": "/repo/out.apk", "file": "out.apk", "label": "Android"},
                {"path": "/repo/out.ipa", "file": "out.ipa"}
            ]
        }"#,
    );

    let project = load_project_at(&layout, &ProjectId::from("app")).expect("load");
    assert_eq!(project.watch.len(), 2);
    assert_eq!(project.watch[0].label(), "Android");
    assert_eq!(project.watch[1].label(), "out.ipa");
    assert!(project.artifact("out.ipa").is_some());
    assert!(project.artifact("missing.bin").is_none());
}

#[test]
fn config_edits_are_seen_without_restart() {
    let root = TempDir::new().expect("root");
    let layout = Layout::new(root.path());
    let id = ProjectId::from("app");

    write_config(&layout, "app", r#"{"watch": []}"#);
    assert!(load_project_at(&layout, &id).expect("first").watch.is_empty());

    write_config(
        &layout,
        "app",
        r#"{"watch": [{"path": "/repo/out.apk", "file": "out.apk"}]}"#,
    );
    assert_eq!(load_project_at(&layout, &id).expect("second").watch.len(), 1);
}

#[test]
fn duplicate_served_file_is_rejected_at_load() {
    let root = TempDir::new().expect("root");
    let layout = Layout::new(root.path());
    write_config(
        &layout,
        "app",
        r#"{"watch": [
            {"path": "/a/out.apk", "file": "out.apk"},
            {"path": "/b/out.apk", "file": "out.apk"}
        ]}"#,
    );

    let err = load_project_at(&layout, &ProjectId::from("app")).unwrap_err();
    match err {
        RegistryError::DuplicateFile { project, file } => {
            assert_eq!(project, "app");
            assert_eq!(file, "out.apk");
        }
        other => panic!("expected duplicate file error, got {other:?}"),
    }
}

#[test]
fn served_file_with_separator_is_rejected() {
    let root = TempDir::new().expect("root");
    let layout = Layout::new(root.path());
    write_config(
        &layout,
        "app",
        r#"{"watch": [{"path": "/a/out.apk", "file": "../escape.apk"}]}"#,
    );

    let err = load_project_at(&layout, &ProjectId::from("app")).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidFile { .. }));
}

#[test]
fn malformed_config_is_a_parse_error_with_path() {
    let root = TempDir::new().expect("root");
    let layout = Layout::new(root.path());
    write_config(&layout, "app", "{ not json");

    let err = load_project_at(&layout, &ProjectId::from("app")).unwrap_err();
    assert!(matches!(err, RegistryError::Parse { .. }));
    assert!(err.to_string().contains("app.json"));
}

#[test]
fn traversal_id_is_not_found_not_read() {
    let root = TempDir::new().expect("root");
    let layout = Layout::new(root.path());
    let err = load_project_at(&layout, &ProjectId::from("..")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn list_returns_sorted_ids_and_skips_other_files() {
    let root = TempDir::new().expect("root");
    let layout = Layout::new(root.path());
    for id in ["web", "app"] {
        save_project_at(
            &layout,
            &Project {
                id: ProjectId::from(id),
                watch: vec![WatchedArtifact::new("/repo/out", "out")],
            },
        )
        .expect("save");
    }
    fs::write(layout.projects_dir().join("notes.txt"), "ignore me").expect("write");

    let ids = list_project_ids_at(&layout).expect("list");
    assert_eq!(ids, vec![ProjectId::from("app"), ProjectId::from("web")]);
}

//! Integration tests for `rafters init`.

use predicates::prelude::*;
use serde_json::Value;

use crate::common::CliProject;

fn read_config(project: &CliProject) -> Value {
    let raw = std::fs::read_to_string(project.path(".rafters/config.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_init_with_defaults_in_ci() {
    let server = mockito::Server::new();
    let project = CliProject::new().unwrap();
    std::fs::write(project.path("package-lock.json"), "{}").unwrap();

    project
        .rafters(&server.url())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized Rafters"));

    let config = read_config(&project);
    assert_eq!(config["hasStorybook"], false);
    assert_eq!(config["packageManager"], "npm");
    assert_eq!(config["componentsDir"], "src/components/ui");
    assert_eq!(config["registryUrl"], server.url());
    assert!(config.get("storiesDir").is_none());

    assert!(project.path(".rafters/component-manifest.json").exists());
    assert!(project.path(".rafters/AGENTS.md").exists());
    assert!(project.path("src/components/ui").is_dir());
    assert!(project.path("src/lib/utils.ts").exists());
}

#[test]
fn test_init_detects_package_manager_from_lockfile() {
    let server = mockito::Server::new();
    let project = CliProject::new().unwrap();
    std::fs::write(project.path("pnpm-lock.yaml"), "lockfileVersion: '9.0'\n").unwrap();

    project.rafters(&server.url()).arg("init").assert().success();

    assert_eq!(read_config(&project)["packageManager"], "pnpm");
}

#[test]
fn test_init_writes_registry_theme() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/themes/default")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name":"default","tokens":{"--primary":"oklch(0.5 0.2 260)"}}"#)
        .create();
    let project = CliProject::new().unwrap();

    project.rafters(&server.url()).arg("init").assert().success();

    let css = std::fs::read_to_string(project.path("src/index.css")).unwrap();
    assert!(css.starts_with("@import \"tailwindcss\";"));
    assert!(css.contains("/* rafters:tokens */"));
    assert!(css.contains("--primary: oklch(0.5 0.2 260);"));
}

#[test]
fn test_init_falls_back_to_builtin_theme() {
    let mut server = mockito::Server::new();
    server.mock("GET", "/themes/default").with_status(503).create();
    let project = CliProject::new().unwrap();

    project
        .rafters(&server.url())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in palette"));

    let css = std::fs::read_to_string(project.path("src/index.css")).unwrap();
    assert!(css.contains("/* rafters:tokens */"));
}

#[test]
fn test_init_twice_fails() {
    let server = mockito::Server::new();
    let project = CliProject::new().unwrap();
    project.rafters(&server.url()).arg("init").assert().success();
    let before = std::fs::read_to_string(project.path(".rafters/config.json")).unwrap();

    project
        .rafters(&server.url())
        .arg("init")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already initialized"));

    let after = std::fs::read_to_string(project.path(".rafters/config.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_init_without_package_json() {
    let server = mockito::Server::new();
    let project = CliProject::empty().unwrap();

    project.rafters(&server.url()).arg("init").assert().code(1);

    assert!(!project.path(".rafters").exists());
}

#[test]
fn test_init_rejects_tailwind_v3() {
    let server = mockito::Server::new();
    let project = CliProject::new().unwrap();
    project.project.write(
        "package.json",
        r#"{"dependencies":{"react":"^19.0.0"},"devDependencies":{"tailwindcss":"^3.4.1"}}"#,
    );

    project
        .rafters(&server.url())
        .arg("init")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("tailwindcss"));

    assert!(!project.path(".rafters/config.json").exists());
}

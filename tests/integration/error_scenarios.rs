//! Fatal errors exit with status 1 and a readable message.

use predicates::prelude::*;

use crate::common::{CliProject, ComponentFixture};

#[test]
fn test_add_before_init() {
    let server = mockito::Server::new();
    let project = CliProject::new().unwrap();

    project
        .rafters(&server.url())
        .args(["add", "button"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not initialized"))
        .stderr(predicate::str::contains("rafters init"));
}

#[test]
fn test_add_unknown_component_suggests_names() {
    let mut server = mockito::Server::new();
    server.mock("GET", "/components/buton").with_status(404).create();
    server
        .mock("GET", "/components")
        .with_status(200)
        .with_body(ComponentFixture::catalog(&[ComponentFixture::new("button")]))
        .create();
    let project = CliProject::initialized().unwrap();

    project
        .rafters(&server.url())
        .args(["add", "buton"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'buton' not found"))
        .stderr(predicate::str::contains("button"));
}

#[test]
fn test_add_with_unreachable_registry() {
    let project = CliProject::initialized().unwrap();

    project
        .rafters("http://127.0.0.1:9")
        .args(["add", "button"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot reach registry"));

    assert!(!project.path("src/components/ui/button.tsx").exists());
}

#[test]
fn test_registry_flag_overrides_environment() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/components")
        .with_status(200)
        .with_body(ComponentFixture::catalog(&[ComponentFixture::new("badge")]))
        .create();
    let project = CliProject::initialized().unwrap();

    project
        .rafters("http://127.0.0.1:9")
        .args(["--registry", &server.url(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("badge"));
}

#[test]
fn test_missing_subcommand() {
    let project = CliProject::new().unwrap();
    project.rafters("http://127.0.0.1:9").assert().failure();
}

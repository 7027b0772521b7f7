//! Integration tests for `rafters list`.

use predicates::prelude::*;

use crate::common::{CliProject, ComponentFixture};

fn serve_catalog(server: &mut mockito::ServerGuard) -> mockito::Mock {
    let catalog = ComponentFixture::catalog(&[
        ComponentFixture::new("button").dependency("@radix-ui/react-slot"),
        ComponentFixture::new("dialog"),
    ]);
    server
        .mock("GET", "/components")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(catalog)
        .create()
}

#[test]
fn test_list_shows_catalog() {
    let mut server = mockito::Server::new();
    serve_catalog(&mut server);
    let project = CliProject::initialized().unwrap();

    project
        .rafters(&server.url())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 total, 0 installed"))
        .stdout(predicate::str::contains("button"))
        .stdout(predicate::str::contains("dialog"));
}

#[test]
fn test_list_details_after_add() {
    let mut server = mockito::Server::new();
    serve_catalog(&mut server);
    server
        .mock("GET", "/components/button")
        .with_status(200)
        .with_body(ComponentFixture::new("button").to_json().to_string())
        .create();
    let project = CliProject::initialized().unwrap();
    project.rafters(&server.url()).args(["add", "button"]).assert().success();

    project
        .rafters(&server.url())
        .args(["list", "--details"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 installed"))
        .stdout(predicate::str::contains("Cognitive load: 2/10"))
        .stdout(predicate::str::contains("Dependencies: @radix-ui/react-slot"))
        .stdout(predicate::str::contains("Installed: src/components/ui/button.tsx (latest)"));
}

#[test]
fn test_list_degrades_when_registry_fails() {
    let mut server = mockito::Server::new();
    server.mock("GET", "/components").with_status(502).create();
    let project = CliProject::initialized().unwrap();

    project
        .rafters(&server.url())
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("Registry unavailable"))
        .stdout(predicate::str::contains("No components found."));
}

#[test]
fn test_list_in_uninitialized_project() {
    let mut server = mockito::Server::new();
    serve_catalog(&mut server);
    let project = CliProject::new().unwrap();

    project.rafters(&server.url()).arg("list").assert().success();

    assert!(!project.path(".rafters").exists());
}

//! Integration tests for `rafters add`.

use predicates::prelude::*;

use crate::common::{CliProject, ComponentFixture, read_manifest};

fn serve(server: &mut mockito::ServerGuard, component: &ComponentFixture, name: &str) -> mockito::Mock {
    server
        .mock("GET", format!("/components/{name}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(component.to_json().to_string())
        .create()
}

#[test]
fn test_add_minimal_component() {
    let mut server = mockito::Server::new();
    let mock = serve(&mut server, &ComponentFixture::new("button"), "button");
    let project = CliProject::initialized().unwrap();

    project
        .rafters(&server.url())
        .args(["add", "button"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed button"));

    mock.assert();
    assert!(project.path("src/components/ui/button.tsx").exists());

    let manifest = read_manifest(project.root());
    let record = &manifest["components"]["button"];
    assert_eq!(record["path"], "src/components/ui/button.tsx");
    assert_eq!(record["version"], "latest");
    assert_eq!(record["intelligence"]["cognitiveLoad"], 2);
    assert!(record["installedAt"].is_string());
}

#[test]
fn test_add_existing_component_fails_without_force() {
    let mut server = mockito::Server::new();
    serve(&mut server, &ComponentFixture::new("button"), "button");
    let project = CliProject::initialized().unwrap();
    project.rafters(&server.url()).args(["add", "button"]).assert().success();
    let manifest_before = read_manifest(project.root());

    project
        .rafters(&server.url())
        .args(["add", "button"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));

    assert_eq!(read_manifest(project.root()), manifest_before);
}

#[test]
fn test_add_force_overwrites() {
    let mut server = mockito::Server::new();
    let component = ComponentFixture::new("button")
        .version("2.0.0")
        .source("export function Button() { return null }\n");
    serve(&mut server, &component, "button");
    let project = CliProject::initialized().unwrap();
    project.project.write("src/components/ui/button.tsx", "// local edits\n");

    project
        .rafters(&server.url())
        .args(["add", "button", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replaced button"));

    assert_eq!(
        project.project.read("src/components/ui/button.tsx"),
        "export function Button() { return null }\n"
    );
    assert_eq!(read_manifest(project.root())["components"]["button"]["version"], "2.0.0");
}

#[test]
fn test_add_adapts_imports() {
    let mut server = mockito::Server::new();
    let source = "import { cn } from '../lib/utils';\n\
                  import { useIntelligence } from '../hooks/use-intelligence';\n\
                  export function Card() { return cn('p-4', 'trust-pulse') }\n";
    let component = ComponentFixture::new("card").source(source);
    serve(&mut server, &component, "card");
    let project = CliProject::initialized().unwrap();
    project.project.write(
        "tsconfig.json",
        r#"{"compilerOptions":{"paths":{"@/*":["./src/*"]}}}"#,
    );

    project.rafters(&server.url()).args(["add", "card"]).assert().success();

    let written = project.project.read("src/components/ui/card.tsx");
    assert!(written.contains("from '@/lib/utils'"), "{written}");
    assert!(!written.contains("use-intelligence"), "{written}");
    assert!(!written.contains("trust-pulse"), "{written}");
    assert!(written.contains("cn('p-4')"), "{written}");
}

#[test]
fn test_add_without_intelligence_fails() {
    let mut server = mockito::Server::new();
    serve(&mut server, &ComponentFixture::new("tooltip").without_intelligence(), "tooltip");
    let project = CliProject::initialized().unwrap();

    project
        .rafters(&server.url())
        .args(["add", "tooltip"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be installed"));

    assert!(!project.path("src/components/ui/tooltip.tsx").exists());
    assert!(read_manifest(project.root())["components"].get("tooltip").is_none());
}

#[test]
fn test_add_writes_story_when_storybook_enabled() {
    let mut server = mockito::Server::new();
    serve(&mut server, &ComponentFixture::new("button"), "button");
    let project = CliProject::initialized().unwrap();
    project.project.update_config(|config| {
        config.has_storybook = true;
        config.stories_dir = Some("src/stories".to_string());
    });

    project
        .rafters(&server.url())
        .args(["add", "button"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Story:"));

    assert!(project.path("src/stories/button-intelligence.stories.tsx").exists());
    assert_eq!(
        read_manifest(project.root())["components"]["button"]["story"],
        "src/stories/button-intelligence.stories.tsx"
    );
}

#[test]
fn test_add_with_dependencies_uses_package_manager() {
    let mut server = mockito::Server::new();
    let component = ComponentFixture::new("dialog").dependency("@radix-ui/react-dialog");
    serve(&mut server, &component, "dialog");
    let project = CliProject::initialized().unwrap();

    project.rafters(&server.url()).args(["add", "dialog"]).assert().success();

    let record = &read_manifest(project.root())["components"]["dialog"];
    assert_eq!(record["dependencies"][0], "@radix-ui/react-dialog");
}

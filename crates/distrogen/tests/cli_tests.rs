//! End-to-end tests of the distrogen binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const SPEC: &str = r#"
name: cli-distro
module: github.com/example/cli-distro
display_name: CLI Distro
version: 0.1.0
opentelemetry_version: 0.124.0
opentelemetry_stable_version: 1.30.0
go_version: 1.24.3
binary_name: otelcol-cli
components:
  receivers:
    - otlp
  exporters:
    - debug
"#;

fn distrogen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_distrogen"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("spec.yaml"), SPEC).unwrap();
    dir
}

#[test]
fn test_query_prints_value() {
    let dir = setup();
    let out = distrogen(dir.path(), &["query", "--spec", "spec.yaml", "--field", "binary_name"]);

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "otelcol-cli\n");
}

#[test]
fn test_query_unknown_field() {
    let dir = setup();
    let out = distrogen(dir.path(), &["query", "--spec", "spec.yaml", "--field", "nope"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("field 'nope': not found in spec"));
}

#[test]
fn test_missing_spec_flag() {
    let dir = setup();
    let out = distrogen(dir.path(), &["generate"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing --spec flag"));
}

#[test]
fn test_generate_then_skip() {
    let dir = setup();

    let first = distrogen(dir.path(), &["generate", "--spec", "spec.yaml"]);
    assert!(first.status.success());
    assert!(dir.path().join("cli-distro/manifest.yaml").exists());

    let second = distrogen(dir.path(), &["generate", "--spec", "spec.yaml"]);
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("no differences found"));
}

#[test]
fn test_generate_compare() {
    let dir = setup();
    assert!(distrogen(dir.path(), &["generate", "--spec", "spec.yaml"])
        .status
        .success());

    let same = distrogen(dir.path(), &["generate", "--spec", "spec.yaml", "--force", "--compare"]);
    assert!(same.status.success());

    fs::write(dir.path().join("cli-distro/Makefile"), "changed\n").unwrap();
    let changed = distrogen(dir.path(), &["generate", "--spec", "spec.yaml", "-f", "--compare"]);
    assert_eq!(changed.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&changed.stderr).contains("Makefile"));

    // compare never leaves scratch directories behind
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["cli-distro", "spec.yaml"]);
}

#[test]
fn test_generate_unknown_component() {
    let dir = setup();
    fs::write(
        dir.path().join("spec.yaml"),
        SPEC.replace("- debug", "- doesnotexist"),
    )
    .unwrap();

    let out = distrogen(dir.path(), &["generate", "--spec", "spec.yaml"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("doesnotexist: component not found"));
    assert!(!dir.path().join("cli-distro").exists());
}

const VENDOR_REGISTRY: &str = r#"
release:
  version: 0.9.0
  opentelemetry_collector_version: 0.124.0
exporters:
  vendor:
    gomod: github.com/vendor/collector/vendorexporter
"#;

#[test]
fn test_generate_with_spec_registry() {
    let dir = setup();
    fs::write(dir.path().join("vendor.yaml"), VENDOR_REGISTRY).unwrap();
    let spec = format!(
        "{}registries:\n  - name: vendor\n    source: local\n    path: vendor.yaml\n",
        SPEC.replace("- debug", "- vendor")
    );
    fs::write(dir.path().join("spec.yaml"), spec).unwrap();

    let out = distrogen(dir.path(), &["generate", "--spec", "spec.yaml"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let manifest = fs::read_to_string(dir.path().join("cli-distro/manifest.yaml")).unwrap();
    assert!(manifest.contains("github.com/vendor/collector/vendorexporter v0.9.0"));
}

#[test]
fn test_generate_rejects_incompatible_spec_registry() {
    let dir = setup();
    fs::write(
        dir.path().join("vendor.yaml"),
        VENDOR_REGISTRY.replace("0.124.0", "0.110.0"),
    )
    .unwrap();
    let spec = format!(
        "{}registries:\n  - name: vendor\n    source: local\n    path: vendor.yaml\n",
        SPEC
    );
    fs::write(dir.path().join("spec.yaml"), spec).unwrap();

    let out = distrogen(dir.path(), &["generate", "--spec", "spec.yaml"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr)
        .contains("registry vendor is at collector version 0.110.0"));
    assert!(!dir.path().join("cli-distro").exists());
}

#[test]
fn test_component_requires_module_base() {
    let dir = setup();
    let out = distrogen(
        dir.path(),
        &["component", "--spec", "spec.yaml", "--type", "receiver", "--name", "foo"],
    );

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("component_module_base"));
}

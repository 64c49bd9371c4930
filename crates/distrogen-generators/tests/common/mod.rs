//! Shared test utilities for distrogen-generators integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};

use camino::{Utf8Path, Utf8PathBuf};
use distrogen_core::DistributionSpec;
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;
use walkdir::WalkDir;

pub const TEST_SPEC: &str = r#"
name: test-distro
module: github.com/example/test-distro
display_name: Test Distro
description: Distribution used by generator tests
version: 0.1.0
opentelemetry_version: 0.124.0
opentelemetry_stable_version: 1.30.0
go_version: 1.24.3
binary_name: otelcol-test
docker_repo: example.registry/test-distro
component_module_base: github.com/example/test-distro/components
distrogen_version: v0.1.0
components:
  receivers:
    - otlp
    - hostmetrics
  processors:
    - batch
  exporters:
    - debug
  connector:
    - forward
  providers:
    - env
replaces:
  - from: github.com/example/old
    to: github.com/example/new v1.0.0
    reason: use the maintained fork
feature_gates:
  - exporter.googlecloud.OTLPDirect
"#;

pub fn test_spec() -> DistributionSpec {
    DistributionSpec::from_yaml(TEST_SPEC).unwrap()
}

/// Temp directory together with its UTF-8 path
pub fn workdir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, path)
}

/// Every file under `root` keyed by relative path
pub fn read_tree(root: &Utf8Path) -> BTreeMap<String, String> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            (rel, fs::read_to_string(e.path()).unwrap())
        })
        .collect()
}

/// Names of the entries directly under `dir`
pub fn entries(dir: &Utf8Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// In-memory log sink for a scoped tracing subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a debug level subscriber, returning its result and the logs
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = String::from_utf8_lossy(&logs.buf.lock().unwrap()).into_owned();
    (result, captured)
}

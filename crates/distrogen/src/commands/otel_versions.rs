//! Upstream collector module versions
//!
//! Reads Go module paths from stdin and prints `module@version` for those the
//! collector release's `versions.yaml` lists in one of its module sets.

use std::collections::BTreeMap;
use std::io::{self, BufRead};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::cli::OtelComponentVersionsArgs;

const VERSIONS_URL: &str =
    "https://raw.githubusercontent.com/open-telemetry/opentelemetry-collector/refs/tags";

#[derive(Debug, Deserialize)]
struct ModuleSet {
    version: String,
    #[serde(default)]
    modules: Vec<String>,
}

/// The parts of the collector's `versions.yaml` that matter here
#[derive(Debug, Deserialize)]
struct UpstreamVersions {
    #[serde(rename = "module-sets", default)]
    module_sets: BTreeMap<String, ModuleSet>,
}

pub async fn run(args: OtelComponentVersionsArgs) -> Result<()> {
    let modules = io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<Vec<String>>>()
        .context("Failed to read modules from stdin")?;

    let url = format!("{}/{}/versions.yaml", VERSIONS_URL, args.otel_version);
    debug!("Fetching {}", url);

    let response = reqwest::get(&url).await?;
    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to fetch {}: HTTP {}",
            url,
            response.status()
        ));
    }
    let body = response.text().await?;
    let versions: UpstreamVersions =
        serde_yaml_ng::from_str(&body).with_context(|| format!("Failed to parse {}", url))?;

    for line in pinned_modules(&versions, &modules) {
        println!("{}", line);
    }
    Ok(())
}

/// `module@version` for every requested module found in a module set
fn pinned_modules(versions: &UpstreamVersions, modules: &[String]) -> Vec<String> {
    let mut pinned = Vec::new();
    for set in versions.module_sets.values() {
        for module in modules {
            let module = module.trim();
            if set.modules.iter().any(|m| m == module) {
                pinned.push(format!("{}@{}", module, set.version));
            }
        }
    }
    pinned
}

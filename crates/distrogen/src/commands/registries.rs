//! Registry assembly for the generate command
//!
//! Components resolve against, from highest priority to lowest: `--registry`
//! files, the spec's `registries` in listed order, then the embedded registry.

use anyhow::{anyhow, Context, Result};
use camino::Utf8PathBuf;
use tracing::{debug, info};

use distrogen_core::{CustomRegistry, DistributionSpec, Registry, RegistrySource};

/// The registry a distribution resolves its components against
pub async fn load_registries(
    spec: &DistributionSpec,
    overrides: &[Utf8PathBuf],
) -> Result<Registry> {
    let mut custom = Vec::with_capacity(spec.registries.len());
    for entry in &spec.registries {
        let registry = load_custom_registry(entry)
            .await
            .with_context(|| format!("Failed to load registry {}", entry.name))?;
        info!(
            "Loaded {} components from registry {}",
            registry.len(),
            entry.name
        );
        custom.push((entry.name.clone(), registry));
    }

    let mut registry = Registry::stack(
        Registry::load_embedded()?,
        &custom,
        &spec.opentelemetry_version,
    )?;
    registry.merge_files(overrides)?;
    debug!("Registry has {} components", registry.len());
    Ok(registry)
}

async fn load_custom_registry(entry: &CustomRegistry) -> Result<Registry> {
    match &entry.source {
        RegistrySource::Local { path } => Ok(Registry::load(path)?),
        RegistrySource::Github { .. } => {
            let url = entry
                .source
                .github_url()
                .ok_or_else(|| anyhow!("registry {} has no github url", entry.name))?;
            fetch_registry(&url).await
        }
    }
}

async fn fetch_registry(url: &str) -> Result<Registry> {
    debug!("Fetching registry {}", url);
    let response = reqwest::get(url).await?;
    if !response.status().is_success() {
        return Err(anyhow!(
            "could not retrieve registry from github: {}",
            response.status()
        ));
    }
    let body = response.text().await?;
    Ok(Registry::from_yaml_source(&body, url)?)
}

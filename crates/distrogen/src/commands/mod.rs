//! Command implementations

pub mod component;
pub mod distrogen;
pub mod generate;
pub mod internal;
pub mod otel_versions;
pub mod project;
pub mod query;
pub mod registries;

use anyhow::{anyhow, Context, Result};

use distrogen_core::DistributionSpec;

use crate::cli::SpecArg;

/// Load the spec named by `--spec`
pub(crate) fn load_spec(arg: &SpecArg) -> Result<DistributionSpec> {
    let path = arg.spec.as_ref().ok_or_else(|| anyhow!("missing --spec flag"))?;
    DistributionSpec::load(path).with_context(|| format!("Failed to load spec {}", path))
}

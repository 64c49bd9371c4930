//! Go tool pinning and distrogen settings for a project

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use distrogen_core::DistributionSpec;

use crate::error::Result;
use crate::project::render_group;
use crate::templates::{TemplateContext, TemplateGroup};

/// Go module distrogen itself is installed from
pub const DISTROGEN_MODULE: &str =
    "github.com/GoogleCloudPlatform/opentelemetry-operations-collector/cmd/distrogen";

/// Renders `internal/`, pinning build tools and distrogen itself
#[derive(Debug, Clone)]
pub struct InternalGenerator {
    spec: DistributionSpec,
    tools: Vec<String>,
}

impl InternalGenerator {
    /// `tools` are `module@version` strings; distrogen is appended at the
    /// spec's `distrogen_version`
    pub fn new(spec: DistributionSpec, tools: Vec<String>) -> Self {
        let mut tools = tools;
        tools.push(format!("{}@{}", DISTROGEN_MODULE, spec.distrogen_version));
        Self { spec, tools }
    }

    pub fn tools(&self) -> &[String] {
        &self.tools
    }

    pub fn generate(&self, root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let mut context = TemplateContext::for_spec(&self.spec)?;
        context.insert("tools", &self.tools);
        let modules: Vec<&str> = self
            .tools
            .iter()
            .map(|t| t.split_once('@').map_or(t.as_str(), |(module, _)| module))
            .collect();
        context.insert("tool_modules", &modules);

        let written = render_group(TemplateGroup::Internal, &context, &root.join("internal"))?;
        info!("Pinned {} tools in {}", self.tools.len(), root.join("internal"));
        Ok(written)
    }
}

/// Renders `.distrogen/`
#[derive(Debug, Clone)]
pub struct DistrogenGenerator {
    spec: DistributionSpec,
}

impl DistrogenGenerator {
    pub fn new(spec: DistributionSpec) -> Self {
        Self { spec }
    }

    pub fn generate(&self, root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let context = TemplateContext::for_spec(&self.spec)?;
        render_group(TemplateGroup::Distrogen, &context, &root.join(".distrogen"))
    }
}

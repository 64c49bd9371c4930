//! Project scaffolding
//!
//! A distrogen project holds one or more distribution specs next to the
//! shared build plumbing: make includes, scripts, a `templates/` directory
//! for custom templates, and a `components/` directory with its own registry.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use distrogen_core::{DistributionSpec, Registry};

use crate::error::Result;
use crate::templates::{TemplateContext, TemplateGroup, TemplateSet};

/// Registry of in-repository components, relative to the project root
pub const COMPONENT_REGISTRY_PATH: &str = "components/registry.yaml";

/// Marker file keeping the otherwise empty `templates/` directory
pub const EMPTY_FILE_NAME: &str = ".empty";

/// Render a built-in template set into `dir`, creating it first
pub(crate) fn render_group(
    group: TemplateGroup,
    context: &TemplateContext,
    dir: &Utf8Path,
) -> Result<Vec<Utf8PathBuf>> {
    fs::create_dir_all(dir)?;
    let templates = TemplateSet::embedded(group)?;
    templates.render(context, dir)
}

/// Creates `components/` with an empty registry
#[derive(Debug, Clone)]
pub struct ComponentsRegistryGenerator {
    root: Utf8PathBuf,
}

impl ComponentsRegistryGenerator {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn generate(&self) -> Result<()> {
        let components_dir = self.root.join("components");
        fs::create_dir_all(&components_dir)?;

        Registry::with_path(self.root.join(COMPONENT_REGISTRY_PATH)).save()?;
        debug!("Created empty component registry in {}", components_dir);

        render_group(
            TemplateGroup::Components,
            &TemplateContext::new(),
            &components_dir,
        )?;
        Ok(())
    }
}

/// Scaffolds a new distrogen project
#[derive(Debug, Clone)]
pub struct ProjectGenerator {
    spec: DistributionSpec,
    root: Utf8PathBuf,
}

impl ProjectGenerator {
    pub fn new(spec: DistributionSpec, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            spec,
            root: root.into(),
        }
    }

    pub fn generate(&self) -> Result<()> {
        ComponentsRegistryGenerator::new(self.root.clone()).generate()?;

        let templates_dir = self.root.join("templates");
        fs::create_dir_all(&templates_dir)?;
        fs::File::create(templates_dir.join(EMPTY_FILE_NAME))?;

        let context = TemplateContext::for_spec(&self.spec)?;
        render_group(TemplateGroup::Make, &context, &self.root.join("make"))?;
        render_group(TemplateGroup::Scripts, &context, &self.root.join("scripts"))?;
        render_group(TemplateGroup::Project, &context, &self.root)?;
        render_group(
            TemplateGroup::Distrogen,
            &context,
            &self.root.join(".distrogen"),
        )?;

        info!("Project for {} generated in {}", self.spec.name, self.root);
        Ok(())
    }
}

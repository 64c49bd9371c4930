//! Component scaffolding
//!
//! New components live under `components/<type>/<name><type>` as their own Go
//! module and are registered in the project's component registry, so specs
//! can refer to them by name like any upstream component.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use distrogen_core::{ComponentType, DistributionSpec, GoModuleId, Registry, RegistryEntry};

use crate::error::{Error, Result};
use crate::project::{render_group, COMPONENT_REGISTRY_PATH};
use crate::templates::{TemplateContext, TemplateGroup};

/// Scaffolds one component and registers it
#[derive(Debug, Clone)]
pub struct ComponentGenerator {
    spec: DistributionSpec,
    component_type: ComponentType,
    name: String,
    path: Utf8PathBuf,
    module_url: String,
}

impl ComponentGenerator {
    pub fn new(
        spec: DistributionSpec,
        component_type: ComponentType,
        name: impl Into<String>,
    ) -> Result<Self> {
        if spec.component_module_base.is_empty() {
            return Err(Error::MissingComponentModuleBase);
        }

        let name = name.into();
        let path = Utf8PathBuf::from("components")
            .join(component_type.as_str())
            .join(format!("{}{}", name, component_type));
        let module_url = format!("{}/{}", spec.module, path);

        Ok(Self {
            spec,
            component_type,
            name,
            path,
            module_url,
        })
    }

    /// Component directory relative to the project root
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn module_url(&self) -> &str {
        &self.module_url
    }

    /// Render the component under `root` and add it to the component registry
    pub fn generate(&self, root: &Utf8Path) -> Result<()> {
        let mut context = TemplateContext::for_spec(&self.spec)?;
        context.insert("component_type", self.component_type.as_str());
        context.insert("component_name", &self.name);
        context.insert("component_path", self.path.as_str());
        context.insert("component_module", &self.module_url);

        render_group(TemplateGroup::Component, &context, &root.join(&self.path))?;

        let registry_path = root.join(COMPONENT_REGISTRY_PATH);
        let mut registry = match Registry::load(&registry_path) {
            Ok(registry) => registry,
            Err(e) if e.is_not_found() => {
                debug!("No component registry at {}, creating one", registry_path);
                Registry::with_path(registry_path)
            }
            Err(e) => return Err(e.into()),
        };

        let mut entry = RegistryEntry::new(GoModuleId::untagged(&self.module_url));
        entry.path = Some(format!("../{}", self.path));
        registry.add(self.component_type, &self.name, entry);
        registry.save()?;

        info!(
            "{} {} generated in {}",
            self.component_type,
            self.name,
            root.join(&self.path)
        );
        Ok(())
    }
}

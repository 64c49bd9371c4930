//! Values available to templates
//!
//! Every spec field is available under its YAML name. Distribution templates
//! additionally get:
//! - `go_major_version`
//! - `rendered_feature_gates`, `rendered_replaces`
//! - `ocb.<plural type>`: pre-rendered OCB manifest lists
//! - `resolved.<plural type>`: `{name, gomod, docs_url}` per component
//! - `systemd_service_name`, `systemd_conf_file_name`

use std::collections::BTreeMap;

use serde::Serialize;

use distrogen_core::{ComponentType, DistributionSpec, ManifestContext, ResolvedComponent};

use crate::error::Result;

/// Component as shown to templates
#[derive(Debug, Clone, Serialize)]
struct ComponentView {
    name: String,
    gomod: String,
    docs_url: String,
}

impl From<&ResolvedComponent> for ComponentView {
    fn from(c: &ResolvedComponent) -> Self {
        Self {
            name: c.name.clone(),
            gomod: c.gomod.to_string(),
            docs_url: c.render_docs_url().to_string(),
        }
    }
}

/// Template rendering context
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    inner: tera::Context,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.inner.insert(key, value);
    }

    pub fn as_tera(&self) -> &tera::Context {
        &self.inner
    }

    /// Spec fields plus `go_major_version`
    pub fn for_spec(spec: &DistributionSpec) -> Result<Self> {
        let mut inner = tera::Context::from_serialize(spec)?;
        inner.insert("go_major_version", &spec.render_go_major_version());
        Ok(Self { inner })
    }

    /// Everything a distribution template can reference
    pub fn for_distribution(manifest: &ManifestContext) -> Result<Self> {
        let spec = &manifest.spec;
        let mut context = Self::for_spec(spec)?;

        let mut ocb = BTreeMap::new();
        let mut resolved = BTreeMap::new();
        for component_type in ComponentType::ALL {
            ocb.insert(
                component_type.plural(),
                manifest.render_ocb_components(component_type)?,
            );
            let views: Vec<ComponentView> = manifest
                .components(component_type)
                .iter()
                .map(ComponentView::from)
                .collect();
            resolved.insert(component_type.plural(), views);
        }

        context.insert("ocb", &ocb);
        context.insert("resolved", &resolved);
        context.insert("rendered_feature_gates", &manifest.render_feature_gates());
        context.insert("rendered_replaces", &manifest.render_replaces());
        context.insert(
            "systemd_service_name",
            &format!("{}.service", spec.binary_name),
        );
        context.insert(
            "systemd_conf_file_name",
            &format!("{}.conf", spec.binary_name),
        );
        Ok(context)
    }
}

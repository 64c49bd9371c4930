//! Manifest context
//!
//! [`ManifestContext`] is the spec together with every requested component
//! resolved against a registry. It is what templates render from.

use tracing::info;

use crate::error::{CollectionError, Result};
use crate::registry::{ComponentType, OcbManifestComponent, Registry, ResolvedComponent};
use crate::spec::{ComponentReplace, DistributionSpec};
use crate::yaml::render_yaml;

/// A distribution spec with its components resolved
#[derive(Debug, Clone)]
pub struct ManifestContext {
    pub spec: DistributionSpec,
    pub receivers: Vec<ResolvedComponent>,
    pub processors: Vec<ResolvedComponent>,
    pub exporters: Vec<ResolvedComponent>,
    pub connectors: Vec<ResolvedComponent>,
    pub extensions: Vec<ResolvedComponent>,
    pub providers: Vec<ResolvedComponent>,
}

impl ManifestContext {
    /// Resolve every component list of `spec`.
    ///
    /// Fails with one [`CollectionError`] naming every component missing
    /// from the registry, across all lists.
    pub fn build(spec: &DistributionSpec, registry: &Registry) -> Result<Self> {
        let versions = spec.otel_versions();
        let mut errors = CollectionError::new();

        let mut resolve = |component_type: ComponentType| {
            let (resolved, errs) =
                registry.resolve(component_type, spec.components.names(component_type), &versions);
            errors.extend(errs);
            resolved
        };

        let receivers = resolve(ComponentType::Receiver);
        let processors = resolve(ComponentType::Processor);
        let exporters = resolve(ComponentType::Exporter);
        let connectors = resolve(ComponentType::Connector);
        let extensions = resolve(ComponentType::Extension);
        let providers = resolve(ComponentType::Provider);

        errors.into_result()?;

        let context = Self {
            spec: spec.clone(),
            receivers,
            processors,
            exporters,
            connectors,
            extensions,
            providers,
        };
        info!(
            "Resolved {} components for {}",
            context.len(),
            context.spec.name
        );
        Ok(context)
    }

    pub fn components(&self, component_type: ComponentType) -> &[ResolvedComponent] {
        match component_type {
            ComponentType::Receiver => &self.receivers,
            ComponentType::Processor => &self.processors,
            ComponentType::Exporter => &self.exporters,
            ComponentType::Connector => &self.connectors,
            ComponentType::Extension => &self.extensions,
            ComponentType::Provider => &self.providers,
        }
    }

    /// Number of resolved components across all types
    pub fn len(&self) -> usize {
        ComponentType::ALL
            .iter()
            .map(|t| self.components(*t).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// OCB manifest entries for one type, sorted by module url
    pub fn ocb_components(&self, component_type: ComponentType) -> Vec<OcbManifestComponent> {
        let mut components: Vec<OcbManifestComponent> = self
            .components(component_type)
            .iter()
            .map(ResolvedComponent::to_ocb)
            .collect();
        components.sort_by(|a, b| a.gomod.url.cmp(&b.gomod.url));
        components
    }

    /// OCB manifest entries for one type as a YAML list, empty if there are none
    pub fn render_ocb_components(&self, component_type: ComponentType) -> Result<String> {
        let components = self.ocb_components(component_type);
        if components.is_empty() {
            return Ok(String::new());
        }
        render_yaml(&components)
    }

    /// Replace directives of the spec, followed by those the registries of
    /// resolved components require. Repeats are dropped.
    pub fn replaces(&self) -> Vec<&ComponentReplace> {
        let mut replaces: Vec<&ComponentReplace> = self.spec.replaces.iter().collect();
        for component_type in ComponentType::ALL {
            for component in self.components(component_type) {
                for replace in &component.replaces {
                    if !replaces.contains(&replace) {
                        replaces.push(replace);
                    }
                }
            }
        }
        replaces
    }

    pub fn render_replaces(&self) -> String {
        self.replaces()
            .into_iter()
            .map(|r| format!("{}\n", r.render()))
            .collect()
    }

    pub fn render_feature_gates(&self) -> String {
        self.spec.render_feature_gates()
    }
}

//! Distribution specification
//!
//! The spec is the user authored description of a collector distribution:
//! identity, versions, build settings, and the component names to include.
//! A copy of it is written into every generated distribution so the next run
//! can tell whether anything changed.

use std::collections::BTreeMap;
use std::fmt;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::module_id::GoModuleId;
use crate::otel_config;
use crate::registry::{ComponentType, CustomRegistry, OtelVersions};
use crate::yaml::{map_not_found, read_yaml_file, render_yaml, write_yaml_file};

/// Container image family used to build the collector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildContainer {
    Alpine,
    #[default]
    Debian,
}

impl fmt::Display for BuildContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alpine => f.write_str("alpine"),
            Self::Debian => f.write_str("debian"),
        }
    }
}

/// Component names to include in the distribution, per component type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionComponents {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub receivers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exporters: Vec<String>,
    /// Written under the singular key; existing spec files use it
    #[serde(
        rename = "connector",
        alias = "connectors",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub connectors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<String>,
}

impl DistributionComponents {
    pub fn names(&self, component_type: ComponentType) -> &[String] {
        match component_type {
            ComponentType::Receiver => &self.receivers,
            ComponentType::Processor => &self.processors,
            ComponentType::Exporter => &self.exporters,
            ComponentType::Connector => &self.connectors,
            ComponentType::Extension => &self.extensions,
            ComponentType::Provider => &self.providers,
        }
    }

    pub fn is_empty(&self) -> bool {
        ComponentType::ALL.iter().all(|t| self.names(*t).is_empty())
    }
}

/// A Go module replace directive for the OCB manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentReplace {
    pub from: GoModuleId,
    pub to: GoModuleId,
    #[serde(default)]
    pub reason: String,
}

impl ComponentReplace {
    /// `# <reason>` followed by the replace entry, tags optional on both sides
    pub fn render(&self) -> String {
        format!(
            "# {}\n- {} => {}",
            self.reason,
            self.from.with_blank_tag_allowed(),
            self.to.with_blank_tag_allowed()
        )
    }
}

/// Specification of a collector distribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionSpec {
    pub name: String,
    pub module: String,
    pub display_name: String,
    pub description: String,
    pub blurb: String,
    pub build_container: BuildContainer,
    pub version: String,
    pub opentelemetry_version: String,
    pub opentelemetry_contrib_version: String,
    pub opentelemetry_stable_version: String,
    pub go_version: String,
    pub binary_name: String,
    pub build_tags: String,
    pub boringcrypto: bool,
    pub docker_repo: String,
    /// Registries searched before the embedded one, first listed wins
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub registries: Vec<CustomRegistry>,
    pub components: DistributionComponents,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<ComponentReplace>,
    /// Free form values handed to custom templates
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_values: BTreeMap<String, serde_yaml_ng::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feature_gates: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub go_proxy: String,
    /// Build the collector with CGO enabled
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub collector_cgo: bool,
    pub component_module_base: String,
    pub distrogen_version: String,
}

impl DistributionSpec {
    /// Load a spec file, apply defaults, and validate it
    pub fn load(path: &Utf8Path) -> Result<Self> {
        debug!("Loading distribution spec from {}", path);
        let spec: DistributionSpec = read_yaml_file(path)
            .map_err(|e| map_not_found(e, || Error::spec_not_found(path.as_str())))?;
        spec.finish()
    }

    /// Parse a spec from a YAML string, apply defaults, and validate it
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let spec: DistributionSpec =
            serde_yaml_ng::from_str(yaml).map_err(|e| Error::parse("<string>", e))?;
        spec.finish()
    }

    fn finish(mut self) -> Result<Self> {
        if self.opentelemetry_contrib_version.is_empty() {
            self.opentelemetry_contrib_version = self.opentelemetry_version.clone();
        }
        self.validate()?;
        Ok(self)
    }

    /// boringcrypto builds need CGO and the debian build container
    pub fn validate(&self) -> Result<()> {
        if !self.boringcrypto {
            return Ok(());
        }
        if !self.collector_cgo {
            return Err(Error::BoringCryptoWithoutCgo);
        }
        if self.build_container != BuildContainer::Debian {
            return Err(Error::BoringCryptoWithoutDebian {
                build_container: self.build_container.to_string(),
            });
        }
        Ok(())
    }

    /// True when the two specs differ in any field
    pub fn diff(&self, other: &DistributionSpec) -> bool {
        self != other
    }

    /// Write the spec as YAML
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        write_yaml_file(self, path)
    }

    pub fn otel_versions(&self) -> OtelVersions {
        OtelVersions::new(
            &self.opentelemetry_version,
            &self.opentelemetry_stable_version,
            &self.opentelemetry_contrib_version,
        )
    }

    /// `"1.24.3"` -> `"1.24"`; versions without a minor part are returned as is
    pub fn render_go_major_version(&self) -> String {
        let mut parts = self.go_version.split('.');
        match (parts.next(), parts.next()) {
            (Some(major), Some(minor)) => format!("{}.{}", major, minor),
            _ => self.go_version.clone(),
        }
    }

    pub fn render_feature_gates(&self) -> String {
        self.feature_gates.join(",")
    }

    /// Replace directives rendered for the OCB manifest, one per line group
    pub fn render_replaces(&self) -> String {
        self.replaces
            .iter()
            .map(|r| format!("{}\n", r.render()))
            .collect()
    }

    /// Value of a top level field by its YAML name
    pub fn query(&self, field: &str) -> Result<String> {
        let value = match field {
            "name" => self.name.clone(),
            "module" => self.module.clone(),
            "display_name" => self.display_name.clone(),
            "description" => self.description.clone(),
            "blurb" => self.blurb.clone(),
            "build_container" => self.build_container.to_string(),
            "version" => self.version.clone(),
            "opentelemetry_version" => self.opentelemetry_version.clone(),
            "opentelemetry_contrib_version" => self.opentelemetry_contrib_version.clone(),
            "opentelemetry_stable_version" => self.opentelemetry_stable_version.clone(),
            "go_version" => self.go_version.clone(),
            "binary_name" => self.binary_name.clone(),
            "build_tags" => self.build_tags.clone(),
            "boringcrypto" => self.boringcrypto.to_string(),
            "docker_repo" => self.docker_repo.clone(),
            "go_proxy" => self.go_proxy.clone(),
            "collector_cgo" => self.collector_cgo.to_string(),
            "component_module_base" => self.component_module_base.clone(),
            "distrogen_version" => self.distrogen_version.clone(),
            "feature_gates" => self.render_feature_gates(),
            "components" => render_yaml(&self.components)?.trim_end().to_string(),
            "replaces" => render_yaml(&self.replaces)?.trim_end().to_string(),
            "registries" => render_yaml(&self.registries)?.trim_end().to_string(),
            "custom_values" => render_yaml(&self.custom_values)?.trim_end().to_string(),
            _ => return Err(Error::query_field_not_found(field)),
        };
        Ok(value)
    }

    /// Replace the component lists with the components an existing collector
    /// config uses
    pub fn apply_otel_config(&mut self, path: &Utf8Path) -> Result<()> {
        let components = otel_config::load_components(path)?;
        debug!(
            "Loaded {} receivers, {} processors, {} exporters from {}",
            components.receivers.len(),
            components.processors.len(),
            components.exporters.len(),
            path
        );
        self.components = components;
        Ok(())
    }
}

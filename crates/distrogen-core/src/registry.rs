//! Component registry
//!
//! A registry maps short component names (`hostmetrics`, `otlp`, ...) to the Go
//! module coordinates of the component, partitioned by component type. The
//! generator ships with an embedded default registry; user supplied registry
//! files are merged on top of it.
//!
//! A registry file may carry a `release` block. Its `version` pins the tag of
//! every component in that file, its `opentelemetry_collector_version` must
//! match the distribution's collector version, and its `replaces` are added to
//! the manifest of any distribution using one of its components. Entries keep
//! a copy of the release block they were loaded with, so merging registries
//! keeps each component's pinning intact.
//!
//! Resolution never touches the stored entries: it hands out
//! [`ResolvedComponent`] copies with the version tag filled in, so one loaded
//! registry can serve any number of resolutions with different versions.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CollectionError, Error, Result};
use crate::module_id::GoModuleId;
use crate::spec::ComponentReplace;
use crate::yaml::{map_not_found, read_yaml_file, write_yaml_file};

/// Registry bundled with the generator
const EMBEDDED_REGISTRY: &str = include_str!("../registry.yaml");

/// Base url for raw files of github registry sources
const GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";

/// Url marker of modules living in the collector-contrib repository
pub const CONTRIB_REPOSITORY: &str = "github.com/open-telemetry/opentelemetry-collector-contrib";

/// Collector component types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentType {
    Receiver,
    Processor,
    Exporter,
    Connector,
    Extension,
    Provider,
}

impl ComponentType {
    pub const ALL: [ComponentType; 6] = [
        ComponentType::Receiver,
        ComponentType::Processor,
        ComponentType::Exporter,
        ComponentType::Connector,
        ComponentType::Extension,
        ComponentType::Provider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receiver => "receiver",
            Self::Processor => "processor",
            Self::Exporter => "exporter",
            Self::Connector => "connector",
            Self::Extension => "extension",
            Self::Provider => "provider",
        }
    }

    /// Plural form, as used for registry partitions and collector config sections
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Receiver => "receivers",
            Self::Processor => "processors",
            Self::Exporter => "exporters",
            Self::Connector => "connectors",
            Self::Extension => "extensions",
            Self::Provider => "providers",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| lower == t.as_str() || lower == t.plural())
            .ok_or_else(|| Error::invalid_component_type(s))
    }
}

/// Release pinning declared by a registry file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Version every component of the registry is tagged with
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Collector version the registry's components are built against
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub opentelemetry_collector_version: String,

    /// Replace directives the registry's components need
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<ComponentReplace>,
}

impl ReleaseInfo {
    pub fn is_empty(&self) -> bool {
        self.version.is_empty()
            && self.opentelemetry_collector_version.is_empty()
            && self.replaces.is_empty()
    }
}

/// Registry entry for a single component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Go module of the component
    pub gomod: GoModuleId,

    /// Import path when it differs from the module url
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<String>,

    /// Display name used in the OCB manifest
    #[serde(rename = "string", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Local path of the module, for components living next to the distribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Versioned with the stable (1.x) collector modules
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_revision: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,

    /// Release block of the registry file this entry was loaded from
    #[serde(skip)]
    pub release: Option<ReleaseInfo>,
}

impl RegistryEntry {
    pub fn new(gomod: GoModuleId) -> Self {
        Self {
            gomod,
            import: None,
            display_name: None,
            path: None,
            stable: false,
            start_revision: None,
            docs_url: None,
            release: None,
        }
    }

    /// Version pinned by the entry's registry release, if any
    pub fn release_version(&self) -> Option<&str> {
        self.release
            .as_ref()
            .map(|r| r.version.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Whether the module comes from the collector-contrib repository
    pub fn is_contrib(&self) -> bool {
        self.gomod.url.contains(CONTRIB_REPOSITORY)
    }

    pub fn render_docs_url(&self) -> &str {
        render_docs_url(self.docs_url.as_deref())
    }
}

fn render_docs_url(docs_url: Option<&str>) -> &str {
    docs_url.unwrap_or("No docs linked for component")
}

/// Collector versions used to tag resolved components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtelVersions {
    /// Core collector version (`0.124.0`)
    pub core: String,
    /// Stable core module version (`1.30.0`)
    pub stable: String,
    /// collector-contrib version, usually the same as `core`
    pub contrib: String,
}

impl OtelVersions {
    pub fn new(
        core: impl Into<String>,
        stable: impl Into<String>,
        contrib: impl Into<String>,
    ) -> Self {
        Self {
            core: core.into(),
            stable: stable.into(),
            contrib: contrib.into(),
        }
    }

    /// Tag for an entry: stable first, then contrib, then core
    pub fn tag_for(&self, entry: &RegistryEntry) -> String {
        let version = if entry.stable {
            &self.stable
        } else if entry.is_contrib() {
            &self.contrib
        } else {
            &self.core
        };
        if version.is_empty() {
            String::new()
        } else {
            format!("v{}", version)
        }
    }
}

/// A registry entry resolved for one distribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComponent {
    pub name: String,
    pub component_type: ComponentType,
    pub gomod: GoModuleId,
    pub import: Option<String>,
    pub display_name: Option<String>,
    pub path: Option<String>,
    pub docs_url: Option<String>,
    /// Replace directives required by the component's registry
    pub replaces: Vec<ComponentReplace>,
}

impl ResolvedComponent {
    fn from_entry(
        name: &str,
        component_type: ComponentType,
        entry: &RegistryEntry,
        versions: &OtelVersions,
    ) -> Self {
        let mut gomod = entry.gomod.clone();
        gomod.tag = match entry.release_version() {
            Some(version) => format!("v{}", version),
            None => versions.tag_for(entry),
        };
        Self {
            name: name.to_string(),
            component_type,
            gomod,
            import: entry.import.clone(),
            display_name: entry.display_name.clone(),
            path: entry.path.clone(),
            docs_url: entry.docs_url.clone(),
            replaces: entry
                .release
                .as_ref()
                .map(|r| r.replaces.clone())
                .unwrap_or_default(),
        }
    }

    pub fn render_docs_url(&self) -> &str {
        render_docs_url(self.docs_url.as_deref())
    }

    /// The OCB manifest view of this component
    pub fn to_ocb(&self) -> OcbManifestComponent {
        OcbManifestComponent {
            gomod: self.gomod.clone(),
            import: self.import.clone(),
            name: self.display_name.clone(),
            path: self.path.clone(),
        }
    }
}

/// An entry in an OCB (OpenTelemetry Collector Builder) manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OcbManifestComponent {
    pub gomod: GoModuleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<String>,
    #[serde(rename = "string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Where a registry listed in a distribution spec comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RegistrySource {
    /// A registry file on disk
    Local { path: Utf8PathBuf },
    /// A registry file in a GitHub repository at a revision
    Github {
        repo: String,
        revision: String,
        path: String,
    },
}

impl RegistrySource {
    /// Raw file url of a github source
    pub fn github_url(&self) -> Option<String> {
        match self {
            Self::Local { .. } => None,
            Self::Github {
                repo,
                revision,
                path,
            } => Some(format!(
                "{}/{}/{}/{}",
                GITHUB_RAW_URL,
                repo,
                revision,
                path.trim_start_matches('/')
            )),
        }
    }
}

/// A named registry listed in a distribution spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRegistry {
    pub name: String,
    #[serde(flatten)]
    pub source: RegistrySource,
}

/// Components of one type, keyed by name
pub type RegistryComponents = BTreeMap<String, RegistryEntry>;

/// Catalog of components available to a distribution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default, skip_serializing_if = "ReleaseInfo::is_empty")]
    pub release: ReleaseInfo,
    #[serde(default)]
    pub receivers: RegistryComponents,
    #[serde(default)]
    pub processors: RegistryComponents,
    #[serde(default)]
    pub exporters: RegistryComponents,
    #[serde(default)]
    pub connectors: RegistryComponents,
    #[serde(default)]
    pub extensions: RegistryComponents,
    #[serde(default)]
    pub providers: RegistryComponents,

    /// File this registry was loaded from or will be saved to
    #[serde(skip)]
    pub path: Option<Utf8PathBuf>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry that saves to `path`
    pub fn with_path(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Load the registry bundled with distrogen
    pub fn load_embedded() -> Result<Self> {
        let registry: Registry = serde_yaml_ng::from_str(EMBEDDED_REGISTRY)
            .map_err(|e| Error::parse("embedded registry.yaml", e))?;
        Ok(registry.finish())
    }

    /// Load a registry from a YAML file
    pub fn load(path: &Utf8Path) -> Result<Self> {
        debug!("Loading registry from {}", path);
        let mut registry: Registry = read_yaml_file(path)
            .map_err(|e| map_not_found(e, || Error::registry_not_found(path.as_str())))?;
        registry.path = Some(path.to_owned());
        Ok(registry.finish())
    }

    /// Parse a registry from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_yaml_source(yaml, "<string>")
    }

    /// Parse a registry from YAML fetched from `source`, named in parse errors
    pub fn from_yaml_source(yaml: &str, source: &str) -> Result<Self> {
        let registry: Registry =
            serde_yaml_ng::from_str(yaml).map_err(|e| Error::parse(source, e))?;
        Ok(registry.finish())
    }

    /// Hand the release block down to every entry
    fn finish(mut self) -> Self {
        if self.release.is_empty() {
            return self;
        }
        let release = self.release.clone();
        for component_type in ComponentType::ALL {
            for entry in self.partition_mut(component_type).values_mut() {
                entry.release = Some(release.clone());
            }
        }
        self
    }

    /// The embedded registry with every file in `paths` merged on top, in order
    pub fn load_with_overrides<P: AsRef<Utf8Path>>(paths: &[P]) -> Result<Self> {
        let mut registry = Self::load_embedded()?;
        registry.merge_files(paths)?;
        Ok(registry)
    }

    /// Merge every registry file in `paths` on top of this one, in order
    pub fn merge_files<P: AsRef<Utf8Path>>(&mut self, paths: &[P]) -> Result<()> {
        for path in paths {
            let other = Self::load(path.as_ref())?;
            info!(
                "Merging {} components from registry {}",
                other.len(),
                path.as_ref()
            );
            self.merge(&other);
        }
        Ok(())
    }

    /// Stack named registries on top of `base`. Earlier registries take
    /// priority over later ones, and all of them over `base`.
    ///
    /// Every registry must be compatible with `collector_version`.
    pub fn stack(
        mut base: Registry,
        registries: &[(String, Registry)],
        collector_version: &str,
    ) -> Result<Self> {
        for (name, registry) in registries {
            registry.check_collector_version(name, collector_version)?;
        }
        for (name, registry) in registries.iter().rev() {
            debug!("Stacking {} components from registry {}", registry.len(), name);
            base.merge(registry);
        }
        Ok(base)
    }

    /// Fails when the release block names a different collector version
    pub fn check_collector_version(&self, name: &str, collector_version: &str) -> Result<()> {
        let declared = &self.release.opentelemetry_collector_version;
        if declared.is_empty() || declared == collector_version {
            return Ok(());
        }
        Err(Error::RegistryVersionIncompatible {
            registry: name.to_string(),
            registry_version: declared.clone(),
            distribution_version: collector_version.to_string(),
        })
    }

    pub fn partition(&self, component_type: ComponentType) -> &RegistryComponents {
        match component_type {
            ComponentType::Receiver => &self.receivers,
            ComponentType::Processor => &self.processors,
            ComponentType::Exporter => &self.exporters,
            ComponentType::Connector => &self.connectors,
            ComponentType::Extension => &self.extensions,
            ComponentType::Provider => &self.providers,
        }
    }

    fn partition_mut(&mut self, component_type: ComponentType) -> &mut RegistryComponents {
        match component_type {
            ComponentType::Receiver => &mut self.receivers,
            ComponentType::Processor => &mut self.processors,
            ComponentType::Exporter => &mut self.exporters,
            ComponentType::Connector => &mut self.connectors,
            ComponentType::Extension => &mut self.extensions,
            ComponentType::Provider => &mut self.providers,
        }
    }

    /// Total number of components across all partitions
    pub fn len(&self) -> usize {
        ComponentType::ALL
            .iter()
            .map(|t| self.partition(*t).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge `other` into this registry. Entries in `other` win over entries
    /// with the same name in the same partition. This registry's own release
    /// block is kept.
    pub fn merge(&mut self, other: &Registry) {
        for component_type in ComponentType::ALL {
            let theirs = other.partition(component_type);
            let ours = self.partition_mut(component_type);
            for (name, entry) in theirs {
                ours.insert(name.clone(), entry.clone());
            }
        }
    }

    /// Insert or replace a component
    pub fn add(&mut self, component_type: ComponentType, name: impl Into<String>, entry: RegistryEntry) {
        self.partition_mut(component_type).insert(name.into(), entry);
    }

    pub fn lookup(&self, component_type: ComponentType, name: &str) -> Result<&RegistryEntry> {
        self.partition(component_type)
            .get(name)
            .ok_or(Error::ComponentNotFound)
    }

    /// Resolve `names` against one partition.
    ///
    /// Every found name yields a [`ResolvedComponent`] in request order
    /// (repeated names once). Every missing name is recorded in the returned
    /// [`CollectionError`]; resolution carries on past it.
    pub fn resolve(
        &self,
        component_type: ComponentType,
        names: &[String],
        versions: &OtelVersions,
    ) -> (Vec<ResolvedComponent>, CollectionError) {
        let mut resolved = Vec::with_capacity(names.len());
        let mut errors = CollectionError::new();
        let mut seen = HashSet::new();

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match self.lookup(component_type, name) {
                Ok(entry) => {
                    resolved.push(ResolvedComponent::from_entry(
                        name,
                        component_type,
                        entry,
                        versions,
                    ));
                }
                Err(e) => {
                    debug!("{} {} not found in registry", component_type, name);
                    errors.insert(name.clone(), e);
                }
            }
        }

        (resolved, errors)
    }

    /// Write the registry back to its path
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_ref().ok_or(Error::RegistryPathUnset)?;
        write_yaml_file(self, path)?;
        debug!("Saved registry to {}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> RegistryEntry {
        RegistryEntry::new(GoModuleId::parse(url))
    }

    fn versions() -> OtelVersions {
        OtelVersions::new("1.2.3", "1.0.0", "0.5.0")
    }

    #[test]
    fn test_load_embedded_registry() {
        let registry = Registry::load_embedded().unwrap();
        assert!(!registry.receivers.is_empty());
        assert!(registry.receivers.contains_key("otlp"));
        assert!(registry.path.is_none());
    }

    #[test]
    fn test_component_type_from_str() {
        assert_eq!("receiver".parse::<ComponentType>().unwrap(), ComponentType::Receiver);
        assert_eq!("Exporters".parse::<ComponentType>().unwrap(), ComponentType::Exporter);
        assert!(matches!(
            "pipeline".parse::<ComponentType>(),
            Err(Error::InvalidComponentType { .. })
        ));
    }

    #[test]
    fn test_is_contrib() {
        assert!(entry("github.com/open-telemetry/opentelemetry-collector-contrib/receiver/test").is_contrib());
        assert!(!entry("github.com/test/module").is_contrib());
    }

    #[test]
    fn test_render_docs_url() {
        let mut e = entry("github.com/test/module");
        assert_eq!(e.render_docs_url(), "No docs linked for component");
        e.docs_url = Some("https://example.com/docs".to_string());
        assert_eq!(e.render_docs_url(), "https://example.com/docs");
    }

    #[test]
    fn test_tag_precedence() {
        let v = versions();
        assert_eq!(v.tag_for(&entry("github.com/test/module")), "v1.2.3");

        let mut stable = entry("github.com/test/module");
        stable.stable = true;
        assert_eq!(v.tag_for(&stable), "v1.0.0");

        let contrib = entry("github.com/open-telemetry/opentelemetry-collector-contrib/receiver/test");
        assert_eq!(v.tag_for(&contrib), "v0.5.0");

        // stable wins over contrib
        let mut stable_contrib = contrib.clone();
        stable_contrib.stable = true;
        assert_eq!(v.tag_for(&stable_contrib), "v1.0.0");
    }

    #[test]
    fn test_tag_empty_version() {
        let v = OtelVersions::new("1.2.3", "", "1.2.3");
        let mut stable = entry("github.com/test/module");
        stable.stable = true;
        assert_eq!(v.tag_for(&stable), "");
    }

    #[test]
    fn test_merge_different_components() {
        let mut r1 = Registry::new();
        r1.add(ComponentType::Receiver, "receiver1", entry("github.com/r1"));
        let mut r2 = Registry::new();
        r2.add(ComponentType::Receiver, "receiver2", entry("github.com/r2"));
        r2.add(ComponentType::Processor, "processor1", entry("github.com/p1"));

        r1.merge(&r2);
        assert_eq!(r1.receivers.len(), 2);
        assert_eq!(r1.processors.len(), 1);
    }

    #[test]
    fn test_merge_last_writer_wins() {
        let mut r1 = Registry::new();
        r1.add(ComponentType::Receiver, "x", entry("github.com/r1"));
        let mut r2 = Registry::new();
        r2.add(ComponentType::Receiver, "x", entry("github.com/r2"));

        r1.merge(&r2);
        assert_eq!(r1.receivers.len(), 1);
        assert_eq!(r1.receivers["x"].gomod.url, "github.com/r2");
    }

    #[test]
    fn test_merge_stays_within_partition() {
        let mut r1 = Registry::new();
        r1.add(ComponentType::Receiver, "otlp", entry("github.com/otlpreceiver"));
        let mut r2 = Registry::new();
        r2.add(ComponentType::Exporter, "otlp", entry("github.com/otlpexporter"));

        r1.merge(&r2);
        assert_eq!(r1.receivers["otlp"].gomod.url, "github.com/otlpreceiver");
        assert_eq!(r1.exporters["otlp"].gomod.url, "github.com/otlpexporter");
    }

    #[test]
    fn test_merge_with_itself_is_unchanged() {
        let registry = Registry::load_embedded().unwrap();
        let mut merged = registry.clone();
        merged.merge(&registry);
        assert_eq!(merged, registry);
    }

    #[test]
    fn test_resolve_partial() {
        let mut registry = Registry::new();
        registry.add(ComponentType::Receiver, "known1", entry("github.com/k1"));
        registry.add(ComponentType::Receiver, "known2", entry("github.com/k2"));

        let names: Vec<String> = ["known1", "unknown1", "known2", "unknown2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (resolved, errs) = registry.resolve(ComponentType::Receiver, &names, &versions());

        assert_eq!(
            resolved.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["known1", "known2"]
        );
        assert_eq!(errs.names().collect::<Vec<_>>(), vec!["unknown1", "unknown2"]);
        assert!(matches!(errs.get("unknown1"), Some(Error::ComponentNotFound)));
        assert_eq!(resolved[0].gomod.tag, "v1.2.3");
    }

    #[test]
    fn test_resolve_does_not_mutate_registry() {
        let mut registry = Registry::new();
        registry.add(ComponentType::Receiver, "c1", entry("github.com/c1"));

        let names = vec!["c1".to_string()];
        let (first, _) = registry.resolve(ComponentType::Receiver, &names, &versions());
        let (second, _) = registry.resolve(
            ComponentType::Receiver,
            &names,
            &OtelVersions::new("9.9.9", "", ""),
        );

        assert_eq!(first[0].gomod.tag, "v1.2.3");
        assert_eq!(second[0].gomod.tag, "v9.9.9");
        assert_eq!(registry.receivers["c1"].gomod.tag, "");
    }

    #[test]
    fn test_resolve_contrib_ignores_core_version() {
        let mut registry = Registry::new();
        registry.add(
            ComponentType::Receiver,
            "hostmetrics",
            entry("github.com/open-telemetry/opentelemetry-collector-contrib/receiver/hostmetricsreceiver"),
        );
        let (resolved, errs) = registry.resolve(
            ComponentType::Receiver,
            &["hostmetrics".to_string()],
            &OtelVersions::new("0.124.0", "1.30.0", "0.124.1"),
        );
        assert!(errs.is_empty());
        assert_eq!(resolved[0].gomod.tag, "v0.124.1");
    }

    #[test]
    fn test_resolve_skips_repeated_names() {
        let mut registry = Registry::new();
        registry.add(ComponentType::Processor, "batch", entry("github.com/batch"));
        let names = vec!["batch".to_string(), "batch".to_string()];
        let (resolved, errs) = registry.resolve(ComponentType::Processor, &names, &versions());
        assert_eq!(resolved.len(), 1);
        assert!(errs.is_empty());
    }

    #[test]
    fn test_lookup_wrong_partition() {
        let mut registry = Registry::new();
        registry.add(ComponentType::Receiver, "otlp", entry("github.com/otlp"));
        assert!(registry.lookup(ComponentType::Receiver, "otlp").is_ok());
        assert!(matches!(
            registry.lookup(ComponentType::Exporter, "otlp"),
            Err(Error::ComponentNotFound)
        ));
    }

    #[test]
    fn test_to_ocb() {
        let mut e = entry("github.com/test/module v1.2.3");
        e.import = Some("github.com/test/module/test".to_string());
        e.display_name = Some("test".to_string());
        e.path = Some("test/path".to_string());
        let resolved = ResolvedComponent::from_entry("test", ComponentType::Receiver, &e, &versions());

        let ocb = resolved.to_ocb();
        assert_eq!(ocb.gomod.url, "github.com/test/module");
        assert_eq!(ocb.gomod.tag, "v1.2.3");
        assert_eq!(ocb.import.as_deref(), Some("github.com/test/module/test"));
        assert_eq!(ocb.name.as_deref(), Some("test"));
        assert_eq!(ocb.path.as_deref(), Some("test/path"));
    }

    #[test]
    fn test_save_without_path() {
        let registry = Registry::new();
        assert!(matches!(registry.save(), Err(Error::RegistryPathUnset)));
    }

    #[test]
    fn test_entry_yaml_keys() {
        let yaml = r#"
receivers:
  foo:
    gomod: github.com/test/foo v1.0.0
    import: github.com/test/foo/receiver
    string: foo
    path: ../foo
    stable: true
    start_revision: abc123
    docs_url: https://example.com
"#;
        let registry = Registry::from_yaml(yaml).unwrap();
        let foo = &registry.receivers["foo"];
        assert_eq!(foo.gomod, GoModuleId::new("github.com/test/foo", "v1.0.0"));
        assert_eq!(foo.display_name.as_deref(), Some("foo"));
        assert!(foo.stable);
        assert_eq!(foo.start_revision.as_deref(), Some("abc123"));
        assert!(registry.exporters.is_empty());
    }

    #[test]
    fn test_untagged_gomod_rendered_as_bare_url() {
        let registry =
            Registry::from_yaml("receivers:\n  foo:\n    gomod: example.com/foo\n    path: ../foo\n")
                .unwrap();
        let yaml = crate::yaml::render_yaml(&registry).unwrap();
        assert!(yaml.contains("gomod: example.com/foo\n"));
        assert!(!yaml.contains("v0.0.0"));

        let reloaded = Registry::from_yaml(&yaml).unwrap();
        assert_eq!(reloaded, registry);
    }

    fn pinned(yaml_release: &str, url: &str) -> Registry {
        Registry::from_yaml(&format!(
            "release:\n{}receivers:\n  shared:\n    gomod: {}\n",
            yaml_release, url
        ))
        .unwrap()
    }

    #[test]
    fn test_release_version_pins_tag() {
        let registry = pinned("  version: 2.0.0\n", "github.com/vendor/shared");
        assert_eq!(registry.receivers["shared"].release_version(), Some("2.0.0"));

        let (resolved, _) = registry.resolve(
            ComponentType::Receiver,
            &["shared".to_string()],
            &versions(),
        );
        assert_eq!(resolved[0].gomod.tag, "v2.0.0");
    }

    #[test]
    fn test_release_survives_merge() {
        let mut registry = Registry::load_embedded().unwrap();
        registry.merge(&pinned("  version: 2.0.0\n", "github.com/vendor/shared"));
        assert!(registry.release.is_empty());
        assert_eq!(registry.receivers["shared"].release_version(), Some("2.0.0"));
        assert_eq!(registry.receivers["otlp"].release_version(), None);
    }

    #[test]
    fn test_stack_first_registry_wins() {
        let base = Registry::load_embedded().unwrap();
        let first = pinned("  version: 1.0.0\n", "github.com/first/shared");
        let second = pinned("  version: 2.0.0\n", "github.com/second/shared");

        let stacked = Registry::stack(
            base,
            &[("first".to_string(), first), ("second".to_string(), second)],
            "0.124.0",
        )
        .unwrap();
        assert_eq!(stacked.receivers["shared"].gomod.url, "github.com/first/shared");
        assert!(stacked.receivers.contains_key("otlp"));
    }

    #[test]
    fn test_stack_rejects_incompatible_registry() {
        let old = pinned(
            "  opentelemetry_collector_version: 0.120.0\n",
            "github.com/vendor/shared",
        );
        let err = Registry::stack(Registry::new(), &[("vendor".to_string(), old)], "0.124.0")
            .unwrap_err();
        match err {
            Error::RegistryVersionIncompatible {
                registry,
                registry_version,
                distribution_version,
            } => {
                assert_eq!(registry, "vendor");
                assert_eq!(registry_version, "0.120.0");
                assert_eq!(distribution_version, "0.124.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_matching_collector_version_is_compatible() {
        let current = pinned(
            "  opentelemetry_collector_version: 0.124.0\n",
            "github.com/vendor/shared",
        );
        assert!(current.check_collector_version("vendor", "0.124.0").is_ok());
        assert!(Registry::new().check_collector_version("empty", "0.124.0").is_ok());
    }

    #[test]
    fn test_release_block_written_back() {
        let registry = pinned("  version: 2.0.0\n", "github.com/vendor/shared");
        let yaml = crate::yaml::render_yaml(&registry).unwrap();
        assert!(yaml.starts_with("release:\n  version: 2.0.0\n"));

        let embedded = crate::yaml::render_yaml(&Registry::load_embedded().unwrap()).unwrap();
        assert!(!embedded.contains("release:"));
    }

    #[test]
    fn test_github_url_strips_leading_slash() {
        let source = RegistrySource::Github {
            repo: "org/repo".to_string(),
            revision: "v1".to_string(),
            path: "/registry.yaml".to_string(),
        };
        assert_eq!(
            source.github_url().as_deref(),
            Some("https://raw.githubusercontent.com/org/repo/v1/registry.yaml")
        );
        let local = RegistrySource::Local {
            path: Utf8PathBuf::from("registry.yaml"),
        };
        assert!(local.github_url().is_none());
    }

    #[test]
    fn test_resolved_render_docs_url() {
        let mut e = entry("github.com/test/module");
        let resolved = ResolvedComponent::from_entry("m", ComponentType::Receiver, &e, &versions());
        assert_eq!(resolved.render_docs_url(), "No docs linked for component");
        e.docs_url = Some("https://example.com/m".to_string());
        let resolved = ResolvedComponent::from_entry("m", ComponentType::Receiver, &e, &versions());
        assert_eq!(resolved.render_docs_url(), "https://example.com/m");
    }
}

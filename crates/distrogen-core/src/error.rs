//! Error types for distrogen-core

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Result type alias using distrogen-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for distrogen
#[derive(Error, Debug)]
pub enum Error {
    /// Component name is not present in the registry partition
    #[error("component not found")]
    ComponentNotFound,

    /// Registry file not found
    #[error("registry file not found: {path}")]
    RegistryNotFound { path: String },

    /// Distribution spec file not found
    #[error("distribution spec not found: {path}")]
    SpecNotFound { path: String },

    /// Malformed YAML in a spec, registry, or collector config
    #[error("error parsing {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// boringcrypto needs a CGO build
    #[error("boringcrypto build is not possible with collector_cgo turned off")]
    BoringCryptoWithoutCgo,

    /// boringcrypto needs the debian build container
    #[error("boringcrypto is only possible with the debian build container, build_container was set to {build_container}")]
    BoringCryptoWithoutDebian { build_container: String },

    /// The spec matches the previously generated one
    #[error("no differences found with previous generation")]
    NoDiff,

    /// Field requested through `query` does not exist
    #[error("field '{field}': not found in spec")]
    QueryFieldNotFound { field: String },

    /// Unknown component type name
    #[error("invalid component type: {name}")]
    InvalidComponentType { name: String },

    /// A collector config section that is not a mapping
    #[error("reading section {section}: invalid section data")]
    InvalidOtelConfigSection { section: String },

    /// A registry release built against another collector version
    #[error("the registry version is incompatible with the distribution: registry {registry} is at collector version {registry_version}, distribution collector version is {distribution_version}")]
    RegistryVersionIncompatible {
        registry: String,
        registry_version: String,
        distribution_version: String,
    },

    /// Registry has no path to be saved to
    #[error("cannot save registry: no path set")]
    RegistryPathUnset,

    /// Several named items failed
    #[error("{0}")]
    Collection(CollectionError),

    /// YAML serialization error
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a parse error tagged with the source path
    pub fn parse(path: impl Into<String>, source: serde_yaml_ng::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Create a registry not found error
    pub fn registry_not_found(path: impl Into<String>) -> Self {
        Self::RegistryNotFound { path: path.into() }
    }

    /// Create a spec not found error
    pub fn spec_not_found(path: impl Into<String>) -> Self {
        Self::SpecNotFound { path: path.into() }
    }

    /// Create a query field not found error
    pub fn query_field_not_found(field: impl Into<String>) -> Self {
        Self::QueryFieldNotFound {
            field: field.into(),
        }
    }

    /// Create an invalid component type error
    pub fn invalid_component_type(name: impl Into<String>) -> Self {
        Self::InvalidComponentType { name: name.into() }
    }

    /// True for the "file does not exist" family of errors
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::RegistryNotFound { .. } | Self::SpecNotFound { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Errors keyed by the name of the item that failed.
///
/// Batch operations collect every failure here instead of stopping at the
/// first one. Display is one `name: error` line per item, sorted by name.
#[derive(Debug, Default)]
pub struct CollectionError {
    errors: BTreeMap<String, Error>,
}

impl CollectionError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `name`, replacing any earlier error for it
    pub fn insert(&mut self, name: impl Into<String>, error: Error) {
        self.errors.insert(name.into(), error);
    }

    /// Move every error from `other` into this collection
    pub fn extend(&mut self, other: CollectionError) {
        self.errors.extend(other.errors);
    }

    pub fn get(&self, name: &str) -> Option<&Error> {
        self.errors.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Names of the failed items, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// `Ok(())` when empty, otherwise the collection as an [`Error`]
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Collection(self))
        }
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, err) in &self.errors {
            writeln!(f, "{}: {}", name, err)?;
        }
        Ok(())
    }
}

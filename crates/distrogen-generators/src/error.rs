//! Error types for distrogen-generators

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result type alias using distrogen-generators' Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Generator error types
#[derive(Error, Debug)]
pub enum Error {
    /// Spec, registry, or resolution error
    #[error(transparent)]
    Core(#[from] distrogen_core::Error),

    /// Template file without the `.tera` suffix
    #[error("invalid template name, must end with .tera: {name}")]
    InvalidTemplateName { name: String },

    /// Template not present in a template set
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    /// Template failed to parse or render
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Scratch directory could not be moved into place
    #[error("failed to move generated distribution into {destination}{}: {source}", backup_note(.backup))]
    PromotionIncomplete {
        destination: Utf8PathBuf,
        backup: Option<Utf8PathBuf>,
        #[source]
        source: io::Error,
    },

    /// Generation was promoted but the previous tree could not be removed
    #[error("failed to remove backup {backup}: {source}")]
    BackupCleanup {
        backup: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// `compare` ran before the distribution was ever generated
    #[error("distribution folder not generated: {path}")]
    DistributionDirMissing { path: Utf8PathBuf },

    /// Generated tree does not match the existing one
    #[error("{name}: existing distro folder differs from generation:\n\n{differences}")]
    DistributionDiffers {
        name: String,
        differences: FileDifferences,
    },

    /// Unexpected I/O while comparing generated trees
    #[error("comparing generated distribution: {0}")]
    Compare(#[source] io::Error),

    /// Component scaffolding needs a module base in the spec
    #[error("must supply a component_module_base in spec")]
    MissingComponentModuleBase,

    /// Path that is not valid UTF-8
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn backup_note(backup: &Option<Utf8PathBuf>) -> String {
    match backup {
        Some(b) => format!(" (previous generation kept at {})", b),
        None => String::new(),
    }
}

impl Error {
    /// Create an invalid template name error
    pub fn invalid_template_name(name: impl Into<String>) -> Self {
        Self::InvalidTemplateName { name: name.into() }
    }

    /// Create a template not found error
    pub fn template_not_found(name: impl Into<String>) -> Self {
        Self::TemplateNotFound { name: name.into() }
    }

    /// True when generation was skipped because nothing changed
    pub fn is_no_diff(&self) -> bool {
        matches!(self, Self::Core(distrogen_core::Error::NoDiff))
    }

    /// True for I/O failures during `compare`, as opposed to differences
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Compare(_))
    }
}

/// How one file of a generated tree differs from the existing tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDifference {
    /// Present in the existing tree only
    NotGenerated,
    /// Present in the generated tree only
    NotExisting,
    /// Present in both with different content
    Changed { diff: String },
}

impl fmt::Display for FileDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotGenerated => f.write_str("existing file not found in generated distribution"),
            Self::NotExisting => f.write_str("generated file not found in existing distribution"),
            Self::Changed { diff } => {
                write!(f, "existing file differs from generated distribution:\n{}", diff)
            }
        }
    }
}

/// Per file differences keyed by path relative to the distribution root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDifferences {
    files: BTreeMap<String, FileDifference>,
}

impl FileDifferences {
    pub fn insert(&mut self, path: impl Into<String>, difference: FileDifference) {
        self.files.insert(path.into(), difference);
    }

    pub fn get(&self, path: &str) -> Option<&FileDifference> {
        self.files.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl fmt::Display for FileDifferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, difference) in &self.files {
            writeln!(f, "{}: {}", path, difference)?;
        }
        Ok(())
    }
}

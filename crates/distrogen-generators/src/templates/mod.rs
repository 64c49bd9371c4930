//! Template sets for generated files
//!
//! Templates are Tera sources named `<output name>.tera`. The built-in sets
//! are embedded in the binary, one folder per [`TemplateGroup`]; a user
//! directory of templates can be layered on top of a built-in set, replacing
//! templates with the same name.

pub mod context;

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use tera::Tera;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

pub use context::TemplateContext;

/// Suffix every template file carries
pub const TEMPLATE_SUFFIX: &str = ".tera";

/// Embedded template folders
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Built-in template sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateGroup {
    /// A generated collector distribution
    Distribution,
    /// Top level files of a distrogen project
    Project,
    /// Make includes under `make/`
    Make,
    /// Helper scripts under `scripts/`
    Scripts,
    /// The `components/` directory of a project
    Components,
    /// A single scaffolded component
    Component,
    /// Go tool pinning under `internal/`
    Internal,
    /// distrogen settings under `.distrogen/`
    Distrogen,
}

impl TemplateGroup {
    fn folder(&self) -> &'static str {
        match self {
            Self::Distribution => "distribution",
            Self::Project => "project",
            Self::Make => "make",
            Self::Scripts => "scripts",
            Self::Components => "components",
            Self::Component => "component",
            Self::Internal => "internal",
            Self::Distrogen => "distrogen",
        }
    }
}

/// Template sources keyed by template name (`Makefile.tera`, `sub/file.tera`)
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: BTreeMap<String, String>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a built-in template set
    pub fn embedded(group: TemplateGroup) -> Result<Self> {
        let prefix = format!("{}/", group.folder());
        let mut set = Self::new();

        for file in EmbeddedTemplates::iter() {
            let Some(name) = file.strip_prefix(&prefix) else {
                continue;
            };
            if let Some(content) = EmbeddedTemplates::get(&file) {
                let source = std::str::from_utf8(content.data.as_ref()).map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("invalid UTF-8 in template {}", file),
                    )
                })?;
                set.add(name, source)?;
            }
        }

        debug!("Loaded {} {} templates", set.len(), group.folder());
        Ok(set)
    }

    /// Collect every `*.tera` file under `dir`. Other files are ignored.
    pub fn from_dir(dir: &Utf8Path) -> Result<Self> {
        let mut set = Self::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = Utf8Path::from_path(entry.path()).ok_or_else(|| Error::NonUtf8Path {
                path: entry.path().display().to_string(),
            })?;
            if !path.as_str().ends_with(TEMPLATE_SUFFIX) {
                continue;
            }
            let name = path
                .strip_prefix(dir)
                .map(|p| p.as_str().replace('\\', "/"))
                .unwrap_or_else(|_| path.as_str().to_string());
            let source = fs::read_to_string(path)?;
            set.add(name, source)?;
        }

        debug!("Loaded {} custom templates from {}", set.len(), dir);
        Ok(set)
    }

    /// Add or replace a template
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !name.ends_with(TEMPLATE_SUFFIX) || name.len() == TEMPLATE_SUFFIX.len() {
            return Err(Error::invalid_template_name(name));
        }
        self.templates.insert(name, source.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&str> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::template_not_found(name))
    }

    /// Layer `other` on top of this set
    pub fn merge(&mut self, other: TemplateSet) {
        self.templates.extend(other.templates);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render every template into `out_dir`, creating directories as needed.
    /// Returns the written paths in template name order.
    pub fn render(&self, context: &TemplateContext, out_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(
            self.templates
                .iter()
                .map(|(name, source)| (name.as_str(), source.as_str())),
        )?;

        let mut written = Vec::with_capacity(self.templates.len());
        for name in self.templates.keys() {
            let rendered = tera.render(name, context.as_tera())?;
            let out_path = out_dir.join(output_name(name));
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&out_path, rendered)?;
            set_executable_if_script(&out_path)?;
            debug!("Rendered {} to {}", name, out_path);
            written.push(out_path);
        }
        Ok(written)
    }
}

/// `Makefile.tera` -> `Makefile`
pub fn output_name(template_name: &str) -> &str {
    template_name
        .strip_suffix(TEMPLATE_SUFFIX)
        .unwrap_or(template_name)
}

#[cfg(unix)]
fn set_executable_if_script(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if path.extension() == Some("sh") {
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_executable_if_script(_path: &Utf8Path) -> Result<()> {
    Ok(())
}

//! Distribution generation
//!
//! A generation renders into a scratch directory next to the destination and
//! is only moved into place by an explicit [`DistributionGenerator::promote`].
//! The lifecycle is:
//!
//! 1. [`DistributionGenerator::new`] compares the spec with the copy saved in
//!    the last generation and fails with `NoDiff` when nothing changed.
//! 2. [`DistributionGenerator::generate`] renders into the scratch directory.
//! 3. [`DistributionGenerator::promote`] swaps the scratch directory in, or
//!    [`DistributionGenerator::compare`] checks it against the existing tree
//!    followed by [`DistributionGenerator::clean`].

use std::collections::BTreeMap;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use distrogen_core::{DistributionSpec, ManifestContext, Registry};

use crate::error::{Error, FileDifference, FileDifferences, Result};
use crate::templates::{TemplateContext, TemplateGroup, TemplateSet};

/// File name of the spec snapshot inside a generated distribution
pub const SPEC_SNAPSHOT: &str = "spec.yaml";

/// Suffix of the previous generation while a new one is moved into place
pub const BACKUP_SUFFIX: &str = "-bkp";

/// Directory of build tooling that is never compared
const TOOLS_DIR: &str = ".tools";

/// Largest LCS table built for a changed file; bigger changes diff as blocks
const MAX_DIFF_CELLS: usize = 1_000_000;

/// Generates one collector distribution from a spec
#[derive(Debug)]
pub struct DistributionGenerator {
    spec: DistributionSpec,
    registry: Registry,
    working_dir: Utf8PathBuf,
    scratch_dir: Utf8PathBuf,
    custom_templates: Option<Utf8PathBuf>,
}

impl DistributionGenerator {
    /// Prepare a generation of `spec` into `<working_dir>/<name>`.
    ///
    /// Unless `force` is set, fails with `NoDiff` when the spec equals the
    /// snapshot of the previous generation. On success a scratch directory
    /// has been created under `working_dir`.
    pub fn new(
        spec: DistributionSpec,
        registry: Registry,
        working_dir: impl Into<Utf8PathBuf>,
        force: bool,
    ) -> Result<Self> {
        let working_dir = working_dir.into();
        let destination = working_dir.join(&spec.name);

        if !force {
            let snapshot = destination.join(SPEC_SNAPSHOT);
            match DistributionSpec::load(&snapshot) {
                Ok(previous) => {
                    if !spec.diff(&previous) {
                        return Err(distrogen_core::Error::NoDiff.into());
                    }
                    debug!("Spec differs from {}", snapshot);
                }
                Err(e) if e.is_not_found() => {
                    debug!("generated spec could not be read: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let scratch = tempfile::Builder::new()
            .prefix(spec.name.as_str())
            .tempdir_in(&working_dir)?
            .keep();
        let scratch_dir = Utf8PathBuf::from_path_buf(scratch).map_err(|p| Error::NonUtf8Path {
            path: p.display().to_string(),
        })?;
        debug!("Generating {} in {}", spec.name, scratch_dir);

        Ok(Self {
            spec,
            registry,
            working_dir,
            scratch_dir,
            custom_templates: None,
        })
    }

    /// Layer the `*.tera` files of `dir` over the built-in distribution templates
    pub fn with_custom_templates(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.custom_templates = Some(dir.into());
        self
    }

    pub fn spec(&self) -> &DistributionSpec {
        &self.spec
    }

    pub fn scratch_dir(&self) -> &Utf8Path {
        &self.scratch_dir
    }

    /// Where the distribution lives once promoted
    pub fn destination(&self) -> Utf8PathBuf {
        self.working_dir.join(&self.spec.name)
    }

    fn backup_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}{}", self.destination(), BACKUP_SUFFIX))
    }

    /// Render the distribution and its spec snapshot into the scratch directory.
    ///
    /// On failure the scratch directory is left as is for inspection.
    pub fn generate(&self) -> Result<()> {
        let manifest = ManifestContext::build(&self.spec, &self.registry)?;
        let context = TemplateContext::for_distribution(&manifest)?;

        let mut templates = TemplateSet::embedded(TemplateGroup::Distribution)?;
        if let Some(dir) = &self.custom_templates {
            templates.merge(TemplateSet::from_dir(dir)?);
        }

        let written = templates.render(&context, &self.scratch_dir)?;
        self.spec.save(&self.scratch_dir.join(SPEC_SNAPSHOT))?;

        info!(
            "Generated {} files for {}",
            written.len() + 1,
            self.spec.name
        );
        Ok(())
    }

    /// Move the scratch directory to the destination.
    ///
    /// The previous generation is renamed aside first and only deleted once
    /// the new one is in place. If the move fails the previous generation
    /// stays at the backup path.
    pub fn promote(&self) -> Result<Utf8PathBuf> {
        let destination = self.destination();
        let backup = self.backup_path();

        let backup = if destination.exists() {
            fs::rename(&destination, &backup)?;
            debug!("Moved previous generation to {}", backup);
            Some(backup)
        } else {
            None
        };

        if let Err(source) = fs::rename(&self.scratch_dir, &destination) {
            return Err(Error::PromotionIncomplete {
                destination,
                backup,
                source,
            });
        }

        if let Some(backup) = backup {
            fs::remove_dir_all(&backup)
                .map_err(|source| Error::BackupCleanup { backup, source })?;
        }

        info!("Distribution {} written to {}", self.spec.name, destination);
        Ok(destination)
    }

    /// Compare the scratch directory with the existing distribution, file by
    /// relative path
    pub fn compare(&self) -> Result<()> {
        let destination = self.destination();

        match fs::metadata(&self.scratch_dir) {
            Ok(_) => {}
            Err(e) => return Err(Error::Compare(e)),
        }
        match fs::metadata(&destination) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::DistributionDirMissing { path: destination })
            }
            Err(e) => return Err(Error::Compare(e)),
        }

        debug!("Comparing {} to {}", self.scratch_dir, destination);

        let generated = self.collect_files(&self.scratch_dir).map_err(Error::Compare)?;
        let existing = self.collect_files(&destination).map_err(Error::Compare)?;

        let mut differences = FileDifferences::default();
        for (path, existing_content) in &existing {
            match generated.get(path) {
                None => differences.insert(path.clone(), FileDifference::NotGenerated),
                Some(generated_content) if generated_content != existing_content => {
                    differences.insert(
                        path.clone(),
                        FileDifference::Changed {
                            diff: line_diff(existing_content, generated_content),
                        },
                    );
                }
                Some(_) => {}
            }
        }
        for path in generated.keys() {
            if !existing.contains_key(path) {
                differences.insert(path.clone(), FileDifference::NotExisting);
            }
        }

        if differences.is_empty() {
            info!("{} matches the existing distribution", self.spec.name);
            return Ok(());
        }
        Err(Error::DistributionDiffers {
            name: self.spec.name.clone(),
            differences,
        })
    }

    /// Remove the scratch directory. Failures are logged, not returned.
    pub fn clean(&self) {
        match fs::remove_dir_all(&self.scratch_dir) {
            Ok(()) => debug!("Removed {}", self.scratch_dir),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => error!("failed to clean generated directory {}: {}", self.scratch_dir, e),
        }
    }

    /// Contents of every comparable file under `root`, keyed by relative path
    fn collect_files(&self, root: &Utf8Path) -> io::Result<BTreeMap<String, String>> {
        let mut files = BTreeMap::new();
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.file_name() != TOOLS_DIR);

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.spec.binary_name.is_empty() && entry.file_name() == self.spec.binary_name.as_str() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let key = relative.to_string_lossy().replace('\\', "/");
            match fs::read_to_string(entry.path()) {
                Ok(content) => {
                    files.insert(key, content);
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!("Skipping non UTF-8 file {}", entry.path().display());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(files)
    }
}

/// Line diff of two texts, `-` for lines only in `old`, `+` for lines only in `new`
fn line_diff(old: &str, new: &str) -> String {
    let old: Vec<&str> = old.lines().collect();
    let new: Vec<&str> = new.lines().collect();

    let prefix = old
        .iter()
        .zip(&new)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let a = &old[prefix..old.len() - suffix];
    let b = &new[prefix..new.len() - suffix];

    let mut out = String::new();
    if a.len().saturating_mul(b.len()) > MAX_DIFF_CELLS {
        for line in a {
            out.push_str(&format!("-{}\n", line));
        }
        for line in b {
            out.push_str(&format!("+{}\n", line));
        }
        return out;
    }

    // longest common subsequence table, suffix based
    let mut lcs = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push_str(&format!("-{}\n", a[i]));
            i += 1;
        } else {
            out.push_str(&format!("+{}\n", b[j]));
            j += 1;
        }
    }
    for line in &a[i..] {
        out.push_str(&format!("-{}\n", line));
    }
    for line in &b[j..] {
        out.push_str(&format!("+{}\n", line));
    }
    out
}

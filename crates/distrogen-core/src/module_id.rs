//! Go module coordinates (`github.com/org/module v1.2.3`)

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// Tag used for modules without a version that are expected to be replaced
pub const PLACEHOLDER_TAG: &str = "v0.0.0";

/// A Go module ID, i.e. a module URL with an optional version tag.
///
/// Serialized as a single string. An empty tag is written as the bare url so
/// the value reads back unchanged; the `v0.0.0` placeholder only appears in
/// rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModuleId {
    pub url: String,
    pub tag: String,
    /// Render an empty tag as just the url (local paths, replace targets)
    pub allow_blank_tag: bool,
}

impl GoModuleId {
    pub fn new(url: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tag: tag.into(),
            allow_blank_tag: false,
        }
    }

    /// A module ID with no tag that renders as the bare url
    pub fn untagged(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tag: String::new(),
            allow_blank_tag: true,
        }
    }

    /// Parse `"<url> <tag>"` or `"<url>"`. Never fails; a malformed url
    /// surfaces when the module is used.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let (url, tag) = match trimmed.split_once(' ') {
            Some((url, rest)) => (url, rest.split_whitespace().next().unwrap_or_default()),
            None => (trimmed, ""),
        };
        Self::new(url, tag)
    }

    /// Copy of this ID with blank tags allowed
    pub fn with_blank_tag_allowed(&self) -> Self {
        Self {
            allow_blank_tag: true,
            ..self.clone()
        }
    }
}

impl fmt::Display for GoModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tag.is_empty() {
            return write!(f, "{} {}", self.url, self.tag);
        }
        if self.allow_blank_tag {
            return f.write_str(&self.url);
        }
        debug!(module = %self.url, "no tag detected for module, using {}", PLACEHOLDER_TAG);
        write!(f, "{} {}", self.url, PLACEHOLDER_TAG)
    }
}

impl FromStr for GoModuleId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for GoModuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.tag.is_empty() {
            return serializer.serialize_str(&self.url);
        }
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GoModuleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

//! # distrogen-generators
//!
//! File generation for distrogen:
//! - Embedded Tera template sets, with user templates layered on top
//! - Distribution generation into a scratch directory, promotion, and comparison
//! - Project, component, and tooling scaffolding

pub mod component;
pub mod distribution;
pub mod error;
pub mod internal;
pub mod project;
pub mod templates;

pub use component::ComponentGenerator;
pub use distribution::DistributionGenerator;
pub use error::{Error, FileDifference, FileDifferences, Result};
pub use internal::{DistrogenGenerator, InternalGenerator};
pub use project::{ComponentsRegistryGenerator, ProjectGenerator};
pub use templates::{TemplateContext, TemplateGroup, TemplateSet};

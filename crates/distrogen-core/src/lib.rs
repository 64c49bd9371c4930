//! # distrogen-core
//!
//! Core library for distrogen providing:
//! - Go module coordinates and the component registry
//! - Registry merging and stacking, release pinning, and component resolution
//!   with version tag selection
//! - The distribution spec (parsing, validation, diffing, querying)
//! - The manifest context templates render from

pub mod error;
pub mod manifest;
pub mod module_id;
pub mod otel_config;
pub mod registry;
pub mod spec;
pub mod yaml;

pub use error::{CollectionError, Error, Result};
pub use manifest::ManifestContext;
pub use module_id::GoModuleId;
pub use registry::{
    ComponentType, CustomRegistry, OcbManifestComponent, OtelVersions, Registry, RegistryEntry,
    RegistrySource, ReleaseInfo, ResolvedComponent,
};
pub use spec::{BuildContainer, ComponentReplace, DistributionComponents, DistributionSpec};

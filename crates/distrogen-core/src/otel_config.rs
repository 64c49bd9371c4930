//! Component names from an existing collector config
//!
//! A collector config names component instances (`otlp`, `otlp/internal`);
//! the component behind an instance is the part before the first `/`.

use std::collections::BTreeSet;

use camino::Utf8Path;
use serde_yaml_ng::{Mapping, Value};

use crate::error::{Error, Result};
use crate::spec::DistributionComponents;
use crate::yaml::read_yaml_file;

/// Load a collector config file and derive its component lists
pub fn load_components(path: &Utf8Path) -> Result<DistributionComponents> {
    let config: Mapping = read_yaml_file(path)?;
    components_from_config(&config)
}

/// Component lists used by a collector config, sorted and without repeats.
///
/// Absent sections yield empty lists. Providers never appear in a collector
/// config and stay empty.
pub fn components_from_config(config: &Mapping) -> Result<DistributionComponents> {
    Ok(DistributionComponents {
        receivers: read_section(config, "receivers")?,
        processors: read_section(config, "processors")?,
        exporters: read_section(config, "exporters")?,
        connectors: read_section(config, "connectors")?,
        extensions: read_section(config, "extensions")?,
        providers: Vec::new(),
    })
}

fn read_section(config: &Mapping, section: &str) -> Result<Vec<String>> {
    let section_map = match config.get(section) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Mapping(m)) => m,
        Some(_) => {
            return Err(Error::InvalidOtelConfigSection {
                section: section.to_string(),
            })
        }
    };

    let names: BTreeSet<String> = section_map
        .keys()
        .filter_map(Value::as_str)
        .map(component_name)
        .map(str::to_string)
        .collect();
    Ok(names.into_iter().collect())
}

fn component_name(instance: &str) -> &str {
    instance.split('/').next().unwrap_or(instance)
}

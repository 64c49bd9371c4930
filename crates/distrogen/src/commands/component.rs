//! Component scaffolding command

use anyhow::{Context, Result};
use camino::Utf8Path;

use distrogen_core::ComponentType;
use distrogen_generators::ComponentGenerator;

use super::load_spec;
use crate::cli::ComponentArgs;
use crate::output;

pub fn run(args: ComponentArgs) -> Result<()> {
    let spec = load_spec(&args.spec)?;
    let component_type: ComponentType = args.component_type.parse()?;

    let generator = ComponentGenerator::new(spec, component_type, &args.name)?;
    generator
        .generate(Utf8Path::new("."))
        .with_context(|| format!("Failed to generate {} {}", component_type, args.name))?;

    output::success(&format!("Created {} {}", component_type, args.name));
    output::kv("Path", generator.path().as_str());
    output::kv("Module", generator.module_url());
    Ok(())
}

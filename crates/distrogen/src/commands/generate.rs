//! Generate command

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use distrogen_generators::DistributionGenerator;

use super::load_spec;
use super::registries::load_registries;
use crate::cli::GenerateArgs;
use crate::output;

pub async fn run(args: GenerateArgs) -> Result<()> {
    let mut spec = load_spec(&args.spec)?;

    if let Some(otel_config) = &args.otel_config {
        spec.apply_otel_config(otel_config)
            .with_context(|| format!("Failed to read collector config {}", otel_config))?;
    }

    let registry = load_registries(&spec, &args.registries).await?;

    let working_dir = Utf8PathBuf::try_from(std::env::current_dir()?)
        .context("Working directory is not valid UTF-8")?;

    let mut generator = DistributionGenerator::new(spec, registry, working_dir, args.force)?;
    if let Some(templates) = args.templates {
        generator = generator.with_custom_templates(templates);
    }

    generator.generate()?;

    if args.compare {
        let result = generator.compare();
        generator.clean();
        result?;
        output::success(&format!(
            "{} matches the existing distribution",
            generator.spec().name
        ));
        return Ok(());
    }

    let destination = generator.promote()?;
    output::success(&format!("Generated {}", generator.spec().name));
    output::kv("Path", destination.as_str());
    Ok(())
}

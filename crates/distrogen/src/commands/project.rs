//! Project scaffolding command

use anyhow::Result;

use distrogen_generators::ProjectGenerator;

use super::load_spec;
use crate::cli::ProjectArgs;
use crate::output;

pub fn run(args: ProjectArgs) -> Result<()> {
    let spec = load_spec(&args.spec)?;
    let name = spec.name.clone();

    ProjectGenerator::new(spec, args.path.clone()).generate()?;

    output::success(&format!("Created project for {}", name));
    output::kv("Path", args.path.as_str());
    Ok(())
}

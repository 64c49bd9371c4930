//! Internal tools command

use anyhow::Result;
use camino::Utf8Path;

use distrogen_generators::InternalGenerator;

use super::load_spec;
use crate::cli::InternalArgs;
use crate::output;

pub fn run(args: InternalArgs) -> Result<()> {
    let spec = load_spec(&args.spec)?;
    let generator = InternalGenerator::new(spec, args.tools);
    generator.generate(Utf8Path::new("."))?;

    output::success(&format!("Pinned {} tools in internal/", generator.tools().len()));
    Ok(())
}

//! distrogen settings command

use anyhow::Result;
use camino::Utf8Path;

use distrogen_generators::DistrogenGenerator;

use super::load_spec;
use crate::cli::DistrogenArgs;
use crate::output;

pub fn run(args: DistrogenArgs) -> Result<()> {
    let spec = load_spec(&args.spec)?;
    let written = DistrogenGenerator::new(spec).generate(Utf8Path::new("."))?;

    output::success(&format!("Wrote {} files to .distrogen/", written.len()));
    Ok(())
}

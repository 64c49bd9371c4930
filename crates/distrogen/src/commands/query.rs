//! Query command

use anyhow::Result;

use super::load_spec;
use crate::cli::QueryArgs;

pub fn run(args: QueryArgs) -> Result<()> {
    let spec = load_spec(&args.spec)?;
    let value = spec.query(&args.field)?;

    // plain stdout, the value is usually piped
    println!("{}", value);
    Ok(())
}

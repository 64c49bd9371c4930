//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// distrogen - Generate custom OpenTelemetry Collector distributions
#[derive(Parser, Debug)]
#[command(name = "distrogen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a distribution from a spec
    Generate(GenerateArgs),

    /// Print a field of a spec
    Query(QueryArgs),

    /// Scaffold a new distrogen project
    Project(ProjectArgs),

    /// Scaffold a new component and register it
    Component(ComponentArgs),

    /// Render pinned Go tools into internal/
    Internal(InternalArgs),

    /// Render distrogen settings into .distrogen/
    Distrogen(DistrogenArgs),

    /// Print module@version for collector modules read from stdin
    #[command(name = "otel-component-versions", alias = "otel_component_versions")]
    OtelComponentVersions(OtelComponentVersionsArgs),
}

/// Spec file shared by every spec driven command
#[derive(Args, Debug, Clone)]
pub struct SpecArg {
    /// The distribution specification to use
    #[arg(long)]
    pub spec: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub spec: SpecArg,

    /// Generate even if the spec matches the previous generation
    #[arg(short, long)]
    pub force: bool,

    /// Additional registry files, merged in order over the built-in registry
    /// and the registries listed in the spec
    #[arg(long = "registry", value_delimiter = ',')]
    pub registries: Vec<Utf8PathBuf>,

    /// Take the component lists from an existing collector config
    #[arg(long = "otel-config", alias = "otel_config")]
    pub otel_config: Option<Utf8PathBuf>,

    /// Directory of custom templates
    #[arg(long)]
    pub templates: Option<Utf8PathBuf>,

    /// Compare the generation with the existing distribution instead of replacing it
    #[arg(long)]
    pub compare: bool,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub spec: SpecArg,

    /// Field to query from the spec
    #[arg(long)]
    pub field: String,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub spec: SpecArg,

    /// Directory to generate the project in
    #[arg(long, default_value = ".")]
    pub path: Utf8PathBuf,
}

#[derive(Args, Debug)]
pub struct ComponentArgs {
    #[command(flatten)]
    pub spec: SpecArg,

    /// Component type (receiver, processor, exporter, connector, extension, provider)
    #[arg(long = "type")]
    pub component_type: String,

    /// Component name
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct InternalArgs {
    #[command(flatten)]
    pub spec: SpecArg,

    /// Go tool to pin, as module@version (repeatable)
    #[arg(long = "tool", value_delimiter = ',')]
    pub tools: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DistrogenArgs {
    #[command(flatten)]
    pub spec: SpecArg,
}

#[derive(Args, Debug)]
pub struct OtelComponentVersionsArgs {
    /// Collector release tag to fetch module versions for
    #[arg(long = "otel-version", alias = "otel_version")]
    pub otel_version: String,
}

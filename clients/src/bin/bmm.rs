//! `bmm`: converts a battery parameter file between BPX, BattMo and cidemod,
//! or exports it as JSON-LD.
//!
//! **Outputs:**
//! - `<output-file>`: the converted document or JSON-LD graph
//! - `<missing-values-out>`: input values the ontology does not map (JSON-LD only)
//!
//! **Usage:**
//! ```text
//! bmm --input-file <path> --input-type <bpx|cidemod|battmo.m|battmo.jl>
//!     [--output-file <path>] [--output-type <jsonld|bpx|cidemod|battmo.m|battmo.jl>]
//!     [--ontology-ref <path>] [--template-ref <path>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use battery_model_mapper::pipeline::{run, OutputKind, RunConfig};
use battery_model_mapper::Format;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Battery Model Mapper CLI.
#[derive(Parser)]
#[command(name = "bmm", about = "Convert battery parameter sets using the battery ontology")]
struct Args {
    /// Input parameter file.
    #[arg(long)]
    input_file: PathBuf,

    /// Input format: bpx, cidemod, battmo.m or battmo.jl.
    #[arg(long)]
    input_type: String,

    /// Output file.
    #[arg(long, default_value = "output.jsonld")]
    output_file: PathBuf,

    /// Output type: jsonld or one of the input formats.
    #[arg(long, default_value = "jsonld")]
    output_type: String,

    /// Cell `@id` for JSON-LD output.
    #[arg(long, default_value = "Cell ID")]
    cell_id: String,

    /// Cell `@type` for JSON-LD output.
    #[arg(long, default_value = "Pouch")]
    cell_type: String,

    /// Turtle ontology file.
    #[arg(long, default_value = "assets/battery-model-lithium-ion.ttl")]
    ontology_ref: PathBuf,

    /// Template for the output document.
    #[arg(long, default_value = "assets/bpx_template.json")]
    template_ref: PathBuf,

    /// Where unmapped input values are listed after a JSON-LD export.
    #[arg(long, default_value = "missing_values.json")]
    missing_values_out: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let input_format = Format::from_id(&args.input_type)
        .with_context(|| format!("Invalid input type: {}", args.input_type))?;
    let output = OutputKind::from_id(&args.output_type)
        .with_context(|| format!("Invalid output type: {}", args.output_type))?;

    let config = RunConfig {
        input_file: args.input_file,
        input_format,
        output_file: args.output_file,
        output,
        cell_id: args.cell_id,
        cell_type: args.cell_type,
        ontology: args.ontology_ref,
        template: args.template_ref,
        missing_values_out: args.missing_values_out,
    };
    tracing::debug!(?config, "resolved run configuration");

    let summary = run(&config)?;

    println!(
        "{} -> {}: {} mapped, {} written, {} defaults kept, {} warnings",
        args.input_type,
        args.output_type,
        summary.mapped,
        summary.written,
        summary.defaults_used,
        summary.warnings
    );
    println!("  Written: {}", config.output_file.display());
    if output == OutputKind::JsonLd {
        println!(
            "  Written: {} ({} missing values)",
            config.missing_values_out.display(),
            summary.missing
        );
    }
    Ok(())
}

//! End-to-end conversion of files: load, preprocess, translate or export,
//! write.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::MapperError;
use crate::format::Format;
use crate::jsonld;
use crate::mapping::MappingIndex;
use crate::ontology::OntologyGraph;
use crate::preprocess::preprocess;
use crate::translate::{strip_validation, translate};

/// The output type that selects JSON-LD export instead of translation.
pub const JSONLD_OUTPUT: &str = "jsonld";

/// Destination of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// JSON-LD graph plus missing-value list.
    JsonLd,
    /// A document in another parameter format.
    Format(Format),
}

impl OutputKind {
    /// Resolves an output type identifier (`jsonld` or a format id).
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::UnknownFormat`] for any other identifier.
    pub fn from_id(id: &str) -> Result<Self, MapperError> {
        if id == JSONLD_OUTPUT {
            Ok(Self::JsonLd)
        } else {
            Format::from_id(id).map(Self::Format)
        }
    }
}

/// Everything one conversion needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The input parameter file.
    pub input_file: PathBuf,
    /// Format of the input file.
    pub input_format: Format,
    /// Where the result is written.
    pub output_file: PathBuf,
    /// What to produce.
    pub output: OutputKind,
    /// `@id` of the exported cell.
    pub cell_id: String,
    /// `@type` of the exported cell.
    pub cell_type: String,
    /// The Turtle ontology.
    pub ontology: PathBuf,
    /// Template for translated output.
    pub template: PathBuf,
    /// Where the missing-value list of a JSON-LD export is written.
    pub missing_values_out: PathBuf,
}

/// Counts reported after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Mapping entries (translation) or property nodes (JSON-LD).
    pub mapped: usize,
    /// Values written into the output template.
    pub written: usize,
    /// Template paths left at their default.
    pub defaults_used: usize,
    /// Input leaves the ontology does not map (JSON-LD only).
    pub missing: usize,
    /// Warnings recorded along the way.
    pub warnings: usize,
}

/// Runs one conversion described by `config`.
///
/// # Errors
///
/// Fails if the ontology, input or template cannot be read or parsed, or if
/// an output file cannot be written. Per-field problems are only counted in
/// [`RunSummary::warnings`].
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let graph = OntologyGraph::load(&config.ontology)?;
    let mut input = load_json(&config.input_file)?;
    let mut warnings = preprocess(config.input_format, &mut input).warning_count();

    let summary = match config.output {
        OutputKind::JsonLd => {
            let export = jsonld::export_for(
                &graph,
                config.input_format,
                &input,
                &config.cell_id,
                &config.cell_type,
            );
            write_json(&config.output_file, &export.document)?;
            let missing: Vec<String> = export.audit.missing_strings();
            write_json(&config.missing_values_out, &Value::from(missing))?;
            warnings += export.diagnostics.warning_count();
            RunSummary {
                mapped: export.properties().len(),
                written: 0,
                defaults_used: 0,
                missing: export.audit.missing.len(),
                warnings,
            }
        }
        OutputKind::Format(output) => {
            let index = MappingIndex::build_for(&graph, config.input_format, output);
            let mut template = load_json(&config.template)?;
            strip_validation(&mut template);
            let source = config.input_file.display().to_string();
            let translation = translate(&index, &template, &input, &source);
            write_json(&config.output_file, &translation.document)?;
            warnings += index.diagnostics().warning_count() + translation.diagnostics.warning_count();
            RunSummary {
                mapped: index.len(),
                written: translation.written,
                defaults_used: translation.defaults_used.len(),
                missing: 0,
                warnings,
            }
        }
    };
    tracing::info!(
        output = %config.output_file.display(),
        mapped = summary.mapped,
        warnings = summary.warnings,
        "conversion finished"
    );
    Ok(summary)
}

/// Reads and parses a JSON file.
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid JSON.
pub fn load_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .map_err(|source| MapperError::Io {
            path: path.to_path_buf(),
            source,
        })
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .map_err(MapperError::from)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Fails if the directory or file cannot be written.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, text + "\n").with_context(|| format!("Failed to write {}", path.display()))
}

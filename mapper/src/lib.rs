//! Ontology-driven conversion of battery cell parameter sets.
//!
//! The `battery-model-mapper` crate reads an EMMO-based battery ontology in
//! which every physical quantity is annotated, per parameter format, with the
//! JSON path where that quantity is stored. From those annotations it builds
//! path-to-path mapping indices and uses them to translate documents between
//! BPX, BattMo (`battmo.m` / `battmo.jl`) and cidemod, or to export a document
//! as a JSON-LD graph.
//!
//! # Entry Point
//!
//! ```no_run
//! use battery_model_mapper::{translate, MappingIndex, OntologyGraph};
//!
//! # fn main() -> Result<(), battery_model_mapper::MapperError> {
//! let graph = OntologyGraph::load("assets/battery-model-lithium-ion.ttl")?;
//! let index = MappingIndex::build(&graph, "bpx", "battmo.m")?;
//! let template = serde_json::json!({});
//! let input = serde_json::json!({"Parameterisation": {}});
//! let translation = translate(&index, &template, &input, "input.json");
//! println!("{}", translation.document);
//! # Ok(())
//! # }
//! ```
//!
//! # JSON-LD
//!
//! ```no_run
//! # fn main() -> Result<(), battery_model_mapper::MapperError> {
//! # let graph = battery_model_mapper::OntologyGraph::from_turtle("")?;
//! # let input = serde_json::json!({});
//! let export = battery_model_mapper::jsonld::export(&graph, "bpx", &input, "Cell ID", "Pouch")?;
//! println!("{} missing values", export.audit.missing.len());
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod audit;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod jsonld;
pub mod mapping;
pub mod ontology;
pub mod path;
pub mod pipeline;
pub mod preprocess;
pub mod translate;

pub use audit::MissingValueAudit;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{MapperError, PathError};
pub use format::Format;
pub use mapping::MappingIndex;
pub use ontology::{Node, OntologyGraph, PrefixMap};
pub use path::{PathComponent, PathExpression};
pub use translate::{translate, FunctionValue, Translation};

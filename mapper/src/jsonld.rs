//! JSON-LD export of a parameter document.
//!
//! Every ontology subject annotated for the input format whose value is
//! present in the document becomes one property node under a fixed
//! `@graph` envelope:
//!
//! ```json
//! {
//!   "@context": "https://w3id.org/emmo/domain/battery/context",
//!   "@graph": { "@id": "Cell ID", "@type": "Pouch", "hasProperty": [ ... ] }
//! }
//! ```

use std::collections::BTreeSet;

use serde_json::{json, Map, Number, Value};

use crate::audit::MissingValueAudit;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::MapperError;
use crate::format::Format;
use crate::mapping::annotations;
use crate::ontology::{Node, OntologyGraph};

/// The fixed `@context` of every exported document.
pub const CONTEXT: &str = "https://w3id.org/emmo/domain/battery/context";

/// Local names of unit predicates, in lookup order.
pub const UNIT_PREDICATES: &[&str] = &["hasMeasurementUnit", "hasUnit", "unit"];

/// An exported document together with its missing-value audit.
#[derive(Debug, Clone)]
pub struct JsonLdExport {
    /// The JSON-LD document.
    pub document: Value,
    /// Leaves of the input the ontology does not map.
    pub audit: MissingValueAudit,
    /// Problems found while scanning the ontology.
    pub diagnostics: Diagnostics,
}

impl JsonLdExport {
    /// The property nodes under `@graph.hasProperty`.
    #[must_use]
    pub fn properties(&self) -> &[Value] {
        self.document["@graph"]["hasProperty"]
            .as_array()
            .map_or(&[], Vec::as_slice)
    }
}

/// Exports `input`, a document in the format named `input_format`, as a
/// JSON-LD graph with the given cell `@id` and `@type`.
///
/// # Errors
///
/// Returns [`MapperError::UnknownFormat`] if `input_format` is not a known
/// format identifier.
pub fn export(
    graph: &OntologyGraph,
    input_format: &str,
    input: &Value,
    cell_id: &str,
    cell_type: &str,
) -> Result<JsonLdExport, MapperError> {
    let format = Format::from_id(input_format)?;
    Ok(export_for(graph, format, input, cell_id, cell_type))
}

/// Same as [`export`] for an already resolved format.
#[must_use]
pub fn export_for(
    graph: &OntologyGraph,
    format: Format,
    input: &Value,
    cell_id: &str,
    cell_type: &str,
) -> JsonLdExport {
    let mut diagnostics = Diagnostics::new();
    let mut declared = BTreeSet::new();
    let mut properties = Vec::new();

    for subject in graph.subjects() {
        let Some(path) = annotations(graph, subject, format, format, &mut diagnostics).input else {
            continue;
        };
        if let Some(value) = path.get(input).filter(|v| !v.is_null()) {
            properties.push(property_node(graph, subject, value));
        }
        declared.insert(path);
    }

    let audit = MissingValueAudit::compare(&declared, input);
    diagnostics.push(Diagnostic::info(
        "export",
        format!(
            "{} property nodes; {} of {} leaf values unmapped",
            properties.len(),
            audit.missing.len(),
            audit.leaf_paths.len()
        ),
    ));

    let document = json!({
        "@context": CONTEXT,
        "@graph": {
            "@id": cell_id,
            "@type": cell_type,
            "hasProperty": properties,
        },
    });
    JsonLdExport {
        document,
        audit,
        diagnostics,
    }
}

fn property_node(graph: &OntologyGraph, subject: &Node, value: &Value) -> Value {
    let mut node = Map::new();
    node.insert("@type".to_owned(), json!(graph.compact(subject)));
    node.insert("rdfs:label".to_owned(), json!(graph.preferred_label(subject)));
    match numerical_value(value) {
        Some(number) => {
            node.insert(
                "hasNumericalPart".to_owned(),
                json!({"@type": "Real", "hasNumericalValue": number}),
            );
        }
        None => {
            node.insert(
                "hasStringPart".to_owned(),
                json!({"@type": "String", "hasStringValue": string_value(value)}),
            );
        }
    }
    if let Some(unit) = graph.first_object_by_local_name(subject, UNIT_PREDICATES) {
        node.insert("emmo:hasMeasurementUnit".to_owned(), json!(graph.compact(unit)));
    }
    Value::Object(node)
}

/// The value as a finite floating-point number, for numbers and numeric text.
fn numerical_value(value: &Value) -> Option<Number> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Number::from_f64(number)
}

fn string_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("functionname").or_else(|| map.get("functionName")) {
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}

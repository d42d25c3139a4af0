//! Ontology mapping index: `input path → output path` for a format pair.
//!
//! Every subject carrying a path annotation for both the input and the
//! output format contributes one entry. The index for `(A, B)` is built by
//! its own scan of the graph and is not derived from the `(B, A)` index, so
//! asymmetric annotations show up as entries missing in one direction only.

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::MapperError;
use crate::format::Format;
use crate::ontology::{Node, OntologyGraph};
use crate::path::PathExpression;

/// The path annotations one subject carries for a format pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSubject<'g> {
    /// The ontology subject.
    pub subject: &'g Node,
    /// Path in the input format, if annotated and well formed.
    pub input: Option<PathExpression>,
    /// Path in the output format, if annotated and well formed.
    pub output: Option<PathExpression>,
}

/// Scans one subject for the input and output annotation predicates.
///
/// When both formats share a predicate, the same path fills both sides.
/// Only the first well-formed value per side is used.
pub fn annotations<'g>(
    graph: &'g OntologyGraph,
    subject: &'g Node,
    input: Format,
    output: Format,
    diagnostics: &mut Diagnostics,
) -> AnnotatedSubject<'g> {
    let mut found = AnnotatedSubject {
        subject,
        input: None,
        output: None,
    };
    for (predicate, object) in graph.predicate_objects(subject) {
        let Some(predicate) = predicate.as_iri() else {
            continue;
        };
        let is_input = predicate == input.annotation_iri();
        let is_output = predicate == output.annotation_iri();
        if !is_input && !is_output {
            continue;
        }
        let path = PathExpression::parse_lenient(object.text(), diagnostics);
        if path.is_empty() {
            continue;
        }
        if is_input && found.input.is_none() {
            found.input = Some(path.clone());
        }
        if is_output && found.output.is_none() {
            found.output = Some(path);
        }
    }
    found
}

/// Directed `input path → output path` mapping for one format pair.
#[derive(Debug, Clone)]
pub struct MappingIndex {
    input: Format,
    output: Format,
    entries: BTreeMap<PathExpression, PathExpression>,
    diagnostics: Diagnostics,
}

impl MappingIndex {
    /// Builds the index for the formats named `input` and `output`.
    ///
    /// Subjects are visited in sorted order; when two subjects declare the
    /// same input path, the first one keeps it and the other is reported.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::UnknownFormat`] if either identifier is not in
    /// the format table.
    pub fn build(graph: &OntologyGraph, input: &str, output: &str) -> Result<Self, MapperError> {
        let input = Format::from_id(input)?;
        let output = Format::from_id(output)?;
        Ok(Self::build_for(graph, input, output))
    }

    /// Builds the index for an already resolved format pair.
    #[must_use]
    pub fn build_for(graph: &OntologyGraph, input: Format, output: Format) -> Self {
        let mut diagnostics = Diagnostics::new();
        let mut entries = BTreeMap::new();
        let mut owners: BTreeMap<PathExpression, &Node> = BTreeMap::new();

        for subject in graph.subjects() {
            let found = annotations(graph, subject, input, output, &mut diagnostics);
            let (Some(from), Some(to)) = (found.input, found.output) else {
                continue;
            };
            match entries.entry(from.clone()) {
                Entry::Vacant(slot) => {
                    tracing::debug!(%input, %output, from = %from, to = %to, "mapping added");
                    owners.insert(from, subject);
                    slot.insert(to);
                }
                Entry::Occupied(_) => {
                    let owner = owners.get(&from).map_or_else(String::new, |s| graph.compact(s));
                    diagnostics.push(Diagnostic::warn_with_details(
                        "mapping",
                        format!("duplicate {input} path {from}; keeping the mapping of {owner}"),
                        vec![format!("ignored subject {}", graph.compact(subject))],
                    ));
                }
            }
        }

        diagnostics.push(Diagnostic::info(
            "mapping",
            format!("{} mappings from {input} to {output}", entries.len()),
        ));
        Self {
            input,
            output,
            entries,
            diagnostics,
        }
    }

    /// Source format.
    #[must_use]
    pub fn input_format(&self) -> Format {
        self.input
    }

    /// Destination format.
    #[must_use]
    pub fn output_format(&self) -> Format {
        self.output
    }

    /// The output path for `input`, if mapped.
    #[must_use]
    pub fn get(&self, input: &PathExpression) -> Option<&PathExpression> {
        self.entries.get(input)
    }

    /// Iterates over `(input, output)` entries in input-path order.
    pub fn iter(&self) -> btree_map::Iter<'_, PathExpression, PathExpression> {
        self.entries.iter()
    }

    /// The mapped input paths.
    pub fn input_paths(&self) -> btree_map::Keys<'_, PathExpression, PathExpression> {
        self.entries.keys()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no subject is annotated for both formats.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics recorded while scanning the graph.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

impl<'a> IntoIterator for &'a MappingIndex {
    type Item = (&'a PathExpression, &'a PathExpression);
    type IntoIter = btree_map::Iter<'a, PathExpression, PathExpression>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

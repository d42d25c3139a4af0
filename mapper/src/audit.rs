//! Missing-value audit: which values of a document the ontology does not
//! account for.
//!
//! A leaf is mapped when one of the format's declared paths is the leaf
//! itself or one of its ancestors (a declared function object covers its
//! fields). Every other leaf is missing. The two sets partition the leaves.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::format::Format;
use crate::mapping::annotations;
use crate::ontology::OntologyGraph;
use crate::path::{PathComponent, PathExpression};

/// Result of comparing a document's leaves against the declared paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingValueAudit {
    /// Every leaf path of the document.
    pub leaf_paths: BTreeSet<PathExpression>,
    /// Every path the ontology declares for the format.
    pub declared: BTreeSet<PathExpression>,
    /// Leaves covered by a declared path.
    pub mapped: BTreeSet<PathExpression>,
    /// Leaves with no declared path.
    pub missing: BTreeSet<PathExpression>,
}

impl MissingValueAudit {
    /// Compares the leaves of `document` with `declared`.
    pub fn compare<'p, I>(declared: I, document: &Value) -> Self
    where
        I: IntoIterator<Item = &'p PathExpression>,
    {
        let declared: BTreeSet<PathExpression> = declared.into_iter().cloned().collect();
        let leaf_paths = leaf_paths(document);
        let (mapped, missing) = leaf_paths
            .iter()
            .cloned()
            .partition(|leaf| is_covered(leaf, &declared));
        Self {
            leaf_paths,
            declared,
            mapped,
            missing,
        }
    }

    /// Missing leaves rendered as dotted paths, e.g. `Cell.Mass [kg]`.
    #[must_use]
    pub fn missing_strings(&self) -> Vec<String> {
        self.missing.iter().map(ToString::to_string).collect()
    }
}

/// Every path the ontology declares for `format`, whether or not another
/// format is also annotated.
pub fn declared_paths(
    graph: &OntologyGraph,
    format: Format,
    diagnostics: &mut Diagnostics,
) -> BTreeSet<PathExpression> {
    graph
        .subjects()
        .filter_map(|subject| annotations(graph, subject, format, format, diagnostics).input)
        .collect()
}

/// Audits `document` against the paths declared for `format`.
pub fn find_missing_values(
    graph: &OntologyGraph,
    format: Format,
    document: &Value,
    diagnostics: &mut Diagnostics,
) -> MissingValueAudit {
    let declared = declared_paths(graph, format, diagnostics);
    MissingValueAudit::compare(&declared, document)
}

/// Every path to a scalar (including `null`) in `document`. Empty objects and
/// arrays have no leaves.
#[must_use]
pub fn leaf_paths(document: &Value) -> BTreeSet<PathExpression> {
    let mut leaves = BTreeSet::new();
    collect_leaves(document, PathExpression::default(), &mut leaves);
    leaves
}

fn collect_leaves(node: &Value, prefix: PathExpression, leaves: &mut BTreeSet<PathExpression>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                collect_leaves(value, prefix.child(PathComponent::Key(key.clone())), leaves);
            }
        }
        Value::Array(items) => {
            for (i, value) in items.iter().enumerate() {
                collect_leaves(value, prefix.child(PathComponent::Index(i)), leaves);
            }
        }
        _ => {
            leaves.insert(prefix);
        }
    }
}

fn is_covered(leaf: &PathExpression, declared: &BTreeSet<PathExpression>) -> bool {
    (0..=leaf.len()).any(|n| {
        let ancestor: PathExpression = leaf.components()[..n].iter().cloned().collect();
        !ancestor.is_empty() && declared.contains(&ancestor)
    })
}

//! Immutable in-memory view of the battery ontology.
//!
//! The graph is loaded once (see [`OntologyGraph::from_turtle`]) and only
//! read afterwards. Triples are grouped by subject, and subjects iterate in
//! sorted order so every index built from the graph is deterministic.

mod prefix;
mod turtle;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use crate::error::MapperError;

pub use prefix::PrefixMap;

/// `skos:prefLabel`.
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
/// `rdfs:label`.
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// An RDF term as stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// An IRI.
    Iri(String),
    /// A blank node label.
    Blank(String),
    /// The lexical form of a literal.
    Literal(String),
}

impl Node {
    /// Shorthand for an IRI node.
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    /// Shorthand for a literal node.
    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal(value.into())
    }

    /// The IRI, if this node is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The text of the node: IRI, blank node label or literal value.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Node::Iri(s) | Node::Blank(s) | Node::Literal(s) => s,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Blank(id) => write!(f, "_:{id}"),
            Node::Literal(value) => write!(f, "{value:?}"),
        }
    }
}

/// Returns the part of an IRI after the last `#` or `/`.
#[must_use]
pub fn local_name(iri: &str) -> &str {
    let tail = iri.rsplit('#').next().unwrap_or(iri);
    tail.rsplit('/').next().unwrap_or(tail)
}

/// A read-only ontology graph.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    subjects: BTreeMap<Node, Vec<(Node, Node)>>,
    by_local_name: HashMap<String, Vec<String>>,
    prefixes: PrefixMap,
    triple_count: usize,
}

impl OntologyGraph {
    /// Parses a Turtle document.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::Turtle`] if the document is not valid Turtle.
    pub fn from_turtle(text: &str) -> Result<Self, MapperError> {
        turtle::parse(text)
    }

    /// Reads and parses a local Turtle file.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::RemoteOntology`] for `http(s)://` references,
    /// [`MapperError::Io`] if the file cannot be read, and
    /// [`MapperError::Turtle`] if it cannot be parsed.
    pub fn load(reference: impl AsRef<Path>) -> Result<Self, MapperError> {
        let path = reference.as_ref();
        let text = path.to_string_lossy();
        if text.starts_with("http://") || text.starts_with("https://") {
            return Err(MapperError::RemoteOntology(text.into_owned()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| MapperError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let graph = Self::from_turtle(&content)?;
        tracing::info!(
            path = %path.display(),
            triples = graph.len(),
            subjects = graph.subject_count(),
            "loaded ontology"
        );
        Ok(graph)
    }

    /// Builds a graph from triples and a prefix table.
    pub fn from_triples<I>(prefixes: PrefixMap, triples: I) -> Self
    where
        I: IntoIterator<Item = (Node, Node, Node)>,
    {
        let mut graph = Self {
            prefixes,
            ..Self::default()
        };
        for (s, p, o) in triples {
            graph.insert(s, p, o);
        }
        graph
    }

    fn insert(&mut self, subject: Node, predicate: Node, object: Node) {
        if let Node::Iri(iri) = &predicate {
            let known = self.by_local_name.entry(local_name(iri).to_owned()).or_default();
            if !known.contains(iri) {
                known.push(iri.clone());
            }
        }
        self.subjects
            .entry(subject)
            .or_default()
            .push((predicate, object));
        self.triple_count += 1;
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triple_count
    }

    /// Returns true if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triple_count == 0
    }

    /// Number of distinct subjects.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// The prefix table used for compact identifiers.
    #[must_use]
    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Every distinct subject, in sorted order.
    pub fn subjects(&self) -> impl Iterator<Item = &Node> {
        self.subjects.keys()
    }

    /// Every `(predicate, object)` pair of `subject`, in document order.
    pub fn predicate_objects(&self, subject: &Node) -> impl Iterator<Item = &(Node, Node)> {
        self.subjects.get(subject).into_iter().flatten()
    }

    /// The objects of `subject` for the predicate IRI `predicate`.
    pub fn objects<'a>(
        &'a self,
        subject: &Node,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.subjects
            .get(subject)
            .into_iter()
            .flatten()
            .filter(move |(p, _)| p.as_iri() == Some(predicate))
            .map(|(_, o)| o)
    }

    /// Every distinct predicate IRI.
    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.by_local_name.values().flatten().map(String::as_str)
    }

    /// Predicate IRIs whose local name is `name`.
    #[must_use]
    pub fn predicates_with_local_name(&self, name: &str) -> &[String] {
        self.by_local_name.get(name).map_or(&[], Vec::as_slice)
    }

    /// The compact (prefixed) identifier of a term.
    ///
    /// IRIs without a matching prefix render as `<iri>`, blank nodes as
    /// `_:id`, literals as their value.
    #[must_use]
    pub fn compact(&self, node: &Node) -> String {
        match node {
            Node::Iri(iri) => self.prefixes.compact(iri),
            Node::Blank(id) => format!("_:{id}"),
            Node::Literal(value) => value.clone(),
        }
    }

    /// The preferred label of a term: `skos:prefLabel`, then `rdfs:label`,
    /// then its compact identifier.
    #[must_use]
    pub fn preferred_label(&self, node: &Node) -> String {
        self.objects(node, SKOS_PREF_LABEL)
            .chain(self.objects(node, RDFS_LABEL))
            .next()
            .map_or_else(|| self.compact(node), |label| label.text().to_owned())
    }

    /// The first object of `subject` reached through a predicate with one of
    /// the given local names, trying the names in order.
    #[must_use]
    pub fn first_object_by_local_name(&self, subject: &Node, names: &[&str]) -> Option<&Node> {
        names.iter().find_map(|name| {
            self.predicates_with_local_name(name)
                .iter()
                .find_map(|predicate| self.objects(subject, predicate).next())
        })
    }
}

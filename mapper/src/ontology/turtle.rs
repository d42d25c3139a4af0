//! Turtle loading through `sophia`.

use std::collections::BTreeMap;

use sophia_api::source::TripleSource;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple;
use sophia_turtle::parser::turtle;

use super::{Node, OntologyGraph, PrefixMap};
use crate::error::MapperError;

pub(super) fn parse(text: &str) -> Result<OntologyGraph, MapperError> {
    let text = text.replace("\r\n", "\n");
    let mut triples = Vec::new();
    let mut skipped = 0usize;
    let mut source = turtle::parse_str(&text);
    source
        .for_each_triple(|t| match (to_node(t.s()), to_node(t.p()), to_node(t.o())) {
            (Some(s), Some(p), Some(o)) => triples.push((s, p, o)),
            _ => skipped += 1,
        })
        .map_err(|e| MapperError::Turtle(e.to_string()))?;
    if skipped > 0 {
        tracing::debug!(skipped, "ignored triples with unsupported terms");
    }
    // The parser keeps the last binding of each prefix.
    let declared: BTreeMap<&str, &str> = source
        .0
        .prefixes()
        .iter()
        .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
        .collect();
    let mut prefixes = PrefixMap::default();
    for (prefix, namespace) in declared {
        prefixes.insert(prefix, namespace);
    }
    Ok(OntologyGraph::from_triples(prefixes, triples))
}

fn to_node<T: Term>(term: T) -> Option<Node> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Node::Iri(iri.as_str().to_owned())),
        TermKind::BlankNode => term.bnode_id().map(|id| Node::Blank(id.as_str().to_owned())),
        TermKind::Literal => term.lexical_form().map(|lex| Node::Literal(String::from(&*lex))),
        _ => None,
    }
}

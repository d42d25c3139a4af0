//! Prefix table for compact identifiers.

const STANDARD_PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
];

/// Ordered `prefix → namespace` table.
///
/// The default table holds the `rdf`, `rdfs`, `owl`, `xsd` and `skos`
/// prefixes. Bindings read from a document override them.
#[derive(Debug, Clone)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self {
            entries: STANDARD_PREFIXES
                .iter()
                .map(|(p, ns)| ((*p).to_owned(), (*ns).to_owned()))
                .collect(),
        }
    }
}

impl PrefixMap {
    /// Binds `prefix` to `namespace`, replacing an earlier binding of the
    /// same prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        let namespace = namespace.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = namespace,
            None => self.entries.push((prefix, namespace)),
        }
    }

    /// The namespace bound to `prefix`.
    #[must_use]
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| ns.as_str())
    }

    /// Compacts `iri` with the longest matching namespace, or renders it as
    /// `<iri>` when no namespace leaves a simple local name.
    #[must_use]
    pub fn compact(&self, iri: &str) -> String {
        self.entries
            .iter()
            .filter_map(|(prefix, ns)| {
                let local = iri.strip_prefix(ns.as_str())?;
                let simple = !local.is_empty() && !local.contains(['/', '#']);
                simple.then_some((prefix, ns.len(), local))
            })
            .max_by_key(|(_, ns_len, _)| *ns_len)
            .map_or_else(|| format!("<{iri}>"), |(prefix, _, local)| format!("{prefix}:{local}"))
    }

    /// Iterates over `(prefix, namespace)` bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_namespace_wins() {
        let mut map = PrefixMap::default();
        map.insert("emmo", "https://w3id.org/emmo#");
        map.insert("w3id", "https://w3id.org/");
        map.insert("battery", "https://w3id.org/emmo/domain/battery#");
        assert_eq!(
            map.compact("https://w3id.org/emmo/domain/battery#battery_1234"),
            "battery:battery_1234"
        );
        assert_eq!(map.compact("https://w3id.org/emmo#Metre"), "emmo:Metre");
    }

    #[test]
    fn unmatched_or_nested_iris_stay_bracketed() {
        let mut map = PrefixMap::default();
        map.insert("w3id", "https://w3id.org/");
        assert_eq!(
            map.compact("https://w3id.org/emmo/domain/battery#x"),
            "<https://w3id.org/emmo/domain/battery#x>"
        );
        assert_eq!(map.compact("urn:x"), "<urn:x>");
    }
}

//! Loading the fixture ontology from disk.

mod common;

use battery_model_mapper::audit::declared_paths;
use battery_model_mapper::{Diagnostics, Format, Node};
use common::ontology;

#[test]
fn fixture_loads_with_prefixes_and_labels() {
    let graph = ontology();
    assert!(graph.len() > 50);
    let thickness = Node::iri("https://w3id.org/emmo/domain/battery#SeparatorThickness");
    assert_eq!(graph.compact(&thickness), "battery:SeparatorThickness");
    assert_eq!(graph.preferred_label(&thickness), "SeparatorThickness");
    assert_eq!(
        graph
            .first_object_by_local_name(&thickness, &["hasMeasurementUnit", "hasUnit", "unit"])
            .map(|unit| graph.compact(unit)),
        Some("emmo:Metre".to_owned())
    );
    assert_eq!(
        graph.prefixes().namespace("bmli"),
        Some("https://w3id.org/emmo/domain/battery-model-lithium-ion#")
    );
}

#[test]
fn declared_paths_per_format() {
    let graph = ontology();
    let mut diagnostics = Diagnostics::new();
    assert_eq!(declared_paths(&graph, Format::Bpx, &mut diagnostics).len(), 20);
    assert_eq!(declared_paths(&graph, Format::BattmoM, &mut diagnostics).len(), 20);
    assert_eq!(declared_paths(&graph, Format::Cidemod, &mut diagnostics).len(), 4);
    assert_eq!(diagnostics.warning_count(), 1);
}

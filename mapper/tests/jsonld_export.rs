//! JSON-LD export of the sample inputs.

mod common;

use battery_model_mapper::jsonld::{self, JsonLdExport, CONTEXT};
use battery_model_mapper::{Format, MapperError};
use common::{input, ontology};
use serde_json::{json, Value};

fn export(name: &str, format: Format) -> JsonLdExport {
    jsonld::export_for(&ontology(), format, &input(name, format), "TestCell", "PouchCell")
}

fn property<'a>(export: &'a JsonLdExport, ty: &str) -> &'a Value {
    export
        .properties()
        .iter()
        .find(|p| p["@type"] == json!(ty))
        .unwrap_or(&Value::Null)
}

#[test]
fn envelope_carries_context_and_cell_identity() {
    let export = export("sample_bpx.json", Format::Bpx);
    assert_eq!(export.document["@context"], json!(CONTEXT));
    assert_eq!(export.document["@graph"]["@id"], json!("TestCell"));
    assert_eq!(export.document["@graph"]["@type"], json!("PouchCell"));
    assert_eq!(export.properties().len(), 20);
}

#[test]
fn numeric_values_are_real_parts() {
    let export = export("sample_bpx.json", Format::Bpx);
    let separator = property(&export, "battery:SeparatorThickness");
    assert_eq!(
        separator["hasNumericalPart"],
        json!({"@type": "Real", "hasNumericalValue": 2e-05})
    );
    assert_eq!(separator["rdfs:label"], json!("SeparatorThickness"));
    assert_eq!(separator["emmo:hasMeasurementUnit"], json!("emmo:Metre"));
    assert!(separator.get("hasStringPart").is_none());

    let porosity = property(&export, "battery:SeparatorPorosity");
    assert_eq!(porosity["rdfs:label"], json!("SeparatorPorosity"));
    assert!(porosity.get("emmo:hasMeasurementUnit").is_none());

    let density = property(&export, "battery:CellDensity");
    assert_eq!(density["rdfs:label"], json!("battery:CellDensity"));
    assert_eq!(density["emmo:hasMeasurementUnit"], json!("emmo:KilogramPerCubicMetre"));
}

#[test]
fn formulas_and_functions_are_string_parts() {
    let bpx = export("sample_bpx.json", Format::Bpx);
    let ocp = property(&bpx, "battery:NegativeOpenCircuitPotential");
    assert_eq!(ocp["hasStringPart"]["@type"], json!("String"));
    assert!(ocp["hasStringPart"]["hasStringValue"]
        .as_str()
        .is_some_and(|s| s.contains("exp(")));

    let battmo = export("sample_battmo.json", Format::BattmoM);
    let conductivity = property(&battmo, "echem:ElectrolyteConductivity");
    assert_eq!(
        conductivity["hasStringPart"]["hasStringValue"],
        json!("computeElectrolyteConductivity_default")
    );
    let diffusivity = property(&battmo, "echem:ElectrolyteDiffusivity");
    let text = diffusivity["hasStringPart"]["hasStringValue"].as_str().expect("string value");
    assert!(text.contains("\"functionFormat\":\"string expression\""));
}

#[test]
fn audit_lists_unmapped_leaves() {
    let bpx = export("sample_bpx.json", Format::Bpx);
    let missing = bpx.audit.missing_strings();
    assert!(missing.contains(&"Header.BPX".to_owned()));
    assert!(missing.contains(&"Parameterisation.Cell.Nominal cell capacity [A.h]".to_owned()));
    assert!(missing.contains(&"Validation.C/20 discharge.Time [s][0]".to_owned()));
    assert!(!missing.contains(&"Parameterisation.Separator.Thickness [m]".to_owned()));
    assert_eq!(
        bpx.audit.mapped.len() + bpx.audit.missing.len(),
        bpx.audit.leaf_paths.len()
    );

    let battmo = export("sample_battmo.json", Format::BattmoM);
    let missing = battmo.audit.missing_strings();
    assert!(missing.contains(&"NegativeElectrode.Coating.volumeFraction".to_owned()));
    assert!(missing.contains(&"Control.controlPolicy".to_owned()));
    assert!(!missing
        .iter()
        .any(|p| p.starts_with("NegativeElectrode.Coating.ActiveMaterial.Interface.openCircuitPotential")));
    assert!(!missing.contains(&"NegativeElectrode.Coating.porosity".to_owned()));
}

#[test]
fn malformed_annotations_are_reported_not_fatal() {
    let export = export("sample_bpx.json", Format::Bpx);
    assert_eq!(export.diagnostics.for_stage("path").count(), 1);
    assert!(export
        .properties()
        .iter()
        .all(|p| p["@type"] != json!("battery:CellMass")));
}

#[test]
fn unknown_input_format_is_a_configuration_error() {
    let graph = ontology();
    assert!(matches!(
        jsonld::export(&graph, "jsonld", &json!({}), "TestCell", "PouchCell"),
        Err(MapperError::UnknownFormat(_))
    ));
}

//! Fixture loading shared by the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use battery_model_mapper::pipeline::load_json;
use battery_model_mapper::preprocess::preprocess;
use battery_model_mapper::{Format, OntologyGraph};
use serde_json::Value;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn ontology() -> OntologyGraph {
    OntologyGraph::load(fixture("battery.ttl")).expect("fixture ontology parses")
}

pub fn json(name: &str) -> Value {
    load_json(&fixture(name)).expect("fixture JSON parses")
}

/// A sample input after the format's preprocessing step.
pub fn input(name: &str, format: Format) -> Value {
    let mut doc = json(name);
    preprocess(format, &mut doc);
    doc
}

pub fn at<'v>(doc: &'v Value, path: &[&str]) -> &'v Value {
    path.iter().fold(doc, |node, key| &node[*key])
}

pub fn approx(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|v| (v - expected).abs() <= 1e-6 * expected.abs().max(1e-300))
}

//! Schema translation: applies a [`MappingIndex`] to move values from an
//! input document into a copy of the destination template.
//!
//! Every value read from the input is classified once into a
//! [`ValueShape`] and converted according to the destination format:
//!
//! | shape | BattMo destination | BPX destination | cidemod destination |
//! |-------|--------------------|-----------------|---------------------|
//! | text | normalized; wrapped as a function object on function fields | normalized | unchanged |
//! | function object with `expression` | unchanged | the expression text | unchanged |
//! | named function | unchanged | manual-conversion placeholder | unchanged |
//! | other object | unchanged | JSON text | unchanged |
//! | number, array, boolean | unchanged | unchanged | unchanged |

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::format::Format;
use crate::mapping::MappingIndex;
use crate::path::{PathComponent, PathExpression};

/// `functionFormat` of every function object this crate writes.
pub const STRING_EXPRESSION: &str = "string expression";

/// BPX header: schema version.
pub const BPX_VERSION: f64 = 0.1;
/// BPX header: title.
pub const BPX_TITLE: &str = "An autoconverted parameter set using BatteryModelMapper";
/// BPX header: model identifier.
pub const BPX_MODEL: &str = "DFN";

/// Function-valued fields and the argument list of their formula.
pub const FUNCTION_FIELDS: &[(&str, &[&str])] = &[
    ("openCircuitPotential", &["stoichiometry"]),
    ("ionicConductivity", &["concentration", "temperature"]),
    ("diffusionCoefficient", &["concentration", "temperature"]),
];

/// Top-level template keys whose paths never count as defaults.
const HIGH_LEVEL_KEYS: &[&str] = &["Parameterisation", "Header"];

/// A formula-valued quantity in BattMo form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionValue {
    /// Always [`STRING_EXPRESSION`].
    pub function_format: String,
    /// Independent variables, in order.
    pub argument_list: Vec<String>,
    /// The formula.
    pub expression: String,
}

impl FunctionValue {
    /// A string-expression function of `arguments`.
    pub fn string_expression(arguments: &[&str], expression: impl Into<String>) -> Self {
        Self {
            function_format: STRING_EXPRESSION.to_owned(),
            argument_list: arguments.iter().map(|a| (*a).to_owned()).collect(),
            expression: expression.into(),
        }
    }

    /// The function object for `expression` if `output` names a
    /// function-valued field.
    #[must_use]
    pub fn for_field(output: &PathExpression, expression: &str) -> Option<Self> {
        FUNCTION_FIELDS
            .iter()
            .find(|(field, _)| output.contains_key(field))
            .map(|(_, arguments)| Self::string_expression(arguments, expression))
    }
}

/// The shape of a value read from an input document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueShape<'v> {
    /// A JSON number.
    Number(&'v Value),
    /// A string.
    Text(&'v str),
    /// An object carrying an `expression` member.
    FunctionExpr(&'v Value),
    /// An object naming a function (`functionName` or `functionname`).
    NamedFunction(&'v str),
    /// An object of any other shape.
    Object(&'v Value),
    /// Arrays, booleans and anything else.
    Other(&'v Value),
}

impl<'v> ValueShape<'v> {
    /// Classifies `value`.
    #[must_use]
    pub fn classify(value: &'v Value) -> Self {
        match value {
            Value::Number(_) => ValueShape::Number(value),
            Value::String(text) => ValueShape::Text(text),
            Value::Object(map) => {
                if let Some(expression) = map.get("expression") {
                    ValueShape::FunctionExpr(expression)
                } else if let Some(name) = map.get("functionName").or_else(|| map.get("functionname")) {
                    ValueShape::NamedFunction(name.as_str().unwrap_or_default())
                } else {
                    ValueShape::Object(value)
                }
            }
            _ => ValueShape::Other(value),
        }
    }
}

/// Rewrites the BPX independent-variable names `x_s` and `c_e` to `x`.
///
/// Only whole identifiers are replaced. Applying it twice gives the same
/// result as applying it once.
#[must_use]
pub fn normalize_variables(expression: &str) -> String {
    match variable_pattern() {
        Some(pattern) => pattern.replace_all(expression, "x").into_owned(),
        None => expression.to_owned(),
    }
}

fn variable_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\b(?:x_s|c_e)\b").ok())
        .as_ref()
}

/// Converts one value for the destination `output` format.
#[must_use]
pub fn convert_value(value: &Value, output_path: &PathExpression, output: Format) -> Value {
    match (ValueShape::classify(value), output) {
        (ValueShape::Text(text), f) if f.is_function_capable() => {
            let text = normalize_variables(text);
            match FunctionValue::for_field(output_path, &text) {
                Some(function) => serde_json::to_value(&function)
                    .unwrap_or_else(|_| Value::String(function.expression)),
                None => Value::String(text),
            }
        }
        (ValueShape::FunctionExpr(expression), Format::Bpx) => expression.clone(),
        (ValueShape::NamedFunction(name), Format::Bpx) => {
            Value::String(format!("# Named function: {name} (requires manual conversion)"))
        }
        (ValueShape::Object(object), Format::Bpx) => Value::String(object.to_string()),
        (ValueShape::Text(text), Format::Bpx) => Value::String(normalize_variables(text)),
        _ => value.clone(),
    }
}

/// The fixed BPX header naming `source` as the origin of the data.
#[must_use]
pub fn bpx_header(source: &str) -> Value {
    json!({
        "BPX": BPX_VERSION,
        "Title": BPX_TITLE,
        "Description": format!(
            "This data set was automatically generated from {source}. Please check carefully."
        ),
        "Model": BPX_MODEL,
    })
}

/// The result of one translation.
#[derive(Debug, Clone)]
pub struct Translation {
    /// The converted document.
    pub document: Value,
    /// Template paths never overwritten, outside `Parameterisation` and `Header`.
    pub defaults_used: BTreeSet<String>,
    /// Number of values written.
    pub written: usize,
    /// Per-field problems.
    pub diagnostics: Diagnostics,
}

/// Translates `input` into the index's output format, starting from a copy
/// of `template`.
///
/// Entries whose input path is absent (or `null`) are skipped. A write that
/// conflicts with the template drops that entry only. `source` names the
/// input in the BPX header.
#[must_use]
pub fn translate(index: &MappingIndex, template: &Value, input: &Value, source: &str) -> Translation {
    let output = index.output_format();
    let mut document = template.clone();
    strip_validation(&mut document);
    let template_paths = template_paths(&document);
    let mut diagnostics = Diagnostics::new();
    let mut written_paths = Vec::new();

    for (from, to) in index {
        let Some(value) = from.get(input).filter(|v| !v.is_null()) else {
            continue;
        };
        let converted = convert_value(value, to, output);
        match to.set(&mut document, converted) {
            Ok(()) => {
                tracing::debug!(from = %from, to = %to, "value written");
                written_paths.push(to.clone());
            }
            Err(err) => diagnostics.push(Diagnostic::warn_with_details(
                "translate",
                format!("dropped value for {to}"),
                vec![err.to_string()],
            )),
        }
    }

    if output.is_bpx() {
        if let Value::Object(map) = &mut document {
            map.insert("Header".to_owned(), bpx_header(source));
        }
        strip_validation(&mut document);
    }

    let defaults_used = defaults_used(template_paths, &written_paths);
    diagnostics.push(Diagnostic::info(
        "translate",
        format!(
            "{} of {} mapped values written to {output}; {} template defaults kept",
            written_paths.len(),
            index.len(),
            defaults_used.len()
        ),
    ));
    Translation {
        document,
        defaults_used,
        written: written_paths.len(),
        diagnostics,
    }
}

/// Removes a top-level `Validation` member.
pub fn strip_validation(document: &mut Value) {
    if let Value::Object(map) = document {
        map.remove("Validation");
    }
}

fn template_paths(template: &Value) -> Vec<PathExpression> {
    let mut paths = Vec::new();
    collect_paths(template, PathExpression::default(), &mut paths);
    paths
}

fn defaults_used(paths: Vec<PathExpression>, written: &[PathExpression]) -> BTreeSet<String> {
    paths
        .into_iter()
        .filter(|path| !path.first_key().is_some_and(|k| HIGH_LEVEL_KEYS.contains(&k)))
        .filter(|path| {
            !written
                .iter()
                .any(|w| w.starts_with(path) || path.starts_with(w))
        })
        .map(|path| path.to_string())
        .collect()
}

fn collect_paths(node: &Value, prefix: PathExpression, out: &mut Vec<PathExpression>) {
    let children: Vec<(PathComponent, &Value)> = match node {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (PathComponent::Key(k.clone()), v))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (PathComponent::Index(i), v))
            .collect(),
        _ => return,
    };
    for (component, child) in children {
        let path = prefix.child(component);
        collect_paths(child, path.clone(), out);
        out.push(path);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::format::{BATTMO_KEY, BPX_KEY};
    use crate::ontology::{Node, OntologyGraph, PrefixMap};
    use proptest::prelude::*;

    fn path(text: &str) -> PathExpression {
        PathExpression::parse(text).expect("valid path literal")
    }

    fn index(input: Format, output: Format) -> MappingIndex {
        let pairs = [
            ("Thickness", "('Parameterisation','Separator','Thickness [m]')", "['Separator','thickness']"),
            ("Ocp", "('Parameterisation','Negative electrode','OCP [V]')", "['NegativeElectrode','Coating','ActiveMaterial','Interface','openCircuitPotential']"),
            ("Conductivity", "('Parameterisation','Electrolyte','Conductivity [S.m-1]')", "['Electrolyte','ionicConductivity']"),
            ("Name", "('Parameterisation','Cell','Name')", "['Cell','name']"),
            ("Clash", "('Parameterisation','Cell','Mass [kg]')", "['Control','lowerCutoffVoltage','mass']"),
        ];
        let triples = pairs.iter().flat_map(|(name, bpx, battmo)| {
            let subject = Node::iri(format!("https://example.org/{name}"));
            [
                (subject.clone(), Node::iri(BPX_KEY), Node::literal(*bpx)),
                (subject, Node::iri(BATTMO_KEY), Node::literal(*battmo)),
            ]
        });
        let graph = OntologyGraph::from_triples(PrefixMap::default(), triples);
        MappingIndex::build_for(&graph, input, output)
    }

    #[test]
    fn normalization_rewrites_whole_identifiers_only() {
        assert_eq!(
            normalize_variables("1.2 * exp(-x_s) + c_e / 1000 + x_sx + ac_e"),
            "1.2 * exp(-x) + x / 1000 + x_sx + ac_e"
        );
    }

    #[test]
    fn classify_distinguishes_function_objects() {
        let expr = json!({"functionFormat": "string expression", "expression": "x"});
        let named = json!({"functionname": "computeOCP_Graphite"});
        let other = json!({"a": 1});
        assert_eq!(ValueShape::classify(&expr), ValueShape::FunctionExpr(&json!("x")));
        assert_eq!(ValueShape::classify(&named), ValueShape::NamedFunction("computeOCP_Graphite"));
        assert_eq!(ValueShape::classify(&other), ValueShape::Object(&other));
        assert_eq!(ValueShape::classify(&json!(true)), ValueShape::Other(&json!(true)));
    }

    #[test]
    fn text_on_function_fields_becomes_a_function_object() {
        let ocp = convert_value(
            &json!("0.1 * exp(-x_s)"),
            &path("['NegativeElectrode','Coating','ActiveMaterial','Interface','openCircuitPotential']"),
            Format::BattmoM,
        );
        assert_eq!(
            ocp,
            json!({
                "functionFormat": "string expression",
                "argumentList": ["stoichiometry"],
                "expression": "0.1 * exp(-x)"
            })
        );

        let kappa = convert_value(&json!("c_e * 2"), &path("['Electrolyte','ionicConductivity']"), Format::BattmoJl);
        assert_eq!(kappa["argumentList"], json!(["concentration", "temperature"]));
        assert_eq!(kappa["expression"], json!("x * 2"));
        let parsed: FunctionValue = serde_json::from_value(kappa).expect("function object");
        assert_eq!(
            parsed,
            FunctionValue::string_expression(&["concentration", "temperature"], "x * 2")
        );
    }

    #[test]
    fn text_elsewhere_stays_text() {
        let value = convert_value(&json!("x_s"), &path("['Cell','name']"), Format::BattmoM);
        assert_eq!(value, json!("x"));
        let value = convert_value(&json!("x_s"), &path("('name',)"), Format::Cidemod);
        assert_eq!(value, json!("x_s"));
    }

    #[test]
    fn function_objects_become_bpx_text() {
        let to = path("('Parameterisation','Negative electrode','OCP [V]')");
        let expr = json!({"functionFormat": "string expression", "argumentList": ["stoichiometry"], "expression": "exp(-x)"});
        assert_eq!(convert_value(&expr, &to, Format::Bpx), json!("exp(-x)"));
        let named = json!({"functionName": "computeOCP_NMC111", "argumentList": ["c"]});
        assert_eq!(
            convert_value(&named, &to, Format::Bpx),
            json!("# Named function: computeOCP_NMC111 (requires manual conversion)")
        );
        assert_eq!(convert_value(&json!({"a": 1}), &to, Format::Bpx), json!("{\"a\":1}"));
        assert_eq!(convert_value(&json!([1, 2]), &to, Format::Bpx), json!([1, 2]));
        assert_eq!(convert_value(&json!(2e-05), &to, Format::Bpx), json!(2e-05));
    }

    #[test]
    fn translate_fills_template_and_skips_absent_values() {
        let index = index(Format::Bpx, Format::BattmoM);
        let template = json!({"Separator": {"thickness": null, "porosity": 0.4}, "Geometry": {"case": "1D"}, "Validation": {}});
        let input = json!({"Parameterisation": {
            "Separator": {"Thickness [m]": 2e-05},
            "Negative electrode": {"OCP [V]": "exp(-x_s)"},
            "Cell": {"Name": null}
        }});
        let result = translate(&index, &template, &input, "sample.json");
        assert_eq!(result.written, 2);
        assert_eq!(result.document["Separator"]["thickness"], json!(2e-05));
        assert_eq!(
            result.document["NegativeElectrode"]["Coating"]["ActiveMaterial"]["Interface"]["openCircuitPotential"]["expression"],
            json!("exp(-x)")
        );
        assert!(result.document.get("Cell").is_none());
        assert!(result.document.get("Validation").is_none());
        assert!(result.document.get("Header").is_none());
        assert_eq!(
            result.defaults_used.iter().map(String::as_str).collect::<Vec<_>>(),
            ["Geometry", "Geometry.case", "Separator.porosity"]
        );
        assert_eq!(template["Separator"]["thickness"], Value::Null);
    }

    #[test]
    fn conflicting_writes_are_dropped_with_a_warning() {
        let index = index(Format::Bpx, Format::BattmoM);
        let template = json!({"Control": {"lowerCutoffVoltage": 2.5}});
        let input = json!({"Parameterisation": {
            "Cell": {"Mass [kg]": 0.07},
            "Separator": {"Thickness [m]": 2e-05}
        }});
        let result = translate(&index, &template, &input, "sample.json");
        assert_eq!(result.written, 1);
        assert_eq!(result.document["Control"]["lowerCutoffVoltage"], json!(2.5));
        assert_eq!(result.diagnostics.warning_count(), 1);
    }

    #[test]
    fn bpx_output_gets_the_fixed_header() {
        let index = index(Format::BattmoM, Format::Bpx);
        let template = json!({"Header": {"BPX": 1.0}, "Parameterisation": {}, "Validation": {"x": 1}});
        let input = json!({"Separator": {"thickness": 2e-05}});
        let result = translate(&index, &template, &input, "battmo.json");
        assert_eq!(result.document["Header"], bpx_header("battmo.json"));
        assert_eq!(result.document["Header"]["Model"], json!("DFN"));
        assert_eq!(
            result.document["Parameterisation"]["Separator"]["Thickness [m]"],
            json!(2e-05)
        );
        assert!(result.document.get("Validation").is_none());
        assert!(result.defaults_used.is_empty());
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(text in "[ a-z_0-9*+()-]{0,40}") {
            let once = normalize_variables(&text);
            prop_assert_eq!(normalize_variables(&once), once.clone());
        }
    }
}

//! Format-specific fixups applied to an input document before mapping.

use serde_json::{json, Value};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::format::Format;

/// Scale applied to cidemod kinetic constants.
pub const KINETIC_CONSTANT_SCALE: f64 = 1e6;

/// BattMo electrode sections whose coating porosity is derived.
pub const ELECTRODES: &[&str] = &["NegativeElectrode", "PositiveElectrode"];

/// Prepares `document` (in `format`) for mapping, in place.
///
/// - cidemod: top-level numbers under keys containing `kinetic_constant` are
///   scaled by [`KINETIC_CONSTANT_SCALE`].
/// - BattMo: `Coating.porosity` of each electrode is set to
///   `1 - Coating.volumeFraction` when the fraction is numeric.
/// - BPX: unchanged.
pub fn preprocess(format: Format, document: &mut Value) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    match format {
        Format::Cidemod => scale_kinetic_constants(document, &mut diagnostics),
        Format::BattmoM | Format::BattmoJl => derive_porosity(document, &mut diagnostics),
        Format::Bpx => {}
    }
    diagnostics
}

fn scale_kinetic_constants(document: &mut Value, diagnostics: &mut Diagnostics) {
    let Value::Object(map) = document else {
        return;
    };
    for (key, value) in map.iter_mut().filter(|(k, _)| k.contains("kinetic_constant")) {
        match value.as_f64() {
            Some(constant) => {
                *value = json!(constant * KINETIC_CONSTANT_SCALE);
                diagnostics.push(Diagnostic::info("preprocess", format!("scaled {key} by 1e6")));
            }
            None => diagnostics.push(Diagnostic::warn(
                "preprocess",
                format!("{key} is not a number; left unscaled"),
            )),
        }
    }
}

fn derive_porosity(document: &mut Value, diagnostics: &mut Diagnostics) {
    for electrode in ELECTRODES {
        let Some(Value::Object(coating)) = document.pointer_mut(&format!("/{electrode}/Coating")) else {
            continue;
        };
        let fraction = coating
            .get("volumeFraction")
            .filter(|v| !v.is_null())
            .map(Value::as_f64);
        match fraction {
            None => {}
            Some(Some(fraction)) => {
                coating.insert("porosity".to_owned(), json!(1.0 - fraction));
                diagnostics.push(Diagnostic::info(
                    "preprocess",
                    format!("{electrode}.Coating.porosity derived from volumeFraction"),
                ));
            }
            Some(None) => diagnostics.push(Diagnostic::warn(
                "preprocess",
                format!("{electrode}.Coating.volumeFraction is not a number"),
            )),
        }
    }
}

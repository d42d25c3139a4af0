//! Supported parameter formats and their ontology annotation predicates.
//!
//! [`FORMATS`] is the single source of truth for which formats exist. Each
//! entry names the annotation property whose value, on a physical-quantity
//! subject, is the serialized JSON path of that quantity in documents of the
//! format. `battmo.m` and `battmo.jl` share one predicate.

use std::fmt;
use std::str::FromStr;

use crate::error::MapperError;

/// Namespace of the battery-model-lithium-ion domain ontology.
pub const NS_BMLI: &str = "https://w3id.org/emmo/domain/battery-model-lithium-ion#";

/// Annotation predicate carrying BPX paths.
pub const BPX_KEY: &str =
    "https://w3id.org/emmo/domain/battery-model-lithium-ion#bmli_0a5b99ee_995b_4899_a79b_925a4086da37";

/// Annotation predicate carrying cidemod paths.
pub const CIDEMOD_KEY: &str =
    "https://w3id.org/emmo/domain/battery-model-lithium-ion#bmli_1b718841_5d72_4071_bb71_fc4a754f5e30";

/// Annotation predicate carrying BattMo paths (MATLAB and Julia front-ends).
pub const BATTMO_KEY: &str =
    "https://w3id.org/emmo/domain/battery-model-lithium-ion#bmli_e5e86474_8623_48ea_a1cf_502bdb10aa14";

/// A parameter-set format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    /// Battery Parameter eXchange.
    Bpx,
    /// cidemod flat parameter files.
    Cidemod,
    /// BattMo, MATLAB front-end.
    BattmoM,
    /// BattMo, Julia front-end.
    BattmoJl,
}

/// The format table: `(format, identifier, annotation predicate IRI)`.
pub const FORMATS: &[(Format, &str, &str)] = &[
    (Format::Bpx, "bpx", BPX_KEY),
    (Format::Cidemod, "cidemod", CIDEMOD_KEY),
    (Format::BattmoM, "battmo.m", BATTMO_KEY),
    (Format::BattmoJl, "battmo.jl", BATTMO_KEY),
];

impl Format {
    /// Looks up a format by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::UnknownFormat`] if `id` is not in [`FORMATS`].
    pub fn from_id(id: &str) -> Result<Self, MapperError> {
        FORMATS
            .iter()
            .find(|(_, name, _)| *name == id)
            .map(|(format, _, _)| *format)
            .ok_or_else(|| MapperError::UnknownFormat(id.to_owned()))
    }

    /// The identifier used on the command line and in the format table.
    #[must_use]
    pub fn id(self) -> &'static str {
        self.entry().1
    }

    /// The IRI of the annotation predicate for this format.
    #[must_use]
    pub fn annotation_iri(self) -> &'static str {
        self.entry().2
    }

    /// Whether formula-valued fields are written as function objects.
    #[must_use]
    pub fn is_function_capable(self) -> bool {
        matches!(self, Format::BattmoM | Format::BattmoJl)
    }

    /// Whether this is the BPX format.
    #[must_use]
    pub fn is_bpx(self) -> bool {
        self == Format::Bpx
    }

    fn entry(self) -> &'static (Format, &'static str, &'static str) {
        // FORMATS rows follow the declaration order of the variants.
        &FORMATS[self as usize]
    }
}

impl FromStr for Format {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::from_id(s)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

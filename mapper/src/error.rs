//! Error types.
//!
//! Only configuration problems and file-level failures are errors. Problems
//! with a single ontology subject or a single mapped field are recorded as
//! [`Diagnostic`](crate::Diagnostic)s and never abort a conversion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the mapper.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A format identifier is not in the format table.
    #[error("unknown format `{0}` (expected one of: bpx, cidemod, battmo.m, battmo.jl)")]
    UnknownFormat(String),

    /// The ontology text is not valid Turtle.
    #[error("failed to parse ontology as Turtle: {0}")]
    Turtle(String),

    /// The ontology reference is a URL rather than a local file.
    #[error("remote ontology reference `{0}` is not supported; download it and pass the local file")]
    RemoteOntology(String),

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while parsing or applying a [`PathExpression`](crate::PathExpression).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path literal is not a list or tuple of strings and integers.
    #[error("malformed path literal `{text}`: {reason}")]
    Syntax {
        /// The literal as found in the ontology.
        text: String,
        /// What the parser expected.
        reason: String,
    },

    /// A write was attempted with a path that has no components.
    #[error("cannot write at an empty path")]
    EmptyPath,

    /// A component could not be applied to the node found along the path.
    #[error("cannot apply `{component}` of path {path} to {found}")]
    TypeConflict {
        /// The full path being written.
        path: String,
        /// The offending component.
        component: String,
        /// The JSON type found instead of a suitable container (`"an array"`, ...).
        found: &'static str,
    },
}

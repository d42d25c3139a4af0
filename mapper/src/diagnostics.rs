//! Structured diagnostics returned alongside every mapping result.
//!
//! Per-field problems (a malformed path literal, a write that conflicts with
//! the template, a duplicate annotation) never abort an operation. They are
//! collected here so callers and tests can inspect them, and each one is also
//! emitted as a `tracing` event when recorded.

use serde::Serialize;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; nothing was lost.
    Info,
    /// Something was skipped or recovered locally.
    Warning,
}

/// A single diagnostic record.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Processing stage that produced this record (`"mapping"`, `"translate"`, ...).
    pub stage: String,
    /// Human-readable message.
    pub message: String,
    /// Severity of the record.
    pub severity: Severity,
    /// Optional additional detail lines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Diagnostic {
    /// Creates an informational record.
    pub fn info(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
            severity: Severity::Info,
            details: Vec::new(),
        }
    }

    /// Creates a warning record.
    pub fn warn(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
            severity: Severity::Warning,
            details: Vec::new(),
        }
    }

    /// Creates a warning record with additional detail lines.
    pub fn warn_with_details(
        stage: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
            severity: Severity::Warning,
            details,
        }
    }

    /// Returns true if this record is a warning.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Ordered list of diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and emits it as a `tracing` event.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => tracing::info!(stage = %diagnostic.stage, "{}", diagnostic.message),
            Severity::Warning => {
                tracing::warn!(stage = %diagnostic.stage, "{}", diagnostic.message);
            }
        }
        self.entries.push(diagnostic);
    }

    /// Appends all records from another list without re-emitting them.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Iterates over the records in the order they were pushed.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of warning records.
    pub fn warning_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_warning()).count()
    }

    /// Returns the records produced by one stage.
    pub fn for_stage<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.entries.iter().filter(move |d| d.stage == stage)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn counts_warnings_only() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::info("mapping", "12 entries"));
        diagnostics.push(Diagnostic::warn("translate", "write dropped"));
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.for_stage("translate").count(), 1);
    }

    #[test]
    fn serializes_without_empty_details() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::warn("path", "bad literal"));
        let value = serde_json::to_value(&diagnostics).expect("diagnostics serialize");
        assert_eq!(
            value,
            serde_json::json!([{"stage": "path", "message": "bad literal", "severity": "warning"}])
        );
    }
}

//! Positioned, severity-tagged problems found in schema text.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// The text cannot be trusted to describe a coherent schema.
    Error,
    /// Advisory only; never blocks extraction or layout.
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single marker for the host editor.
///
/// Lines and columns are 1-based; columns count characters, and `end_column`
/// points one past the last highlighted character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub severity: Severity,
    pub message: String,
    pub source: &'static str,
}

impl Diagnostic {
    pub fn error(line: usize, column: usize, end_column: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, line, column, end_column, message)
    }

    pub fn warning(
        line: usize,
        column: usize,
        end_column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, line, column, end_column, message)
    }

    fn new(
        severity: Severity,
        line: usize,
        column: usize,
        end_column: usize,
        message: impl Into<String>,
    ) -> Self {
        let line = line.max(1);
        let column = column.max(1);
        Self {
            line,
            column,
            end_line: line,
            end_column: end_column.max(column + 1),
            severity,
            message: message.into(),
            source: "validation",
        }
    }

    fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}:{}]: {}",
            self.severity, self.line, self.column, self.message
        )
    }
}

/// Error and warning counts for the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSummary {
    pub errors: usize,
    pub warnings: usize,
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        let is_valid = !diagnostics.iter().any(|d| d.severity.is_error());
        Self {
            is_valid,
            diagnostics,
        }
    }

    pub fn summary(&self) -> DiagnosticSummary {
        let errors = self
            .diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count();
        DiagnosticSummary {
            errors,
            warnings: self.diagnostics.len() - errors,
        }
    }

    /// Where the status indicator jumps: the earliest error, or the earliest
    /// warning when there are no errors.
    pub fn jump_target(&self) -> Option<&Diagnostic> {
        let earliest = |severity: Severity| {
            self.diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .min_by_key(|d| d.position())
        };
        earliest(Severity::Error).or_else(|| earliest(Severity::Warning))
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity.is_error())
    }
}

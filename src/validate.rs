//! Validator: turns schema text into positioned diagnostics.
//!
//! The text is outlined once, then a fixed battery of independent checks
//! runs over the outline. Checks never short-circuit each other and are
//! reported in battery order, each in source order, so the same text always
//! yields the same diagnostics.

mod braces;
mod constraints;
mod duplicates;
mod references;
mod spelling;
mod structure;
mod vocabulary;

use std::panic;

use log::{debug, error, trace};

use crate::diagnostic::{Diagnostic, ValidationReport};
use crate::outline::{Outline, Statement};

type Check = fn(&Outline) -> Vec<Diagnostic>;

const CHECKS: &[(&str, Check)] = &[
    ("duplicate_tables", duplicates::check),
    ("braces", braces::check),
    ("table_names", structure::check_table_names),
    ("field_syntax", structure::check_fields),
    ("references", references::check),
    ("keywords", spelling::check_keywords),
    ("data_types", spelling::check_types),
    ("constraints", constraints::check),
];

/// Validate `text`. Never panics: an internal failure becomes a single
/// error diagnostic on line 1.
pub fn validate(text: &str) -> ValidationReport {
    let diagnostics = match panic::catch_unwind(|| run_checks(text)) {
        Ok(diagnostics) => diagnostics,
        Err(_) => {
            error!("Validator failed internally");
            vec![Diagnostic::error(1, 1, 2, "Internal validation error")]
        }
    };

    let report = ValidationReport::new(diagnostics);
    let summary = report.summary();
    debug!(
        errors = summary.errors,
        warnings = summary.warnings;
        "Validated schema text",
    );
    report
}

fn run_checks(text: &str) -> Vec<Diagnostic> {
    let outline = Outline::build(text);
    let mut diagnostics = Vec::new();
    for (name, check) in CHECKS {
        let found = check(&outline);
        trace!(check = *name, found = found.len(); "Check finished");
        diagnostics.extend(found);
    }
    diagnostics
}

/// Error spanning the bytes `start..end` of a statement's text.
fn error_at(stmt: &Statement, start: usize, end: usize, message: String) -> Diagnostic {
    Diagnostic::error(stmt.line, stmt.column_at(start), stmt.column_at(end), message)
}

fn warning_at(stmt: &Statement, start: usize, end: usize, message: String) -> Diagnostic {
    Diagnostic::warning(stmt.line, stmt.column_at(start), stmt.column_at(end), message)
}

/// Appends `Did you mean ...?` when there is a suggestion.
fn with_suggestion(message: String, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!("{message}. Did you mean \"{s}\"?"),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;

    fn messages(text: &str) -> Vec<String> {
        validate(text)
            .diagnostics
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_clean_schema() {
        let text = r#"
Table users as U [headercolor: #3498DB] {
  id int [pk, increment]
  email varchar(255) [not null, unique, note: 'login']
  status order_status [default: 'new']
  Note: 'registered users'
  indexes {
    (email) [unique]
  }
}

Enum order_status {
  new
  shipped
}

Table posts {
  id int [pk]
  user_id int [ref: > U.id, not null]
}

Ref fk_posts: posts.user_id > users.id [delete: cascade]
Ref {
  posts.id - users.id
}
"#;
        let report = validate(text);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert!(report.is_valid);
    }

    #[test]
    fn test_end_to_end_text_is_clean() {
        let text = "Table A { id int [pk] }\nTable B { id int [pk]\n a_id int }\nRef: B.a_id > A.id";
        assert!(validate(text).diagnostics.is_empty());
    }

    #[test]
    fn test_battery_order() {
        let text = "Table A {\n  id strng [primay key]\n  bad\n}\n}\nTabel B {\n}";
        let report = validate(text);
        let found: Vec<_> = report
            .diagnostics
            .iter()
            .map(|d| (d.line, d.severity))
            .collect();
        assert_eq!(
            found,
            vec![
                (5, Severity::Error),
                (3, Severity::Error),
                (6, Severity::Warning),
                (2, Severity::Warning),
                (2, Severity::Warning),
            ]
        );
        assert_eq!(report.jump_target().map(|d| d.line), Some(3));
    }

    #[test]
    fn test_ref_after_unclosed_table_is_only_a_brace_error() {
        let text = "Table A {\n  id int\nTable B {\n  a_id int\n}\nRef: B.a_id > A.id";
        assert_eq!(messages(text), vec!["Missing 1 closing brace"]);
    }

    #[test]
    fn test_idempotent() {
        let text = "Table A {\n x\n}}\nRef: a > b\nTable A {}";
        assert_eq!(validate(text), validate(text));
    }

    #[test]
    fn test_empty_text() {
        assert!(validate("").is_valid);
        assert!(messages("   \n\n").is_empty());
    }
}

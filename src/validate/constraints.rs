//! Field settings inside `[...]`.

use super::vocabulary::{
    ACTION_TYPOS, CONSTRAINT_TYPOS, FLAG_SETTINGS, REFERENTIAL_ACTIONS, correction,
};
use super::{warning_at, with_suggestion};
use crate::diagnostic::Diagnostic;
use crate::outline::{Context, Outline};
use crate::syntax::{Setting, parse_field, parse_inline_ref};

pub(super) fn check(outline: &Outline) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for stmt in outline
        .statements
        .iter()
        .filter(|s| matches!(s.context, Context::Table(_)) && s.opens.is_none())
    {
        let Some(field) = parse_field(&stmt.text).filter(|f| !f.unterminated) else {
            continue;
        };
        for setting in &field.settings {
            if let Some(problem) = problem_with(setting) {
                diagnostics.push(warning_at(stmt, setting.start, setting.end, problem));
            }
        }
    }
    diagnostics
}

/// Why `setting` matches none of the accepted grammars, if it doesn't.
fn problem_with(setting: &Setting) -> Option<String> {
    let normalized = setting.normalized();
    if FLAG_SETTINGS.contains(&normalized.as_str()) {
        return None;
    }

    let key = setting.key();
    match key.as_deref() {
        Some("default") => setting
            .value()
            .is_none_or(str::is_empty)
            .then(|| "Missing value for default: expected 'default: <value>'".to_string()),
        Some("note") => setting
            .string_value()
            .is_none()
            .then(|| "Note must be a quoted string: expected note: '<text>'".to_string()),
        Some("ref") => parse_inline_ref(&setting.text)
            .is_none()
            .then(|| "Invalid ref setting: expected 'ref: <op> <table>.<field>'".to_string()),
        Some(kind @ ("delete" | "update")) => {
            let action = setting
                .value()
                .unwrap_or_default()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            (!REFERENTIAL_ACTIONS.contains(&action.as_str())).then(|| {
                with_suggestion(
                    format!("Unknown {kind} action \"{action}\""),
                    correction(ACTION_TYPOS, &action),
                )
            })
        }
        _ => {
            let word = key.unwrap_or(normalized);
            Some(with_suggestion(
                format!("Unknown constraint \"{}\"", setting.text),
                correction(CONSTRAINT_TYPOS, &word),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problems(settings: &str) -> Vec<String> {
        let text = format!("Table t {{\n  x int [{settings}]\n}}");
        check(&Outline::build(&text))
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_accepted_grammars() {
        let all = "pk, primary key, not null, null, unique, increment, auto_increment, \
                   default: 0, note: 'x', ref: > a.id, delete: cascade, update: set   null";
        assert!(problems(all).is_empty());
        assert!(problems("PK, NOT NULL, Delete: No Action").is_empty());
    }

    #[test]
    fn test_misspelled_constraints() {
        assert_eq!(
            problems("primay key, notnull"),
            vec![
                "Unknown constraint \"primay key\". Did you mean \"primary key\"?",
                "Unknown constraint \"notnull\". Did you mean \"not null\"?",
            ]
        );
        assert_eq!(
            problems("defualt: 1"),
            vec!["Unknown constraint \"defualt: 1\". Did you mean \"default:\"?"]
        );
        assert_eq!(problems("weird"), vec!["Unknown constraint \"weird\""]);
    }

    #[test]
    fn test_malformed_keyed_settings() {
        assert_eq!(problems("default:").len(), 1);
        assert_eq!(problems("note: x").len(), 1);
        assert_eq!(problems("ref: users.id").len(), 1);
        assert_eq!(
            problems("delete: cascde"),
            vec!["Unknown delete action \"cascde\". Did you mean \"cascade\"?"]
        );
    }

    #[test]
    fn test_unclosed_list_is_left_to_field_check() {
        assert!(check(&Outline::build("Table t {\n  x int [pk, not nul\n}")).is_empty());
    }

    #[test]
    fn test_span_points_at_setting() {
        let found = check(&Outline::build("Table t {\n  x int [pk, uniq]\n}"));
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].line, found[0].column, found[0].end_column), (2, 14, 18));
    }
}

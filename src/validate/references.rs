//! Standalone relationship statements.

use super::warning_at;
use crate::diagnostic::Diagnostic;
use crate::outline::{Context, Outline};
use crate::syntax::{is_ref_statement, parse_ref_body, parse_ref_statement};

const STATEMENT_SHAPE: &str =
    "Invalid reference syntax: expected 'Ref: <table>.<field> <op> <table>.<field>'";
const BODY_SHAPE: &str = "Invalid reference syntax: expected '<table>.<field> <op> <table>.<field>'";

pub(super) fn check(outline: &Outline) -> Vec<Diagnostic> {
    outline
        .statements
        .iter()
        .filter_map(|s| {
            let malformed = match s.context {
                Context::TopLevel if s.opens.is_none() && is_ref_statement(&s.text) => {
                    parse_ref_statement(&s.text).is_none().then_some(STATEMENT_SHAPE)
                }
                Context::Ref(_) => parse_ref_body(&s.text).is_none().then_some(BODY_SHAPE),
                _ => None,
            }?;
            Some(warning_at(s, 0, s.text.len(), malformed.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;

    #[test]
    fn test_valid_statements() {
        let text = "Ref: a.x > b.y\nRef named: s.a.x <> b.y [update: cascade]\nRef {\n a.x - b.y\n}";
        assert!(check(&Outline::build(text)).is_empty());
    }

    #[test]
    fn test_malformed_statement() {
        let found = check(&Outline::build("Ref: orders.user_id users.id"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Warning);
        assert_eq!((found[0].column, found[0].end_column), (1, 29));
    }

    #[test]
    fn test_malformed_block_line() {
        let found = check(&Outline::build("Ref {\n  a.x > b\n  a.x > b.y\n}"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 2);
        assert_eq!(found[0].message, BODY_SHAPE);
    }

    #[test]
    fn test_dangling_reference_is_not_flagged() {
        assert!(check(&Outline::build("Ref: Orders.user_id > Users.id")).is_empty());
    }
}

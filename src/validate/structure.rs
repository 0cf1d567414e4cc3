//! Table headers and field lines.

use super::error_at;
use crate::diagnostic::Diagnostic;
use crate::outline::{Context, Outline};
use crate::syntax::{BlockKind, parse_field, parse_note_line, parse_table_header};

/// A `Table {` with no identifier before the brace.
pub(super) fn check_table_names(outline: &Outline) -> Vec<Diagnostic> {
    outline
        .blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Table)
        .filter_map(|block| {
            let stmt = outline.header(block)?;
            let header = parse_table_header(&stmt.text)?;
            header.name.is_none().then(|| {
                error_at(
                    stmt,
                    header.keyword_start,
                    header.keyword_end,
                    "Table name is missing".to_string(),
                )
            })
        })
        .collect()
}

/// Every line directly inside a table body must read
/// `<name> <type> [settings]`, apart from notes and nested block headers.
/// A field with an open `(` or `[` is still flagged.
pub(super) fn check_fields(outline: &Outline) -> Vec<Diagnostic> {
    outline
        .statements
        .iter()
        .filter(|s| matches!(s.context, Context::Table(_)) && s.opens.is_none())
        .filter(|s| {
            parse_note_line(&s.text).is_none()
                && parse_field(&s.text).is_none_or(|field| field.unterminated)
        })
        .map(|s| {
            error_at(
                s,
                0,
                s.text.len(),
                "Invalid field syntax: expected '<name> <type> [settings]'".to_string(),
            )
        })
        .collect()
}

//! Duplicate table names.

use indexmap::IndexMap;

use super::error_at;
use crate::diagnostic::Diagnostic;
use crate::outline::{Outline, Statement};
use crate::syntax::{BlockKind, parse_table_header};

/// One summary error per repeated name, at its first declaration, followed
/// by one error per declaration.
pub(super) fn check(outline: &Outline) -> Vec<Diagnostic> {
    let mut declared: IndexMap<String, Vec<(&Statement, usize, usize)>> = IndexMap::new();

    for block in outline.blocks.iter().filter(|b| b.kind == BlockKind::Table) {
        let Some(stmt) = outline.header(block) else {
            continue;
        };
        let Some(name) = parse_table_header(&stmt.text).and_then(|h| h.name) else {
            continue;
        };
        declared
            .entry(name.value())
            .or_default()
            .push((stmt, name.start, name.end));
    }

    let mut diagnostics = Vec::new();
    for (name, sites) in declared.iter().filter(|(_, sites)| sites.len() > 1) {
        let (first, start, end) = sites[0];
        diagnostics.push(error_at(
            first,
            start,
            end,
            format!("Table \"{name}\" is declared {} times", sites.len()),
        ));
        for &(stmt, start, end) in sites {
            diagnostics.push(error_at(
                stmt,
                start,
                end,
                format!("Duplicate table name \"{name}\""),
            ));
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_declarations() {
        let outline = Outline::build("Table Users {\n id int\n}\nTable Users {\n id int\n}");
        let found = check(&outline);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].message, "Table \"Users\" is declared 2 times");
        assert_eq!(
            found[1..]
                .iter()
                .map(|d| (d.line, d.column, d.end_column))
                .collect::<Vec<_>>(),
            vec![(1, 7, 12), (4, 7, 12)]
        );
    }

    #[test]
    fn test_quotes_are_stripped() {
        let outline = Outline::build("Table \"Users\" {}\nTable Users {}");
        assert_eq!(check(&outline).len(), 3);
    }

    #[test]
    fn test_distinct_names() {
        let outline = Outline::build("Table A {}\nTable B {}\nTable a {}");
        assert!(check(&outline).is_empty());
    }
}

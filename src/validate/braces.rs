//! Brace balance.

use crate::diagnostic::Diagnostic;
use crate::outline::Outline;

pub(super) fn check(outline: &Outline) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = outline
        .stray_closes
        .iter()
        .map(|close| {
            Diagnostic::error(
                close.line,
                close.column,
                close.column + 1,
                "Unexpected closing brace",
            )
        })
        .collect();

    let missing = outline.unclosed();
    if missing > 0
        && let Some(last) = outline.last_code_line()
    {
        let noun = if missing == 1 { "brace" } else { "braces" };
        diagnostics.push(Diagnostic::error(
            last.number,
            1,
            last.end_column(),
            format!("Missing {missing} closing {noun}"),
        ));
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced() {
        assert!(check(&Outline::build("Table A {\n id int\n}")).is_empty());
    }

    #[test]
    fn test_extra_close_reported_once() {
        let found = check(&Outline::build("Table A {\n id int\n}\n  }\nTable B {\n x int\n}"));
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].line, found[0].column), (4, 3));
        assert_eq!(found[0].message, "Unexpected closing brace");
    }

    #[test]
    fn test_missing_closes_at_last_line() {
        let found = check(&Outline::build("Table A {\n id int\nTable B {\n x int\n\n"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 4);
        assert_eq!(found[0].message, "Missing 2 closing braces");
    }

    #[test]
    fn test_braces_in_strings_ignored() {
        let text = "Table A {\n id int [note: '}']\n // }\n}";
        assert!(check(&Outline::build(text)).is_empty());
    }
}

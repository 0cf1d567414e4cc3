//! Misspelled keywords and unknown data types.

use std::collections::HashSet;

use super::vocabulary::{KEYWORD_TYPOS, TYPE_TYPOS, correction, is_known_type, nearest_type};
use super::{warning_at, with_suggestion};
use crate::diagnostic::Diagnostic;
use crate::lexer::{Lexer, Token};
use crate::outline::{Context, Outline};
use crate::syntax::{BlockKind, parse_enum_header, parse_field};

/// Leading words of top-level statements and of block headers inside
/// tables, matched exactly against known misspellings.
pub(super) fn check_keywords(outline: &Outline) -> Vec<Diagnostic> {
    outline
        .statements
        .iter()
        .filter(|s| match s.context {
            Context::TopLevel => true,
            Context::Table(_) => s.opens.is_some(),
            _ => false,
        })
        .filter_map(|s| {
            let tok = Lexer::new(&s.text).next_token()?;
            let Token::Word(word) = &tok.token else {
                return None;
            };
            let lower = word.to_lowercase();
            let (_, fix) = KEYWORD_TYPOS.iter().find(|(typo, _)| *typo == lower)?;
            Some(warning_at(
                s,
                tok.start,
                tok.end,
                with_suggestion(format!("Unknown keyword \"{word}\""), Some(*fix)),
            ))
        })
        .collect()
}

/// Field types must be a known type or a declared enum.
pub(super) fn check_types(outline: &Outline) -> Vec<Diagnostic> {
    let enums: HashSet<String> = outline
        .blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Enum)
        .filter_map(|b| outline.header(b))
        .filter_map(|h| parse_enum_header(&h.text))
        .map(|name| name.value().to_lowercase())
        .collect();

    let is_enum = |ty: &str| {
        enums.contains(ty) || ty.rsplit('.').next().is_some_and(|last| enums.contains(last))
    };

    outline
        .statements
        .iter()
        .filter(|s| matches!(s.context, Context::Table(_)) && s.opens.is_none())
        .filter_map(|s| {
            let field = parse_field(&s.text)?;
            let base = field.base_type();
            if is_known_type(&base) || is_enum(&base) {
                return None;
            }
            let suggestion = correction(TYPE_TYPOS, &base).or_else(|| nearest_type(&base));
            Some(warning_at(
                s,
                field.type_start,
                field.type_end,
                with_suggestion(format!("Unknown data type \"{}\"", field.data_type), suggestion),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misspelled_top_level_keyword() {
        let found = check_keywords(&Outline::build("Tabel users {\n id int\n}\nReff: a.b > c.d"));
        let messages: Vec<_> = found.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Unknown keyword \"Tabel\". Did you mean \"Table\"?",
                "Unknown keyword \"Reff\". Did you mean \"Ref\"?",
            ]
        );
        assert_eq!((found[0].column, found[0].end_column), (1, 6));
    }

    #[test]
    fn test_misspelled_nested_header() {
        let found = check_keywords(&Outline::build("Table a {\n  id int\n  indexs {\n  }\n}"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 3);
    }

    #[test]
    fn test_field_names_are_not_keywords() {
        assert!(check_keywords(&Outline::build("Table a {\n  tabel int\n}")).is_empty());
    }

    #[test]
    fn test_unknown_type_with_suggestion() {
        let found = check_types(&Outline::build("Table a {\n  name strng\n  age intger(4)\n}"));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].message, "Unknown data type \"strng\". Did you mean \"string\"?");
        assert_eq!((found[0].column, found[0].end_column), (8, 13));
        assert_eq!(
            found[1].message,
            "Unknown data type \"intger(4)\". Did you mean \"integer\"?"
        );
    }

    #[test]
    fn test_unknown_type_without_suggestion() {
        let found = check_types(&Outline::build("Table a {\n  x zzz\n}"));
        assert_eq!(found[0].message, "Unknown data type \"zzz\"");
    }

    #[test]
    fn test_enum_types_are_known() {
        let text = "Table a {\n  s status\n  t public.status\n  u VARCHAR(10)\n}\nEnum status {\n  on\n}";
        assert!(check_types(&Outline::build(text)).is_empty());
    }
}

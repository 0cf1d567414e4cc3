//! Static word lists and misspelling tables.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Data types accepted without a warning, in suggestion priority order.
pub const KNOWN_TYPES: &[&str] = &[
    "int",
    "integer",
    "tinyint",
    "smallint",
    "mediumint",
    "bigint",
    "serial",
    "smallserial",
    "bigserial",
    "float",
    "double",
    "real",
    "decimal",
    "numeric",
    "number",
    "money",
    "bool",
    "boolean",
    "bit",
    "char",
    "nchar",
    "varchar",
    "nvarchar",
    "text",
    "tinytext",
    "mediumtext",
    "longtext",
    "string",
    "uuid",
    "guid",
    "date",
    "time",
    "timetz",
    "datetime",
    "datetime2",
    "timestamp",
    "timestamptz",
    "interval",
    "year",
    "json",
    "jsonb",
    "xml",
    "blob",
    "binary",
    "varbinary",
    "bytea",
    "enum",
    "inet",
    "cidr",
    "macaddr",
    "point",
    "geometry",
    "geography",
    "image",
];

static KNOWN_TYPE_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| KNOWN_TYPES.iter().copied().collect());

pub fn is_known_type(name: &str) -> bool {
    KNOWN_TYPE_SET.contains(name)
}

pub const TYPE_TYPOS: &[(&str, &str)] = &[
    ("strng", "string"),
    ("sting", "string"),
    ("stirng", "string"),
    ("interger", "integer"),
    ("integr", "integer"),
    ("intger", "integer"),
    ("itn", "int"),
    ("nit", "int"),
    ("varchr", "varchar"),
    ("varhcar", "varchar"),
    ("vachar", "varchar"),
    ("boolen", "boolean"),
    ("bolean", "boolean"),
    ("tiemstamp", "timestamp"),
    ("timestmp", "timestamp"),
    ("timestap", "timestamp"),
    ("datetiem", "datetime"),
    ("dat", "date"),
    ("txt", "text"),
    ("tetx", "text"),
    ("flaot", "float"),
    ("flot", "float"),
    ("decmial", "decimal"),
    ("dobule", "double"),
    ("doubel", "double"),
    ("jsno", "json"),
    ("uudi", "uuid"),
];

/// Top-level and table-body keywords with their common misspellings.
pub const KEYWORD_TYPOS: &[(&str, &str)] = &[
    ("tabel", "Table"),
    ("tbale", "Table"),
    ("talbe", "Table"),
    ("tabl", "Table"),
    ("tble", "Table"),
    ("tables", "Table"),
    ("reff", "Ref"),
    ("refs", "Ref"),
    ("rf", "Ref"),
    ("enm", "Enum"),
    ("enume", "Enum"),
    ("eunm", "Enum"),
    ("projet", "Project"),
    ("porject", "Project"),
    ("indexs", "indexes"),
    ("indexe", "indexes"),
    ("idexes", "indexes"),
    ("indxes", "indexes"),
    ("ntoe", "Note"),
    ("noet", "Note"),
    ("nots", "Note"),
];

/// Setting words that are accepted on their own inside `[...]`.
pub const FLAG_SETTINGS: &[&str] = &[
    "pk",
    "primary key",
    "null",
    "not null",
    "unique",
    "increment",
    "auto_increment",
];

pub const REFERENTIAL_ACTIONS: &[&str] =
    &["cascade", "restrict", "set null", "set default", "no action"];

pub const CONSTRAINT_TYPOS: &[(&str, &str)] = &[
    ("primarykey", "primary key"),
    ("primary_key", "primary key"),
    ("primay key", "primary key"),
    ("pirmary key", "primary key"),
    ("primary", "primary key"),
    ("p k", "pk"),
    ("notnull", "not null"),
    ("not_null", "not null"),
    ("not nul", "not null"),
    ("nto null", "not null"),
    ("non null", "not null"),
    ("nullable", "null"),
    ("unqiue", "unique"),
    ("uniqe", "unique"),
    ("uniq", "unique"),
    ("incremnt", "increment"),
    ("incremet", "increment"),
    ("autoincrement", "increment"),
    ("auto increment", "increment"),
    ("defualt", "default:"),
    ("deafult", "default:"),
    ("dafault", "default:"),
    ("ntoe", "note:"),
    ("noet", "note:"),
    ("references", "ref:"),
    ("reference", "ref:"),
    ("refs", "ref:"),
    ("ondelete", "delete:"),
    ("on delete", "delete:"),
    ("onupdate", "update:"),
    ("on update", "update:"),
];

pub const ACTION_TYPOS: &[(&str, &str)] = &[
    ("cascde", "cascade"),
    ("cacade", "cascade"),
    ("casade", "cascade"),
    ("restirct", "restrict"),
    ("restric", "restrict"),
    ("setnull", "set null"),
    ("set_null", "set null"),
    ("setdefault", "set default"),
    ("noaction", "no action"),
];

/// Correction for `word` from a typo table: an exact key first, then the
/// first key that occurs inside `word`.
pub fn correction(table: &[(&str, &'static str)], word: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(typo, _)| *typo == word)
        .or_else(|| table.iter().find(|(typo, _)| word.contains(typo)))
        .map(|(_, fix)| *fix)
}

/// The known type sharing the longest prefix (at least three characters)
/// with `word`.
pub fn nearest_type(word: &str) -> Option<&'static str> {
    let shared = |candidate: &str| {
        word.chars()
            .zip(candidate.chars())
            .take_while(|(a, b)| a == b)
            .count()
    };
    let mut best: Option<(&'static str, usize)> = None;
    for &candidate in KNOWN_TYPES {
        let len = shared(candidate);
        if len >= 3 && best.is_none_or(|(_, b)| len > b) {
            best = Some((candidate, len));
        }
    }
    best.map(|(t, _)| t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correction_exact_then_substring() {
        assert_eq!(correction(TYPE_TYPOS, "strng"), Some("string"));
        assert_eq!(correction(TYPE_TYPOS, "mystrng"), Some("string"));
        assert_eq!(correction(TYPE_TYPOS, "zzz"), None);
    }

    #[test]
    fn test_nearest_type() {
        assert_eq!(nearest_type("varchar2"), Some("varchar"));
        assert_eq!(nearest_type("timestampz"), Some("timestamp"));
        assert_eq!(nearest_type("zz"), None);
    }

    #[test]
    fn test_known_types() {
        assert!(is_known_type("varchar"));
        assert!(!is_known_type("VARCHAR"));
    }
}

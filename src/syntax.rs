//! Line grammars shared by the validator and the extractor.
//!
//! Every function here takes one trimmed statement and returns a structured
//! result, or `None` when the statement does not have the expected shape.
//! Byte offsets in results are relative to the statement text.

use crate::lexer::{Lexer, Spanned, Token};
use crate::schema::RelationKind;

/// What a `{` opens, judged from the statement in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Table,
    Enum,
    Ref,
    /// Any block inside a table body (`indexes`, `Note`, ...).
    Nested,
    Other,
}

/// Classify a top-level block header by its leading keyword.
pub fn classify_block(header: &str) -> BlockKind {
    match Lexer::new(header).next_token() {
        Some(t) if t.is_word("table") => BlockKind::Table,
        Some(t) if t.is_word("enum") => BlockKind::Enum,
        Some(t) if t.is_word("ref") => BlockKind::Ref,
        _ => BlockKind::Other,
    }
}

/// A possibly schema-qualified name with quotes stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub parts: Vec<String>,
    pub start: usize,
    pub end: usize,
}

impl Name {
    pub fn value(&self) -> String {
        self.parts.join(".")
    }
}

fn parse_name(tokens: &[Spanned], i: usize) -> Option<(Name, usize)> {
    let first = tokens.get(i)?;
    let mut parts = vec![first.name()?.to_string()];
    let mut end = first.end;
    let mut j = i + 1;

    while let (Some(dot), Some(next)) = (tokens.get(j), tokens.get(j + 1)) {
        if dot.token != Token::Dot || dot.start != end {
            break;
        }
        let Some(part) = next.name() else { break };
        parts.push(part.to_string());
        end = next.end;
        j += 2;
    }

    Some((
        Name {
            parts,
            start: first.start,
            end,
        },
        j,
    ))
}

fn is_identifier(tok: &Spanned) -> bool {
    match &tok.token {
        Token::Word(w) => w
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_'),
        Token::Str(s) => !s.is_empty(),
        _ => false,
    }
}

/// One comma-separated item of a `[...]` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    /// Raw text as written, without surrounding whitespace.
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Setting {
    /// Lowercased text with runs of whitespace collapsed.
    pub fn normalized(&self) -> String {
        self.text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Lowercased part before the first `:`, if there is one.
    pub fn key(&self) -> Option<String> {
        self.text
            .split_once(':')
            .map(|(k, _)| k.trim().to_lowercase())
    }

    /// Raw part after the first `:`.
    pub fn value(&self) -> Option<&str> {
        self.text.split_once(':').map(|(_, v)| v.trim())
    }

    /// The quoted string of a `key: 'text'` setting.
    pub fn string_value(&self) -> Option<String> {
        let tokens = Lexer::new(&self.text).tokenize();
        match tokens.as_slice() {
            [key, colon, value] if key.name().is_some() && colon.token == Token::Colon => {
                match &value.token {
                    Token::Str(s) => Some(s.clone()),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Items of the list opened by the `[` at `tokens[open]`.
struct SettingList {
    settings: Vec<Setting>,
    /// Token index after the list.
    next: usize,
    /// Whether the `]` was found. An unclosed list runs to the end.
    closed: bool,
}

fn parse_settings(src: &str, tokens: &[Spanned], open: usize) -> SettingList {
    let mut settings = Vec::new();
    let mut depth = 0usize;
    let mut item_start = open + 1;
    let mut j = open + 1;

    let close_item = |from: usize, to: usize, settings: &mut Vec<Setting>| {
        if from < to {
            let (start, end) = (tokens[from].start, tokens[to - 1].end);
            settings.push(Setting {
                text: src[start..end].to_string(),
                start,
                end,
            });
        }
    };

    while let Some(tok) = tokens.get(j) {
        match tok.token {
            Token::LParen | Token::LBracket => depth += 1,
            Token::RBracket if depth == 0 => {
                close_item(item_start, j, &mut settings);
                return SettingList {
                    settings,
                    next: j + 1,
                    closed: true,
                };
            }
            Token::RParen | Token::RBracket => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                close_item(item_start, j, &mut settings);
                item_start = j + 1;
            }
            _ => {}
        }
        j += 1;
    }

    close_item(item_start, tokens.len(), &mut settings);
    SettingList {
        settings,
        next: tokens.len(),
        closed: false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableHeader {
    pub keyword_start: usize,
    pub keyword_end: usize,
    pub name: Option<Name>,
    pub alias: Option<String>,
    pub settings: Vec<Setting>,
}

/// `Table <name> [as <alias>] [settings]`. Returns `None` unless the
/// statement starts with the `Table` keyword.
pub fn parse_table_header(src: &str) -> Option<TableHeader> {
    let tokens = Lexer::new(src).tokenize();
    let keyword = tokens.first().filter(|t| t.is_word("table"))?;
    let mut header = TableHeader {
        keyword_start: keyword.start,
        keyword_end: keyword.end,
        name: None,
        alias: None,
        settings: Vec::new(),
    };

    let mut i = 1;
    if let Some(tok) = tokens.get(i)
        && is_identifier(tok)
        && !tok.is_word("as")
        && let Some((name, next)) = parse_name(&tokens, i)
    {
        header.name = Some(name);
        i = next;
    }

    if tokens.get(i).is_some_and(|t| t.is_word("as")) {
        header.alias = tokens.get(i + 1).and_then(|t| t.name()).map(str::to_string);
        i += 2;
    }

    if tokens.get(i).is_some_and(|t| t.token == Token::LBracket) {
        header.settings = parse_settings(src, &tokens, i).settings;
    }

    Some(header)
}

/// `Enum <name>`; returns the name.
pub fn parse_enum_header(src: &str) -> Option<Name> {
    let tokens = Lexer::new(src).tokenize();
    if !tokens.first()?.is_word("enum") {
        return None;
    }
    parse_name(&tokens, 1).map(|(name, _)| name)
}

/// First identifier of an enum body line.
pub fn parse_enum_value(src: &str) -> Option<String> {
    let tok = Lexer::new(src).next_token()?;
    tok.name().map(str::to_string)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldHead {
    pub name: String,
    pub name_start: usize,
    pub name_end: usize,
    /// The type as written, including any `(...)` arguments or `[]` suffix.
    pub data_type: String,
    pub type_start: usize,
    pub type_end: usize,
    pub settings: Vec<Setting>,
    /// A `(` or `[` was left open. Everything after it is read on a best
    /// effort basis.
    pub unterminated: bool,
}

impl FieldHead {
    /// Lowercased type without arguments or array suffix.
    pub fn base_type(&self) -> String {
        let cut = self
            .data_type
            .find(['(', '['])
            .unwrap_or(self.data_type.len());
        self.data_type[..cut].trim().trim_matches('"').to_lowercase()
    }
}

/// `<identifier> <type-token> [rest]`.
///
/// A line still being typed keeps its head: an unclosed `(` ends the type at
/// the next `[` (or the end of the line) and an unclosed `[` takes the rest
/// of the line as settings.
pub fn parse_field(src: &str) -> Option<FieldHead> {
    let tokens = Lexer::new(src).tokenize();
    let name = tokens.first().filter(|t| is_identifier(t))?;
    let ty = tokens.get(1).filter(|t| is_identifier(t))?;

    let mut type_end = ty.end;
    let mut unterminated = false;
    let mut j = 2;
    loop {
        match tokens.get(j).map(|t| &t.token) {
            Some(Token::Dot) if tokens.get(j + 1).is_some_and(is_identifier) => {
                type_end = tokens[j + 1].end;
                j += 2;
            }
            Some(Token::LParen) => {
                let mut depth = 0usize;
                let close = tokens[j..].iter().position(|t| match t.token {
                    Token::LParen => {
                        depth += 1;
                        false
                    }
                    Token::RParen => {
                        depth -= 1;
                        depth == 0
                    }
                    _ => false,
                });
                if let Some(close) = close {
                    type_end = tokens[j + close].end;
                    j += close + 1;
                    continue;
                }
                unterminated = true;
                let stop = tokens[j..]
                    .iter()
                    .position(|t| t.token == Token::LBracket)
                    .map_or(tokens.len(), |at| j + at);
                type_end = tokens[stop - 1].end;
                j = stop;
                break;
            }
            Some(Token::LBracket)
                if tokens[j].start == type_end
                    && tokens.get(j + 1).is_some_and(|t| t.token == Token::RBracket) =>
            {
                type_end = tokens[j + 1].end;
                j += 2;
            }
            _ => break,
        }
    }

    let settings = match tokens.get(j) {
        Some(t) if t.token == Token::LBracket => {
            let list = parse_settings(src, &tokens, j);
            unterminated |= !list.closed;
            list.settings
        }
        _ => Vec::new(),
    };

    Some(FieldHead {
        name: name.name().unwrap_or_default().to_string(),
        name_start: name.start,
        name_end: name.end,
        data_type: src[ty.start..type_end].trim_end().to_string(),
        type_start: ty.start,
        type_end,
        settings,
        unterminated,
    })
}

/// `Note: '...'` inside a table body.
pub fn parse_note_line(src: &str) -> Option<Option<String>> {
    let tokens = Lexer::new(src).tokenize();
    if !(tokens.first()?.is_word("note") && tokens.get(1)?.token == Token::Colon) {
        return None;
    }
    Some(match tokens.get(2).map(|t| &t.token) {
        Some(Token::Str(s)) => Some(s.clone()),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRef {
    pub table: String,
    pub field: String,
    pub start: usize,
    pub end: usize,
}

fn parse_endpoint(tokens: &[Spanned], i: usize) -> Option<(EndpointRef, usize)> {
    let (mut name, next) = parse_name(tokens, i)?;
    if name.parts.len() < 2 {
        return None;
    }
    let field = name.parts.pop()?;
    Some((
        EndpointRef {
            table: name.parts.join("."),
            field,
            start: name.start,
            end: name.end,
        },
        next,
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefBody {
    pub from: EndpointRef,
    pub kind: RelationKind,
    pub to: EndpointRef,
    pub settings: Vec<Setting>,
}

impl RefBody {
    /// Raw value of a trailing `delete:`/`update:` setting.
    pub fn action(&self, key: &str) -> Option<String> {
        self.settings
            .iter()
            .find(|s| s.key().as_deref() == Some(key))
            .and_then(|s| s.value())
            .map(|v| v.to_lowercase())
    }
}

fn parse_ref_tokens(src: &str, tokens: &[Spanned], i: usize) -> Option<RefBody> {
    let (from, j) = parse_endpoint(tokens, i)?;
    let kind = match tokens.get(j).map(|t| &t.token) {
        Some(Token::Op(op)) => RelationKind::from_op(op)?,
        _ => return None,
    };
    let (to, mut j) = parse_endpoint(tokens, j + 1)?;

    let mut settings = Vec::new();
    if tokens.get(j).is_some_and(|t| t.token == Token::LBracket) {
        let list = parse_settings(src, tokens, j);
        if !list.closed {
            return None;
        }
        settings = list.settings;
        j = list.next;
    }

    (j == tokens.len()).then_some(RefBody {
        from,
        kind,
        to,
        settings,
    })
}

/// One line of a `Ref { ... }` block: `a.x > b.y [settings]`.
pub fn parse_ref_body(src: &str) -> Option<RefBody> {
    let tokens = Lexer::new(src).tokenize();
    parse_ref_tokens(src, &tokens, 0)
}

/// Whether the statement starts with the `Ref` keyword.
pub fn is_ref_statement(src: &str) -> bool {
    Lexer::new(src)
        .next_token()
        .is_some_and(|t| t.is_word("ref"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefStatement {
    pub name: Option<String>,
    pub body: RefBody,
}

/// `Ref [name]: a.x > b.y [settings]`.
pub fn parse_ref_statement(src: &str) -> Option<RefStatement> {
    let tokens = Lexer::new(src).tokenize();
    if !tokens.first()?.is_word("ref") {
        return None;
    }

    let (name, start) = match (tokens.get(1), tokens.get(2)) {
        (Some(colon), _) if colon.token == Token::Colon => (None, 2),
        (Some(name), Some(colon)) if colon.token == Token::Colon && is_identifier(name) => {
            (name.name().map(str::to_string), 3)
        }
        _ => return None,
    };

    let body = parse_ref_tokens(src, &tokens, start)?;
    Some(RefStatement { name, body })
}

/// `ref: > table.field` inside a field's settings.
pub fn parse_inline_ref(setting: &str) -> Option<(RelationKind, EndpointRef)> {
    let tokens = Lexer::new(setting).tokenize();
    if !(tokens.first()?.is_word("ref") && tokens.get(1)?.token == Token::Colon) {
        return None;
    }
    let kind = match tokens.get(2).map(|t| &t.token) {
        Some(Token::Op(op)) => RelationKind::from_op(op)?,
        _ => return None,
    };
    let (endpoint, next) = parse_endpoint(&tokens, 3)?;
    (next == tokens.len()).then_some((kind, endpoint))
}

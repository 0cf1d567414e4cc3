//! Lexical layer: comment stripping, brace events and per-segment tokens.
//!
//! [`scan`] walks the whole text once and produces one [`ScannedLine`] per
//! source line. Comments are blanked out with spaces so that character
//! columns stay aligned with the original text, and braces inside strings or
//! comments never produce events.

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

/// A brace or a run of text between braces on one line.
/// Offsets are byte offsets into [`ScannedLine::code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Text(Range<usize>),
    Open(usize),
    Close(usize),
}

#[derive(Debug, Clone)]
pub struct ScannedLine {
    /// 1-based line number.
    pub number: usize,
    /// The line starts inside a `'''` string opened on an earlier line.
    pub continues_string: bool,
    /// The line with comments replaced by spaces.
    pub code: String,
    pub events: Vec<Event>,
}

impl ScannedLine {
    /// 1-based character column of a byte offset into `code`.
    pub fn column(&self, byte: usize) -> usize {
        let byte = byte.min(self.code.len());
        self.code[..byte].chars().count() + 1
    }

    /// Column one past the last non-blank character (at least 2).
    pub fn end_column(&self) -> usize {
        self.column(self.code.trim_end().len()).max(2)
    }

    pub fn text(&self, range: &Range<usize>) -> &str {
        &self.code[range.clone()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    Code,
    BlockComment,
    Quoted(char),
    TripleQuoted,
}

/// Split `input` into scanned lines.
pub fn scan(input: &str) -> Vec<ScannedLine> {
    let mut state = ScanState::Code;
    let mut lines = Vec::new();

    for (idx, raw) in input.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let continues_string = state == ScanState::TripleQuoted;
        let chars: Vec<char> = raw.chars().collect();
        let mut code = String::with_capacity(raw.len());
        let mut events = Vec::new();
        let mut segment_start = 0;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            match state {
                ScanState::BlockComment => {
                    if c == '*' && next == Some('/') {
                        code.push_str("  ");
                        i += 2;
                        state = ScanState::Code;
                        continue;
                    }
                    code.push(' ');
                }
                ScanState::Quoted(quote) => {
                    code.push(c);
                    if c == '\\' {
                        if let Some(n) = next {
                            code.push(n);
                            i += 1;
                        }
                    } else if c == quote {
                        state = ScanState::Code;
                    }
                }
                ScanState::TripleQuoted => {
                    code.push(c);
                    if c == '\'' && next == Some('\'') && chars.get(i + 2) == Some(&'\'') {
                        code.push_str("''");
                        i += 2;
                        state = ScanState::Code;
                    }
                }
                ScanState::Code => match c {
                    '/' if next == Some('/') => break,
                    '/' if next == Some('*') => {
                        code.push_str("  ");
                        i += 2;
                        state = ScanState::BlockComment;
                        continue;
                    }
                    '\'' if next == Some('\'') && chars.get(i + 2) == Some(&'\'') => {
                        code.push_str("'''");
                        i += 3;
                        state = ScanState::TripleQuoted;
                        continue;
                    }
                    '\'' | '"' | '`' => {
                        code.push(c);
                        state = ScanState::Quoted(c);
                    }
                    '{' | '}' => {
                        if code.len() > segment_start {
                            events.push(Event::Text(segment_start..code.len()));
                        }
                        let at = code.len();
                        events.push(if c == '{' {
                            Event::Open(at)
                        } else {
                            Event::Close(at)
                        });
                        code.push(c);
                        segment_start = code.len();
                    }
                    _ => code.push(c),
                },
            }
            i += 1;
        }

        if code.len() > segment_start {
            events.push(Event::Text(segment_start..code.len()));
        }

        // Single-line strings end with their line.
        if matches!(state, ScanState::Quoted(_)) {
            state = ScanState::Code;
        }

        lines.push(ScannedLine {
            number: idx + 1,
            continues_string,
            code,
            events,
        });
    }

    lines
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(String),
    Str(String),
    Backtick(String),

    LBracket, // [
    RBracket, // ]
    LParen,   // (
    RParen,   // )
    Comma,    // ,
    Colon,    // :
    Dot,      // .
    Op(&'static str), // - < > <>

    Other(char),
}

/// A token with its byte range inside the tokenized segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

impl Spanned {
    /// Case-insensitive keyword test.
    pub fn is_word(&self, keyword: &str) -> bool {
        matches!(&self.token, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }

    /// The identifier carried by a bare word or a quoted string.
    pub fn name(&self) -> Option<&str> {
        match &self.token {
            Token::Word(w) => Some(w),
            Token::Str(s) => Some(s),
            _ => None,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '#' || c == '$'
}

/// Tolerant tokenizer over one segment. Never fails: unknown characters
/// become [`Token::Other`] and unterminated strings run to the end.
pub struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.src.len())
    }

    fn read_word(&mut self, start: usize) -> String {
        while let Some(&(_, c)) = self.chars.peek() {
            if is_word_char(c) {
                self.chars.next();
            } else {
                break;
            }
        }
        let end = self.offset();
        self.src[start..end].to_string()
    }

    fn read_quoted(&mut self, quote: char) -> String {
        let mut s = String::new();
        while let Some((_, c)) = self.chars.next() {
            if c == '\\' {
                if let Some((_, escaped)) = self.chars.next() {
                    s.push(escaped);
                }
            } else if c == quote {
                return s;
            } else {
                s.push(c);
            }
        }
        s
    }

    fn read_triple_quoted(&mut self) -> String {
        let rest = &self.src[self.offset()..];
        let content_len = rest.find("'''").unwrap_or(rest.len());
        let content = rest[..content_len].to_string();
        let consumed = (content_len + 3).min(rest.len());
        let stop = self.offset() + consumed;
        while self.offset() < stop {
            self.chars.next();
        }
        content
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }

        let (start, c) = self.chars.next()?;
        let token = match c {
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '-' => Token::Op("-"),
            '>' => Token::Op(">"),
            '<' => {
                if matches!(self.chars.peek(), Some((_, '>'))) {
                    self.chars.next();
                    Token::Op("<>")
                } else {
                    Token::Op("<")
                }
            }
            '\'' if self.src[start..].starts_with("'''") => {
                self.chars.next();
                self.chars.next();
                Token::Str(self.read_triple_quoted())
            }
            '\'' | '"' => Token::Str(self.read_quoted(c)),
            '`' => Token::Backtick(self.read_quoted('`')),
            c if is_word_char(c) => Token::Word(self.read_word(start)),
            c => Token::Other(c),
        };

        let end = self.offset();
        Some(Spanned { token, start, end })
    }

    pub fn tokenize(mut self) -> Vec<Spanned> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token() {
            tokens.push(tok);
        }
        tokens
    }
}

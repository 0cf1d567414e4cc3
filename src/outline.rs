//! Block structure of schema text, recovered in one forward pass.
//!
//! Every non-blank run of text between braces becomes a [`Statement`] tagged
//! with the block it sits in. A `{` opens a [`Block`] whose header is the
//! statement in front of it; a `}` closes the innermost open block, and a
//! `}` with nothing open is recorded as stray without disturbing the rest.
//! A `Table ... {` header met inside an open table ends that table's body.

use crate::lexer::{Event, ScannedLine, scan};
use crate::syntax::{BlockKind, classify_block};

/// Where a statement sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    TopLevel,
    /// Directly inside the table block with this index.
    Table(usize),
    Enum(usize),
    Ref(usize),
    /// Anywhere inside a nested block of a table body.
    Nested,
    Other,
}

#[derive(Debug, Clone)]
pub struct Statement {
    pub line: usize,
    /// Trimmed text. Lines continuing a `'''` string are appended after `\n`.
    pub text: String,
    /// Column of the first character of `text`.
    pub column: usize,
    /// Column one past the end of the statement on its first line.
    pub end_column: usize,
    pub context: Context,
    /// Index of the block this statement is the header of.
    pub opens: Option<usize>,
}

impl Statement {
    /// Column of a byte offset into the first line of `text`.
    pub fn column_at(&self, byte: usize) -> usize {
        let first = self.text.split('\n').next().unwrap_or_default();
        let byte = byte.min(first.len());
        self.column + first[..byte].chars().count()
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    /// Statement index of the header, if anything preceded the `{`.
    pub header: Option<usize>,
    pub line: usize,
    pub column: usize,
    pub closed: bool,
}

/// A `}` that had no open block to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrayClose {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct Outline {
    pub lines: Vec<ScannedLine>,
    pub statements: Vec<Statement>,
    pub blocks: Vec<Block>,
    pub stray_closes: Vec<StrayClose>,
    /// Statement indices directly inside each table, enum or ref block.
    bodies: Vec<Vec<usize>>,
    /// Brace depth left at the end of the text.
    open_depth: usize,
}

impl Outline {
    /// Block structure and brace balance are tracked separately. Balance is
    /// the raw `{`/`}` depth. Structure follows the rule that a table body
    /// ends at its `}` or at the next `Table ... {` header, whichever comes
    /// first; a table cut short that way is left on one side and closed by
    /// the first `}` that has no open block to close.
    pub fn build(text: &str) -> Self {
        let lines = scan(text);
        let mut statements: Vec<Statement> = Vec::new();
        let mut blocks: Vec<Block> = Vec::new();
        let mut bodies: Vec<Vec<usize>> = Vec::new();
        let mut stray_closes = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut cut_short: Vec<usize> = Vec::new();
        let mut depth = 0usize;
        let mut pending: Option<usize> = None;

        for line in &lines {
            let mut continuing = line.continues_string;

            for event in &line.events {
                match event {
                    Event::Text(range) => {
                        let raw = line.text(range);
                        let text = raw.trim();
                        if continuing {
                            continuing = false;
                            if let Some(last) = statements.last_mut() {
                                last.text.push('\n');
                                last.text.push_str(raw.trim_end());
                                continue;
                            }
                        }
                        if text.is_empty() {
                            continue;
                        }
                        let start = range.start + (raw.len() - raw.trim_start().len());
                        let context = context_of(&blocks, &stack);
                        let idx = statements.len();
                        if let Context::Table(b) | Context::Enum(b) | Context::Ref(b) = context {
                            bodies[b].push(idx);
                        }
                        statements.push(Statement {
                            line: line.number,
                            text: text.to_string(),
                            column: line.column(start),
                            end_column: line.column(start + text.len()),
                            context,
                            opens: None,
                        });
                        pending = Some(idx);
                    }
                    Event::Open(at) => {
                        continuing = false;
                        depth += 1;
                        let header = pending.take();
                        let classified = header.map(|h| classify_block(&statements[h].text));
                        let kind = match context_of(&blocks, &stack) {
                            Context::TopLevel => classified.unwrap_or(BlockKind::Other),
                            Context::Table(_) | Context::Nested
                                if classified == Some(BlockKind::Table) =>
                            {
                                // The enclosing table never got its `}`.
                                if let Some(h) = header {
                                    if let Some(&top) = stack.last()
                                        && bodies[top].last() == Some(&h)
                                    {
                                        bodies[top].pop();
                                    }
                                    statements[h].context = Context::TopLevel;
                                }
                                cut_short.extend(stack.drain(..));
                                BlockKind::Table
                            }
                            Context::Table(_) | Context::Nested => BlockKind::Nested,
                            _ => BlockKind::Other,
                        };
                        blocks.push(Block {
                            kind,
                            header,
                            line: line.number,
                            column: line.column(*at),
                            closed: false,
                        });
                        bodies.push(Vec::new());
                        let idx = blocks.len() - 1;
                        if let Some(h) = header {
                            statements[h].opens = Some(idx);
                        }
                        stack.push(idx);
                    }
                    Event::Close(at) => {
                        continuing = false;
                        pending = None;
                        if depth == 0 {
                            stray_closes.push(StrayClose {
                                line: line.number,
                                column: line.column(*at),
                            });
                            continue;
                        }
                        depth -= 1;
                        if let Some(idx) = stack.pop().or_else(|| cut_short.pop()) {
                            blocks[idx].closed = true;
                        }
                    }
                }
            }
        }

        Self {
            lines,
            statements,
            blocks,
            stray_closes,
            bodies,
            open_depth: depth,
        }
    }

    pub fn header(&self, block: &Block) -> Option<&Statement> {
        block.header.map(|h| &self.statements[h])
    }

    /// Closing braces still owed at the end of the text.
    pub fn unclosed(&self) -> usize {
        self.open_depth
    }

    /// The last line with any code on it, falling back to the last line.
    pub fn last_code_line(&self) -> Option<&ScannedLine> {
        self.lines
            .iter()
            .rev()
            .find(|l| !l.code.trim().is_empty())
            .or_else(|| self.lines.last())
    }

    /// Statements directly inside the block at `idx`, in source order.
    pub fn body(&self, idx: usize) -> impl Iterator<Item = &Statement> {
        self.bodies
            .get(idx)
            .into_iter()
            .flatten()
            .map(|&i| &self.statements[i])
    }

    pub fn top_level(&self) -> impl Iterator<Item = &Statement> {
        self.statements
            .iter()
            .filter(|s| s.context == Context::TopLevel)
    }
}

fn context_of(blocks: &[Block], stack: &[usize]) -> Context {
    let Some(&top) = stack.last() else {
        return Context::TopLevel;
    };
    match blocks[top].kind {
        BlockKind::Table => Context::Table(top),
        BlockKind::Enum => Context::Enum(top),
        BlockKind::Ref => Context::Ref(top),
        BlockKind::Nested => Context::Nested,
        BlockKind::Other => Context::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_table() {
        let outline = Outline::build("Table A { id int [pk] }");
        assert_eq!(outline.blocks.len(), 1);
        assert_eq!(outline.blocks[0].kind, BlockKind::Table);
        assert!(outline.blocks[0].closed);

        let header = outline.header(&outline.blocks[0]).unwrap();
        assert_eq!(header.text, "Table A");
        assert_eq!((header.column, header.end_column), (1, 8));

        let body: Vec<_> = outline.body(0).map(|s| s.text.as_str()).collect();
        assert_eq!(body, vec!["id int [pk]"]);
    }

    #[test]
    fn test_statement_columns() {
        let outline = Outline::build("Table users {\n    email varchar\n}");
        let field = &outline.statements[1];
        assert_eq!(field.line, 2);
        assert_eq!(field.column, 5);
        assert_eq!(field.end_column, 18);
        assert_eq!(field.column_at(6), 11);
    }

    #[test]
    fn test_nested_blocks_inside_table() {
        let text = "Table A {\n  id int\n  indexes {\n    (id) [unique]\n  }\n  name text\n}";
        let outline = Outline::build(text);
        assert_eq!(outline.blocks[1].kind, BlockKind::Nested);
        let body: Vec<_> = outline.body(0).map(|s| s.text.as_str()).collect();
        assert_eq!(body, vec!["id int", "indexes", "name text"]);
        assert_eq!(outline.statements[3].context, Context::Nested);
        assert_eq!(outline.statements[2].opens, Some(1));
    }

    #[test]
    fn test_header_on_previous_line() {
        let outline = Outline::build("Table A\n{\n  id int\n}");
        assert_eq!(outline.blocks[0].kind, BlockKind::Table);
        assert_eq!(outline.body(0).count(), 1);
    }

    #[test]
    fn test_stray_close_does_not_unbalance() {
        let outline = Outline::build("Table A {\n id int\n}\n}\nTable B {\n id int\n}");
        assert_eq!(outline.stray_closes, vec![StrayClose { line: 4, column: 1 }]);
        assert_eq!(outline.unclosed(), 0);
        assert_eq!(outline.blocks[1].kind, BlockKind::Table);
    }

    #[test]
    fn test_unclosed_blocks() {
        let outline = Outline::build("Table A {\n id int\nTable B {\n x int");
        assert_eq!(outline.unclosed(), 2);
        assert_eq!(outline.blocks[1].kind, BlockKind::Table);
        assert_eq!(outline.last_code_line().unwrap().number, 4);
    }

    #[test]
    fn test_table_header_ends_unclosed_table() {
        let text = "Table A {\n  id int\nTable B {\n  a_id int\n}\nRef: B.a_id > A.id";
        let outline = Outline::build(text);
        let contexts: Vec<_> = outline.statements.iter().map(|s| s.context).collect();
        assert_eq!(
            contexts,
            vec![
                Context::TopLevel,
                Context::Table(0),
                Context::TopLevel,
                Context::Table(1),
                Context::TopLevel,
            ]
        );
        let body: Vec<_> = outline.body(0).map(|s| s.text.as_str()).collect();
        assert_eq!(body, vec!["id int"]);
        assert!(!outline.blocks[0].closed && outline.blocks[1].closed);
        assert_eq!(outline.unclosed(), 1);
    }

    #[test]
    fn test_late_close_finishes_cut_short_table() {
        let outline = Outline::build("Table A {\n id int\nTable B {\n x int\n}\n}");
        assert_eq!(outline.unclosed(), 0);
        assert!(outline.stray_closes.is_empty());
        assert!(outline.blocks.iter().all(|b| b.closed));
    }

    #[test]
    fn test_multiline_note_is_merged() {
        let text = "Table A {\n  Note: '''\n  { not a block }\n  '''\n  id int\n}";
        let outline = Outline::build(text);
        assert_eq!(outline.blocks.len(), 1);
        let body: Vec<_> = outline.body(0).collect();
        assert_eq!(body.len(), 2);
        assert!(body[0].text.starts_with("Note: '''"));
        assert!(body[0].text.ends_with("'''"));
        assert_eq!(body[1].text, "id int");
    }

    #[test]
    fn test_contexts() {
        let text = "Enum s {\n a\n}\nRef {\n a.x > b.y\n}\nProject p {\n x\n}\nRef: a.x > b.y";
        let outline = Outline::build(text);
        let contexts: Vec<_> = outline.statements.iter().map(|s| s.context).collect();
        assert_eq!(
            contexts,
            vec![
                Context::TopLevel,
                Context::Enum(0),
                Context::TopLevel,
                Context::Ref(1),
                Context::TopLevel,
                Context::Other,
                Context::TopLevel,
            ]
        );
    }
}

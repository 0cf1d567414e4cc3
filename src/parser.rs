//! Schema extractor.
//!
//! Tolerant by construction: it never rejects text, it only recognizes what
//! it can. Tables come from `Table` blocks, fields from lines directly inside
//! them, and relationships from inline `ref:` settings followed by
//! standalone `Ref` statements and `Ref { }` block lines in source order.

use std::collections::{HashMap, HashSet};
use std::panic;

use log::{debug, error};

use crate::lexer::Lexer;
use crate::outline::{Context, Outline};
use crate::schema::{
    Endpoint, EnumDef, Field, RelationKind, RelationOrigin, Relationship, Schema, Table,
};
use crate::syntax::{
    BlockKind, EndpointRef, FieldHead, RefBody, parse_enum_header, parse_enum_value, parse_field,
    parse_inline_ref, parse_note_line, parse_ref_body, parse_ref_statement, parse_table_header,
};

/// Extract a schema from `text`. An internal failure yields an empty schema.
pub fn extract(text: &str) -> Schema {
    match panic::catch_unwind(|| Parser::new(text).parse()) {
        Ok(schema) => schema,
        Err(_) => {
            error!("Schema extraction failed internally");
            Schema::default()
        }
    }
}

pub struct Parser {
    outline: Outline,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            outline: Outline::build(input),
        }
    }

    pub fn parse(&self) -> Schema {
        let mut schema = Schema::default();

        for (idx, block) in self.outline.blocks.iter().enumerate() {
            match block.kind {
                BlockKind::Table => {
                    if let Some(table) = self.parse_table(idx, &mut schema.relationships) {
                        schema.tables.push(table);
                    }
                }
                BlockKind::Enum => {
                    if let Some(def) = self.parse_enum(idx) {
                        schema.enums.push(def);
                    }
                }
                _ => {}
            }
        }

        schema.relationships.extend(self.parse_standalone_refs());
        resolve_aliases(&mut schema);

        debug!(
            tables = schema.tables.len(),
            relationships = schema.relationships.len(),
            enums = schema.enums.len();
            "Extracted schema",
        );
        schema
    }

    /// A table and the relationships declared inline on its fields.
    fn parse_table(&self, idx: usize, relationships: &mut Vec<Relationship>) -> Option<Table> {
        let header = self.outline.header(&self.outline.blocks[idx])?;
        let parsed = parse_table_header(&header.text)?;
        let mut table = Table::new(parsed.name?.value());
        table.alias = parsed.alias;

        for setting in &parsed.settings {
            match setting.key().as_deref() {
                Some("headercolor") => table.color = setting.value().map(str::to_string),
                Some("note") => table.note = setting.string_value(),
                _ => {}
            }
        }

        for stmt in self.outline.body(idx).filter(|s| s.opens.is_none()) {
            if let Some(note) = parse_note_line(&stmt.text) {
                table.note = note.map(|n| n.trim().to_string());
                continue;
            }
            if parse_ref_statement(&stmt.text).is_some() {
                continue;
            }
            let Some(head) = parse_field(&stmt.text) else {
                continue;
            };
            let (field, refs) = parse_field_head(head);
            for (kind, target) in refs {
                let mut rel = Relationship::new(
                    Endpoint::new(table.name.clone(), field.name.clone()),
                    kind,
                    endpoint(target),
                );
                rel.origin = RelationOrigin::Inline;
                relationships.push(rel);
            }
            table.fields.push(field);
        }

        Some(table)
    }

    fn parse_enum(&self, idx: usize) -> Option<EnumDef> {
        let header = self.outline.header(&self.outline.blocks[idx])?;
        let name = parse_enum_header(&header.text)?;
        let values = self
            .outline
            .body(idx)
            .filter_map(|s| parse_enum_value(&s.text))
            .collect();
        Some(EnumDef {
            name: name.value(),
            values,
        })
    }

    /// `Ref:` statements anywhere in the text and `Ref { }` block lines, in
    /// source order.
    fn parse_standalone_refs(&self) -> Vec<Relationship> {
        self.outline
            .statements
            .iter()
            .filter(|stmt| stmt.opens.is_none())
            .filter_map(|stmt| match stmt.context {
                Context::Ref(block) => {
                    let body = parse_ref_body(&stmt.text)?;
                    Some(relationship(body, self.ref_block_name(block)))
                }
                _ => {
                    let parsed = parse_ref_statement(&stmt.text)?;
                    Some(relationship(parsed.body, parsed.name))
                }
            })
            .collect()
    }

    /// The name in a `Ref <name> {` header.
    fn ref_block_name(&self, block: usize) -> Option<String> {
        let header = self.outline.header(&self.outline.blocks[block])?;
        let tokens = Lexer::new(&header.text).tokenize();
        tokens.get(1).and_then(|t| t.name()).map(str::to_string)
    }
}

fn parse_field_head(head: FieldHead) -> (Field, Vec<(RelationKind, EndpointRef)>) {
    let mut field = Field::new(head.name, head.data_type);
    let mut refs = Vec::new();

    for setting in &head.settings {
        match setting.key().as_deref() {
            Some("note") => field.note = setting.string_value(),
            Some("default") => field.default = setting.value().map(str::to_string),
            Some("ref") => {
                if let Some(target) = parse_inline_ref(&setting.text) {
                    refs.push(target);
                }
            }
            Some(_) => {}
            None => {
                let flag = setting.normalized();
                if flag.contains("pk") || flag.contains("primary key") {
                    field.is_primary_key = true;
                }
                match flag.as_str() {
                    "not null" => field.not_null = true,
                    "unique" => field.unique = true,
                    "increment" | "auto_increment" => field.increment = true,
                    _ => {}
                }
            }
        }
    }

    (field, refs)
}

fn endpoint(target: EndpointRef) -> Endpoint {
    Endpoint::new(target.table, target.field)
}

fn relationship(body: RefBody, name: Option<String>) -> Relationship {
    let on_delete = body.action("delete");
    let on_update = body.action("update");
    let mut rel = Relationship::new(endpoint(body.from), body.kind, endpoint(body.to));
    rel.name = name;
    rel.on_delete = on_delete;
    rel.on_update = on_update;
    rel
}

/// Rewrite endpoints that name a table alias to the table's real name.
/// A real table name always wins over an alias.
fn resolve_aliases(schema: &mut Schema) {
    let names: HashSet<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    let mut aliases: HashMap<&str, &str> = HashMap::new();
    for table in &schema.tables {
        if let Some(alias) = &table.alias {
            aliases.entry(alias.as_str()).or_insert(table.name.as_str());
        }
    }

    let resolve = |endpoint: &mut Endpoint| {
        if names.contains(endpoint.table.as_str()) {
            return;
        }
        if let Some(real) = aliases.get(endpoint.table.as_str()) {
            endpoint.table = real.to_string();
        }
    };

    for rel in &mut schema.relationships {
        resolve(&mut rel.from);
        resolve(&mut rel.to);
    }
}

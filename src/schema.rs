//! In-memory schema model produced by the extractor.

use crate::geometry::{Point, Size};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    pub enums: Vec<EnumDef>,
}

impl Schema {
    /// First table declared under `name`. Names are only softly unique.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub alias: Option<String>,
    /// Display order is declaration order.
    pub fields: Vec<Field>,
    pub note: Option<String>,
    pub color: Option<String>,
    pub position: Point,
    pub size: Size,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            fields: Vec::new(),
            note: None,
            color: None,
            position: Point::default(),
            size: Size::default(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// 0-based index of the first field named `name`.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub is_primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
    pub increment: bool,
    pub default: Option<String>,
    pub note: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            not_null: false,
            unique: false,
            increment: false,
            default: None,
            note: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }
}

/// Relationship operator as written in the text.
///
/// `>` and `<` are one-way and point at one end; `<>` points at both and
/// `-` at neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationKind {
    /// `-`
    #[serde(rename = "-")]
    OneToOne,
    /// `>`, pointing at `to`.
    #[serde(rename = ">")]
    Forward,
    /// `<`, pointing at `from`.
    #[serde(rename = "<")]
    Backward,
    /// `<>`
    #[serde(rename = "<>")]
    ManyToMany,
}

impl RelationKind {
    pub fn from_op(op: &str) -> Option<Self> {
        match op {
            "-" => Some(Self::OneToOne),
            ">" => Some(Self::Forward),
            "<" => Some(Self::Backward),
            "<>" => Some(Self::ManyToMany),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::OneToOne => "-",
            Self::Forward => ">",
            Self::Backward => "<",
            Self::ManyToMany => "<>",
        }
    }

    /// Whether an arrowhead is drawn where the line meets the `from` table.
    pub fn arrow_at_from(&self) -> bool {
        matches!(self, Self::Backward | Self::ManyToMany)
    }

    /// Whether an arrowhead is drawn where the line meets the `to` table.
    pub fn arrow_at_to(&self) -> bool {
        matches!(self, Self::Forward | Self::ManyToMany)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub table: String,
    pub field: String,
}

impl Endpoint {
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationOrigin {
    /// `[ref: > table.field]` on a field.
    Inline,
    /// A `Ref:` statement or a line of a `Ref { }` block.
    Standalone,
}

/// Endpoints are names only; they are never checked against the tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub from: Endpoint,
    pub to: Endpoint,
    pub kind: RelationKind,
    pub name: Option<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
    pub origin: RelationOrigin,
}

impl Relationship {
    pub fn new(from: Endpoint, kind: RelationKind, to: Endpoint) -> Self {
        Self {
            from,
            to,
            kind,
            name: None,
            on_delete: None,
            on_update: None,
            origin: RelationOrigin::Standalone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_kind_ops() {
        for op in ["-", ">", "<", "<>"] {
            assert_eq!(RelationKind::from_op(op).unwrap().symbol(), op);
        }
        assert!(RelationKind::from_op("=>").is_none());
    }

    #[test]
    fn test_arrow_ends() {
        assert!(!RelationKind::OneToOne.arrow_at_from());
        assert!(!RelationKind::OneToOne.arrow_at_to());
        assert!(RelationKind::Forward.arrow_at_to());
        assert!(!RelationKind::Forward.arrow_at_from());
        assert!(RelationKind::Backward.arrow_at_from());
        assert!(RelationKind::ManyToMany.arrow_at_from());
        assert!(RelationKind::ManyToMany.arrow_at_to());
    }

    #[test]
    fn test_field_index_uses_declaration_order() {
        let table = Table::new("users")
            .with_field(Field::new("id", "int").primary_key())
            .with_field(Field::new("email", "varchar"));
        assert_eq!(table.field_index("email"), Some(1));
        assert_eq!(table.field_index("missing"), None);
    }

    #[test]
    fn test_kind_serializes_as_symbol() {
        let json = serde_json::to_string(&RelationKind::ManyToMany).unwrap();
        assert_eq!(json, "\"<>\"");
    }
}

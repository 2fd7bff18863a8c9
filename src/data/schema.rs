use anyhow::{bail, Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// ColumnDescriptor – static metadata for one catalog column
// ---------------------------------------------------------------------------

/// Semantic type of a catalog column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Numeric,
    Categorical,
    Text,
}

/// Describes one column of the source catalog: its stable key, display
/// label, optional unit, semantic type, and whether it participates in
/// filtering and/or object identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDescriptor {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub identity: bool,
}

// ---------------------------------------------------------------------------
// Schema – the full ordered column list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct SchemaFile {
    version: u32,
    columns: Vec<ColumnDescriptor>,
}

/// The ordered, immutable column schema. Loaded once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Schema {
    pub version: u32,
    columns: Vec<ColumnDescriptor>,
}

impl Schema {
    /// Build a schema, validating the invariants the rest of the pipeline
    /// relies on: unique column ids, at least one identity column, and no
    /// filterable free-text columns (only numeric ranges and categorical
    /// sets have filter semantics).
    pub fn new(version: u32, columns: Vec<ColumnDescriptor>) -> Result<Self> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.id == col.id) {
                bail!("duplicate column id '{}'", col.id);
            }
            if col.filterable && col.value_type == ValueType::Text {
                bail!("column '{}' is text but marked filterable", col.id);
            }
        }
        if !columns.iter().any(|c| c.identity) {
            bail!("schema declares no identity column");
        }
        Ok(Schema { version, columns })
    }

    /// The built-in column schema shipped with the application.
    pub fn builtin() -> Result<Schema> {
        let file: SchemaFile = serde_json::from_str(include_str!("../../assets/columns.json"))
            .context("parsing built-in column schema")?;
        Schema::new(file.version, file.columns)
    }

    /// All columns, in display order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Look up a column by id.
    pub fn column(&self, id: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Columns that take part in faceted filtering, in schema order.
    pub fn filterable(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.filterable)
    }

    /// Columns whose values determine object identity, in schema order.
    pub fn identity_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.identity)
    }

    /// Derive the identity key of one record. `value_of` maps a column id
    /// to that record's raw value. Values are trimmed and joined with `|`
    /// in schema order; a record where every identity column is empty has
    /// no key (it cannot be deduplicated or displayed).
    pub fn identity_key<F>(&self, mut value_of: F) -> Option<String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let parts: Vec<String> = self
            .identity_columns()
            .map(|col| {
                value_of(&col.id)
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default()
            })
            .collect();
        if parts.iter().all(|p| p.is_empty()) {
            None
        } else {
            Some(parts.join("|"))
        }
    }
}

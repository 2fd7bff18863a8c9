use std::collections::BTreeMap;

use super::model::{CatalogValue, Entry};
use super::schema::{Schema, ValueType};

// ---------------------------------------------------------------------------
// Raw row → typed Entry
// ---------------------------------------------------------------------------

/// One source row as tokenized from the delimited input: header → raw text.
pub type RawRow = BTreeMap<String, String>;

/// Result of normalizing a batch of raw rows.
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub entries: Vec<Entry>,
    /// Rows rejected because no identity column carried a value.
    pub dropped: usize,
}

/// Convert raw string-keyed rows into typed entries per the schema.
///
/// Field-level failures (empty or unparsable values) become null and never
/// reject the row; the only row-level rejection is a missing identity key.
/// Columns absent from the input read as null, and input columns unknown to
/// the schema are ignored.
pub fn normalize(rows: &[RawRow], schema: &Schema) -> NormalizeOutcome {
    let mut entries = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in rows {
        let Some(key) = schema.identity_key(|id| row.get(id).cloned()) else {
            dropped += 1;
            continue;
        };

        let values: BTreeMap<String, CatalogValue> = schema
            .columns()
            .iter()
            .map(|col| {
                let raw = row.get(col.id.as_str()).map(String::as_str);
                (col.id.clone(), coerce(raw, col.value_type))
            })
            .collect();

        entries.push(Entry { key, values });
    }

    if dropped > 0 {
        log::warn!("normalize: dropped {dropped} rows lacking identity columns");
    }

    NormalizeOutcome { entries, dropped }
}

/// Coerce one raw field to its declared type. Numeric parses must be finite;
/// anything else degrades to null.
fn coerce(raw: Option<&str>, value_type: ValueType) -> CatalogValue {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return CatalogValue::Null;
    }
    match value_type {
        ValueType::Numeric => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(CatalogValue::Number)
            .unwrap_or(CatalogValue::Null),
        ValueType::Categorical | ValueType::Text => CatalogValue::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::ColumnDescriptor;

    fn test_schema() -> Schema {
        let cols = vec![
            ColumnDescriptor {
                id: "host".into(),
                label: "Host".into(),
                unit: None,
                value_type: ValueType::Text,
                filterable: false,
                identity: true,
            },
            ColumnDescriptor {
                id: "letter".into(),
                label: "Letter".into(),
                unit: None,
                value_type: ValueType::Text,
                filterable: false,
                identity: true,
            },
            ColumnDescriptor {
                id: "method".into(),
                label: "Method".into(),
                unit: None,
                value_type: ValueType::Categorical,
                filterable: true,
                identity: false,
            },
            ColumnDescriptor {
                id: "radius".into(),
                label: "Radius".into(),
                unit: None,
                value_type: ValueType::Numeric,
                filterable: true,
                identity: false,
            },
        ];
        Schema::new(1, cols).unwrap()
    }

    fn row(fields: &[(&str, &str)]) -> RawRow {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_declared_types() {
        let schema = test_schema();
        let rows = vec![row(&[
            ("host", "Kepler-22"),
            ("letter", "b"),
            ("method", "  Transit "),
            ("radius", "2.38"),
        ])];

        let out = normalize(&rows, &schema);
        assert_eq!(out.dropped, 0);
        let entry = &out.entries[0];
        assert_eq!(entry.key, "Kepler-22|b");
        assert_eq!(entry.value("method"), &CatalogValue::Text("Transit".into()));
        assert_eq!(entry.value("radius"), &CatalogValue::Number(2.38));
    }

    #[test]
    fn unparsable_and_empty_fields_become_null() {
        let schema = test_schema();
        let rows = vec![row(&[
            ("host", "GJ 1214"),
            ("letter", "b"),
            ("method", ""),
            ("radius", "not-a-number"),
        ])];

        let out = normalize(&rows, &schema);
        let entry = &out.entries[0];
        assert!(entry.value("method").is_null());
        assert!(entry.value("radius").is_null());
    }

    #[test]
    fn non_finite_numbers_become_null() {
        let schema = test_schema();
        for raw in ["inf", "-inf", "NaN"] {
            let rows = vec![row(&[("host", "X"), ("letter", "b"), ("radius", raw)])];
            let out = normalize(&rows, &schema);
            assert!(out.entries[0].value("radius").is_null(), "raw = {raw}");
        }
    }

    #[test]
    fn rows_without_identity_are_dropped_and_counted() {
        let schema = test_schema();
        let rows = vec![
            row(&[("host", ""), ("letter", " "), ("radius", "1.0")]),
            row(&[("host", "51 Peg"), ("letter", "b")]),
            row(&[("radius", "3.0")]),
        ];

        let out = normalize(&rows, &schema);
        assert_eq!(out.dropped, 2);
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].key, "51 Peg|b");
    }

    #[test]
    fn every_schema_column_gets_a_value() {
        let schema = test_schema();
        // Unknown input column, several schema columns missing entirely.
        let rows = vec![row(&[("host", "WASP-12"), ("letter", "b"), ("bogus", "42")])];

        let out = normalize(&rows, &schema);
        let entry = &out.entries[0];
        assert_eq!(entry.values.len(), schema.columns().len());
        assert!(!entry.values.contains_key("bogus"));
        assert!(entry.value("radius").is_null());
    }
}

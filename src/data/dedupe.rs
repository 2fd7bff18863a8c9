use std::collections::HashMap;

use super::model::{CatalogValue, Entry};

// ---------------------------------------------------------------------------
// Deduplication – one canonical entry per identity key
// ---------------------------------------------------------------------------

/// Collapse multiple observational records of the same object into one
/// canonical entry per identity key, preserving first-seen key order.
///
/// Merge policy: the first record for a key seeds the canonical entry.
/// Each later record with the same key only fills columns that are still
/// null: earlier values always win, later records close gaps.
pub fn dedupe(entries: Vec<Entry>) -> Vec<Entry> {
    let mut canonical: Vec<Entry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        match index.get(&entry.key) {
            None => {
                index.insert(entry.key.clone(), canonical.len());
                canonical.push(entry);
            }
            Some(&i) => {
                let target = &mut canonical[i];
                for (column, value) in entry.values {
                    if value.is_null() {
                        continue;
                    }
                    let slot = target.values.entry(column).or_insert(CatalogValue::Null);
                    if slot.is_null() {
                        *slot = value;
                    }
                }
            }
        }
    }

    canonical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CatalogValue;
    use std::collections::BTreeMap;

    fn entry(key: &str, fields: &[(&str, CatalogValue)]) -> Entry {
        let values: BTreeMap<String, CatalogValue> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Entry {
            key: key.into(),
            values,
        }
    }

    #[test]
    fn later_records_only_fill_nulls() {
        let input = vec![
            entry(
                "K",
                &[
                    ("a", CatalogValue::Number(5.0)),
                    ("b", CatalogValue::Null),
                ],
            ),
            entry(
                "K",
                &[
                    ("a", CatalogValue::Number(7.0)),
                    ("b", CatalogValue::Number(3.0)),
                ],
            ),
        ];

        let out = dedupe(input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value("a"), &CatalogValue::Number(5.0));
        assert_eq!(out[0].value("b"), &CatalogValue::Number(3.0));
    }

    #[test]
    fn preserves_first_seen_key_order() {
        let input = vec![
            entry("C", &[]),
            entry("A", &[]),
            entry("C", &[]),
            entry("B", &[]),
            entry("A", &[]),
        ];

        let keys: Vec<String> = dedupe(input).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["C", "A", "B"]);
    }

    #[test]
    fn is_idempotent() {
        let input = vec![
            entry("K", &[("a", CatalogValue::Number(1.0))]),
            entry("K", &[("b", CatalogValue::Text("x".into()))]),
            entry("L", &[("a", CatalogValue::Null)]),
        ];

        let once = dedupe(input);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn never_drops_a_key() {
        let input = vec![
            entry("K", &[("a", CatalogValue::Null)]),
            entry("L", &[]),
            entry("K", &[("a", CatalogValue::Null)]),
        ];

        let out = dedupe(input);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn fill_can_add_columns_missing_from_the_seed() {
        let input = vec![
            entry("K", &[("a", CatalogValue::Number(1.0))]),
            entry("K", &[("b", CatalogValue::Number(2.0))]),
        ];

        let out = dedupe(input);
        assert_eq!(out[0].value("a"), &CatalogValue::Number(1.0));
        assert_eq!(out[0].value("b"), &CatalogValue::Number(2.0));
    }
}

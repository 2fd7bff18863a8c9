use std::collections::{BTreeMap, BTreeSet};

use super::filter::ActiveFilter;
use super::model::Entry;
use super::schema::{Schema, ValueType};

// ---------------------------------------------------------------------------
// Facet domains – the observed universe per filterable column
// ---------------------------------------------------------------------------

/// The observed value universe of one filterable column, scanned from the
/// deduplicated entries. The UI renders widgets against this; filters are
/// initialized from it.
#[derive(Debug, Clone, PartialEq)]
pub enum FacetDomain {
    /// Inclusive observed bounds; `None` when no entry carries a finite
    /// value for the column.
    Numeric { bounds: Option<(f64, f64)> },
    /// All distinct non-null observed values.
    Categorical { values: BTreeSet<String> },
}

/// Scan the entries once and compute the facet domain of every filterable
/// column.
pub fn facet_domains(entries: &[Entry], schema: &Schema) -> BTreeMap<String, FacetDomain> {
    schema
        .filterable()
        .map(|col| {
            let domain = match col.value_type {
                ValueType::Numeric => {
                    let mut bounds: Option<(f64, f64)> = None;
                    for entry in entries {
                        if let Some(v) = entry.value(&col.id).as_f64() {
                            bounds = Some(match bounds {
                                None => (v, v),
                                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                            });
                        }
                    }
                    FacetDomain::Numeric { bounds }
                }
                ValueType::Categorical | ValueType::Text => {
                    let values = entries
                        .iter()
                        .filter_map(|e| e.value(&col.id).as_str().map(str::to_string))
                        .collect();
                    FacetDomain::Categorical { values }
                }
            };
            (col.id.clone(), domain)
        })
        .collect()
}

/// Derive the initial filter state: exactly one unconstrained filter per
/// filterable column, in schema order. Runs once per freshly loaded
/// dataset; user interaction afterwards replaces individual filters, it
/// never re-derives them.
pub fn initial_filters(entries: &[Entry], schema: &Schema) -> Vec<ActiveFilter> {
    let domains = facet_domains(entries, schema);
    schema
        .filterable()
        .filter_map(|col| {
            domains
                .get(&col.id)
                .map(|domain| ActiveFilter::unconstrained(&col.id, domain))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{is_excluded, Constraint};
    use crate::data::model::CatalogValue;
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
            ColumnDescriptor {
                id: "mass".into(),
                label: "Mass".into(),
                unit: None,
                value_type: ValueType::Numeric,
                filterable: true,
                identity: false,
            },
        ];
        Schema::new(1, cols).unwrap()
    }

    fn entry(key: &str, method: Option<&str>, radius: Option<f64>) -> Entry {
        let mut values = std::collections::BTreeMap::new();
        values.insert(
            "method".to_string(),
            method.map_or(CatalogValue::Null, |m| CatalogValue::Text(m.into())),
        );
        values.insert(
            "radius".to_string(),
            radius.map_or(CatalogValue::Null, CatalogValue::Number),
        );
        values.insert("mass".to_string(), CatalogValue::Null);
        Entry {
            key: key.into(),
            values,
        }
    }

    #[test]
    fn numeric_bounds_are_observed_min_max() {
        let schema = test_schema();
        let entries = vec![
            entry("a", Some("Transit"), Some(2.0)),
            entry("b", Some("Transit"), None),
            entry("c", Some("Imaging"), Some(-1.5)),
            entry("d", None, Some(11.0)),
        ];

        let domains = facet_domains(&entries, &schema);
        assert_eq!(
            domains.get("radius"),
            Some(&FacetDomain::Numeric {
                bounds: Some((-1.5, 11.0))
            })
        );
    }

    #[test]
    fn all_null_numeric_column_has_no_bounds() {
        let schema = test_schema();
        let entries = vec![entry("a", Some("Transit"), Some(2.0))];

        let domains = facet_domains(&entries, &schema);
        assert_eq!(
            domains.get("mass"),
            Some(&FacetDomain::Numeric { bounds: None })
        );
    }

    #[test]
    fn categorical_domain_is_distinct_non_null_values() {
        let schema = test_schema();
        let entries = vec![
            entry("a", Some("Transit"), None),
            entry("b", Some("Imaging"), None),
            entry("c", Some("Transit"), None),
            entry("d", None, None),
        ];

        let domains = facet_domains(&entries, &schema);
        let FacetDomain::Categorical { values } = domains.get("method").unwrap() else {
            panic!("expected categorical domain");
        };
        assert_eq!(values.len(), 2);
        assert!(values.contains("Transit") && values.contains("Imaging"));
    }

    #[test]
    fn one_filter_per_filterable_column_in_schema_order() {
        let schema = test_schema();
        let filters = initial_filters(&[entry("a", Some("Transit"), Some(1.0))], &schema);

        let ids: Vec<&str> = filters.iter().map(|f| f.column_id.as_str()).collect();
        assert_eq!(ids, vec!["method", "radius", "mass"]);
    }

    #[test]
    fn initial_filters_exclude_nothing() {
        let schema = test_schema();
        let entries = vec![
            entry("a", Some("Transit"), Some(2.0)),
            entry("b", None, Some(-3.0)),
            entry("c", Some("Imaging"), None),
        ];

        let filters = initial_filters(&entries, &schema);
        assert!(filters.iter().all(|f| match &f.constraint {
            Constraint::Range { min, max } => min <= max,
            Constraint::Categorical { .. } => true,
        }));
        for entry in &entries {
            assert!(!is_excluded(entry, &filters));
        }
    }

    #[test]
    fn empty_dataset_yields_inert_filters() {
        let schema = test_schema();
        let filters = initial_filters(&[], &schema);
        assert_eq!(filters.len(), 3);
        assert!(!is_excluded(&entry("x", Some("Transit"), Some(5.0)), &filters[1..2]));
    }
}

use std::collections::BTreeSet;

use super::facet::FacetDomain;
use super::model::Entry;

// ---------------------------------------------------------------------------
// ActiveFilter – the current constraint on one filterable column
// ---------------------------------------------------------------------------

/// The constraint kind: an inclusive numeric range or a categorical
/// selection set.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Inclusive bounds. A column with no numeric data gets ±∞, which can
    /// never exclude anything.
    Range { min: f64, max: f64 },
    /// Values currently selected. An empty set hides every entry with a
    /// non-null value in the column.
    Categorical { selected: BTreeSet<String> },
}

/// The user-adjustable filter for one filterable column. Exactly one exists
/// per filterable column at all times; the UI replaces it wholesale, never
/// edits it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFilter {
    pub column_id: String,
    pub constraint: Constraint,
}

impl ActiveFilter {
    /// A filter spanning the column's whole observed domain, guaranteed to
    /// exclude nothing.
    pub fn unconstrained(column_id: &str, domain: &FacetDomain) -> Self {
        let constraint = match domain {
            FacetDomain::Numeric { bounds } => {
                let (min, max) = bounds.unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
                Constraint::Range { min, max }
            }
            FacetDomain::Categorical { values } => Constraint::Categorical {
                selected: values.clone(),
            },
        };
        ActiveFilter {
            column_id: column_id.to_string(),
            constraint,
        }
    }

    /// Whether this single filter rejects the entry. Null values are never
    /// rejected; unknown data stays visible.
    fn excludes(&self, entry: &Entry) -> bool {
        match &self.constraint {
            Constraint::Range { min, max } => match entry.value(&self.column_id).as_f64() {
                Some(v) => v < *min || v > *max,
                None => false,
            },
            Constraint::Categorical { selected } => match entry.value(&self.column_id).as_str() {
                Some(v) => !selected.contains(v),
                None => false,
            },
        }
    }
}

/// Whether the entry is filtered out by the current filter set: it must
/// satisfy every filter simultaneously to stay visible. Pure and
/// order-independent across the slice.
pub fn is_excluded(entry: &Entry, filters: &[ActiveFilter]) -> bool {
    filters.iter().any(|f| f.excludes(entry))
}

/// Indices of entries passing all filters, in catalog order.
pub fn filtered_indices(entries: &[Entry], filters: &[ActiveFilter]) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| !is_excluded(entry, filters))
        .map(|(i, _)| i)
        .collect()
}

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::color::ColorMap;
use crate::data::facet::{initial_filters, FacetDomain};
use crate::data::filter::{filtered_indices, ActiveFilter, Constraint};
use crate::data::loader::{self, Enrichment};
use crate::data::model::{Catalog, Entry};
use crate::data::page::{paginate, Page};
use crate::data::schema::{Schema, ValueType};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Cards shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 24;
/// Catalog file looked up next to the executable at startup.
pub const CATALOG_FILE: &str = "exoplanets.csv";
/// Optional enrichment file with display names and descriptions.
pub const ENRICHMENT_FILE: &str = "descriptions.csv";
/// Column used as the card title when no enrichment name exists.
pub const NAME_COLUMN: &str = "pl_name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Cards,
    Plot,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Column schema, loaded once and never mutated.
    pub schema: Schema,

    /// Ingested catalog (None until the first load finishes).
    pub catalog: Option<Catalog>,

    /// Exactly one filter per filterable column, in schema order. Mutated
    /// only by whole-filter replacement.
    pub filters: Vec<ActiveFilter>,

    /// Indices of entries passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// 1-based page into `visible_indices`.
    pub page: usize,
    pub page_size: usize,

    /// Central panel mode.
    pub view: ViewMode,

    /// Entry index whose detail window is open.
    pub selected: Option<usize>,

    /// Identity key → descriptive fields, looked up at render time.
    pub enrichment: BTreeMap<String, Enrichment>,

    /// Which categorical column is used for colouring.
    pub color_column: Option<String>,
    pub color_map: Option<ColorMap>,

    /// Plot axes (numeric column ids).
    pub plot_x: Option<String>,
    pub plot_y: Option<String>,

    /// Set when the catalog could not be ingested and the bundled fallback
    /// dataset was substituted.
    pub degraded: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            catalog: None,
            filters: Vec::new(),
            visible_indices: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            view: ViewMode::Cards,
            selected: None,
            enrichment: BTreeMap::new(),
            color_column: None,
            color_map: None,
            plot_x: None,
            plot_y: None,
            degraded: false,
            status_message: None,
        }
    }

    /// Ingest the catalog once at startup. On total ingestion failure the
    /// bundled fallback dataset is substituted and the degraded flag raised;
    /// there is no automatic retry.
    pub fn bootstrap(schema: Schema) -> Self {
        let mut state = Self::new(schema);

        match loader::load_catalog(Path::new(CATALOG_FILE), &state.schema) {
            Ok(catalog) => state.set_catalog(catalog),
            Err(e) => {
                log::error!("loading {CATALOG_FILE}: {e}");
                let fallback = loader::fallback_catalog(&state.schema);
                state.set_catalog(fallback);
                state.degraded = true;
                state.status_message =
                    Some("Catalog unavailable — showing bundled sample data".into());
            }
        }

        match loader::load_enrichment(Path::new(ENRICHMENT_FILE), &state.schema) {
            Ok(map) => state.enrichment = map,
            Err(e) => log::info!("no enrichment data ({ENRICHMENT_FILE}): {e}"),
        }

        state
    }

    /// Install a freshly ingested catalog: derive the initial filters, show
    /// everything, reset paging and defaults.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.filters = initial_filters(&catalog.entries, &self.schema);
        self.visible_indices = (0..catalog.len()).collect();
        self.page = 1;
        self.selected = None;

        // Default colour column: first filterable categorical column.
        self.color_column = self
            .schema
            .filterable()
            .find(|c| c.value_type == ValueType::Categorical)
            .map(|c| c.id.clone());

        // Default plot axes: first two filterable numeric columns.
        let mut numeric = self
            .schema
            .filterable()
            .filter(|c| c.value_type == ValueType::Numeric);
        self.plot_x = numeric.next().map(|c| c.id.clone());
        self.plot_y = numeric.next().map(|c| c.id.clone());
        drop(numeric);

        self.catalog = Some(catalog);
        self.rebuild_color_map();
        self.status_message = None;
    }

    /// Rebuild the colour map from the current `color_column`.
    pub fn rebuild_color_map(&mut self) {
        self.color_map = match (&self.catalog, &self.color_column) {
            (Some(catalog), Some(col)) => match catalog.domains.get(col) {
                Some(FacetDomain::Categorical { values }) => Some(ColorMap::new(col, values)),
                _ => None,
            },
            _ => None,
        };
    }

    /// Set colour column and rebuild the map.
    pub fn set_color_column(&mut self, col: String) {
        self.color_column = Some(col);
        self.rebuild_color_map();
    }

    /// Recompute `visible_indices` after a filter change and clamp the page
    /// back into range.
    pub fn refilter(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.visible_indices = filtered_indices(&catalog.entries, &self.filters);
        }
        let total = paginate(&self.visible_indices, self.page_size, 1).total_pages;
        self.page = self.page.clamp(1, total);
    }

    /// The filter currently active for a column.
    pub fn filter(&self, column: &str) -> Option<&ActiveFilter> {
        self.filters.iter().find(|f| f.column_id == column)
    }

    /// Swap in a whole replacement filter for its column. Filters are never
    /// edited in place, so an evaluation pass always sees a consistent
    /// snapshot.
    pub fn replace_filter(&mut self, filter: ActiveFilter) {
        if let Some(slot) = self
            .filters
            .iter_mut()
            .find(|f| f.column_id == filter.column_id)
        {
            *slot = filter;
            self.refilter();
        }
    }

    /// Toggle a single value in a categorical filter.
    pub fn toggle_category(&mut self, column: &str, value: &str) {
        let Some(current) = self.filter(column) else {
            return;
        };
        let Constraint::Categorical { selected } = &current.constraint else {
            return;
        };
        let mut selected = selected.clone();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.replace_filter(ActiveFilter {
            column_id: column.to_string(),
            constraint: Constraint::Categorical { selected },
        });
    }

    /// Select every observed value in a categorical column.
    pub fn select_all(&mut self, column: &str) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        if let Some(FacetDomain::Categorical { values }) = catalog.domains.get(column) {
            let selected = values.clone();
            self.replace_filter(ActiveFilter {
                column_id: column.to_string(),
                constraint: Constraint::Categorical { selected },
            });
        }
    }

    /// Deselect every value in a categorical column (hides all entries with
    /// a non-null value there).
    pub fn select_none(&mut self, column: &str) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        if let Some(FacetDomain::Categorical { .. }) = catalog.domains.get(column) {
            self.replace_filter(ActiveFilter {
                column_id: column.to_string(),
                constraint: Constraint::Categorical {
                    selected: BTreeSet::new(),
                },
            });
        }
    }

    /// Set a numeric filter's inclusive bounds. Out-of-order bounds are
    /// swapped to keep `min ≤ max`.
    pub fn set_range(&mut self, column: &str, min: f64, max: f64) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let is_range = self
            .filter(column)
            .is_some_and(|f| matches!(f.constraint, Constraint::Range { .. }));
        if is_range {
            self.replace_filter(ActiveFilter {
                column_id: column.to_string(),
                constraint: Constraint::Range { min, max },
            });
        }
    }

    /// Restore every filter to its unconstrained span. Uses the stored
    /// facet domains; derivation itself runs only at ingestion.
    pub fn reset_filters(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.filters = self
                .schema
                .filterable()
                .filter_map(|col| {
                    catalog
                        .domains
                        .get(&col.id)
                        .map(|domain| ActiveFilter::unconstrained(&col.id, domain))
                })
                .collect();
        }
        self.refilter();
    }

    /// The current page of visible entry indices.
    pub fn page_slice(&self) -> Page<'_, usize> {
        paginate(&self.visible_indices, self.page_size, self.page)
    }

    pub fn set_page(&mut self, page: usize) {
        let total = self.page_slice().total_pages;
        self.page = page.clamp(1, total);
    }

    /// Card / window title for an entry: enrichment display name, then the
    /// name column, then the identity key.
    pub fn display_name(&self, entry: &Entry) -> String {
        self.enrichment
            .get(&entry.key)
            .and_then(|e| e.display_name.clone())
            .or_else(|| entry.value(NAME_COLUMN).as_str().map(str::to_string))
            .unwrap_or_else(|| entry.key.clone())
    }
}

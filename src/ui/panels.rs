use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::facet::FacetDomain;
use crate::data::filter::{ActiveFilter, Constraint};
use crate::data::loader;
use crate::data::schema::{ColumnDescriptor, ValueType};
use crate::state::{AppState, ViewMode, ENRICHMENT_FILE};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.heading("Filters");
    ui.separator();

    let Some(catalog) = &state.catalog else {
        ui.label("No catalog loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let domains = catalog.domains.clone();
    let columns: Vec<ColumnDescriptor> = state.schema.filterable().cloned().collect();
    let categorical: Vec<(String, String)> = columns
        .iter()
        .filter(|c| c.value_type == ValueType::Categorical)
        .map(|c| (c.id.clone(), c.label.clone()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Colour-by selector ----
            ui.strong("Color by");
            let current = state.color_column.clone().unwrap_or_default();
            let current_label = categorical
                .iter()
                .find(|(id, _)| *id == current)
                .map(|(_, label)| label.clone())
                .unwrap_or_default();
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(current_label)
                .show_ui(ui, |ui: &mut Ui| {
                    for (id, label) in &categorical {
                        if ui
                            .selectable_label(current == *id, label.as_str())
                            .clicked()
                        {
                            state.set_color_column(id.clone());
                        }
                    }
                });
            ui.separator();

            if ui.button("Reset all filters").clicked() {
                state.reset_filters();
            }
            ui.separator();

            // ---- Per-column filter widgets (collapsible) ----
            for col in &columns {
                match domains.get(&col.id) {
                    Some(FacetDomain::Categorical { values }) => {
                        categorical_widget(ui, state, col, values);
                    }
                    Some(FacetDomain::Numeric { bounds }) => {
                        range_widget(ui, state, col, *bounds);
                    }
                    None => {}
                }
            }
        });
}

/// Checkbox list over the observed values of a categorical column, with
/// All/None shortcuts. Selection changes go through the state's
/// whole-filter replacement mutators.
fn categorical_widget(
    ui: &mut Ui,
    state: &mut AppState,
    col: &ColumnDescriptor,
    values: &BTreeSet<String>,
) {
    let selected = match state.filter(&col.id) {
        Some(ActiveFilter {
            constraint: Constraint::Categorical { selected },
            ..
        }) => selected.clone(),
        _ => return,
    };

    let header = format!("{}  ({}/{})", col.label, selected.len(), values.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(col.id.as_str())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(&col.id);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(&col.id);
                }
            });

            for value in values {
                let mut checked = selected.contains(value);

                // Show the category in its map colour when colouring by
                // this column.
                let mut text = RichText::new(value.as_str());
                if state.color_column.as_deref() == Some(col.id.as_str()) {
                    if let Some(cm) = &state.color_map {
                        text = text.color(cm.color_for(value));
                    }
                }

                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_category(&col.id, value);
                }
            }
        });
}

/// Min/max drag values over a numeric column's observed bounds.
fn range_widget(
    ui: &mut Ui,
    state: &mut AppState,
    col: &ColumnDescriptor,
    bounds: Option<(f64, f64)>,
) {
    let header = match &col.unit {
        Some(unit) => format!("{} ({unit})", col.label),
        None => col.label.clone(),
    };
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(col.id.as_str())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let Some((lo, hi)) = bounds else {
                ui.label("No data in this column.");
                return;
            };
            let (mut min, mut max) = match state.filter(&col.id) {
                Some(ActiveFilter {
                    constraint: Constraint::Range { min, max },
                    ..
                }) => (*min, *max),
                _ => return,
            };

            let speed = ((hi - lo) / 300.0).max(1e-3);
            let mut changed = false;
            ui.horizontal(|ui: &mut Ui| {
                ui.label("min");
                changed |= ui
                    .add(egui::DragValue::new(&mut min).speed(speed))
                    .changed();
                ui.label("max");
                changed |= ui
                    .add(egui::DragValue::new(&mut max).speed(speed))
                    .changed();
            });
            if changed {
                state.set_range(&col.id, min, max);
            }
            if ui.small_button("Reset").clicked() {
                state.set_range(&col.id, lo, hi);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open catalog…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.view, ViewMode::Cards, "Cards");
        ui.selectable_value(&mut state.view, ViewMode::Plot, "Plot");

        ui.separator();

        if let Some(catalog) = &state.catalog {
            ui.label(format!(
                "{} planets, {} matching",
                catalog.len(),
                state.visible_indices.len()
            ));
            if catalog.dropped_rows > 0 {
                ui.label(
                    RichText::new(format!("{} rows skipped", catalog.dropped_rows)).weak(),
                );
            }
        }

        if state.degraded {
            ui.separator();
            ui.label(RichText::new("⚠ showing bundled sample data").color(Color32::YELLOW));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg.as_str()).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open exoplanet catalog")
        .add_filter("Catalog files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_catalog(&path, &state.schema) {
            Ok(catalog) => {
                state.set_catalog(catalog);
                state.degraded = false;

                // Pick up an enrichment file sitting next to the catalog.
                let enrichment_path = path.with_file_name(ENRICHMENT_FILE);
                state.enrichment =
                    match loader::load_enrichment(&enrichment_path, &state.schema) {
                        Ok(map) => map,
                        Err(e) => {
                            log::info!("no enrichment next to {}: {e}", path.display());
                            Default::default()
                        }
                    };
            }
            Err(e) => {
                // The previous catalog stays authoritative on failure.
                log::error!("failed to load catalog: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

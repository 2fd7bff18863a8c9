use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Stroke, Ui, Vec2};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{CatalogValue, Entry};
use crate::data::schema::ColumnDescriptor;
use crate::state::{AppState, NAME_COLUMN};

// ---------------------------------------------------------------------------
// Card grid (central panel)
// ---------------------------------------------------------------------------

/// Render the paginated card grid.
pub fn card_grid(ui: &mut Ui, state: &mut AppState) {
    if state.catalog.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a catalog to browse planets  (File → Open catalog…)");
        });
        return;
    }

    paging_controls(ui, state);
    ui.separator();

    let indices: Vec<usize> = state.page_slice().visible.to_vec();
    if indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No planets match the current filters.");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for idx in indices {
                    planet_card(ui, state, idx);
                }
            });
            ui.separator();
            paging_controls(ui, state);
        });
}

/// Prev / next pager, shown above and below the grid.
fn paging_controls(ui: &mut Ui, state: &mut AppState) {
    let total = state.page_slice().total_pages;
    let current = state.page;
    let matching = state.visible_indices.len();

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(current > 1, egui::Button::new("◀ Prev"))
            .clicked()
        {
            state.set_page(current - 1);
        }
        ui.label(format!("Page {current} of {total}"));
        if ui
            .add_enabled(current < total, egui::Button::new("Next ▶"))
            .clicked()
        {
            state.set_page(current + 1);
        }
        ui.label(RichText::new(format!("{matching} matching")).weak());
    });
}

/// One planet card: glyph, title, and a label/value row per column.
fn planet_card(ui: &mut Ui, state: &mut AppState, idx: usize) {
    let Some(entry) = state.catalog.as_ref().and_then(|c| c.entries.get(idx)) else {
        return;
    };

    let name = state.display_name(entry);
    let color = glyph_color(state, entry);
    // Low-density planets render as ringed gas giants.
    let gas_giant = entry
        .value("pl_dens")
        .as_f64()
        .is_some_and(|d| d < 2.0);
    let rows = card_rows(state, entry);

    let response = ui
        .group(|ui: &mut Ui| {
            ui.set_width(210.0);
            ui.vertical_centered(|ui: &mut Ui| {
                draw_glyph(ui, color, gas_giant);
                ui.label(RichText::new(name.as_str()).heading().size(16.0));
            });
            ui.add_space(4.0);
            for (label, text) in &rows {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.strong(format!("{label}:"));
                    ui.label(text.as_str());
                });
            }
        })
        .response
        .interact(Sense::click());

    if response.clicked() {
        state.selected = Some(idx);
    }
}

fn card_rows(state: &AppState, entry: &Entry) -> Vec<(String, String)> {
    state
        .schema
        .columns()
        .iter()
        .filter(|c| c.id != NAME_COLUMN && !c.identity)
        .map(|c| (c.label.clone(), formatted_value(entry.value(&c.id), c)))
        .collect()
}

/// Painter-drawn planet glyph; gas giants get a ring.
fn draw_glyph(ui: &mut Ui, color: Color32, gas_giant: bool) {
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(56.0), Sense::hover());
    let painter = ui.painter();
    let center = rect.center();
    painter.circle_filled(center, 18.0, color);
    if gas_giant {
        painter.circle_stroke(center, 24.0, Stroke::new(2.0, color.gamma_multiply(0.6)));
    }
}

fn glyph_color(state: &AppState, entry: &Entry) -> Color32 {
    state
        .color_column
        .as_deref()
        .and_then(|col| entry.value(col).as_str())
        .and_then(|value| state.color_map.as_ref().map(|cm| cm.color_for(value)))
        .unwrap_or(Color32::LIGHT_BLUE)
}

/// Value text for display: numbers rounded, unit appended, null as a dash.
fn formatted_value(value: &CatalogValue, col: &ColumnDescriptor) -> String {
    let text = match value {
        CatalogValue::Number(v) => round_for_display(*v),
        other => other.to_string(),
    };
    match (&col.unit, value) {
        (Some(unit), CatalogValue::Number(_)) => format!("{text} {unit}"),
        _ => text,
    }
}

/// Two decimals, trailing zeros dropped.
fn round_for_display(v: f64) -> String {
    let mut s = format!("{v:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

// ---------------------------------------------------------------------------
// Detail window
// ---------------------------------------------------------------------------

/// Modal-style window with the full column table and the enrichment
/// description for the selected entry.
pub fn detail_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(idx) = state.selected else {
        return;
    };
    let Some(entry) = state
        .catalog
        .as_ref()
        .and_then(|c| c.entries.get(idx))
        .cloned()
    else {
        state.selected = None;
        return;
    };

    let title = state.display_name(&entry);
    let description = state
        .enrichment
        .get(&entry.key)
        .and_then(|e| e.description.clone());
    let columns: Vec<ColumnDescriptor> = state.schema.columns().to_vec();

    let mut open = true;
    egui::Window::new(title)
        .id(egui::Id::new("detail_window"))
        .open(&mut open)
        .collapsible(false)
        .default_width(380.0)
        .show(ctx, |ui: &mut Ui| {
            if let Some(text) = &description {
                ui.label(text.as_str());
                ui.separator();
            }
            TableBuilder::new(ui)
                .striped(true)
                .column(TableColumn::auto())
                .column(TableColumn::remainder())
                .body(|mut body| {
                    for col in &columns {
                        body.row(18.0, |mut row| {
                            row.col(|ui: &mut Ui| {
                                ui.strong(col.label.as_str());
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(formatted_value(entry.value(&col.id), col));
                            });
                        });
                    }
                });
        });

    if !open {
        state.selected = None;
    }
}

use std::collections::BTreeMap;

use eframe::egui::{self, Color32, Ui};
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::data::schema::ValueType;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Scatter plot (central panel, Plot view)
// ---------------------------------------------------------------------------

/// Scatter the currently visible entries over two numeric columns, one
/// legend series per colour-column category.
pub fn scatter_plot(ui: &mut Ui, state: &mut AppState) {
    if state.catalog.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a catalog to plot it  (File → Open catalog…)");
        });
        return;
    }

    let numeric: Vec<(String, String)> = state
        .schema
        .filterable()
        .filter(|c| c.value_type == ValueType::Numeric)
        .map(|c| (c.id.clone(), c.label.clone()))
        .collect();

    let mut plot_x = state.plot_x.clone();
    let mut plot_y = state.plot_y.clone();
    ui.horizontal(|ui: &mut Ui| {
        axis_picker(ui, "X axis", &numeric, &mut plot_x);
        axis_picker(ui, "Y axis", &numeric, &mut plot_y);
    });
    state.plot_x = plot_x;
    state.plot_y = plot_y;

    let (Some(x_col), Some(y_col)) = (state.plot_x.clone(), state.plot_y.clone()) else {
        ui.label("No numeric columns to plot.");
        return;
    };

    let axis_label = |id: &str| {
        state
            .schema
            .column(id)
            .map(|c| match &c.unit {
                Some(unit) => format!("{} ({unit})", c.label),
                None => c.label.clone(),
            })
            .unwrap_or_else(|| id.to_string())
    };
    let x_label = axis_label(&x_col);
    let y_label = axis_label(&y_col);

    let color_col = state.color_column.clone();
    let color_map = state.color_map.clone();
    let Some(catalog) = &state.catalog else {
        return;
    };

    // Group visible points by colour value so the legend shows one series
    // per category. Entries lacking either coordinate are skipped.
    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for &idx in &state.visible_indices {
        let entry = &catalog.entries[idx];
        let (Some(x), Some(y)) = (
            entry.value(&x_col).as_f64(),
            entry.value(&y_col).as_f64(),
        ) else {
            continue;
        };
        let group = color_col
            .as_deref()
            .and_then(|col| entry.value(col).as_str())
            .unwrap_or("unknown")
            .to_string();
        series.entry(group).or_default().push([x, y]);
    }

    Plot::new("catalog_plot")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            for (group, points) in series {
                let color = color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&group))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .name(&group)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

fn axis_picker(ui: &mut Ui, label: &str, columns: &[(String, String)], slot: &mut Option<String>) {
    ui.label(label);
    let current = slot.clone().unwrap_or_default();
    let current_label = columns
        .iter()
        .find(|(id, _)| *id == current)
        .map(|(_, label)| label.clone())
        .unwrap_or_default();
    egui::ComboBox::from_id_salt(label)
        .selected_text(current_label)
        .show_ui(ui, |ui: &mut Ui| {
            for (id, col_label) in columns {
                if ui
                    .selectable_label(current == *id, col_label.as_str())
                    .clicked()
                {
                    *slot = Some(id.clone());
                }
            }
        });
}

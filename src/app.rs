use eframe::egui;

use crate::data::schema::Schema;
use crate::state::{AppState, ViewMode};
use crate::ui::{cards, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExoAtlasApp {
    pub state: AppState,
}

impl ExoAtlasApp {
    /// Load the schema and ingest the catalog (or its fallback) once.
    pub fn new() -> anyhow::Result<Self> {
        let schema = Schema::builtin()?;
        Ok(Self {
            state: AppState::bootstrap(schema),
        })
    }
}

impl eframe::App for ExoAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: card grid or scatter plot ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            ViewMode::Cards => cards::card_grid(ui, &mut self.state),
            ViewMode::Plot => plot::scatter_plot(ui, &mut self.state),
        });

        cards::detail_window(ctx, &mut self.state);
    }
}

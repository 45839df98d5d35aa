use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AwardLensApp {
    pub state: AppState,
}

impl AwardLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AwardLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    charts::metric_tiles(ui, &self.state);
                    ui.add_space(12.0);
                    charts::theme_distribution_chart(ui, &self.state);
                    ui.add_space(12.0);
                    charts::agency_totals_chart(ui, &self.state);
                    ui.add_space(12.0);
                    charts::monthly_timeline_chart(ui, &self.state);
                    ui.add_space(12.0);
                    table::contract_table(ui, &mut self.state);
                    ui.add_space(12.0);
                    table::featured_awards(ui, &self.state);
                });
        });
    }
}

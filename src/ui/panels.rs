use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;
use crate::ui::format_count;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel and refilter on any change.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.heading("Filters");
    ui.separator();

    // Clone what the widgets need so we can mutate the criteria below.
    let (agencies, themes, date_span, amount_span) = match &state.dataset {
        Some(ds) => (
            ds.agencies.iter().cloned().collect::<Vec<String>>(),
            ds.themes.iter().cloned().collect::<Vec<String>>(),
            ds.date_span,
            ds.amount_span,
        ),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }
    ui.separator();

    let Some(criteria) = state.criteria.as_mut() else {
        return;
    };
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date range");
            let (mut start, mut end) = criteria.date_range;
            ui.horizontal(|ui: &mut Ui| {
                changed |= ui
                    .add(DatePickerButton::new(&mut start).id_salt("date_start"))
                    .changed();
                ui.label("to");
                changed |= ui
                    .add(DatePickerButton::new(&mut end).id_salt("date_end"))
                    .changed();
                if ui.small_button("Full span").clicked() {
                    (start, end) = date_span;
                    changed = true;
                }
            });
            if end < start {
                end = start;
            }
            criteria.date_range = (start, end);
            ui.separator();

            // ---- Award size range ----
            ui.strong("Award size");
            let (mut lo, mut hi) = criteria.amount_range;
            let step = ((amount_span.1 - amount_span.0) / 200.0).max(1.0);
            ui.horizontal(|ui: &mut Ui| {
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut lo)
                            .prefix("$")
                            .speed(step)
                            .range(0.0..=f64::MAX),
                    )
                    .changed();
                ui.label("to");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut hi)
                            .prefix("$")
                            .speed(step)
                            .range(0.0..=f64::MAX),
                    )
                    .changed();
            });
            if hi < lo {
                hi = lo;
            }
            criteria.amount_range = (lo, hi);
            ui.separator();

            // ---- Agency / theme multi-selects ----
            changed |= tag_selector(ui, "Agencies", &agencies, &mut criteria.agencies);
            ui.separator();
            changed |= tag_selector(ui, "DEI Themes", &themes, &mut criteria.themes);
        });

    if changed {
        state.refilter();
    }
}

/// Collapsible checkbox list over a label set. An empty selection means
/// "no restriction", so the `Any` button clears rather than hides.
fn tag_selector(
    ui: &mut Ui,
    title: &str,
    all_values: &[String],
    selected: &mut BTreeSet<String>,
) -> bool {
    let mut changed = false;

    let summary = if selected.is_empty() {
        "any".to_string()
    } else {
        format!("{}/{}", selected.len(), all_values.len())
    };
    let header_text = format!("{title}  ({summary})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    *selected = all_values.iter().cloned().collect();
                    changed = true;
                }
                if ui.small_button("Any").clicked() {
                    selected.clear();
                    changed = true;
                }
            });

            for value in all_values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                    changed = true;
                }
            }
        });

    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} of {} contracts shown",
                format_count(state.visible_indices.len()),
                format_count(ds.len())
            ));
            if ds.skipped_rows > 0 {
                ui.separator();
                ui.label(
                    RichText::new(format!("{} malformed rows skipped", ds.skipped_rows))
                        .color(Color32::YELLOW),
                );
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open contract data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} contracts across {} agencies ({} rows quarantined)",
                    dataset.len(),
                    dataset.agencies.len(),
                    dataset.skipped_rows
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{AppState, SortColumn};
use crate::ui::{format_currency, truncate_words};

/// Featured-award descriptions are cut at 500 words.
const DESCRIPTION_WORDS: usize = 500;

// ---------------------------------------------------------------------------
// Contract table
// ---------------------------------------------------------------------------

/// Sortable table of the filtered records. Click a header to sort; a second
/// click flips the direction.
pub fn contract_table(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Detailed Contract Data");

    let sorted = state.sorted_visible();
    let Some(ds) = &state.dataset else {
        return;
    };

    let mut clicked: Option<SortColumn> = None;
    let sort = state.sort;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .column(Column::auto())
        .column(Column::initial(180.0))
        .column(Column::initial(220.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for col in SortColumn::ALL {
                header.col(|ui: &mut Ui| {
                    let marker = if sort.column == col {
                        if sort.ascending { " ⏶" } else { " ⏷" }
                    } else {
                        ""
                    };
                    if ui
                        .button(RichText::new(format!("{}{marker}", col.label())).strong())
                        .clicked()
                    {
                        clicked = Some(col);
                    }
                });
            }
            header.col(|ui: &mut Ui| {
                ui.strong("Description");
            });
        })
        .body(|body| {
            body.rows(20.0, sorted.len(), |mut row| {
                let rec = &ds.records[sorted[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.award_id);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.recipient_name);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.awarding_agency_name);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format_currency(rec.award_amount));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.action_date.format("%Y-%m-%d").to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(truncate_words(&rec.award_description, 24))
                        .on_hover_text(&rec.award_description);
                });
            });
        });

    if let Some(col) = clicked {
        state.sort_by(col);
    }
}

// ---------------------------------------------------------------------------
// Featured awards strip
// ---------------------------------------------------------------------------

/// A handful of filtered awards rendered as cards, spread evenly across the
/// current subset.
pub fn featured_awards(ui: &mut Ui, state: &AppState) {
    ui.strong("Featured Awards");

    let Some(ds) = &state.dataset else {
        return;
    };
    if state.visible_indices.is_empty() {
        ui.label("No contracts match the current filters.");
        return;
    }

    for idx in state.featured_indices() {
        let rec = &ds.records[idx];
        ui.group(|ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format_currency(rec.award_amount))
                        .strong()
                        .size(16.0),
                );
                ui.label("awarded to");
                ui.label(RichText::new(&rec.recipient_name).strong());
                ui.label(format!("on {}", rec.action_date.format("%B %d, %Y")));
            });
            if !rec.award_description.is_empty() {
                ui.label(
                    RichText::new(truncate_words(&rec.award_description, DESCRIPTION_WORDS))
                        .italics()
                        .weak(),
                );
            }
        });
        ui.add_space(6.0);
    }
}

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

use crate::state::AppState;
use crate::ui::{compact_currency, format_count, format_currency};

/// Muted teal / coral pair used for single-series charts.
const PRIMARY: Color32 = Color32::from_rgb(0x7A, 0x9E, 0x9F);
const ACCENT: Color32 = Color32::from_rgb(0xFE, 0x5F, 0x55);

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

/// The three headline numbers above the charts.
pub fn metric_tiles(ui: &mut Ui, state: &AppState) {
    let agg = &state.aggregates;
    ui.columns(3, |cols: &mut [Ui]| {
        metric_tile(&mut cols[0], "Total Contracts", &format_count(agg.total_contracts));
        metric_tile(
            &mut cols[1],
            "Total Award Amount",
            &format_currency(agg.total_award_amount),
        );
        metric_tile(
            &mut cols[2],
            "Unique Recipients",
            &format_count(agg.unique_recipients),
        );
    });
}

fn metric_tile(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(label).color(PRIMARY).small());
        ui.heading(RichText::new(value).size(24.0));
    });
}

// ---------------------------------------------------------------------------
// DEI theme distribution (vertical bars)
// ---------------------------------------------------------------------------

pub fn theme_distribution_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("DEI Themes Distribution");

    let dist = &state.aggregates.theme_distribution;
    let bars: Vec<Bar> = dist
        .iter()
        .enumerate()
        .map(|(i, (tag, count))| {
            Bar::new(i as f64, *count as f64)
                .name(tag)
                .fill(state.theme_colors.color_for(tag))
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = dist.iter().map(|(tag, _)| tag.clone()).collect();

    Plot::new("theme_distribution")
        .height(260.0)
        .y_axis_label("Contracts")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Top-10 agency totals (horizontal bars)
// ---------------------------------------------------------------------------

pub fn agency_totals_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Award Amount by Top 10 Agencies");

    let totals = &state.aggregates.agency_totals;
    let n = totals.len();
    // agency_totals is descending; place the largest bar at the top.
    let bars: Vec<Bar> = totals
        .iter()
        .enumerate()
        .map(|(i, (name, sum))| {
            Bar::new((n - 1 - i) as f64, *sum)
                .name(name)
                .fill(PRIMARY)
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = totals.iter().rev().map(|(name, _)| name.clone()).collect();

    Plot::new("agency_totals")
        .height(300.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(|mark, _range| compact_currency(mark.value))
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Monthly timeline (line)
// ---------------------------------------------------------------------------

/// Monthly award totals. Months without records are omitted from the
/// timeline, so the line connects only months that had activity.
pub fn monthly_timeline_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Monthly Award Amounts");

    let timeline = &state.aggregates.monthly_timeline;
    let points: PlotPoints = timeline
        .iter()
        .enumerate()
        .map(|(i, (_, sum))| [i as f64, *sum])
        .collect();
    let labels: Vec<String> = timeline.iter().map(|(ym, _)| ym.to_string()).collect();
    let hover_labels = labels.clone();

    Plot::new("monthly_timeline")
        .height(260.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_formatter(|mark, _range| compact_currency(mark.value))
        .label_formatter(move |_name, value| {
            let i = value.x.round();
            let month = (i >= 0.0)
                .then(|| hover_labels.get(i as usize))
                .flatten()
                .cloned()
                .unwrap_or_default();
            format!("{month}\n{}", format_currency(value.y.max(0.0)))
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(ACCENT).width(2.0));
        });
}

/// Show a category label only at (near-)integer grid marks.
fn category_label(labels: &[String], value: f64) -> String {
    let i = value.round();
    if (value - i).abs() > 0.25 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::chart::{BarEntry, Chart, DistributionChart};
use crate::color::{ColorMap, DENSITY_COLOR, GRADE_COLOR, HISTOGRAM_COLOR};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart panel (central panel, "Charts" tab)
// ---------------------------------------------------------------------------

/// Render the current chart, or a hint if none has been requested yet.
pub fn chart_view(ui: &mut Ui, state: &AppState) {
    let Some(chart) = &state.chart else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Pick a chart from the sidebar");
        });
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(chart.title());
    });

    match chart {
        Chart::SubjectAverages(bars) => {
            let colors = ColorMap::new(&bars.iter().map(|b| b.label.as_str()).collect::<Vec<_>>());
            category_plot(ui, "subject_averages", chart, bars, |label| {
                colors.color_for(label)
            });
        }
        Chart::GradeBreakdown(bars) => {
            category_plot(ui, "grade_breakdown", chart, bars, |_| GRADE_COLOR);
        }
        Chart::Distribution(dist) => distribution_plot(ui, chart, dist),
    }
}

/// Bars at x = 0, 1, 2… with the category labels on the x axis.
fn category_plot(
    ui: &mut Ui,
    id: &str,
    chart: &Chart,
    entries: &[BarEntry],
    fill: impl Fn(&str) -> Color32,
) {
    let labels: Vec<String> = entries.iter().map(|e| e.label.clone()).collect();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Bar::new(i as f64, e.value)
                .name(&e.label)
                .width(0.6)
                .fill(fill(&e.label))
        })
        .collect();

    Plot::new(id)
        .x_axis_label(chart.x_label())
        .y_axis_label(chart.y_label())
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(chart.title()));
        });
}

/// Histogram bars with the density curve on top.
fn distribution_plot(ui: &mut Ui, chart: &Chart, dist: &DistributionChart) {
    let bars: Vec<Bar> = dist
        .bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("{:.1} – {:.1}", b.start, b.end))
                .fill(HISTOGRAM_COLOR)
        })
        .collect();

    Plot::new("distribution")
        .legend(Legend::default())
        .x_axis_label(chart.x_label())
        .y_axis_label(chart.y_label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&dist.column));

            if !dist.density.is_empty() {
                let points: PlotPoints = dist.density.iter().copied().collect();
                plot_ui.line(Line::new(points).name("density").color(DENSITY_COLOR).width(2.0));
            }
        });
}

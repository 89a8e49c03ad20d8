use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, Plot, PlotPoints, Points};

use crate::color::SeriesColors;
use crate::data::aggregate::{
    CategoryShare, MakerCategorySales, MakerSales, PenetrationPoint, QuarterlySales, StateMaturity,
    StateSales, TrendPoint,
};
use crate::ui::format::{compact, percent};

const CHART_HEIGHT: f32 = 280.0;
const ACCENT: Color32 = Color32::from_rgb(72, 152, 214);

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

fn date_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn date_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Label for a categorical axis where category `i` sits at `x = i`.
fn category_label(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

fn base_plot(id: &str) -> Plot {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Executive overview
// ---------------------------------------------------------------------------

/// EV sales over time.
pub fn sales_trend(ui: &mut Ui, trend: &[TrendPoint]) {
    let points: PlotPoints = trend
        .iter()
        .map(|t| [date_x(t.date), t.sales])
        .collect();

    base_plot("sales_trend")
        .x_axis_label("Date")
        .y_axis_label("EV sales")
        .x_axis_formatter(|mark, _range| date_label(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("EV sales").color(ACCENT).width(2.0));
        });
}

/// Share of each vehicle category, one bar per category.
pub fn category_share(ui: &mut Ui, shares: &[CategoryShare]) {
    let colors = SeriesColors::new(shares.iter().map(|c| c.vehicle_category.as_str()));
    let labels: Vec<String> = shares.iter().map(|c| c.vehicle_category.clone()).collect();

    base_plot("category_share")
        .y_axis_label("EV sales")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            for (i, share) in shares.iter().enumerate() {
                let bar = Bar::new(i as f64, share.sales)
                    .name(format!(
                        "{}: {} ({})",
                        share.vehicle_category,
                        compact(share.sales),
                        percent(share.share)
                    ))
                    .width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(&share.vehicle_category)
                        .color(colors.color_for(&share.vehicle_category)),
                );
            }
        });
}

/// Sales per fiscal year and quarter, coloured by quarter.
pub fn quarterly_performance(ui: &mut Ui, quarters: &[QuarterlySales]) {
    let colors = SeriesColors::new(quarters.iter().map(|q| q.quarter.as_str()));
    let labels: Vec<String> = quarters.iter().map(|q| q.period.clone()).collect();

    let mut by_quarter: BTreeMap<&str, Vec<Bar>> = BTreeMap::new();
    for (i, q) in quarters.iter().enumerate() {
        by_quarter.entry(q.quarter.as_str()).or_default().push(
            Bar::new(i as f64, q.sales)
                .name(format!("{}: {}", q.period, compact(q.sales)))
                .width(0.7),
        );
    }

    base_plot("quarterly_performance")
        .y_axis_label("EV sales")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            for (quarter, bars) in by_quarter {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(quarter)
                        .color(colors.color_for(quarter)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Makers & categories
// ---------------------------------------------------------------------------

/// Total sales per maker, largest first.
pub fn sales_by_maker(ui: &mut Ui, makers: &[MakerSales]) {
    let labels: Vec<String> = makers.iter().map(|m| m.maker.clone()).collect();
    let bars: Vec<Bar> = makers
        .iter()
        .enumerate()
        .map(|(i, m)| {
            Bar::new(i as f64, m.sales)
                .name(format!("{}: {}", m.maker, compact(m.sales)))
                .width(0.7)
        })
        .collect();

    base_plot("sales_by_maker")
        .y_axis_label("EV sales")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("EV sales").color(ACCENT));
        });
}

/// Maker sales stacked by vehicle category.
pub fn sales_by_maker_category(ui: &mut Ui, rows: &[MakerCategorySales]) {
    let makers: Vec<String> = rows
        .iter()
        .map(|r| r.maker.clone())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let position: BTreeMap<&str, usize> = makers
        .iter()
        .enumerate()
        .map(|(i, m)| (m.as_str(), i))
        .collect();
    let colors = SeriesColors::new(rows.iter().map(|r| r.vehicle_category.as_str()));

    let mut by_category: BTreeMap<&str, Vec<Bar>> = BTreeMap::new();
    for row in rows {
        let x = position[row.maker.as_str()] as f64;
        by_category
            .entry(row.vehicle_category.as_str())
            .or_default()
            .push(
                Bar::new(x, row.sales)
                    .name(format!("{} / {}: {}", row.maker, row.vehicle_category, compact(row.sales)))
                    .width(0.7),
            );
    }

    let labels = makers.clone();
    base_plot("sales_by_maker_category")
        .y_axis_label("EV sales")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            let mut stacked: Vec<BarChart> = Vec::new();
            for (category, bars) in by_category {
                let below: Vec<&BarChart> = stacked.iter().collect();
                let chart = BarChart::new(bars)
                    .name(category)
                    .color(colors.color_for(category))
                    .stack_on(&below);
                stacked.push(chart);
            }
            for chart in stacked {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// States & penetration
// ---------------------------------------------------------------------------

/// Horizontal bars of sales per state, largest on top.
pub fn sales_by_state(ui: &mut Ui, states: &[StateSales]) {
    let n = states.len();
    // Largest state gets the highest y so it is drawn at the top.
    let labels: Vec<String> = states.iter().rev().map(|s| s.state.clone()).collect();
    let bars: Vec<Bar> = states
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new((n - 1 - i) as f64, s.sales)
                .name(format!("{}: {}", s.state, compact(s.sales)))
                .width(0.7)
        })
        .collect();

    base_plot("sales_by_state")
        .height(CHART_HEIGHT.max(18.0 * n as f32))
        .x_axis_label("EV sales")
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("EV sales")
                    .color(ACCENT)
                    .horizontal(),
            );
        });
}

/// One penetration line per state. Rows without a market total leave gaps.
pub fn penetration_trend(ui: &mut Ui, points: &[PenetrationPoint]) {
    let colors = SeriesColors::new(points.iter().map(|p| p.state.as_str()));
    let mut by_state: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        if let Some(pen) = p.ev_penetration {
            by_state
                .entry(p.state.as_str())
                .or_default()
                .push([date_x(p.date), pen * 100.0]);
        }
    }

    base_plot("penetration_trend")
        .x_axis_label("Date")
        .y_axis_label("EV penetration %")
        .x_axis_formatter(|mark, _range| date_label(mark.value))
        .show(ui, |plot_ui| {
            for (state, mut series) in by_state {
                series.sort_by(|a, b| a[0].total_cmp(&b[0]));
                plot_ui.line(
                    Line::new(PlotPoints::from(series))
                        .name(state)
                        .color(colors.color_for(state)),
                );
            }
        });
}

/// Market size (log10) against average penetration, bubble size by EV sales,
/// with the overall average as a dotted reference line.
pub fn state_maturity(ui: &mut Ui, states: &[StateMaturity], avg_penetration: Option<f64>) {
    let colors = SeriesColors::new(states.iter().map(|s| s.state.as_str()));
    let max_sales = states.iter().map(|s| s.sales).fold(0.0_f64, f64::max);

    base_plot("state_maturity")
        .x_axis_label("Total vehicle market (log10 sales)")
        .y_axis_label("EV penetration %")
        .show(ui, |plot_ui| {
            for s in states {
                let Some(pen) = s.avg_penetration else {
                    continue;
                };
                if s.total_market_sales <= 0.0 {
                    continue;
                }
                let radius = if max_sales > 0.0 {
                    3.0 + 17.0 * (s.sales / max_sales).sqrt() as f32
                } else {
                    3.0
                };
                plot_ui.points(
                    Points::new(vec![[s.total_market_sales.log10(), pen * 100.0]])
                        .name(&s.state)
                        .radius(radius)
                        .color(colors.color_for(&s.state)),
                );
            }
            if let Some(avg) = avg_penetration {
                plot_ui.hline(
                    HLine::new(avg * 100.0)
                        .name(format!("Avg penetration {}", percent(avg)))
                        .color(Color32::GRAY)
                        .style(egui_plot::LineStyle::dotted_dense()),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(date_label(date_x(date)), "2024-02-29");
    }

    #[test]
    fn category_labels_only_on_whole_positions() {
        let labels = vec!["A".to_string(), "B".to_string()];
        assert_eq!(category_label(&labels, 1.0), "B");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }
}

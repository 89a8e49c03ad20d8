use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{MakersProfile, OverviewProfile, Report, StatesProfile, TreeNode, View};
use crate::state::AppState;
use crate::ui::format::{millions, percent, percent_or_na, thousands};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Navigation plus the active page.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for view in View::ALL {
            if ui.selectable_label(state.view == view, view.label()).clicked() {
                state.set_view(view);
            }
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match &state.report {
            Report::Overview(p) => overview_page(ui, p),
            Report::Makers(p) => makers_page(ui, p),
            Report::States(p) => states_page(ui, p),
        });
}

/// A row of labelled metric cards.
fn metric_cards(ui: &mut Ui, metrics: &[(&str, String)]) {
    ui.columns(metrics.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(metrics) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(*label).weak());
                ui.heading(RichText::new(value).strong());
            });
        }
    });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.strong(title);
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

fn overview_page(ui: &mut Ui, p: &OverviewProfile) {
    ui.heading("📊 Executive Overview");
    metric_cards(
        ui,
        &[
            ("Total EV Sales", millions(p.total_ev_sales)),
            ("Total Market Sales", millions(p.total_market_sales)),
            ("EV Penetration %", percent(p.penetration)),
            ("Top EV Maker", p.top_maker.clone()),
        ],
    );
    ui.separator();

    section(ui, "EV Sales Trend Over Time");
    plot::sales_trend(ui, &p.sales_trend);

    section(ui, "EV Sales Share by Vehicle Category");
    plot::category_share(ui, &p.category_share);

    section(ui, "📅 Quarterly Performance");
    plot::quarterly_performance(ui, &p.quarterly_performance);
}

fn makers_page(ui: &mut Ui, p: &MakersProfile) {
    ui.heading("🏭 Makers & Categories");
    metric_cards(
        ui,
        &[
            ("Total EV Sales", millions(p.total_ev_sales)),
            ("Active Makers", p.active_makers.to_string()),
            ("Top Maker", p.top_maker.clone()),
            ("Avg Sales / Maker", thousands(p.avg_sales_per_maker)),
        ],
    );
    ui.separator();

    section(ui, "EV Sales by Maker");
    plot::sales_by_maker(ui, &p.sales_by_maker);

    section(ui, "Maker × Vehicle Category Sales");
    plot::sales_by_maker_category(ui, &p.sales_by_maker_category);
    grouped_table(
        ui,
        "maker_category_table",
        &["Maker", "Vehicle category", "Sales"],
        p.sales_by_maker_category
            .iter()
            .map(|r| vec![r.maker.clone(), r.vehicle_category.clone(), thousands(r.sales)])
            .collect(),
    );

    section(ui, "🧩 Market Share Hierarchy");
    hierarchy(ui, &p.treemap, p.treemap.sales, 0);
}

fn states_page(ui: &mut Ui, p: &StatesProfile) {
    ui.heading("🗺 States & EV Penetration");
    metric_cards(
        ui,
        &[
            ("Total EV Sales", millions(p.total_ev_sales)),
            ("States Covered", p.total_states.to_string()),
            ("Top State", p.top_state.clone()),
            ("Avg EV Penetration", percent_or_na(p.avg_penetration)),
        ],
    );
    ui.separator();

    section(ui, "Total EV Sales by State");
    plot::sales_by_state(ui, &p.sales_by_state);

    section(ui, "EV Penetration Trend by State");
    plot::penetration_trend(ui, &p.penetration_trend);

    section(ui, "🎯 State Maturity Matrix");
    plot::state_maturity(ui, &p.state_maturity, p.avg_penetration);
    grouped_table(
        ui,
        "state_maturity_table",
        &["State", "EV sales", "Market sales", "Avg penetration"],
        p.state_maturity
            .iter()
            .map(|s| {
                vec![
                    s.state.clone(),
                    thousands(s.sales),
                    thousands(s.total_market_sales),
                    percent_or_na(s.avg_penetration),
                ]
            })
            .collect(),
    );
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

/// The category → maker hierarchy as nested rows sized by share of the root.
fn hierarchy(ui: &mut Ui, node: &TreeNode, root_sales: f64, depth: usize) {
    let fraction = if root_sales > 0.0 {
        (node.sales / root_sales) as f32
    } else {
        0.0
    };
    let text = format!("{}  {}", node.label, thousands(node.sales));
    let bar = egui::ProgressBar::new(fraction).text(format!("{text}  ({})", percent(fraction as f64)));

    if node.children.is_empty() {
        ui.add(bar);
        return;
    }

    egui::CollapsingHeader::new(RichText::new(text).strong())
        .id_salt(("hierarchy", depth, &node.label))
        .default_open(depth == 0)
        .show(ui, |ui: &mut Ui| {
            ui.add(bar);
            for child in &node.children {
                hierarchy(ui, child, root_sales, depth + 1);
            }
        });
}

/// A plain striped table of preformatted cells.
fn grouped_table(ui: &mut Ui, id: &str, headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(90.0), headers.len())
            .max_scroll_height(220.0)
            .header(20.0, |mut header| {
                for h in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|mut body| {
                for cells in &rows {
                    body.row(18.0, |mut row| {
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell.as_str());
                            });
                        }
                    });
                }
            });
    });
}

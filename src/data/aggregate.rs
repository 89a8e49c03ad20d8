use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::filter::{filter_rows, FilterSelection};
use super::group::{accumulate_by, arg_max, mean_of, sorted_desc, stable_sum, sum_by};
use super::model::{Datasets, SalesRecord, StateSalesRecord};

/// Shown in place of a leader when nothing was sold.
pub const NOT_AVAILABLE: &str = "N/A";

/// Label of the synthetic root of the category → maker hierarchy.
pub const TREEMAP_ROOT: &str = "All Categories";

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum View {
    #[default]
    Overview,
    Makers,
    States,
}

impl View {
    pub const ALL: [View; 3] = [View::Overview, View::Makers, View::States];

    pub fn label(self) -> &'static str {
        match self {
            View::Overview => "Executive Overview",
            View::Makers => "Makers & Categories",
            View::States => "States & Penetration",
        }
    }
}

/// The aggregates behind one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view")]
pub enum Report {
    Overview(OverviewProfile),
    Makers(MakersProfile),
    States(StatesProfile),
}

/// Filter both sales tables with `selection` and aggregate them for `view`.
pub fn compute(view: View, data: &Datasets, selection: &FilterSelection) -> Report {
    match view {
        View::Overview => {
            let makers = filter_rows(&data.makers, selection);
            let states = filter_rows(&data.states, selection);
            Report::Overview(overview(&makers, &states))
        }
        View::Makers => Report::Makers(makers(&filter_rows(&data.makers, selection))),
        View::States => Report::States(states(&filter_rows(&data.states, selection))),
    }
}

/// Leader of `groups`, or [`NOT_AVAILABLE`] when nothing was sold.
fn leader(groups: &BTreeMap<String, f64>, total: f64) -> String {
    if total == 0.0 {
        return NOT_AVAILABLE.to_string();
    }
    arg_max(groups)
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

// ---------------------------------------------------------------------------
// Executive overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub vehicle_category: String,
    pub sales: f64,
    /// Fraction of the filtered total, 0 when the total is 0.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterlySales {
    pub fiscal_year: i32,
    pub quarter: String,
    /// `"{fiscal_year} - {quarter}"`, the bar label.
    pub period: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewProfile {
    pub total_ev_sales: f64,
    pub total_market_sales: f64,
    /// EV sales over market sales; 0 when the market total is 0.
    pub penetration: f64,
    pub top_maker: String,
    /// Ascending by date.
    pub sales_trend: Vec<TrendPoint>,
    pub category_share: Vec<CategoryShare>,
    /// Ascending by fiscal year, then quarter.
    pub quarterly_performance: Vec<QuarterlySales>,
}

pub fn overview(makers: &[&SalesRecord], states: &[&StateSalesRecord]) -> OverviewProfile {
    let by_maker = sum_by(makers, |r| r.maker.clone(), |r| r.sales);
    let total_ev_sales = stable_sum(by_maker.values().copied());
    let total_market_sales = stable_sum(states.iter().map(|r| r.total_market_sales));

    let sales_trend = sum_by(makers, |r| r.date, |r| r.sales)
        .into_iter()
        .map(|(date, sales)| TrendPoint { date, sales })
        .collect();

    let category_share = sum_by(makers, |r| r.vehicle_category.clone(), |r| r.sales)
        .into_iter()
        .map(|(vehicle_category, sales)| CategoryShare {
            vehicle_category,
            sales,
            share: ratio_or_zero(sales, total_ev_sales),
        })
        .collect();

    let quarterly_performance = sum_by(
        makers,
        |r| (r.fiscal_year, r.quarter.clone()),
        |r| r.sales,
    )
    .into_iter()
    .map(|((fiscal_year, quarter), sales)| QuarterlySales {
        period: format!("{fiscal_year} - {quarter}"),
        fiscal_year,
        quarter,
        sales,
    })
    .collect();

    OverviewProfile {
        total_ev_sales,
        total_market_sales,
        penetration: ratio_or_zero(total_ev_sales, total_market_sales),
        top_maker: leader(&by_maker, total_ev_sales),
        sales_trend,
        category_share,
        quarterly_performance,
    }
}

// ---------------------------------------------------------------------------
// Makers & categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakerSales {
    pub maker: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakerCategorySales {
    pub maker: String,
    pub vehicle_category: String,
    pub sales: f64,
}

/// A weighted node of the category → maker hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub label: String,
    pub sales: f64,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: String, sales: f64) -> Self {
        TreeNode {
            label,
            sales,
            children: Vec::new(),
        }
    }

    /// A node weighted by the sum of its children, largest child first.
    fn branch(label: String, mut children: Vec<TreeNode>) -> Self {
        children.sort_by(|a, b| b.sales.total_cmp(&a.sales));
        TreeNode {
            label,
            sales: stable_sum(children.iter().map(|c| c.sales)),
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakersProfile {
    pub total_ev_sales: f64,
    pub active_makers: usize,
    /// 0 when there are no makers.
    pub avg_sales_per_maker: f64,
    pub top_maker: String,
    /// Descending by sales.
    pub sales_by_maker: Vec<MakerSales>,
    pub sales_by_maker_category: Vec<MakerCategorySales>,
    /// Root → category → maker, zero-sales makers left out.
    pub treemap: TreeNode,
}

pub fn makers(rows: &[&SalesRecord]) -> MakersProfile {
    let by_maker = sum_by(rows, |r| r.maker.clone(), |r| r.sales);
    let total_ev_sales = stable_sum(by_maker.values().copied());
    let active_makers = by_maker.len();
    let top_maker = leader(&by_maker, total_ev_sales);

    let sales_by_maker = sorted_desc(by_maker)
        .into_iter()
        .map(|(maker, sales)| MakerSales { maker, sales })
        .collect();

    let sales_by_maker_category = sum_by(
        rows,
        |r| (r.maker.clone(), r.vehicle_category.clone()),
        |r| r.sales,
    )
    .into_iter()
    .map(|((maker, vehicle_category), sales)| MakerCategorySales {
        maker,
        vehicle_category,
        sales,
    })
    .collect();

    let mut categories: BTreeMap<String, Vec<TreeNode>> = BTreeMap::new();
    let by_category_maker = sum_by(
        rows,
        |r| (r.vehicle_category.clone(), r.maker.clone()),
        |r| r.sales,
    );
    for ((category, maker), sales) in by_category_maker {
        if sales > 0.0 {
            categories
                .entry(category)
                .or_default()
                .push(TreeNode::leaf(maker, sales));
        }
    }
    let treemap = TreeNode::branch(
        TREEMAP_ROOT.to_string(),
        categories
            .into_iter()
            .map(|(category, makers)| TreeNode::branch(category, makers))
            .collect(),
    );

    MakersProfile {
        total_ev_sales,
        active_makers,
        avg_sales_per_maker: ratio_or_zero(total_ev_sales, active_makers as f64),
        top_maker,
        sales_by_maker,
        sales_by_maker_category,
        treemap,
    }
}

// ---------------------------------------------------------------------------
// States & penetration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSales {
    pub state: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenetrationPoint {
    pub date: NaiveDate,
    pub state: String,
    /// `None` when the row's market total is 0.
    pub ev_penetration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateMaturity {
    pub state: String,
    pub sales: f64,
    pub total_market_sales: f64,
    /// Mean of the state's defined per-row penetrations.
    pub avg_penetration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatesProfile {
    pub total_states: usize,
    pub total_ev_sales: f64,
    /// Mean over rows with a defined penetration; `None` if there are none.
    pub avg_penetration: Option<f64>,
    pub top_state: String,
    /// Descending by sales.
    pub sales_by_state: Vec<StateSales>,
    /// One point per filtered row, in row order.
    pub penetration_trend: Vec<PenetrationPoint>,
    pub state_maturity: Vec<StateMaturity>,
}

pub fn states(rows: &[&StateSalesRecord]) -> StatesProfile {
    let by_state = sum_by(rows, |r| r.state.clone(), |r| r.sales);
    let total_ev_sales = stable_sum(by_state.values().copied());
    let market_by_state = sum_by(rows, |r| r.state.clone(), |r| r.total_market_sales);
    let penetration_by_state = accumulate_by(rows, |r| r.state.clone(), |r| r.ev_penetration());

    let state_maturity = by_state
        .iter()
        .map(|(state, &sales)| StateMaturity {
            state: state.clone(),
            sales,
            total_market_sales: market_by_state.get(state).copied().unwrap_or(0.0),
            avg_penetration: penetration_by_state.get(state).and_then(|acc| acc.mean()),
        })
        .collect();

    let penetration_trend = rows
        .iter()
        .map(|r| PenetrationPoint {
            date: r.date,
            state: r.state.clone(),
            ev_penetration: r.ev_penetration(),
        })
        .collect();

    StatesProfile {
        total_states: by_state.len(),
        total_ev_sales,
        avg_penetration: mean_of(rows.iter().map(|r| r.ev_penetration())),
        top_state: leader(&by_state, total_ev_sales),
        sales_by_state: sorted_desc(by_state)
            .into_iter()
            .map(|(state, sales)| StateSales { state, sales })
            .collect(),
        penetration_trend,
        state_maturity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    use crate::data::filter::Dimension;
    use crate::data::model::InfrastructureTable;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(date: NaiveDate, quarter: &str, category: &str, maker: &str, sales: f64) -> SalesRecord {
        SalesRecord {
            date,
            fiscal_year: date.year(),
            quarter: quarter.into(),
            vehicle_category: category.into(),
            maker: maker.into(),
            sales,
        }
    }

    fn state(
        date: NaiveDate,
        quarter: &str,
        category: &str,
        name: &str,
        sales: f64,
        market: f64,
    ) -> StateSalesRecord {
        StateSalesRecord {
            date,
            fiscal_year: date.year(),
            quarter: quarter.into(),
            vehicle_category: category.into(),
            state: name.into(),
            sales,
            total_market_sales: market,
        }
    }

    fn sample() -> Datasets {
        let makers = vec![
            sale(day(2023, 4, 1), "Q1", "2W", "Ola", 120.0),
            sale(day(2023, 4, 1), "Q1", "4W", "Tata", 80.0),
            sale(day(2023, 7, 1), "Q2", "2W", "Ather", 60.0),
            sale(day(2023, 7, 1), "Q2", "4W", "Tata", 40.0),
            sale(day(2024, 4, 1), "Q1", "2W", "Ola", 30.0),
            sale(day(2024, 4, 1), "Q1", "3W", "Mahindra", 0.0),
        ];
        let states = vec![
            state(day(2023, 4, 1), "Q1", "2W", "Kerala", 50.0, 500.0),
            state(day(2023, 4, 1), "Q1", "4W", "Delhi", 20.0, 100.0),
            state(day(2023, 7, 1), "Q2", "2W", "Kerala", 30.0, 100.0),
            state(day(2024, 4, 1), "Q1", "2W", "Goa", 10.0, 0.0),
        ];
        Datasets::new(makers, states, InfrastructureTable::default())
    }

    /// Fractional figures whose sums round differently in different orders.
    fn fractional() -> Datasets {
        let makers = vec![
            sale(day(2023, 4, 1), "Q1", "2W", "A", 0.3),
            sale(day(2023, 4, 1), "Q1", "2W", "B", 0.1),
            sale(day(2023, 7, 1), "Q2", "4W", "A", 0.2),
            sale(day(2023, 7, 1), "Q2", "2W", "C", 0.7),
            sale(day(2024, 4, 1), "Q1", "4W", "B", 0.6),
        ];
        let states = vec![
            state(day(2023, 4, 1), "Q1", "2W", "Kerala", 0.1, 0.3),
            state(day(2023, 7, 1), "Q2", "2W", "Kerala", 0.2, 0.7),
            state(day(2023, 7, 1), "Q2", "4W", "Delhi", 0.3, 0.9),
            state(day(2024, 4, 1), "Q1", "4W", "Delhi", 0.6, 1.1),
        ];
        Datasets::new(makers, states, InfrastructureTable::default())
    }

    fn all(data: &Datasets) -> FilterSelection {
        FilterSelection::all(&data.dimensions)
    }

    fn overview_of(data: &Datasets, sel: &FilterSelection) -> OverviewProfile {
        match compute(View::Overview, data, sel) {
            Report::Overview(p) => p,
            other => panic!("unexpected report {other:?}"),
        }
    }

    fn makers_of(data: &Datasets, sel: &FilterSelection) -> MakersProfile {
        match compute(View::Makers, data, sel) {
            Report::Makers(p) => p,
            other => panic!("unexpected report {other:?}"),
        }
    }

    fn states_of(data: &Datasets, sel: &FilterSelection) -> StatesProfile {
        match compute(View::States, data, sel) {
            Report::States(p) => p,
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn two_maker_scenario() {
        let rows = [
            sale(day(2023, 1, 1), "Q1", "2W", "A", 100.0),
            sale(day(2023, 1, 1), "Q1", "2W", "B", 50.0),
        ];
        let data = Datasets::new(rows.to_vec(), Vec::new(), InfrastructureTable::default());
        let sel = all(&data);

        let over = overview_of(&data, &sel);
        assert_eq!(over.total_ev_sales, 150.0);
        assert_eq!(over.top_maker, "A");

        let mk = makers_of(&data, &sel);
        assert_eq!(
            mk.sales_by_maker,
            vec![
                MakerSales { maker: "A".into(), sales: 100.0 },
                MakerSales { maker: "B".into(), sales: 50.0 },
            ]
        );
    }

    #[test]
    fn overview_metrics_and_tables() {
        let data = sample();
        let p = overview_of(&data, &all(&data));

        assert_eq!(p.total_ev_sales, 330.0);
        assert_eq!(p.total_market_sales, 700.0);
        assert!((p.penetration - 330.0 / 700.0).abs() < 1e-12);
        assert_eq!(p.top_maker, "Ola");

        let dates: Vec<_> = p.sales_trend.iter().map(|t| (t.date, t.sales)).collect();
        assert_eq!(
            dates,
            vec![
                (day(2023, 4, 1), 200.0),
                (day(2023, 7, 1), 100.0),
                (day(2024, 4, 1), 30.0),
            ]
        );

        let cats: Vec<_> = p
            .category_share
            .iter()
            .map(|c| (c.vehicle_category.as_str(), c.sales))
            .collect();
        assert_eq!(cats, vec![("2W", 210.0), ("3W", 0.0), ("4W", 120.0)]);
        let share_sum: f64 = p.category_share.iter().map(|c| c.share).sum();
        assert!((share_sum - 1.0).abs() < 1e-12);

        let periods: Vec<_> = p
            .quarterly_performance
            .iter()
            .map(|q| (q.period.as_str(), q.sales))
            .collect();
        assert_eq!(
            periods,
            vec![("2023 - Q1", 200.0), ("2023 - Q2", 100.0), ("2024 - Q1", 30.0)]
        );
    }

    #[test]
    fn overview_penetration_is_zero_without_market() {
        let data = sample();
        let mut sel = all(&data);
        sel.years = [2024].into();

        let p = overview_of(&data, &sel);
        assert_eq!(p.total_market_sales, 0.0);
        assert_eq!(p.total_ev_sales, 30.0);
        assert_eq!(p.penetration, 0.0);
    }

    #[test]
    fn makers_metrics_and_hierarchy() {
        let data = sample();
        let p = makers_of(&data, &all(&data));

        assert_eq!(p.total_ev_sales, 330.0);
        assert_eq!(p.active_makers, 4);
        assert_eq!(p.avg_sales_per_maker, 82.5);
        assert_eq!(p.top_maker, "Ola");

        let ranked: Vec<_> = p.sales_by_maker.iter().map(|m| m.maker.as_str()).collect();
        assert_eq!(ranked, vec!["Ola", "Tata", "Ather", "Mahindra"]);

        assert_eq!(p.sales_by_maker_category.len(), 4);
        assert_eq!(p.sales_by_maker_category[0].maker, "Ather");

        let root = &p.treemap;
        assert_eq!(root.label, TREEMAP_ROOT);
        assert_eq!(root.sales, 330.0);
        let cats: Vec<_> = root.children.iter().map(|c| (c.label.as_str(), c.sales)).collect();
        // The 3W category only has a zero-sales maker and disappears.
        assert_eq!(cats, vec![("2W", 210.0), ("4W", 120.0)]);
        let two_wheelers: Vec<_> = root.children[0]
            .children
            .iter()
            .map(|m| (m.label.as_str(), m.sales))
            .collect();
        assert_eq!(two_wheelers, vec![("Ola", 150.0), ("Ather", 60.0)]);
    }

    #[test]
    fn groupings_add_up_to_the_total() {
        for data in [sample(), fractional()] {
            let dims = data.dimensions.clone();
            let mut selections = vec![all(&data)];
            for year in &dims.years {
                let mut sel = all(&data);
                sel.years = [*year].into();
                selections.push(sel);
            }
            for category in &dims.categories {
                let mut sel = all(&data);
                sel.toggle_category(category);
                selections.push(sel);
            }

            for sel in &selections {
                let over = overview_of(&data, sel);
                let mk = makers_of(&data, sel);
                let by_maker = stable_sum(mk.sales_by_maker.iter().map(|m| m.sales));
                let by_pair = stable_sum(mk.sales_by_maker_category.iter().map(|m| m.sales));
                assert_eq!(over.total_ev_sales, by_maker);
                assert_eq!(mk.total_ev_sales, over.total_ev_sales);
                // Different groupings of fractional figures agree up to rounding.
                assert!((by_pair - by_maker).abs() < 1e-9);
                assert!((mk.treemap.sales - by_maker).abs() < 1e-9);

                let st = states_of(&data, sel);
                let by_state = stable_sum(st.sales_by_state.iter().map(|s| s.sales));
                assert_eq!(st.total_ev_sales, by_state);
            }
        }
    }

    #[test]
    fn empty_selection_yields_the_no_data_case() {
        let data = sample();
        for dim in Dimension::ALL {
            let mut sel = all(&data);
            sel.select_none(dim);

            let over = overview_of(&data, &sel);
            assert_eq!(over.total_ev_sales, 0.0);
            assert_eq!(over.penetration, 0.0);
            assert_eq!(over.top_maker, NOT_AVAILABLE);
            assert!(over.sales_trend.is_empty());
            assert!(over.category_share.is_empty());
            assert!(over.quarterly_performance.is_empty());

            let mk = makers_of(&data, &sel);
            assert_eq!(mk.total_ev_sales, 0.0);
            assert_eq!(mk.active_makers, 0);
            assert_eq!(mk.avg_sales_per_maker, 0.0);
            assert_eq!(mk.top_maker, NOT_AVAILABLE);
            assert!(mk.sales_by_maker.is_empty());
            assert!(mk.sales_by_maker_category.is_empty());
            assert!(mk.treemap.children.is_empty());

            let st = states_of(&data, &sel);
            assert_eq!(st.total_states, 0);
            assert_eq!(st.total_ev_sales, 0.0);
            assert_eq!(st.avg_penetration, None);
            assert_eq!(st.top_state, NOT_AVAILABLE);
            assert!(st.sales_by_state.is_empty());
            assert!(st.penetration_trend.is_empty());
            assert!(st.state_maturity.is_empty());
        }
    }

    #[test]
    fn zero_sales_leader_is_not_available() {
        let data = sample();
        let mut sel = all(&data);
        sel.categories = ["3W".to_string()].into();
        let mk = makers_of(&data, &sel);
        assert_eq!(mk.active_makers, 1);
        assert_eq!(mk.top_maker, NOT_AVAILABLE);
    }

    #[test]
    fn maker_ties_go_to_the_first_name() {
        let rows = vec![
            sale(day(2023, 1, 1), "Q1", "2W", "Zeta", 10.0),
            sale(day(2023, 1, 1), "Q1", "2W", "Alpha", 10.0),
        ];
        let data = Datasets::new(rows, Vec::new(), InfrastructureTable::default());
        let mk = makers_of(&data, &all(&data));
        assert_eq!(mk.top_maker, "Alpha");
        assert_eq!(mk.sales_by_maker[0].maker, "Alpha");
    }

    #[test]
    fn states_metrics_and_tables() {
        let data = sample();
        let p = states_of(&data, &all(&data));

        assert_eq!(p.total_states, 3);
        assert_eq!(p.total_ev_sales, 110.0);
        assert_eq!(p.top_state, "Kerala");

        let ranked: Vec<_> = p
            .sales_by_state
            .iter()
            .map(|s| (s.state.as_str(), s.sales))
            .collect();
        assert_eq!(ranked, vec![("Kerala", 80.0), ("Delhi", 20.0), ("Goa", 10.0)]);

        assert_eq!(p.penetration_trend.len(), 4);
        assert_eq!(p.penetration_trend[0].ev_penetration, Some(0.1));
        assert_eq!(p.penetration_trend[3].state, "Goa");
        assert_eq!(p.penetration_trend[3].ev_penetration, None);

        let kerala = p.state_maturity.iter().find(|s| s.state == "Kerala").unwrap();
        assert_eq!(kerala.sales, 80.0);
        assert_eq!(kerala.total_market_sales, 600.0);
        assert!((kerala.avg_penetration.unwrap() - 0.2).abs() < 1e-12);

        let goa = p.state_maturity.iter().find(|s| s.state == "Goa").unwrap();
        assert_eq!(goa.avg_penetration, None);
    }

    #[test]
    fn average_penetration_skips_rows_without_market() {
        let data = sample();
        let p = states_of(&data, &all(&data));
        // Rows: 0.1, 0.2, 0.3 and Goa's undefined row.
        assert!((p.avg_penetration.unwrap() - 0.2).abs() < 1e-12);

        let mut sel = all(&data);
        sel.years = [2024].into();
        let only_goa = states_of(&data, &sel);
        assert_eq!(only_goa.total_ev_sales, 10.0);
        assert_eq!(only_goa.penetration_trend[0].ev_penetration, None);
        assert_eq!(only_goa.avg_penetration, None);
        assert_eq!(only_goa.top_state, "Goa");
    }

    #[test]
    fn results_do_not_depend_on_row_order() {
        for data in [sample(), fractional()] {
            let mut reversed = data.clone();
            reversed.makers.reverse();
            reversed.states.reverse();
            let mut rotated = data.clone();
            rotated.makers.rotate_left(1);
            rotated.states.rotate_left(1);
            let sel = all(&data);

            for other in [&reversed, &rotated] {
                assert_eq!(overview_of(&data, &sel), overview_of(other, &sel));
                assert_eq!(makers_of(&data, &sel), makers_of(other, &sel));

                let a = states_of(&data, &sel);
                let b = states_of(other, &sel);
                assert_eq!(a.total_ev_sales, b.total_ev_sales);
                assert_eq!(a.sales_by_state, b.sales_by_state);
                assert_eq!(a.state_maturity, b.state_maturity);
                assert_eq!(a.avg_penetration, b.avg_penetration);
            }
        }
    }

    #[test]
    fn fractional_totals_match_for_any_row_order() {
        let forward = [
            sale(day(2023, 4, 1), "Q1", "2W", "A", 0.1),
            sale(day(2023, 4, 1), "Q1", "2W", "B", 0.2),
            sale(day(2023, 4, 1), "Q1", "2W", "C", 0.3),
        ];
        let mut backward = forward.clone();
        backward.reverse();
        let totals: Vec<f64> = [forward.to_vec(), backward.to_vec()]
            .into_iter()
            .map(|rows| {
                let data = Datasets::new(rows, Vec::new(), InfrastructureTable::default());
                makers_of(&data, &all(&data)).total_ev_sales
            })
            .collect();
        assert_eq!(totals[0], totals[1]);

        let rows = vec![
            sale(day(2023, 4, 1), "Q1", "2W", "A", 0.3),
            sale(day(2023, 4, 1), "Q1", "2W", "B", 0.1),
            sale(day(2023, 4, 1), "Q1", "2W", "A", 0.2),
        ];
        let data = Datasets::new(rows, Vec::new(), InfrastructureTable::default());
        let mk = makers_of(&data, &all(&data));
        let listed: f64 = mk.sales_by_maker.iter().map(|m| m.sales).sum();
        assert_eq!(mk.total_ev_sales, listed);
    }

    #[test]
    fn sales_above_the_market_give_penetration_over_one() {
        let rows = vec![
            state(day(2023, 4, 1), "Q1", "2W", "Goa", 30.0, 20.0),
            state(day(2023, 7, 1), "Q2", "2W", "Goa", 10.0, 20.0),
        ];
        let data = Datasets::new(Vec::new(), rows, InfrastructureTable::default());
        let sel = FilterSelection {
            years: [2023].into(),
            quarters: ["Q1".to_string(), "Q2".to_string()].into(),
            categories: ["2W".to_string()].into(),
        };
        let p = states_of(&data, &sel);

        assert_eq!(p.penetration_trend[0].ev_penetration, Some(1.5));
        assert_eq!(p.avg_penetration, Some(1.0));
        let goa = &p.state_maturity[0];
        assert_eq!(goa.sales, 40.0);
        assert_eq!(goa.total_market_sales, 40.0);
        assert_eq!(goa.avg_penetration, Some(1.0));
    }

    #[test]
    fn report_serializes_with_view_tag() {
        let data = sample();
        let report = compute(View::States, &data, &all(&data));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["view"], "States");
        assert_eq!(json["top_state"], "Kerala");
        assert!(json["penetration_trend"][3]["ev_penetration"].is_null());
    }
}

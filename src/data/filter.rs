use std::collections::BTreeSet;

use super::model::{Dimensions, SalesRecord, StateSalesRecord};

// ---------------------------------------------------------------------------
// Segmented rows: anything sliced by year, quarter and category
// ---------------------------------------------------------------------------

/// The three filterable dimensions shared by the maker and state tables.
pub trait Segmented {
    fn fiscal_year(&self) -> i32;
    fn quarter(&self) -> &str;
    fn vehicle_category(&self) -> &str;
}

impl Segmented for SalesRecord {
    fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }
    fn quarter(&self) -> &str {
        &self.quarter
    }
    fn vehicle_category(&self) -> &str {
        &self.vehicle_category
    }
}

impl Segmented for StateSalesRecord {
    fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }
    fn quarter(&self) -> &str {
        &self.quarter
    }
    fn vehicle_category(&self) -> &str {
        &self.vehicle_category
    }
}

// ---------------------------------------------------------------------------
// FilterSelection
// ---------------------------------------------------------------------------

/// Which dimension a sidebar widget edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    FiscalYear,
    Quarter,
    VehicleCategory,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::FiscalYear,
        Dimension::Quarter,
        Dimension::VehicleCategory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::FiscalYear => "Fiscal Year",
            Dimension::Quarter => "Quarter",
            Dimension::VehicleCategory => "Vehicle Category",
        }
    }
}

/// Selected values per dimension.
///
/// An empty set selects nothing: every row fails it. There is no
/// "unfiltered" state other than selecting every value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub quarters: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl FilterSelection {
    /// Everything selected.
    pub fn all(dims: &Dimensions) -> Self {
        FilterSelection {
            years: dims.years.clone(),
            quarters: dims.quarters.clone(),
            categories: dims.categories.clone(),
        }
    }

    pub fn matches<R: Segmented>(&self, row: &R) -> bool {
        self.years.contains(&row.fiscal_year())
            && self.quarters.contains(row.quarter())
            && self.categories.contains(row.vehicle_category())
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.years.remove(&year) {
            self.years.insert(year);
        }
    }

    pub fn toggle_quarter(&mut self, quarter: &str) {
        toggle(&mut self.quarters, quarter);
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.categories, category);
    }

    /// Select every known value of one dimension.
    pub fn select_all(&mut self, dim: Dimension, dims: &Dimensions) {
        match dim {
            Dimension::FiscalYear => self.years = dims.years.clone(),
            Dimension::Quarter => self.quarters = dims.quarters.clone(),
            Dimension::VehicleCategory => self.categories = dims.categories.clone(),
        }
    }

    /// Deselect every value of one dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        match dim {
            Dimension::FiscalYear => self.years.clear(),
            Dimension::Quarter => self.quarters.clear(),
            Dimension::VehicleCategory => self.categories.clear(),
        }
    }

    /// Number of selected values in one dimension.
    pub fn selected_count(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::FiscalYear => self.years.len(),
            Dimension::Quarter => self.quarters.len(),
            Dimension::VehicleCategory => self.categories.len(),
        }
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows that passed a selection, borrowed from the source table in source
/// order.
pub type FilteredTable<'a, R> = Vec<&'a R>;

/// Keep the rows whose year, quarter and category are all selected.
///
/// Accepts either a whole table (`&[R]`) or an earlier filter result
/// (`table.iter().copied()`), so filters can be chained.
pub fn filter_rows<'a, R, I>(rows: I, selection: &FilterSelection) -> FilteredTable<'a, R>
where
    R: Segmented + 'a,
    I: IntoIterator<Item = &'a R>,
{
    rows.into_iter()
        .filter(|row| selection.matches(*row))
        .collect()
}

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::loader::deserialize_date;

// ---------------------------------------------------------------------------
// SalesRecord – one row of the maker sales table
// ---------------------------------------------------------------------------

/// EV sales of one maker in one period and vehicle category.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SalesRecord {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub fiscal_year: i32,
    pub quarter: String,
    pub vehicle_category: String,
    pub maker: String,
    pub sales: f64,
}

// ---------------------------------------------------------------------------
// StateSalesRecord – one row of the state sales table
// ---------------------------------------------------------------------------

/// EV sales of one state next to the state's whole vehicle market.
///
/// `sales <= total_market_sales` is expected but not checked; rows that break
/// it simply report a penetration above 100%.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StateSalesRecord {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub fiscal_year: i32,
    pub quarter: String,
    pub vehicle_category: String,
    pub state: String,
    pub sales: f64,
    pub total_market_sales: f64,
}

impl StateSalesRecord {
    /// EV share of this row's market, `None` when the market is empty.
    pub fn ev_penetration(&self) -> Option<f64> {
        if self.total_market_sales == 0.0 {
            None
        } else {
            Some(self.sales / self.total_market_sales)
        }
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the infrastructure table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. The infrastructure table has no fixed schema,
/// so its columns are typed per cell when loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    /// Guess the narrowest type for a raw CSV field.
    pub fn infer(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// InfrastructureTable – charging locations, loaded but not aggregated
// ---------------------------------------------------------------------------

/// One charging-infrastructure row: column name → cell.
pub type InfrastructureRecord = BTreeMap<String, CellValue>;

#[derive(Debug, Clone, Default)]
pub struct InfrastructureTable {
    /// Column names in file order.
    pub column_names: Vec<String>,
    pub rows: Vec<InfrastructureRecord>,
}

impl InfrastructureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dimensions – the legal filter values
// ---------------------------------------------------------------------------

/// Distinct values of each filter dimension, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dimensions {
    pub years: BTreeSet<i32>,
    pub quarters: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl Dimensions {
    /// Collect the dimension values found in the maker table.
    pub fn from_makers(makers: &[SalesRecord]) -> Self {
        let mut dims = Dimensions::default();
        for row in makers {
            dims.years.insert(row.fiscal_year);
            dims.quarters.insert(row.quarter.clone());
            dims.categories.insert(row.vehicle_category.clone());
        }
        dims
    }
}

// ---------------------------------------------------------------------------
// Datasets – the complete load result
// ---------------------------------------------------------------------------

/// All three tables plus the filter dimensions. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub makers: Vec<SalesRecord>,
    pub states: Vec<StateSalesRecord>,
    pub infrastructure: InfrastructureTable,
    /// Derived from `makers` when the datasets are assembled.
    pub dimensions: Dimensions,
}

impl Datasets {
    pub fn new(
        makers: Vec<SalesRecord>,
        states: Vec<StateSalesRecord>,
        infrastructure: InfrastructureTable,
    ) -> Self {
        let dimensions = Dimensions::from_makers(&makers);
        Datasets {
            makers,
            states,
            infrastructure,
            dimensions,
        }
    }
}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::model::{CellValue, Datasets, InfrastructureTable, SalesRecord, StateSalesRecord};

pub const MAKERS_FILE: &str = "EV_Makers_Sales_Cleaned.csv";
pub const STATES_FILE: &str = "EV_States_Sales_Cleaned.csv";
pub const INFRASTRUCTURE_FILE: &str = "EV_Infrastructure_Map.csv";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything that stops the three tables from loading. There is no partial
/// load: one bad file fails the whole set.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}, row {row}: {message}", .path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// File locations
// ---------------------------------------------------------------------------

/// Where the three source tables live.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub makers: PathBuf,
    pub states: PathBuf,
    pub infrastructure: PathBuf,
}

impl DataPaths {
    /// The fixed file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        DataPaths {
            makers: dir.join(MAKERS_FILE),
            states: dir.join(STATES_FILE),
            infrastructure: dir.join(INFRASTRUCTURE_FILE),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load all three tables. Called once at startup; the caller owns the result.
pub fn load(paths: &DataPaths) -> Result<Datasets, DataLoadError> {
    let makers: Vec<SalesRecord> = load_typed(&paths.makers)?;
    check_sales(&paths.makers, &makers, |r| vec![("sales", r.sales)])?;

    let states: Vec<StateSalesRecord> = load_typed(&paths.states)?;
    check_sales(&paths.states, &states, |r| {
        vec![
            ("sales", r.sales),
            ("total_market_sales", r.total_market_sales),
        ]
    })?;

    let infrastructure = load_infrastructure(&paths.infrastructure)?;

    log::info!(
        "Loaded {} maker rows, {} state rows, {} infrastructure rows",
        makers.len(),
        states.len(),
        infrastructure.len()
    );

    Ok(Datasets::new(makers, states, infrastructure))
}

// ---------------------------------------------------------------------------
// Typed CSV tables
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, DataLoadError> {
    if !path.is_file() {
        return Err(DataLoadError::MissingFile(path.to_path_buf()));
    }
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Deserialize every row of a headed CSV file. Unknown columns are ignored.
fn load_typed<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataLoadError> {
    let mut reader = open(path)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Sales figures must be finite and non-negative.
fn check_sales<T>(
    path: &Path,
    rows: &[T],
    figures: impl Fn(&T) -> Vec<(&'static str, f64)>,
) -> Result<(), DataLoadError> {
    for (i, row) in rows.iter().enumerate() {
        for (column, value) in figures(row) {
            if !value.is_finite() || value < 0.0 {
                return Err(DataLoadError::InvalidValue {
                    path: path.to_path_buf(),
                    row: i + 1,
                    message: format!("'{column}' must be a non-negative number, got {value}"),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Untyped infrastructure table
// ---------------------------------------------------------------------------

fn load_infrastructure(path: &Path) -> Result<InfrastructureTable, DataLoadError> {
    let mut reader = open(path)?;
    let csv_err = |source| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let column_names: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let row: BTreeMap<String, CellValue> = column_names
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), CellValue::infer(value)))
            .collect();
        rows.push(row);
    }

    Ok(InfrastructureTable { column_names, rows })
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

// "%d-%b-%y" comes before "%d-%b-%Y" so a two-digit year is not read as year 21.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%d-%b-%y",
    "%d-%b-%Y",
];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse the date forms found in exported spreadsheets. A time of day is
/// dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("unparsable date '{raw}'")))
}

//! Writes synthetic EV maker, state and charging-station tables so the
//! dashboard can be run without the real exports.
//!
//! Usage: `generate_sample [output_dir]` (defaults to the current directory).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Months, NaiveDate};
use serde::Serialize;

const FISCAL_YEARS: [i32; 3] = [2022, 2023, 2024];
const QUARTERS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

/// (category, makers with their relative size)
const MAKERS: [(&str, &[(&str, f64)]); 3] = [
    ("2W", &[("Ola Electric", 1.0), ("TVS Motor", 0.8), ("Ather Energy", 0.6), ("Bajaj Auto", 0.5)]),
    ("3W", &[("Mahindra Last Mile", 0.7), ("YC Electric", 0.5), ("Piaggio", 0.4)]),
    ("4W", &[("Tata Motors", 0.9), ("MG Motor", 0.35), ("Mahindra & Mahindra", 0.25), ("BYD", 0.1)]),
];

/// (state, quarterly market size, starting EV share)
const STATES: [(&str, f64, f64); 8] = [
    ("Uttar Pradesh", 420_000.0, 0.07),
    ("Maharashtra", 380_000.0, 0.05),
    ("Karnataka", 260_000.0, 0.06),
    ("Tamil Nadu", 250_000.0, 0.04),
    ("Delhi", 150_000.0, 0.08),
    ("Kerala", 120_000.0, 0.05),
    ("Goa", 18_000.0, 0.03),
    ("Ladakh", 1_500.0, 0.01),
];

const CITIES: [(&str, &str, f64, f64); 6] = [
    ("Delhi", "Delhi", 28.61, 77.21),
    ("Mumbai", "Maharashtra", 19.08, 72.88),
    ("Bengaluru", "Karnataka", 12.97, 77.59),
    ("Chennai", "Tamil Nadu", 13.08, 80.27),
    ("Lucknow", "Uttar Pradesh", 26.85, 80.95),
    ("Kochi", "Kerala", 9.93, 76.27),
];

#[derive(Serialize)]
struct MakerRow<'a> {
    date: String,
    fiscal_year: i32,
    quarter: &'a str,
    vehicle_category: &'a str,
    maker: &'a str,
    sales: u64,
}

#[derive(Serialize)]
struct StateRow<'a> {
    date: String,
    fiscal_year: i32,
    quarter: &'a str,
    vehicle_category: &'a str,
    state: &'a str,
    sales: u64,
    total_market_sales: u64,
}

#[derive(Serialize)]
struct StationRow<'a> {
    station_id: String,
    city: &'a str,
    state: &'a str,
    latitude: f64,
    longitude: f64,
    charger_type: &'a str,
    operational: bool,
}

/// Small deterministic PRNG (splitmix64).
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative noise around 1.0.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + spread * (2.0 * self.next_f64() - 1.0)
    }
}

/// First day of a fiscal quarter; fiscal years start in April.
fn quarter_start(fiscal_year: i32, quarter_index: usize) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(fiscal_year, 4, 1)
        .and_then(|start| start.checked_add_months(Months::new(3 * quarter_index as u32)))
        .with_context(|| format!("no start date for {fiscal_year} Q{}", quarter_index + 1))
}

fn growth(period: usize) -> f64 {
    1.12_f64.powi(period as i32)
}

fn write_makers(path: &Path, rng: &mut SampleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    let mut rows = 0;
    for (y, &fiscal_year) in FISCAL_YEARS.iter().enumerate() {
        for (q, &quarter) in QUARTERS.iter().enumerate() {
            let date = quarter_start(fiscal_year, q)?.to_string();
            let period = y * QUARTERS.len() + q;
            for (category, makers) in MAKERS {
                for &(maker, weight) in makers {
                    let base = match category {
                        "2W" => 60_000.0,
                        "3W" => 25_000.0,
                        _ => 12_000.0,
                    };
                    writer.serialize(MakerRow {
                        date: date.clone(),
                        fiscal_year,
                        quarter,
                        vehicle_category: category,
                        maker,
                        sales: (base * weight * growth(period) * rng.jitter(0.2)).round() as u64,
                    })?;
                    rows += 1;
                }
            }
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn write_states(path: &Path, rng: &mut SampleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    let mut rows = 0;
    for (y, &fiscal_year) in FISCAL_YEARS.iter().enumerate() {
        for (q, &quarter) in QUARTERS.iter().enumerate() {
            let date = quarter_start(fiscal_year, q)?.to_string();
            let period = y * QUARTERS.len() + q;
            for (category, _) in MAKERS {
                for &(state, market, share) in &STATES {
                    let market = (market / 3.0 * rng.jitter(0.1)).round();
                    let share = (share * growth(period)).min(0.6) * rng.jitter(0.15);
                    writer.serialize(StateRow {
                        date: date.clone(),
                        fiscal_year,
                        quarter,
                        vehicle_category: category,
                        state,
                        sales: (market * share).round() as u64,
                        total_market_sales: market as u64,
                    })?;
                    rows += 1;
                }
            }
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn write_stations(path: &Path, rng: &mut SampleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    let mut rows = 0;
    for &(city, state, lat, lon) in &CITIES {
        for i in 0..12 {
            writer.serialize(StationRow {
                station_id: format!("{}-{i:03}", &city[..3].to_uppercase()),
                city,
                state,
                latitude: lat + 0.2 * (rng.next_f64() - 0.5),
                longitude: lon + 0.2 * (rng.next_f64() - 0.5),
                charger_type: if rng.next_f64() < 0.3 { "DC Fast" } else { "AC Type 2" },
                operational: rng.next_f64() < 0.9,
            })?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SampleRng(42);
    let makers = write_makers(&out_dir.join("EV_Makers_Sales_Cleaned.csv"), &mut rng)?;
    let states = write_states(&out_dir.join("EV_States_Sales_Cleaned.csv"), &mut rng)?;
    let stations = write_stations(&out_dir.join("EV_Infrastructure_Map.csv"), &mut rng)?;

    println!(
        "Wrote {makers} maker rows, {states} state rows and {stations} stations to {}",
        out_dir.display()
    );
    Ok(())
}

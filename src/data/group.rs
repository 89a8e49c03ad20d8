//! Minimal group-by over borrowed rows.
//!
//! Groups live in a `BTreeMap`, so iteration is in ascending key order no
//! matter how the input rows were ordered.

use std::collections::BTreeMap;

/// Add `values` smallest first, so the result is the same for every order
/// the values arrive in.
pub fn stable_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.into_iter().collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// The values collected for one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator {
    values: Vec<f64>,
}

impl Accumulator {
    pub fn add(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn sum(&self) -> f64 {
        stable_sum(self.values.iter().copied())
    }

    /// `None` for a group that never received a value.
    pub fn mean(&self) -> Option<f64> {
        (self.count() > 0).then(|| self.sum() / self.count() as f64)
    }
}

/// Sum `value` per `key`. Each group is added with [`stable_sum`].
pub fn sum_by<R, K: Ord>(
    rows: &[&R],
    key: impl Fn(&R) -> K,
    value: impl Fn(&R) -> f64,
) -> BTreeMap<K, f64> {
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for &row in rows {
        groups.entry(key(row)).or_default().add(value(row));
    }
    groups
        .into_iter()
        .map(|(key, acc)| (key, acc.sum()))
        .collect()
}

/// Accumulate `value` per `key`, skipping rows where `value` is `None`. A key
/// whose rows were all skipped still gets an empty accumulator.
pub fn accumulate_by<R, K: Ord>(
    rows: &[&R],
    key: impl Fn(&R) -> K,
    value: impl Fn(&R) -> Option<f64>,
) -> BTreeMap<K, Accumulator> {
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for &row in rows {
        let acc = groups.entry(key(row)).or_default();
        if let Some(v) = value(row) {
            acc.add(v);
        }
    }
    groups
}

/// Mean of the defined values; `None` when there are none.
pub fn mean_of(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let mut acc = Accumulator::default();
    for v in values.into_iter().flatten() {
        acc.add(v);
    }
    acc.mean()
}

/// The key with the largest value. Ties go to the smallest key.
pub fn arg_max<K: Ord>(groups: &BTreeMap<K, f64>) -> Option<&K> {
    let mut best: Option<(&K, f64)> = None;
    for (key, &value) in groups {
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((key, value)),
        }
    }
    best.map(|(key, _)| key)
}

/// Flatten groups into `(key, value)` pairs, largest value first. Equal values
/// keep ascending key order.
pub fn sorted_desc<K: Ord>(groups: BTreeMap<K, f64>) -> Vec<(K, f64)> {
    let mut pairs: Vec<(K, f64)> = groups.into_iter().collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    pairs
}

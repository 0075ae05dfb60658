//! Long-to-wide reshaping of `(key, status, count)` rows.
//!
//! Columns are whatever statuses appear in the data, sorted alphabetically,
//! so a new delivery status shows up without code changes. Missing
//! `(key, status)` combinations read as zero.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Wide-form table: one row per group key, one column per observed status.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable<K: Ord> {
    cells: BTreeMap<K, BTreeMap<String, i64>>,
    statuses: BTreeSet<String>,
}

/// One rendered pivot row with derived total and percentage columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow<K> {
    pub key: K,
    /// Counts aligned with [`PivotTable::statuses`].
    pub counts: Vec<i64>,
    pub total: i64,
    /// Percentages aligned with [`PivotTable::statuses`], rounded to 2 dp.
    pub percentages: Vec<f64>,
}

impl<K: Ord + Clone> PivotTable<K> {
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
            statuses: BTreeSet::new(),
        }
    }

    /// Build from long-form triples. Repeated `(key, status)` pairs are summed.
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (K, String, i64)>,
    {
        let mut table = Self::new();
        for (key, status, count) in triples {
            table.add(key, status, count);
        }
        table
    }

    pub fn add(&mut self, key: K, status: String, count: i64) {
        self.statuses.insert(status.clone());
        *self
            .cells
            .entry(key)
            .or_default()
            .entry(status)
            .or_insert(0) += count;
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Distinct statuses observed, alphabetically.
    pub fn statuses(&self) -> Vec<&str> {
        self.statuses.iter().map(String::as_str).collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.cells.keys()
    }

    pub fn count(&self, key: &K, status: &str) -> i64 {
        self.cells
            .get(key)
            .and_then(|row| row.get(status))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self, key: &K) -> i64 {
        self.cells
            .get(key)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    /// Share of `status` in the row total, as a percentage rounded to 2 dp.
    /// Zero for an all-zero row.
    pub fn percentage(&self, key: &K, status: &str) -> f64 {
        let total = self.total(key);
        if total == 0 {
            return 0.0;
        }
        round2(self.count(key, status) as f64 / total as f64 * 100.0)
    }

    /// Rows in key order with zero-filled counts and derived columns.
    pub fn rows(&self) -> Vec<PivotRow<K>> {
        self.cells
            .keys()
            .map(|key| PivotRow {
                key: key.clone(),
                counts: self
                    .statuses
                    .iter()
                    .map(|status| self.count(key, status))
                    .collect(),
                total: self.total(key),
                percentages: self
                    .statuses
                    .iter()
                    .map(|status| self.percentage(key, status))
                    .collect(),
            })
            .collect()
    }
}

impl<K: Ord + Clone> Default for PivotTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + Serialize> Serialize for PivotTable<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("PivotTable", 2)?;
        s.serialize_field("statuses", &self.statuses())?;
        s.serialize_field("rows", &self.rows())?;
        s.end()
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

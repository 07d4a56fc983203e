#![forbid(unsafe_code)]

//! Ordered, append-only log of calculations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculation::Calculation;

/// A recorded calculation and the moment it entered the history.
///
/// Serialized flat: the calculation's fields plus `recorded_at` (RFC 3339).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    calculation: Calculation,
    recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub const fn new(calculation: Calculation, recorded_at: DateTime<Utc>) -> Self {
        Self {
            calculation,
            recorded_at,
        }
    }

    pub const fn calculation(&self) -> &Calculation {
        &self.calculation
    }

    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Calculations in insertion order. Entries are only appended or cleared
/// all at once; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CalculationHistory {
    entries: Vec<HistoryEntry>,
}

impl CalculationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end, stamped with the current time. No validation is
    /// performed.
    pub fn add_entry(&mut self, calculation: Calculation) {
        self.add_entry_at(calculation, Utc::now());
    }

    /// Append with an explicit timestamp.
    pub fn add_entry_at(&mut self, calculation: Calculation, recorded_at: DateTime<Utc>) {
        tracing::debug!(
            formatted = calculation.formatted_result().unwrap_or("<unset>"),
            position = self.entries.len(),
            recorded_at = %recorded_at,
            "history entry added"
        );
        self.entries.push(HistoryEntry::new(calculation, recorded_at));
    }

    /// Remove every entry, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        tracing::debug!(removed, "history cleared");
        removed
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The recorded calculations, oldest first.
    pub fn calculations(&self) -> impl DoubleEndedIterator<Item = &Calculation> + ExactSizeIterator {
        self.entries.iter().map(HistoryEntry::calculation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a CalculationHistory {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

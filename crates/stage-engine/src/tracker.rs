//! Unresolved-output tracking.
//!
//! Counts, per output kind, how many records could not be recoded, and keeps
//! a bit per record number marking records with at least one unresolved
//! output. Safe to update from many threads; the order of updates does not
//! affect the totals. Bits are stored in 64-record words keyed by word
//! index, so record numbers need not be dense.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use stage_types::RecodeKind;

/// Unresolved tallies produced while recoding one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTally {
    /// Failure count per output kind, in output-vector order.
    pub counts: [u64; RecodeKind::COUNT],
    /// Flagged-record errors.
    pub flagged: u64,
    /// Whether the record has at least one unresolved output.
    pub unresolved: bool,
}

impl RecordTally {
    /// Counts one failure for an output kind.
    pub fn count(&mut self, kind: RecodeKind) {
        self.counts[kind.index()] += 1;
    }
}

/// Snapshot of the run-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnresolvedCounts {
    /// PRE88AJCC failures.
    pub pre88_ajcc: u64,
    /// SSG2000 failures.
    pub ssg2000: u64,
    /// SSG77 failures.
    pub ssg77: u64,
    /// HISTORIC2000 failures.
    pub historic2000: u64,
    /// PSTSSG2000 failures.
    pub pst_ssg2000: u64,
    /// PSTSSG77 failures.
    pub pst_ssg77: u64,
    /// PSTHISTORIC2000 failures.
    pub pst_historic2000: u64,
    /// Records flagged by the field source.
    pub flagged_records: u64,
    /// Records with at least one unresolved output.
    pub unresolved_records: u64,
}

impl UnresolvedCounts {
    /// Returns the failure count for an output kind.
    pub fn get(&self, kind: RecodeKind) -> u64 {
        match kind {
            RecodeKind::Pre88Ajcc => self.pre88_ajcc,
            RecodeKind::Ssg2000 => self.ssg2000,
            RecodeKind::Ssg77 => self.ssg77,
            RecodeKind::Historic2000 => self.historic2000,
            RecodeKind::ProstateSsg2000 => self.pst_ssg2000,
            RecodeKind::ProstateSsg77 => self.pst_ssg77,
            RecodeKind::ProstateHistoric2000 => self.pst_historic2000,
        }
    }
}

/// Run-wide unresolved counters and per-record bitset.
#[derive(Debug, Default)]
pub struct UnresolvedTracker {
    counters: [AtomicU64; RecodeKind::COUNT],
    flagged_records: AtomicU64,
    records: Mutex<BTreeMap<u64, u64>>,
}

impl UnresolvedTracker {
    /// Creates a tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one record's tallies.
    pub fn record(&self, record_number: u64, tally: &RecordTally) {
        for (counter, count) in self.counters.iter().zip(tally.counts) {
            if count > 0 {
                counter.fetch_add(count, Ordering::Relaxed);
            }
        }
        if tally.flagged > 0 {
            self.flagged_records.fetch_add(tally.flagged, Ordering::Relaxed);
        }
        if tally.unresolved {
            self.mark(record_number);
        }
    }

    /// Sets the unresolved bit of a record.
    pub fn mark(&self, record_number: u64) {
        let (word, bit) = Self::position(record_number);
        *self.words().entry(word).or_insert(0) |= bit;
    }

    /// Returns true if the record's unresolved bit is set.
    pub fn is_unresolved(&self, record_number: u64) -> bool {
        let (word, bit) = Self::position(record_number);
        self.words().get(&word).map(|w| w & bit != 0).unwrap_or(false)
    }

    /// Returns the failure count for an output kind.
    pub fn count(&self, kind: RecodeKind) -> u64 {
        self.counters[kind.index()].load(Ordering::Relaxed)
    }

    /// Returns the number of flagged-record errors.
    pub fn flagged_record_count(&self) -> u64 {
        self.flagged_records.load(Ordering::Relaxed)
    }

    /// Returns the number of records with the unresolved bit set.
    pub fn unresolved_record_count(&self) -> u64 {
        self.words().values().map(|w| u64::from(w.count_ones())).sum()
    }

    /// Returns the record numbers with the unresolved bit set, ascending.
    pub fn unresolved_records(&self) -> Vec<u64> {
        let words = self.words();
        let mut records = Vec::new();
        for (index, word) in words.iter() {
            for bit in 0..64u64 {
                if word & (1 << bit) != 0 {
                    records.push(index * 64 + bit);
                }
            }
        }
        records
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> UnresolvedCounts {
        UnresolvedCounts {
            pre88_ajcc: self.count(RecodeKind::Pre88Ajcc),
            ssg2000: self.count(RecodeKind::Ssg2000),
            ssg77: self.count(RecodeKind::Ssg77),
            historic2000: self.count(RecodeKind::Historic2000),
            pst_ssg2000: self.count(RecodeKind::ProstateSsg2000),
            pst_ssg77: self.count(RecodeKind::ProstateSsg77),
            pst_historic2000: self.count(RecodeKind::ProstateHistoric2000),
            flagged_records: self.flagged_record_count(),
            unresolved_records: self.unresolved_record_count(),
        }
    }

    /// Clears every counter and bit for a new run.
    pub fn reset(&self) {
        for counter in &self.counters {
            counter.store(0, Ordering::Relaxed);
        }
        self.flagged_records.store(0, Ordering::Relaxed);
        self.words().clear();
    }

    fn position(record_number: u64) -> (u64, u64) {
        (record_number / 64, 1 << (record_number % 64))
    }

    fn words(&self) -> MutexGuard<'_, BTreeMap<u64, u64>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

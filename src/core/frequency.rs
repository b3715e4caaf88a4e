use serde::Serialize;
use std::fmt;

const BYTE_VALUES: usize = 256;

/// Occurrence count per byte value.
///
/// Only the counter builds tables; once handed out a table is read-only.
/// `total()` always equals the sum of all per-value counts.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; BYTE_VALUES],
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; BYTE_VALUES],
            total: 0,
        }
    }

    /// Build a table from `(value, count)` pairs. Repeated values are summed.
    #[cfg(test)]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = Self::new();
        for (value, count) in pairs {
            table.counts[value as usize] += count;
            table.total += count;
        }
        table
    }

    pub(crate) fn record_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[b as usize] += 1;
        }
        self.total += bytes.len() as u64;
    }

    /// Sum another table into this one, value by value.
    pub(crate) fn merge(&mut self, other: &Self) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
        self.total += other.total;
    }

    #[cfg(test)]
    pub fn get(&self, value: u8) -> u64 {
        self.counts[value as usize]
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Present values with their counts, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter_map(|(v, &c)| (c > 0).then_some((v as u8, c)))
    }

    /// Present values ordered by descending count, ties by ascending value.
    pub fn ranked(&self) -> Vec<(u8, u64)> {
        let mut entries: Vec<(u8, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Summary of a table, logged as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct TableStats {
    pub total: u64,
    pub distinct: usize,
    pub most_common: Option<(u8, u64)>,
}

impl From<&FrequencyTable> for TableStats {
    fn from(table: &FrequencyTable) -> Self {
        Self {
            total: table.total(),
            distinct: table.distinct(),
            most_common: table.ranked().first().copied(),
        }
    }
}

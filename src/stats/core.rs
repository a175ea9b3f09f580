use std::collections::HashMap;

use ahash::RandomState;

use crate::keyhash::fingerprint;

/// Running min/max/sum/count aggregate for one station key.
///
/// Values are exact fixed-point tenths (`-12.3` → `-123`), so `sum` is the
/// exact sum of every observation. The key's original bytes are kept for
/// output; equality is always decided on them, never on the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStats {
    key: Box<[u8]>,
    min: i64,
    max: i64,
    sum: i64,
    count: u64,
}

impl KeyStats {
    /// First observation of a key.
    pub fn new(key: &[u8], tenths: i64) -> Self {
        KeyStats {
            key: key.into(),
            min: tenths,
            max: tenths,
            sum: tenths,
            count: 1,
        }
    }

    /// Fold one more observation into the running aggregate.
    #[inline]
    pub fn add(&mut self, tenths: i64) {
        if tenths < self.min {
            self.min = tenths;
        }
        if tenths > self.max {
            self.max = tenths;
        }
        self.sum += tenths;
        self.count += 1;
    }

    /// Combine another worker's aggregate for the same key.
    pub fn merge(&mut self, other: &KeyStats) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn min_tenths(&self) -> i64 {
        self.min
    }

    pub fn max_tenths(&self) -> i64 {
        self.max
    }

    pub fn sum_tenths(&self) -> i64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean in floating point; `count >= 1` by construction.
    pub fn mean(&self) -> f64 {
        self.sum as f64 / 10.0 / self.count as f64
    }
}

/// Aggregation table: fingerprint → bucket of per-key aggregates.
///
/// The fingerprint is only a first-level bucket key. Every lookup and insert
/// compares the actual key bytes inside the bucket, so two distinct keys that
/// share a fingerprint stay separate instead of silently merging.
#[derive(Debug, Default)]
pub struct StationTable {
    buckets: HashMap<u64, Vec<KeyStats>, RandomState>,
    distinct: usize,
}

impl StationTable {
    pub fn with_capacity(capacity: usize) -> Self {
        StationTable {
            buckets: HashMap::with_capacity_and_hasher(capacity, RandomState::default()),
            distinct: 0,
        }
    }

    /// Fold one observation into the table.
    #[inline]
    pub fn record(&mut self, key: &[u8], tenths: i64) {
        let bucket = self.buckets.entry(fingerprint(key)).or_default();
        match bucket.iter_mut().find(|stats| &*stats.key == key) {
            Some(stats) => stats.add(tenths),
            None => {
                bucket.push(KeyStats::new(key, tenths));
                self.distinct += 1;
            }
        }
    }

    /// Fold another worker's table into this one, consuming it. Entries not
    /// yet present move in whole — key text ownership transfers, no copy.
    pub fn merge(&mut self, other: StationTable) {
        for (fp, incoming) in other.buckets {
            let bucket = self.buckets.entry(fp).or_default();
            for stats in incoming {
                match bucket.iter_mut().find(|mine| mine.key == stats.key) {
                    Some(mine) => mine.merge(&stats),
                    None => {
                        bucket.push(stats);
                        self.distinct += 1;
                    }
                }
            }
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    /// Look up one key's aggregate by exact bytes.
    pub fn get(&self, key: &[u8]) -> Option<&KeyStats> {
        self.buckets
            .get(&fingerprint(key))?
            .iter()
            .find(|stats| &*stats.key == key)
    }

    /// All aggregates, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyStats> {
        self.buckets.values().flatten()
    }
}

use std::thread;

use thiserror::Error;

use crate::parse::RecordError;
use crate::stats::StationTable;

use super::plan::{DEFAULT_LOOKBACK, default_region_size, plan_regions};
use super::worker::{RegionScan, scan_region};

/// A record the engine refused to aggregate, located by absolute byte
/// offset. Fatal: partial results are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record at byte {offset}: {source}")]
pub struct ScanError {
    pub offset: usize,
    #[source]
    pub source: RecordError,
}

/// Tuning knobs for one aggregation run.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Bytes per region; `None` tunes to the core count.
    pub region_size: Option<usize>,
    /// Boundary lookback window length.
    pub lookback: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            region_size: None,
            lookback: DEFAULT_LOOKBACK,
        }
    }
}

/// Merged output of a full scan.
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Per-key aggregates across all regions.
    pub table: StationTable,
    /// Total records parsed, across all workers.
    pub records: u64,
}

/// Aggregate the whole buffer: plan regions, fan out one scoped worker
/// thread per region, join them all, then fold the private tables in region
/// order.
///
/// Workers scan disjoint regions of the shared read-only buffer with no
/// synchronization; the scope's join is the only barrier. The fold order
/// makes the run deterministic — the merge itself is commutative. The first
/// worker error (in region order) aborts the run; a panicking worker
/// propagates its panic.
pub fn aggregate(data: &[u8], opts: &ScanOptions) -> Result<Aggregate, ScanError> {
    let region_size = opts
        .region_size
        .unwrap_or_else(|| default_region_size(data.len()));
    let regions = plan_regions(data.len(), region_size, opts.lookback);

    let results: Vec<Result<RegionScan, ScanError>> = match regions.as_slice() {
        [] => return Ok(Aggregate::default()),
        [only] => vec![scan_region(data, only)],
        many => thread::scope(|s| {
            let handles: Vec<_> = many
                .iter()
                .map(|region| s.spawn(move || scan_region(data, region)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        }),
    };

    let mut merged = Aggregate::default();
    for result in results {
        let scan = result?;
        merged.records += scan.records;
        merged.table.merge(scan.table);
    }
    Ok(merged)
}

/// Single-threaded reference scan: one region covering the whole buffer.
pub fn aggregate_serial(data: &[u8]) -> Result<Aggregate, ScanError> {
    let opts = ScanOptions {
        region_size: Some(data.len().max(1)),
        lookback: DEFAULT_LOOKBACK,
    };
    aggregate(data, &opts)
}

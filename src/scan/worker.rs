use memchr::memchr;

use crate::parse;
use crate::stats::StationTable;

use super::boundary::split_record_tail;
use super::core::ScanError;
use super::plan::Region;

/// What one worker hands back to the merger.
#[derive(Debug, Default)]
pub struct RegionScan {
    /// Fully parsed records, including a stitched boundary record.
    pub records: u64,
    /// Private per-worker aggregate table.
    pub table: StationTable,
}

/// Initial bucket capacity; distinct-key cardinality is typically a few
/// hundred.
const TABLE_CAPACITY: usize = 512;

/// Scan one region of the shared buffer into a private table.
///
/// The region's bytes are only ever touched through this borrowed view, so
/// the mapping outlives the scan on every exit path. A record that straddles
/// the region's start is reconstructed from the lookback window; a record
/// that straddles its end is left to the next region's worker. The trailing
/// unterminated record of the whole buffer belongs to the last region.
pub fn scan_region(data: &[u8], region: &Region) -> Result<RegionScan, ScanError> {
    let bytes = &data[region.offset..region.end()];
    let is_last = region.end() == data.len();

    let mut table = StationTable::with_capacity(TABLE_CAPACITY);
    let mut records = 0u64;
    let mut pos = 0usize;

    if region.lookback > 0 {
        let window = &data[region.offset - region.lookback..region.offset];
        let head_end = memchr(b'\n', bytes);
        match split_record_tail(window, region.window_anchored()) {
            Some(tail) => {
                // The stitched record ends at the region's first terminator;
                // without one it runs past this region and is only complete
                // here when no region follows.
                if head_end.is_some() || is_last {
                    let head = &bytes[..head_end.unwrap_or(bytes.len())];
                    let mut line = Vec::with_capacity(tail.len() + head.len());
                    line.extend_from_slice(tail);
                    line.extend_from_slice(head);
                    // Mapped views padded past the logical file length end in
                    // NUL bytes; clip the reconstruction at the sentinel.
                    let padded = memchr(0, &line);
                    if let Some(sentinel) = padded {
                        line.truncate(sentinel);
                    }
                    if !line.is_empty() || padded.is_none() {
                        fold(&mut table, &line, region.offset - tail.len())?;
                        records += 1;
                    }
                }
            }
            None => {
                // Window too short to recover the split record; the leading
                // fragment is discarded with it.
            }
        }
        pos = head_end.map(|i| i + 1).unwrap_or(bytes.len());
    }

    while pos < bytes.len() {
        // Sentinel for mapped views padded past the logical file length.
        if bytes[pos] == 0 {
            break;
        }
        match memchr(b'\n', &bytes[pos..]) {
            Some(i) => {
                fold(&mut table, &bytes[pos..pos + i], region.offset + pos)?;
                records += 1;
                pos += i + 1;
            }
            None => {
                if is_last {
                    // Final record of the input, no trailing terminator;
                    // clip any mapped padding at the NUL sentinel.
                    let rest = &bytes[pos..];
                    let rest = &rest[..memchr(0, rest).unwrap_or(rest.len())];
                    fold(&mut table, rest, region.offset + pos)?;
                    records += 1;
                }
                break;
            }
        }
    }

    Ok(RegionScan { records, table })
}

#[inline]
fn fold(table: &mut StationTable, line: &[u8], offset: usize) -> Result<(), ScanError> {
    let (key, tenths) =
        parse::parse_record(line).map_err(|source| ScanError { offset, source })?;
    table.record(key, tenths);
    Ok(())
}

use memchr::memrchr;

/// Recover the tail of the record truncated at a region boundary.
///
/// `window` is the span of raw bytes ending exactly at the region's start
/// offset. The return value is what must be prepended to the region's first
/// line to reconstruct the split record:
///
/// - terminator is the window's last byte → `Some(&[])`: the previous region
///   ended exactly on a record boundary, nothing to stitch;
/// - terminator earlier in the window → `Some(tail)`: the bytes after it are
///   the truncated record's head;
/// - no terminator, window anchored at the buffer start → `Some(window)`:
///   the window itself begins the input's first record;
/// - no terminator otherwise → `None`: the record is longer than the window
///   and cannot be reconstructed (the caller skips the fragment).
#[inline]
pub fn split_record_tail(window: &[u8], anchored: bool) -> Option<&[u8]> {
    match memrchr(b'\n', window) {
        Some(i) if i + 1 == window.len() => Some(&[]),
        Some(i) => Some(&window[i + 1..]),
        None if anchored => Some(window),
        None => None,
    }
}

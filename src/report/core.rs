use std::fmt::Write as _;

use crate::stats::{KeyStats, StationTable};

/// Separator between formatted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    CommaSpace,
    CommaNewline,
}

impl Separator {
    fn as_str(self) -> &'static str {
        match self {
            Separator::CommaSpace => ", ",
            Separator::CommaNewline => ",\n",
        }
    }
}

/// Render the merged table as `{key=min/mean/max, ...}`.
///
/// Entries are sorted by the key's original bytes in ascending order — never
/// by fingerprint or table iteration order — so the output is deterministic
/// for a given table. `min` and `max` print exactly from their tenths;
/// `mean` is computed in floating point and rounded to one decimal.
pub fn render(table: &StationTable, sep: Separator) -> String {
    let mut entries: Vec<&KeyStats> = table.iter().collect();
    entries.sort_unstable_by(|a, b| a.key().cmp(b.key()));

    let mut out = String::with_capacity(entries.len() * 32 + 2);
    out.push('{');
    for (i, stats) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(sep.as_str());
        }
        out.push_str(&String::from_utf8_lossy(stats.key()));
        out.push('=');
        push_tenths(&mut out, stats.min_tenths());
        out.push('/');
        let _ = write!(out, "{:.1}", stats.mean());
        out.push('/');
        push_tenths(&mut out, stats.max_tenths());
    }
    out.push('}');
    out
}

/// Format an exact tenths value as `-?digits.digit` without a float
/// round-trip; `-3` must print as `-0.3`.
fn push_tenths(out: &mut String, tenths: i64) {
    let mut buf = itoa::Buffer::new();
    if tenths < 0 {
        out.push('-');
    }
    let magnitude = tenths.unsigned_abs();
    out.push_str(buf.format(magnitude / 10));
    out.push('.');
    out.push_str(buf.format(magnitude % 10));
}

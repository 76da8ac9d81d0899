// src/format.rs
use anyhow::{bail, Result};
use itoa::Buffer;

use crate::aggregate::{StatsMap, Tenths};

#[inline]
fn push_tenths(out: &mut String, buf: &mut Buffer, tenths: Tenths) {
    if tenths < 0 {
        out.push('-');
    }
    let abs = tenths.unsigned_abs();
    out.push_str(buf.format(abs / 10));
    out.push('.');
    out.push_str(buf.format(abs % 10));
}

/// Renders one tenths value as its decimal form ("-34" tenths -> "-3.4").
pub fn format_tenths(tenths: Tenths) -> String {
    let mut out = String::with_capacity(8);
    let mut buf = Buffer::new();
    push_tenths(&mut out, &mut buf, tenths);
    out
}

/// Renders the final mapping as `{k1=min1/avg1/max1, k2=min2/avg2/max2, ...}`.
///
/// Keys are sorted by raw byte value before rendering, so the output is
/// deterministic no matter what order keys were discovered in. A key present
/// in the list but missing from the map means an aggregation invariant broke;
/// that aborts rendering instead of producing a partial line.
pub fn render(keys: &[String], map: &StatsMap) -> Result<String> {
    let mut sorted: Vec<&String> = keys.iter().collect();
    sorted.sort_unstable();

    let mut out = String::with_capacity(2 + sorted.len() * 32);
    let mut buf = Buffer::new();

    out.push('{');
    for (i, key) in sorted.iter().enumerate() {
        let Some(agg) = map.get(key.as_str()) else {
            bail!("key '{key}' present in key list but missing from stats map");
        };

        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push('=');
        push_tenths(&mut out, &mut buf, agg.min);
        out.push('/');
        push_tenths(&mut out, &mut buf, agg.avg_tenths());
        out.push('/');
        push_tenths(&mut out, &mut buf, agg.max);
    }
    out.push('}');

    Ok(out)
}

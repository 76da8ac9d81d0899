// src/aggregate.rs
//! Per-key statistics accumulation in integer tenths.
//!
//! This module holds the state the whole engine revolves around: the
//! [`Aggregate`] summary kept per key, the accumulate-or-insert fold applied to
//! every observed line, and the merge used to combine chunk-local maps into the
//! global one. All values are signed integer tenths of a degree ("23.4" is
//! stored as 234), so accumulation never touches floating point and never
//! drifts.
//!
//! The merge is commutative and associative over every field (sum, min, max,
//! count), which is what lets chunk results be folded in whatever order they
//! arrive while still producing the exact result a sequential scan would.
//!
//! ## Example
//!
//! ```rust
//! use tempscan::aggregate::Aggregate;
//!
//! let mut agg = Aggregate::new(234); // first observation: 23.4
//! agg.observe(-51);                  // -5.1
//!
//! assert_eq!(agg.min, -51);
//! assert_eq!(agg.max, 234);
//! assert_eq!(agg.total, 183);
//! assert_eq!(agg.count, 2);
//! ```

/// Signed integer tenths of a degree.
pub type Tenths = i64;

/// Map from key to its running summary. Chunk workers build local ones; the
/// merge consumer (or the sequential scanner) owns the global one.
pub type StatsMap = hashbrown::HashMap<String, Aggregate>;

/// Running min/max/total/count summary for one key, all in tenths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aggregate {
    pub min: Tenths,
    pub max: Tenths,
    pub total: Tenths,
    pub count: i64,
}

impl Aggregate {
    /// Summary after the first observation of a key.
    #[inline]
    pub fn new(tenths: Tenths) -> Self {
        Self {
            min: tenths,
            max: tenths,
            total: tenths,
            count: 1,
        }
    }

    /// Folds one more observed value into the summary.
    #[inline]
    pub fn observe(&mut self, tenths: Tenths) {
        self.count += 1;
        self.total += tenths;
        if self.max < tenths {
            self.max = tenths;
        }
        if self.min > tenths {
            self.min = tenths;
        }
    }

    /// Combines two summaries of the same key. Commutative and associative.
    #[inline]
    pub fn merge(&mut self, other: Aggregate) {
        self.count += other.count;
        self.total += other.total;
        if self.max < other.max {
            self.max = other.max;
        }
        if self.min > other.min {
            self.min = other.min;
        }
    }

    /// Average in tenths, rounded half away from zero.
    #[inline]
    pub fn avg_tenths(&self) -> Tenths {
        (self.total as f64 / self.count as f64).round() as Tenths
    }
}

/// Accumulate-or-insert fold into a chunk-local map.
#[inline]
pub fn record(map: &mut StatsMap, key: &str, tenths: Tenths) {
    match map.get_mut(key) {
        Some(agg) => agg.observe(tenths),
        None => {
            map.insert(key.to_owned(), Aggregate::new(tenths));
        }
    }
}

/// Accumulate-or-insert fold that also appends first-seen keys to the ordered
/// key list. Only the single owner of the global map calls this.
#[inline]
pub fn record_tracked(map: &mut StatsMap, keys: &mut Vec<String>, key: &str, tenths: Tenths) {
    match map.get_mut(key) {
        Some(agg) => agg.observe(tenths),
        None => {
            keys.push(key.to_owned());
            map.insert(key.to_owned(), Aggregate::new(tenths));
        }
    }
}

/// Folds a whole chunk-local map into the global one, appending keys the
/// global map has not seen yet.
pub fn merge_into(map: &mut StatsMap, keys: &mut Vec<String>, local: StatsMap) {
    for (key, agg) in local {
        match map.get_mut(&key) {
            Some(cur) => cur.merge(agg),
            None => {
                keys.push(key.clone());
                map.insert(key, agg);
            }
        }
    }
}

impl Aggregate {
    pub fn assert_invariants(&self) {
        assert!(self.count >= 1, "count must be at least 1");
        assert!(self.min <= self.max, "min above max");
        assert!(
            self.min * self.count <= self.total,
            "total below min * count"
        );
        assert!(
            self.total <= self.max * self.count,
            "total above max * count"
        );
    }
}

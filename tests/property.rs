use std::io::Write;

use proptest::prelude::*;

use tempscan::aggregate::{merge_into, record, Aggregate, StatsMap, Tenths};
use tempscan::engine::{run, Options};
use tempscan::format;
use tempscan::parse;
use tokio::sync::watch;

const KEYS: &[&str] = &["alpha", "beta", "gamma", "delta", "epsilon"];

fn build_map(rows: &[(u8, Tenths)]) -> StatsMap {
    let mut map = StatsMap::new();
    for &(k, v) in rows {
        record(&mut map, KEYS[k as usize % KEYS.len()], v);
    }
    map
}

fn merged(parts: &[&StatsMap]) -> StatsMap {
    let mut map = StatsMap::new();
    let mut keys = Vec::new();
    for part in parts {
        merge_into(&mut map, &mut keys, (*part).clone());
    }
    map
}

proptest! {
    #[test]
    fn aggregate_invariants_hold(values in prop::collection::vec(-999i64..=999, 1..500)) {
        let mut agg = Aggregate::new(values[0]);
        for &v in &values[1..] {
            agg.observe(v);
        }

        agg.assert_invariants();
        prop_assert_eq!(agg.count as usize, values.len());
        prop_assert_eq!(agg.total, values.iter().sum::<i64>());
        prop_assert!(agg.min <= agg.avg_tenths() && agg.avg_tenths() <= agg.max);
    }

    #[test]
    fn merge_is_commutative_and_associative(
        a in prop::collection::vec((any::<u8>(), -999i64..=999), 0..100),
        b in prop::collection::vec((any::<u8>(), -999i64..=999), 0..100),
        c in prop::collection::vec((any::<u8>(), -999i64..=999), 0..100),
    ) {
        let (a, b, c) = (build_map(&a), build_map(&b), build_map(&c));

        let ab_c = merged(&[&merged(&[&a, &b]), &c]);
        let a_bc = merged(&[&a, &merged(&[&b, &c])]);
        let cba = merged(&[&c, &b, &a]);

        prop_assert_eq!(&ab_c, &a_bc);
        prop_assert_eq!(&ab_c, &cba);
    }

    #[test]
    fn parse_format_round_trip(tenths in -999i64..=999) {
        let rendered = format::format_tenths(tenths);
        prop_assert!(parse::value_shape_ok(rendered.as_bytes()));
        prop_assert_eq!(parse::parse_tenths(rendered.as_bytes()), tenths);
    }

    #[test]
    fn rendered_keys_are_sorted(
        keys in prop::collection::hash_set("[a-z]{1,8}", 1..20),
        tenths in -999i64..=999,
    ) {
        let mut map = StatsMap::new();
        let keys: Vec<String> = keys.into_iter().collect();
        for key in &keys {
            map.insert(key.clone(), Aggregate::new(tenths));
        }

        let line = format::render(&keys, &map).unwrap();
        let body = &line[1..line.len() - 1];
        let rendered: Vec<&str> = body
            .split(", ")
            .filter(|e| !e.is_empty())
            .map(|e| e.split('=').next().unwrap())
            .collect();

        let mut sorted = rendered.clone();
        sorted.sort_unstable();
        prop_assert_eq!(rendered, sorted);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn modes_agree_on_generated_input(
        rows in prop::collection::vec(("[A-Za-z]{1,10}", -999i64..=999), 1..300),
    ) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for (key, tenths) in &rows {
            writeln!(file, "{key};{}", format::format_tenths(*tenths)).unwrap();
        }
        file.flush().unwrap();

        let rt = tokio::runtime::Runtime::new().unwrap();
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let sequential = rt
            .block_on(run(
                cancel_rx.clone(),
                file.path(),
                &Options { concurrency: false, ..Options::default() },
            ))
            .unwrap();
        let concurrent = rt
            .block_on(run(
                cancel_rx,
                file.path(),
                &Options { chunk_size: 64, ..Options::default() },
            ))
            .unwrap();

        prop_assert_eq!(sequential, concurrent);
    }
}

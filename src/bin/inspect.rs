use std::{collections::HashSet, env, fs::File};

use anyhow::{bail, Result};
use memmap2::Mmap;

use tempscan::aggregate::Tenths;
use tempscan::parse;

fn main() -> Result<()> {
    let Some(path) = env::args().nth(1) else {
        bail!("usage: inspect <measurements-file>");
    };

    let f = File::open(&path)?;
    let mmap = unsafe { Mmap::map(&f)? };

    let mut keys = HashSet::<&str>::new();
    let mut lines = 0u64;
    let mut malformed = 0u64;
    let mut min = Tenths::MAX;
    let mut max = Tenths::MIN;

    for line in mmap.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        match parse::parse_line(line) {
            Some((key, tenths)) => {
                lines += 1;
                keys.insert(key);
                if tenths < min {
                    min = tenths;
                }
                if tenths > max {
                    max = tenths;
                }
            }
            None => malformed += 1,
        }
    }

    println!("lines={}", lines);
    println!("malformed={}", malformed);
    println!("unique_keys={}", keys.len());
    if lines > 0 {
        println!("tenths_range=[{}, {}]", min, max);
    }
    Ok(())
}

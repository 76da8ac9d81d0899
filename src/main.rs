// src/main.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tracing::{error, info};

use tempscan::chunk::DEFAULT_CHUNK_SIZE;
use tempscan::engine::{self, Options};
use tempscan::format::format_tenths;

const GENERATE_BUF_SIZE: usize = 1 << 20;

// Key vocabulary for `generate`; indexes past the table get a numeric suffix.
const STATIONS: &[&str] = &[
    "Adelaide",
    "Amsterdam",
    "Auckland",
    "Bamako",
    "Bangkok",
    "Bordeaux",
    "Cabo San Lucas",
    "Cairo",
    "Calgary",
    "Dakar",
    "Dodoma",
    "Dunedin",
    "Halifax",
    "Hanoi",
    "Harare",
    "Karachi",
    "Kyoto",
    "La Paz",
    "Lisbon",
    "Ljubljana",
    "Marrakesh",
    "Medellín",
    "Nairobi",
    "Nuuk",
    "Odesa",
    "Oulu",
    "Pittsburgh",
    "Porto",
    "Reykjavík",
    "Riga",
    "Ségou",
    "Suva",
    "Tauranga",
    "Thessaloniki",
    "Tromsø",
    "Valparaíso",
    "Windhoek",
    "Xi'an",
    "Yerevan",
    "Zagreb",
];

#[derive(ClapParser, Debug)]
#[command(name = "tempscan", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Aggregate a measurements file and print the per-key min/avg/max line.
    Run {
        file: PathBuf,
        /// Single-threaded full-file scan instead of chunked concurrent aggregation.
        #[arg(long, default_value_t = false)]
        sequential: bool,
        /// Proposed chunk size in bytes for the concurrent path.
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: u64,
        /// Number of chunk workers (defaults to available parallelism).
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Write a synthetic measurements file for benchmarks and tests.
    Generate {
        file: PathBuf,
        /// Number of lines to write.
        #[arg(long)]
        rows: u64,
        /// Number of distinct keys to draw from.
        #[arg(long, default_value_t = 400)]
        keys: usize,
        /// RNG seed; the same seed reproduces the same file.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Run {
            file,
            sequential,
            chunk_size,
            workers,
        } => {
            let opts = Options {
                concurrency: !sequential,
                chunk_size,
                workers: workers.unwrap_or_else(engine::default_workers),
            };

            let (cancel_tx, cancel_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = cancel_tx.send(true);
                }
            });

            let started = Instant::now();
            match engine::run(cancel_rx, &file, &opts).await {
                Ok(line) => {
                    println!("{line}");
                    info!(
                        duration_seconds = started.elapsed().as_secs_f64(),
                        "success"
                    );
                    Ok(())
                }
                Err(e) => {
                    error!("{e:#}");
                    std::process::exit(1);
                }
            }
        }
        Cmd::Generate {
            file,
            rows,
            keys,
            seed,
        } => generate(&file, rows, keys, seed),
    }
}

fn generate(path: &Path, rows: u64, keys: usize, seed: u64) -> Result<()> {
    let keys = keys.max(1);
    let file = File::create(path).with_context(|| format!("create {:?}", path))?;
    let mut out = BufWriter::with_capacity(GENERATE_BUF_SIZE, file);
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..rows {
        let k = rng.gen_range(0..keys);
        let base = STATIONS[k % STATIONS.len()];
        let tenths = rng.gen_range(-999i64..=999);

        if k < STATIONS.len() {
            writeln!(out, "{base};{}", format_tenths(tenths))?;
        } else {
            writeln!(out, "{base} {};{}", k / STATIONS.len(), format_tenths(tenths))?;
        }
    }
    out.flush().context("flush generated file")?;

    info!(path = ?path, rows, keys, seed, "generated measurements");
    Ok(())
}

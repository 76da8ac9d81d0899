// src/engine.rs
//! Run entry point: sequential full-file scan and the chunked concurrent
//! orchestrator. Both paths produce the same abstract mapping; the concurrent
//! one splits the file into line-aligned chunks, fans them out over a fixed
//! worker pool, and folds chunk-local maps in a single merge consumer that
//! exclusively owns the global state.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::task;
use tracing::debug;

use crate::aggregate::{self, StatsMap};
use crate::chunk::{self, DEFAULT_CHUNK_SIZE};
use crate::format;
use crate::metrics::Metrics;
use crate::parse;

const SEQUENTIAL_BUF_SIZE: usize = 1 << 20;
const RESULT_CHANNEL_DEPTH: usize = 64;

#[derive(Clone, Debug)]
pub struct Options {
    /// Chunked concurrent aggregation when true, single-threaded scan when false.
    pub concurrency: bool,
    /// Proposed chunk length in bytes for the concurrent path.
    pub chunk_size: u64,
    /// Number of chunk workers; capped at the number of planned chunks.
    pub workers: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            concurrency: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: default_workers(),
        }
    }
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Aggregates the file at `path` and returns the rendered result line.
///
/// The cancellation signal is advisory: it is observed once per merge-loop
/// iteration on the concurrent path, and in-flight chunk workers finish their
/// current chunk before exiting. Any I/O error on either path aborts the run
/// with no partial result.
pub async fn run(
    cancel: watch::Receiver<bool>,
    path: impl AsRef<Path>,
    opts: &Options,
) -> Result<String> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {:?}", path))?;
    let metrics = Arc::new(Metrics::new());

    let (keys, map) = if opts.concurrency {
        scan_concurrent(cancel, file, opts, metrics.clone()).await?
    } else {
        let metrics = metrics.clone();
        task::spawn_blocking(move || scan_sequential(file, &metrics))
            .await
            .context("sequential scan task panicked")??
    };

    metrics.log_summary();
    format::render(&keys, &map)
}

/// Single-threaded reference scan: one buffered pass, line by line, folding
/// into the global map and appending first-seen keys to the ordered list.
pub fn scan_sequential(file: File, metrics: &Metrics) -> Result<(Vec<String>, StatsMap)> {
    let mut reader = BufReader::with_capacity(SEQUENTIAL_BUF_SIZE, file);
    let mut keys = Vec::new();
    let mut map = StatsMap::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        let n = reader.read_until(b'\n', &mut line).context("read line")?;
        if n == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }

        match parse::parse_line(&line) {
            Some((key, tenths)) => {
                metrics.inc_lines();
                aggregate::record_tracked(&mut map, &mut keys, key, tenths);
            }
            None => {
                if !line.is_empty() {
                    metrics.inc_skipped();
                }
            }
        }
    }

    Ok((keys, map))
}

/// Plans line-aligned chunks, fans them out over a fixed pool of blocking
/// workers claiming chunk descriptors from a shared cursor, and folds each
/// chunk-local map into the global one in a single merge consumer.
///
/// The global map and ordered key list live only on this task; workers hand
/// their local maps over the channel and never see shared state. A chunk read
/// error is published on the same channel and aborts the whole run.
async fn scan_concurrent(
    mut cancel: watch::Receiver<bool>,
    file: File,
    opts: &Options,
    metrics: Arc<Metrics>,
) -> Result<(Vec<String>, StatsMap)> {
    let file = Arc::new(file);

    let chunks = {
        let file = file.clone();
        let chunk_size = opts.chunk_size;
        task::spawn_blocking(move || chunk::plan_chunks(&file, chunk_size))
            .await
            .context("chunk planner panicked")??
    };
    metrics.set_chunks_planned(chunks.len() as u64);
    debug!(
        chunks = chunks.len(),
        chunk_size = opts.chunk_size,
        "planned chunks"
    );

    let workers = opts.workers.clamp(1, chunks.len().max(1));
    let chunks = Arc::new(chunks);
    let cursor = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::channel::<Result<StatsMap>>(RESULT_CHANNEL_DEPTH);

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let file = file.clone();
        let chunks = chunks.clone();
        let cursor = cursor.clone();
        let tx = tx.clone();
        let metrics = metrics.clone();

        handles.push(task::spawn_blocking(move || loop {
            let idx = cursor.fetch_add(1, Ordering::Relaxed);
            let Some(&c) = chunks.get(idx) else { break };

            let result = chunk::read_chunk(&file, c).map(|buf| {
                metrics.add_bytes_read(buf.len() as u64);
                chunk::process_chunk(&buf, &metrics)
            });

            let failed = result.is_err();
            // A closed channel means the merge loop is gone; stop claiming chunks.
            if tx.blocking_send(result).is_err() || failed {
                break;
            }
        }));
    }
    drop(tx);

    let mut keys = Vec::new();
    let mut map = StatsMap::new();
    loop {
        tokio::select! {
            _ = cancelled(&mut cancel) => bail!("run cancelled"),
            result = rx.recv() => match result {
                Some(Ok(local)) => {
                    metrics.inc_chunks_merged();
                    aggregate::merge_into(&mut map, &mut keys, local);
                }
                Some(Err(e)) => return Err(e).context("chunk worker failed"),
                None => break,
            },
        }
    }

    for handle in handles {
        handle.await.context("chunk worker panicked")?;
    }

    Ok((keys, map))
}

/// Resolves once the cancellation flag turns true. A dropped sender means
/// cancellation can never arrive, so this pends forever rather than resolving.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    while !*cancel.borrow() {
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

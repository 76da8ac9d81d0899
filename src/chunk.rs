// src/chunk.rs
//! Line-aligned chunk planning and the per-chunk worker fold.
//!
//! Chunks partition the input file exactly: the end of chunk *i* is the start
//! of chunk *i+1* and the union of all chunks covers every byte. A chunk end
//! always lands immediately after a newline (except the final chunk, which
//! ends at file length), so no line is ever split between two workers.

use std::fs::File;
use std::os::unix::fs::FileExt;

use anyhow::{Context, Result};

use crate::aggregate::{self, StatsMap};
use crate::metrics::Metrics;
use crate::parse;

/// Proposed chunk length in bytes. Boundary correction can shrink a chunk by
/// up to one line, or grow it when a single line exceeds the proposal.
pub const DEFAULT_CHUNK_SIZE: u64 = 80 * 1024;

/// Half-open byte range `[start, end)` of the input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub start: u64,
    pub end: u64,
}

impl Chunk {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Partitions the file into line-aligned chunks of roughly `chunk_size` bytes.
///
/// Each boundary is proposed at `start + chunk_size` and corrected backward
/// byte-by-byte to the nearest newline. When the whole window `(start,
/// proposal)` holds no newline (a line longer than `chunk_size`), the proposal
/// is widened by another `chunk_size` and corrected again, so the oversized
/// line stays whole inside one chunk and planning always terminates.
pub fn plan_chunks(file: &File, chunk_size: u64) -> Result<Vec<Chunk>> {
    let file_len = file.metadata().context("stat input file")?.len();
    let chunk_size = chunk_size.max(1);

    let mut chunks = Vec::with_capacity((file_len / chunk_size) as usize + 1);
    let mut start = 0u64;
    while start < file_len {
        let mut proposed = start.saturating_add(chunk_size).min(file_len);
        let end = loop {
            if proposed == file_len {
                break file_len;
            }
            match line_boundary_before(file, start, proposed)? {
                Some(end) => break end,
                None => proposed = proposed.saturating_add(chunk_size).min(file_len),
            }
        };
        chunks.push(Chunk { start, end });
        start = end;
    }

    Ok(chunks)
}

/// Walks backward from `proposed`, one positioned single-byte read at a time,
/// until the byte just before the cursor is a newline; returns the offset
/// after that newline. `None` when the scan reaches `start` without finding
/// one. O(longest line) per boundary.
fn line_boundary_before(file: &File, start: u64, proposed: u64) -> Result<Option<u64>> {
    let mut byte = [0u8; 1];
    let mut pos = proposed;
    while pos > start {
        file.read_exact_at(&mut byte, pos - 1)
            .with_context(|| format!("read boundary byte at offset {}", pos - 1))?;
        if byte[0] == b'\n' {
            return Ok(Some(pos));
        }
        pos -= 1;
    }
    Ok(None)
}

/// Reads a chunk's exact byte range with a positioned read on the shared
/// read-only handle. Workers never seek, so one handle serves all of them.
pub fn read_chunk(file: &File, chunk: Chunk) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; chunk.len() as usize];
    file.read_exact_at(&mut buf, chunk.start)
        .with_context(|| format!("read chunk [{}, {})", chunk.start, chunk.end))?;
    Ok(buf)
}

/// Parses one chunk's raw bytes into a chunk-local stats map.
///
/// Splits on `\n` and applies the shared structural guards; malformed lines
/// are counted and dropped. Touches no global state, which is what keeps the
/// per-chunk fold lock-free.
pub fn process_chunk(bytes: &[u8], metrics: &Metrics) -> StatsMap {
    let mut local = StatsMap::new();

    for line in bytes.split(|&b| b == b'\n') {
        match parse::parse_line(line) {
            Some((key, tenths)) => {
                metrics.inc_lines();
                aggregate::record(&mut local, key, tenths);
            }
            None => {
                if !line.is_empty() {
                    metrics.inc_skipped();
                }
            }
        }
    }

    local
}

//! # tempscan - Chunked Concurrent Measurement Aggregation
//!
//! This crate computes per-key minimum/average/maximum statistics over large
//! `<key>;<value>` text files in a single pass. Values are signed decimals
//! with exactly one fractional digit and are held as integer tenths end to
//! end, so accumulation never involves floating-point rounding.
//!
//! ## Architecture
//!
//! The engine consists of several key components:
//! - **Parser**: fixed-position decoding of tenths values and line splitting
//! - **Aggregate**: the per-key min/max/total/count fold and its commutative merge
//! - **Chunking**: line-aligned partitioning of the file into worker byte ranges
//! - **Engine**: sequential scan and the pooled concurrent orchestrator/merge
//! - **Formatter**: deterministic, byte-sorted rendering of the result line
//!
//! ## Features
//!
//! - **Exact partitioning**: chunk boundaries are corrected backward to the
//!   nearest newline, so no line is ever split across workers
//! - **Deterministic output**: the concurrent and sequential paths produce
//!   byte-identical results for any input and any chunk size
//! - **Bounded fan-out**: a fixed worker pool claims chunk descriptors from a
//!   shared cursor instead of spawning one task per chunk
//! - **Single-owner merge**: one consumer owns the global map; workers only
//!   hand off chunk-local maps over a channel
//!
//! ## Example
//!
//! ```rust,no_run
//! use tempscan::engine::{run, Options};
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (_cancel_tx, cancel_rx) = watch::channel(false);
//!     let line = run(cancel_rx, "measurements.txt", &Options::default()).await?;
//!     println!("{line}");
//!     Ok(())
//! }
//! ```
pub mod aggregate;
pub mod chunk;
pub mod engine;
pub mod format;
pub mod metrics;
pub mod parse;

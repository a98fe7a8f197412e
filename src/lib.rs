//! Core library for the `rlprobe` CLI.
//!
//! This crate provides the internal building blocks used by the binary: CLI
//! argument types, the single-attempt request executor, the adaptive batch
//! scheduler, the baseline/anomaly analyzer, and report rendering. The
//! primary user-facing interface is the `rlprobe` command-line application;
//! library APIs may evolve as the CLI grows.
pub mod args;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod probe;
pub mod report;

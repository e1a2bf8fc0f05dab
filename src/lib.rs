//! Local-first time tracking for projects and tasks.
//!
//! The [tracker] owns the data and its invariants, [persistence] writes every change to a
//! [store], and [analysis] and [screenshots] derive reports from snapshots. The [cli] and the
//! [daemon] are the two processes built on top.

pub mod analysis;
pub mod cli;
pub mod daemon;
pub mod fs;
pub mod idle_api;
pub mod persistence;
pub mod screenshots;
pub mod store;
pub mod tracker;
pub mod utils;

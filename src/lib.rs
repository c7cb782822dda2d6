//! Skyview library
//!
//! Normalizes weather backend payloads into per-day records and chart-ready
//! datasets. The binary in `main.rs` puts a terminal UI on top.

pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod refresh;
pub mod ui;

/// Shared modules for the signal dashboard
pub mod app;
pub mod chart;
pub mod config;
pub mod detail;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod metrics;
pub mod types;
pub mod widget;

#![allow(clippy::uninlined_format_args)]

pub mod annotate;
pub mod app;
pub mod backend;
pub mod charts;
pub mod cli;
pub mod collector;
pub mod config;
pub mod data;
pub mod filter;
pub mod metrics;
pub mod report;
pub mod session;
pub mod video;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;

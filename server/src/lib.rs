//! Process bootstrap for the todo service.
//!
//! The binary in `main.rs` wires these pieces together:
//!
//! - [`config`]: environment-driven configuration
//! - [`telemetry`]: tracing subscriber and Prometheus exporter
//! - [`seed`]: opt-in sample data loader

pub mod config;
pub mod seed;
pub mod telemetry;

pub use config::Config;

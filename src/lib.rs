//! Loader for pod voltage captures.
//!
//! Reads one hourly CSV capture for a measurement pod, rescales the raw ADC
//! readings into volts and writes the series to InfluxDB in a single batch.

pub mod cli;
pub mod config;
pub mod error;
pub mod filename;
pub mod loader;
pub mod logging;
pub mod sample;
pub mod store;

pub use config::{RowPolicy, StoreConfig};
pub use error::{LoadError, Result, RowError};
pub use loader::{load, load_with_context, LoadSummary, PointBuffer, RunContext};
pub use sample::{DataPoint, Sample, SCALE_FACTOR};
pub use store::{InfluxStore, JsonLinesSink, PointSink};

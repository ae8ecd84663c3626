//! Destinations for a run's buffered points.

use std::io::Write;

use influxdb::{Client, InfluxDbWriteable, WriteQuery};
use log::{debug, info};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::sample::DataPoint;

/// Receives the whole buffer of a run in one call.
#[allow(async_fn_in_trait)]
pub trait PointSink {
    /// Write every point, returning how many were accepted.
    async fn write_batch(&mut self, points: Vec<DataPoint>) -> Result<usize>;
}

/// InfluxDB 1.x backend. One batched write per call, no retries.
pub struct InfluxStore {
    client: Client,
    measurement: String,
}

impl InfluxStore {
    pub fn new(config: &StoreConfig) -> Self {
        let client = Client::new(config.url.as_str(), config.database.as_str())
            .with_auth(config.username.as_str(), config.password.as_str());
        info!(
            "Using database {} at {} (measurement {})",
            config.database, config.url, config.measurement
        );
        Self {
            client,
            measurement: config.measurement.clone(),
        }
    }
}

impl PointSink for InfluxStore {
    async fn write_batch(&mut self, points: Vec<DataPoint>) -> Result<usize> {
        let count = points.len();
        let queries: Vec<WriteQuery> = points
            .into_iter()
            .map(|p| p.into_query(self.measurement.as_str()))
            .collect();

        let response = self.client.query(queries).await?;
        debug!("InfluxDB response: {:?}", response);
        Ok(count)
    }
}

/// Prints points as JSON lines, for inspecting a run without writing it.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PointSink for JsonLinesSink<W> {
    async fn write_batch(&mut self, points: Vec<DataPoint>) -> Result<usize> {
        for point in &points {
            serde_json::to_writer(&mut self.out, point)?;
            self.out.write_all(b"\n").map_err(serde_json::Error::io)?;
        }
        self.out.flush().map_err(serde_json::Error::io)?;
        Ok(points.len())
    }
}

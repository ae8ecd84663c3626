//! Reads one capture file and commits it as a single batch.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};

use crate::config::RowPolicy;
use crate::error::{LoadError, Result};
use crate::filename;
use crate::sample::{DataPoint, Sample, SCALE_FACTOR};
use crate::store::PointSink;

/// Per-run constants shared by every row.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    pub base_date: DateTime<Utc>,
    pub pod_id: String,
    pub scale_factor: f64,
}

impl RunContext {
    pub fn new(base_date: DateTime<Utc>, pod_id: impl Into<String>) -> Self {
        Self {
            base_date,
            pod_id: pod_id.into(),
            scale_factor: SCALE_FACTOR,
        }
    }

    /// Anchor the run on the hour encoded in the capture filename.
    pub fn from_filename(path: &Path, pod_id: impl Into<String>) -> Result<Self> {
        Ok(Self::new(filename::base_date(path)?, pod_id))
    }
}

/// Outcome of a load run
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub base_date: DateTime<Utc>,
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub points_written: usize,
}

/// Points converted from one capture, in file order.
#[derive(Debug, Default)]
pub struct PointBuffer {
    pub points: Vec<DataPoint>,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Convert every row of `reader` into points.
///
/// With [`RowPolicy::Abort`] the first bad row fails the run and nothing is
/// returned; with [`RowPolicy::Skip`] it is logged and counted.
pub fn read_points<R: Read>(reader: R, ctx: &RunContext, policy: RowPolicy) -> Result<PointBuffer> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut buffer = PointBuffer::default();
    for result in csv_reader.records() {
        let record = result?;
        buffer.rows_read += 1;
        let line = record.position().map_or(buffer.rows_read as u64, |p| p.line());

        match Sample::from_record(&record).and_then(|s| s.into_point(ctx)) {
            Ok(point) => {
                debug!("line {}: {:?}", line, point);
                buffer.points.push(point);
            }
            Err(source) => match policy {
                RowPolicy::Abort => return Err(LoadError::RowParse { line, source }),
                RowPolicy::Skip => {
                    warn!("Skipping line {}: {}", line, source);
                    buffer.rows_skipped += 1;
                }
            },
        }
    }

    Ok(buffer)
}

/// Load a capture file into `sink`.
///
/// The filename is validated before the file is opened. All points are
/// handed to the sink in one `write_batch` call; an empty capture writes
/// nothing.
pub async fn load<S: PointSink>(
    path: &Path,
    pod_id: &str,
    policy: RowPolicy,
    sink: &mut S,
) -> Result<LoadSummary> {
    let ctx = RunContext::from_filename(path, pod_id)?;
    load_with_context(path, &ctx, policy, sink).await
}

pub async fn load_with_context<S: PointSink>(
    path: &Path,
    ctx: &RunContext,
    policy: RowPolicy,
    sink: &mut S,
) -> Result<LoadSummary> {
    info!("Loading {} for hour: {}", path.display(), ctx.base_date);

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let buffer = read_points(file, ctx, policy)?;
    info!(
        "Parsed {} rows from {} ({} skipped)",
        buffer.rows_read,
        path.display(),
        buffer.rows_skipped
    );

    let points_written = if buffer.points.is_empty() {
        warn!("No points to write for {}", path.display());
        0
    } else {
        sink.write_batch(buffer.points).await?
    };
    info!("Wrote {} points for pod {}", points_written, ctx.pod_id);

    Ok(LoadSummary {
        base_date: ctx.base_date,
        rows_read: buffer.rows_read,
        rows_skipped: buffer.rows_skipped,
        points_written,
    })
}

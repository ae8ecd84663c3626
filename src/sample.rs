//! Row conversion: raw capture rows into scaled voltage points.

use chrono::{DateTime, Duration, Utc};
use csv::StringRecord;
use influxdb::{InfluxDbWriteable, Timestamp, WriteQuery};
use serde::Serialize;

use crate::error::RowError;
use crate::loader::RunContext;

/// ADC counts per volt for the pod front end.
pub const SCALE_FACTOR: f64 = 993.0 / 4.788;

/// One capture row: `offset, raw_c2, raw_c3`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Offset into the hour as `M:S[.fff]`
    pub offset: String,
    pub raw_c2: i64,
    pub raw_c3: i64,
}

/// A scaled reading ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub time: DateTime<Utc>,
    pub pod_id: String,
    pub volts_c2: f64,
    pub volts_c3: f64,
}

impl Sample {
    /// Columns past the third are ignored.
    pub fn from_record(record: &StringRecord) -> Result<Self, RowError> {
        if record.len() < 3 {
            return Err(RowError::MissingColumns { found: record.len() });
        }
        Ok(Self {
            offset: record[0].trim().to_string(),
            raw_c2: parse_reading(&record[1], 2)?,
            raw_c3: parse_reading(&record[2], 3)?,
        })
    }

    pub fn into_point(self, ctx: &RunContext) -> Result<DataPoint, RowError> {
        let offset = parse_offset(&self.offset)?;
        let time = ctx
            .base_date
            .checked_add_signed(offset)
            .ok_or_else(|| RowError::TimestampOutOfRange(self.offset.clone()))?;

        // InfluxDB timestamps are unsigned nanoseconds since the epoch
        match time.timestamp_nanos_opt() {
            Some(nanos) if nanos >= 0 => {}
            _ => return Err(RowError::TimestampOutOfRange(self.offset)),
        }

        Ok(DataPoint {
            time,
            pod_id: ctx.pod_id.clone(),
            volts_c2: self.raw_c2 as f64 / ctx.scale_factor,
            volts_c3: self.raw_c3 as f64 / ctx.scale_factor,
        })
    }
}

fn parse_reading(field: &str, channel: u8) -> Result<i64, RowError> {
    field.trim().parse().map_err(|_| RowError::InvalidReading {
        channel,
        value: field.to_string(),
    })
}

/// Parse `M:S[.fff]` into a duration, rounded to whole microseconds.
pub fn parse_offset(offset: &str) -> Result<Duration, RowError> {
    let mut parts = offset.split(':');
    let (minutes, seconds) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(s), None) => (m.trim(), s.trim()),
        _ => return Err(RowError::MissingColon(offset.to_string())),
    };

    let minutes: i64 = minutes
        .parse()
        .map_err(|_| RowError::InvalidMinutes(offset.to_string()))?;
    let seconds: f64 = seconds
        .parse()
        .map_err(|_| RowError::InvalidSeconds(offset.to_string()))?;
    if !seconds.is_finite() {
        return Err(RowError::InvalidSeconds(offset.to_string()));
    }

    let micros = (seconds * 1_000_000.0).round();
    if micros.abs() >= i64::MAX as f64 {
        return Err(RowError::TimestampOutOfRange(offset.to_string()));
    }

    Duration::try_minutes(minutes)
        .and_then(|m| m.checked_add(&Duration::microseconds(micros as i64)))
        .ok_or_else(|| RowError::TimestampOutOfRange(offset.to_string()))
}

/// Points built by [`Sample::into_point`] always fall in the nanosecond range
/// InfluxDB accepts.
impl InfluxDbWriteable for DataPoint {
    fn into_query<S: Into<String>>(self, measurement: S) -> WriteQuery {
        let nanos = self.time.timestamp_nanos_opt().unwrap_or_default().max(0);
        let ts = Timestamp::Nanoseconds(nanos as u128);

        WriteQuery::new(ts, measurement)
            .add_tag("pod_id", self.pod_id)
            .add_field("volts_c2", self.volts_c2)
            .add_field("volts_c3", self.volts_c3)
    }
}

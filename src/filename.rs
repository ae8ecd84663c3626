//! Base timestamp from capture filenames.
//!
//! Captures are named after the hour they cover, `YYYYMMDDHH` in local time,
//! e.g. `2018121523.csv`. Every row offset is relative to that hour.

use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::error::{LoadError, Result};

const STAMP_LEN: usize = 10;

/// Resolve the hour a capture covers, reading the stamp as system local time.
pub fn base_date(path: &Path) -> Result<DateTime<Utc>> {
    base_date_in(path, &Local)
}

/// Same as [`base_date`] with an explicit zone for the stamp.
///
/// The whole path is searched, so a stamp in a directory name counts too.
/// An hour skipped by a DST change is rejected rather than shifted across
/// the gap.
pub fn base_date_in<Tz: TimeZone>(path: &Path, tz: &Tz) -> Result<DateTime<Utc>> {
    let name = path.to_string_lossy();

    let stamp = find_stamp(&name)
        .ok_or_else(|| LoadError::invalid_filename(&name, "no YYYYMMDDHH timestamp"))?;

    // All ASCII digits, so these cannot fail
    let year: i32 = stamp[0..4].parse().unwrap_or_default();
    let month: u32 = stamp[4..6].parse().unwrap_or_default();
    let day: u32 = stamp[6..8].parse().unwrap_or_default();
    let hour: u32 = stamp[8..10].parse().unwrap_or_default();

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| LoadError::invalid_filename(&name, format!("'{stamp}' is not a valid date and hour")))?;

    // Ambiguous hours (end of DST) resolve to the earlier instant
    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| LoadError::invalid_filename(&name, format!("{naive} does not exist in the local time zone")))?;

    Ok(local.with_timezone(&Utc))
}

/// First run of ten ASCII digits in `name`.
fn find_stamp(name: &str) -> Option<&str> {
    let bytes = name.as_bytes();
    if bytes.len() < STAMP_LEN {
        return None;
    }
    (0..=bytes.len() - STAMP_LEN)
        .find(|&i| bytes[i..i + STAMP_LEN].iter().all(u8::is_ascii_digit))
        .map(|i| &name[i..i + STAMP_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_base_date_utc() {
        let date = base_date_in(Path::new("2018121523.csv"), &Utc).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2018, 12, 15, 23, 0, 0).unwrap());
    }

    #[test]
    fn test_base_date_converts_local_to_utc() {
        let pst = FixedOffset::west_opt(8 * 3600).unwrap();
        let date = base_date_in(Path::new("2018121523.csv"), &pst).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2018, 12, 16, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_base_date_system_local() {
        let expected = Local
            .with_ymd_and_hms(2018, 12, 15, 23, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(base_date(Path::new("2018121523.csv")).unwrap(), expected);
    }

    #[test]
    fn test_stamp_embedded_in_name() {
        let date = base_date_in(Path::new("data/pod3_2019010200_raw.csv"), &Utc).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2019, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_stamp_in_directory_name() {
        let date = base_date_in(Path::new("captures/2018121523/pod3.csv"), &Utc).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2018, 12, 15, 23, 0, 0).unwrap());
    }

    #[test]
    fn test_first_stamp_in_path_wins() {
        let date = base_date_in(Path::new("/data/2019010200/2018121523.csv"), &Utc).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2019, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_missing_stamp() {
        let err = base_date_in(Path::new("notadate.csv"), &Utc).unwrap_err();
        match err {
            LoadError::InvalidFilename { filename, .. } => assert_eq!(filename, "notadate.csv"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(base_date_in(Path::new("201812152.csv"), &Utc).is_err());
    }

    #[test]
    fn test_invalid_calendar_values() {
        assert!(base_date_in(Path::new("2018131523.csv"), &Utc).is_err());
        assert!(base_date_in(Path::new("2018121524.csv"), &Utc).is_err());
        assert!(base_date_in(Path::new("2018023010.csv"), &Utc).is_err());
    }

    #[test]
    fn test_find_stamp_takes_first_run() {
        assert_eq!(find_stamp("x20181215231.csv"), Some("2018121523"));
        assert_eq!(find_stamp("a1b2c3"), None);
    }
}

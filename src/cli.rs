use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    RowPolicy, StoreConfig, DEFAULT_DATABASE, DEFAULT_MEASUREMENT, DEFAULT_PASSWORD,
    DEFAULT_URL, DEFAULT_USERNAME,
};

/// Pod voltage loader - writes one hourly CSV capture into InfluxDB
#[derive(Parser, Debug)]
#[command(name = "load", author, version, about, long_about = None)]
pub struct Cli {
    /// CSV capture named after the hour it covers, e.g. 2018121523.csv
    #[arg(value_name = "CSV_FILE")]
    pub csv_file: PathBuf,

    /// Pod identifier written as the pod_id tag
    #[arg(value_name = "POD_ID")]
    pub pod_id: String,

    /// InfluxDB URL
    #[arg(short, long, env = "PODVOLTS_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// InfluxDB database name
    #[arg(short = 'b', long, env = "PODVOLTS_DB", default_value = DEFAULT_DATABASE)]
    pub db_name: String,

    /// InfluxDB user
    #[arg(long, env = "PODVOLTS_USER", default_value = DEFAULT_USERNAME)]
    pub user: String,

    /// InfluxDB password
    #[arg(long, env = "PODVOLTS_PASSWORD", default_value = DEFAULT_PASSWORD, hide_env_values = true)]
    pub password: String,

    /// Measurement name for the data
    #[arg(short, long, env = "PODVOLTS_MEASUREMENT", default_value = DEFAULT_MEASUREMENT)]
    pub measurement: String,

    /// How to handle rows that cannot be parsed
    #[arg(long, value_enum, default_value_t = RowPolicy::Abort)]
    pub on_malformed: RowPolicy,

    /// Print the points as JSON lines instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            url: self.url.clone(),
            database: self.db_name.clone(),
            username: self.user.clone(),
            password: self.password.clone(),
            measurement: self.measurement.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_exactly_two_positionals() {
        assert!(Cli::try_parse_from(["load"]).is_err());
        assert!(Cli::try_parse_from(["load", "2018121523.csv"]).is_err());
        assert!(Cli::try_parse_from(["load", "2018121523.csv", "pod1", "extra"]).is_err());

        let cli = Cli::try_parse_from(["load", "2018121523.csv", "pod1"]).unwrap();
        assert_eq!(cli.csv_file, PathBuf::from("2018121523.csv"));
        assert_eq!(cli.pod_id, "pod1");
    }

    #[test]
    fn test_usage_error_exit_code_is_nonzero() {
        let err = Cli::try_parse_from(["load", "only-one.csv"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_store_options() {
        let cli = Cli::try_parse_from([
            "load",
            "2018121523.csv",
            "pod7",
            "--url",
            "http://influx:8086",
            "-b",
            "lab",
            "--on-malformed",
            "skip",
            "--dry-run",
        ])
        .unwrap();

        let config = cli.store_config();
        assert_eq!(config.url, "http://influx:8086");
        assert_eq!(config.database, "lab");
        assert_eq!(config.measurement, "podvolts");
        assert_eq!(cli.on_malformed, RowPolicy::Skip);
        assert!(cli.dry_run);
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use podvolts_loader::cli::Cli;
use podvolts_loader::logging::setup_logging;
use podvolts_loader::{load_with_context, InfluxStore, JsonLinesSink, RunContext};

fn main() -> Result<()> {
    // Wrong argument count exits here with usage
    let args = Cli::parse();

    setup_logging(args.verbose, args.log_file.as_deref())?;

    // Resolve the hour up front so a bad name fails before the runtime starts
    let ctx = RunContext::from_filename(&args.csv_file, args.pod_id.as_str())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")?;

    let summary = runtime.block_on(async {
        if args.dry_run {
            let mut sink = JsonLinesSink::new(std::io::stdout().lock());
            load_with_context(&args.csv_file, &ctx, args.on_malformed, &mut sink).await
        } else {
            let mut store = InfluxStore::new(&args.store_config());
            load_with_context(&args.csv_file, &ctx, args.on_malformed, &mut store).await
        }
    })?;

    info!(
        "Done: {} rows read, {} skipped, {} points written for hour {}",
        summary.rows_read, summary.rows_skipped, summary.points_written, summary.base_date
    );
    Ok(())
}

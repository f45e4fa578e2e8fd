use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use census_tract_etl::config::ConfigLoader;
use census_tract_etl::error::EtlError;
use census_tract_etl::loader::load_all;
use census_tract_etl::store::Store;

#[derive(Parser)]
#[command(name = "census-loader")]
#[command(about = "Load every CSV file in the output directory into SQLite")]
#[command(version)]
struct Cli {
    /// JSON settings file (defaults to ./census-etl.json when present)
    #[arg(long)]
    config: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<EtlError>() {
            return ExitCode::from(err.exit_code());
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = ConfigLoader::resolve(cli.config.as_deref())?;
    let store = Store::new(&settings);

    let summary = load_all(
        store.output_dir().as_std_path(),
        store.database_path().as_std_path(),
    )?;

    for file in &summary.skipped {
        println!("Skipped {} (no geo_id column)", file.display());
    }
    for table in &summary.tables {
        println!(
            "{}: {} rows inserted, {} rejected on primary key conflict",
            table.table, table.inserted, table.rejected
        );
    }
    println!("Database created successfully and tables added");
    Ok(())
}

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use census_tract_etl::census::CensusHttpClient;
use census_tract_etl::config::ConfigLoader;
use census_tract_etl::error::EtlError;
use census_tract_etl::pipeline::Pipeline;
use census_tract_etl::store::Store;

#[derive(Parser)]
#[command(name = "census-pipeline")]
#[command(about = "Fetch, normalize and merge tract-level census datasets into CSV")]
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
    let client = CensusHttpClient::new()?;

    let report = Pipeline::new(store, client, settings.write_intermediate).run()?;

    println!(
        "Census data written to {} ({} tracts)",
        report.merged_path, report.merged_rows
    );
    for path in &report.dataset_paths {
        println!("  dataset export: {path}");
    }
    Ok(())
}

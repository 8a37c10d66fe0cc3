use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use greenfeed_export::auth::Credentials;
use greenfeed_export::config::Config;
use greenfeed_export::profile::ExportProfile;
use greenfeed_export::query::{DataQuery, DatasetKind, FeederIds, PortalTimestamp};
use greenfeed_export::services::ExportService;

#[derive(Parser)]
#[command(name = "greenfeed-export")]
#[command(about = "Download GreenFeed feeder data from the C-Lock portal to CSV", long_about = None)]
struct Cli {
    /// Portal username
    #[arg(long, env = "API_USER")]
    user: String,

    /// Portal password
    #[arg(long = "pass", env = "API_PASS", hide_env_values = true)]
    pass: String,

    /// Feeder ID or comma-separated list, e.g. "453, 454, 560"
    #[arg(long, env = "GREENFEED_FIDS")]
    fids: FeederIds,

    /// Start of the window: mm/dd/yyyy or YYYY-MM-DD_HH:MM:SS
    #[arg(long)]
    start: PortalTimestamp,

    /// End of the window (default: today)
    #[arg(long)]
    end: Option<PortalTimestamp>,

    /// Dataset kind sent as the `d` parameter (visits, meas, ...)
    #[arg(long, default_value = "visits")]
    dataset: DatasetKind,

    /// File naming and end-date convention
    #[arg(long, value_enum, default_value_t = ExportProfile::Emissions)]
    profile: ExportProfile,

    /// Experiment label used as the file name prefix
    #[arg(long)]
    label: Option<String>,

    /// Directory to write the CSV into (created if missing)
    #[arg(long, default_value = "data")]
    output_dir: PathBuf,

    /// Raw response lines to log before parsing
    #[arg(long, default_value = "5")]
    preview_lines: usize,
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,greenfeed_export=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables, then flags (which fall back to them)
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    info!("Using portal {}", config.portal_url);

    // Validate the request before any network call
    let end = cli.end.unwrap_or_else(PortalTimestamp::today);
    let query = DataQuery::new(cli.dataset, cli.fids, cli.start, end)?;
    let credentials = Credentials::new(cli.user, cli.pass);

    // Run login, fetch, parse and write
    let service = ExportService::new(&config, cli.profile)?.with_preview_lines(cli.preview_lines);

    match service
        .run(&credentials, &query, &cli.output_dir, cli.label.as_deref())
        .await
    {
        Ok(summary) => {
            info!(
                "Exported {} records ({} raw lines)",
                summary.records, summary.raw_lines
            );
            println!("Download complete → {}", summary.path.display());
            Ok(())
        }
        Err(e) => {
            error!("Export failed: {}", e);
            Err(e.into())
        }
    }
}

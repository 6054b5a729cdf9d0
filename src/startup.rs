use crate::components::crm::CrmClient;
use crate::components::sheets::SheetsClient;
use crate::config::Config;
use crate::error::other_error;
use crate::sync::{sync_rsvps, SyncReport};
use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build both clients from the config and run one sync pass
pub async fn run(config: &Config) -> miette::Result<SyncReport> {
    let crm = CrmClient::from_config(config);
    let sheets = SheetsClient::from_config(config);

    info!("Syncing RSVPs into spreadsheet {}", config.spreadsheet_id);

    match sync_rsvps(&crm, &sheets, &config.spreadsheet_id, Utc::now()).await {
        Ok(report) => {
            info!(
                "Sync finished: {} events, {} sheets created, {} rows updated, {} rows appended, {} unchanged, {} skipped",
                report.events,
                report.sheets_created,
                report.rows_updated,
                report.rows_appended,
                report.rows_unchanged,
                report.rows_skipped
            );
            Ok(report)
        }
        Err(e) => {
            error!("Sync failed: {}", e);
            Err(e.into())
        }
    }
}

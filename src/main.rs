use rsvp_sheets_sync::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting RSVP sync");

    // Load configuration
    let config = startup::load_config()?;

    // Run a single sync pass; any error exits with status 1
    startup::run(&config).await?;

    Ok(())
}

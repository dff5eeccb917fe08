use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};

use loan_tracker_backend::api;
use loan_tracker_backend::cli::{execute_command, Cli};
use loan_tracker_backend::config::{
    init_logging, ApplicationSettings, BootstrapSettings, DatabaseConnections, SecretManager,
};
use loan_tracker_backend::providers::LogNotifier;
use loan_tracker_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_logging()?;

    let bootstrap_settings = BootstrapSettings::from_env()?;
    let settings = ApplicationSettings::from_env()?;
    let secret_manager = Arc::new(SecretManager::init()?);
    tracing::info!("{}", secret_manager);

    let connections = DatabaseConnections::init(&bootstrap_settings).await?;
    connections.migrate().await?;
    tracing::info!("Database migrations completed");

    let notifier = Arc::new(LogNotifier::new(bootstrap_settings.public_base_url()));
    let app_data = Arc::new(AppData::init(connections, secret_manager, settings, notifier)?);

    if execute_command(&cli, &app_data).await? {
        return Ok(());
    }

    let app = api::routes(app_data, bootstrap_settings.public_base_url());

    let address = bootstrap_settings.server_address();
    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at {}/swagger", bootstrap_settings.public_base_url());
    tracing::info!("API endpoints available at {}/api", bootstrap_settings.public_base_url());

    Server::new(TcpListener::bind(address)).run(app).await?;
    Ok(())
}

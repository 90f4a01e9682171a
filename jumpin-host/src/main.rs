mod config;
mod console;
mod directory;
mod error;
mod table;

use config::HostConfig;
use directory::MatchDirectory;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = HostConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .with_writer(std::io::stderr)
        .init();

    info!("Reading match requests from stdin");
    console::run(MatchDirectory::new(config.rules)).await
}

use clap::Parser;
use tracing::{debug, info};

mod config;
mod error;
mod logger;

use config::{Environment, Settings};

#[derive(Parser)]
#[command(name = "person-service", version)]
struct Cli {
    /// Application environment (local/dev/prod)
    #[arg(long)]
    env: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let environment = config::determine_environment(cli.env.as_deref());
    logger::init(environment);
    config::log_environment(environment, cli.env.as_deref());

    let settings = Settings::load(environment)?;

    info!(environment = %settings.environment, "starting person-service v{}", env!("CARGO_PKG_VERSION"));
    info!("server configured on {}:{}", settings.server.host, settings.server.port);
    debug!(
        "database target {}@{}:{}/{}",
        settings.database.user, settings.database.host, settings.database.port, settings.database.name
    );

    if matches!(settings.environment, Environment::Local | Environment::Dev) {
        debug!("debug messages are enabled");
    }

    Ok(())
}

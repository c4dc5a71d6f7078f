use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

/// Initialize the global tracing subscriber for the given environment.
///
/// Production gets JSON output at `info` and above; every other environment
/// gets human-readable output at `debug` and above. `RUST_LOG` overrides the
/// default filter when set.
pub fn init(environment: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(environment)));

    if use_json(environment) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn default_level(environment: Environment) -> &'static str {
    match environment {
        Environment::Prod => "info",
        _ => "debug",
    }
}

fn use_json(environment: Environment) -> bool {
    environment == Environment::Prod
}

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ConfigError;

// Default database connection values
const DEF_DB_HOST: &str = "localhost";
const DEF_DB_PORT: u16 = 5432;
const DEF_DB_USER: &str = "postgres";
const DEF_DB_PASSWORD: &str = "";
const DEF_DB_NAME: &str = "postgres";
const DEF_DB_SSLMODE: &str = "disable";

// Default server values
const DEF_SERVER_HOST: &str = "localhost";
const DEF_SERVER_PORT: u16 = 8080;

/// Application environment (local/dev/prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application settings, loaded once at startup and read-only afterwards.
#[derive(Debug)]
pub struct Settings {
    pub environment: Environment,
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

#[derive(Debug)]
#[allow(dead_code)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// disable/require/verify-full
    pub ssl_mode: String,
}

#[derive(Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Determine the application environment.
///
/// Priority: `--env` flag > `APP_ENV` environment variable > `local`.
/// An unrecognized value in either source behaves as if that source
/// were unset.
pub fn determine_environment(flag: Option<&str>) -> Environment {
    flag.and_then(parse_environment)
        .or_else(|| {
            std::env::var("APP_ENV")
                .ok()
                .and_then(|name| parse_environment(&name))
        })
        .unwrap_or(Environment::Local)
}

fn parse_environment(name: &str) -> Option<Environment> {
    match name {
        "local" => Some(Environment::Local),
        "dev" => Some(Environment::Dev),
        "prod" => Some(Environment::Prod),
        _ => None,
    }
}

impl Settings {
    /// Load the application settings for the given environment.
    ///
    /// Loads the matching `.env` file (relative to `../../` of the working
    /// directory) into the process environment, then reads each setting,
    /// substituting hardcoded defaults for anything missing or malformed.
    /// A missing env file is fatal; a missing variable is not.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let wd = std::env::current_dir().map_err(ConfigError::WorkDir)?;
        Self::load_from(&wd.join("../../"), environment)
    }

    fn load_from(base_dir: &Path, environment: Environment) -> Result<Self, ConfigError> {
        let path = env_file_path(environment, base_dir);
        dotenvy::from_path(&path).map_err(|source| ConfigError::EnvFile { path, source })?;
        Ok(Self::from_env(environment))
    }

    /// Read all settings from the process environment. Every variable has a
    /// hardcoded default; nothing here can fail.
    pub fn from_env(environment: Environment) -> Self {
        Self {
            environment,
            database: DatabaseSettings {
                host: env_or("DB_HOST", DEF_DB_HOST),
                port: env_parse_or("DB_PORT", DEF_DB_PORT),
                user: env_or("DB_USER", DEF_DB_USER),
                password: env_or("DB_PASSWORD", DEF_DB_PASSWORD),
                name: env_or("DB_NAME", DEF_DB_NAME),
                ssl_mode: env_or("DB_SSLMODE", DEF_DB_SSLMODE),
            },
            server: ServerSettings {
                host: env_or("SERVER_HOST", DEF_SERVER_HOST),
                port: env_parse_or("SERVER_PORT", DEF_SERVER_PORT),
            },
        }
    }
}

impl DatabaseSettings {
    /// Postgres-style connection string.
    #[allow(dead_code)]
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            self.host, self.port, self.user, self.password, self.name, self.ssl_mode
        )
    }
}

/// Env file path for the given environment.
///
/// `dev`/`prod` map to `.env.dev`/`.env.prod`. `local` prefers `.env.local`
/// when it exists, otherwise plain `.env`.
fn env_file_path(environment: Environment, base_dir: &Path) -> PathBuf {
    let name = match environment {
        Environment::Local => {
            if base_dir.join(".env.local").is_file() {
                ".env.local"
            } else {
                ".env"
            }
        }
        Environment::Dev => ".env.dev",
        Environment::Prod => ".env.prod",
    };
    base_dir.join(name)
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) => value,
        Err(_) => {
            warn!("env var {} is missing, using default value", key);
            default.to_owned()
        }
    }
}

fn env_parse_or(key: &str, default: u16) -> u16 {
    match std::env::var(key) {
        Ok(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("env var {} is not a number, using default value", key);
                default
            }
        },
        Err(_) => {
            warn!("env var {} is missing, using default value", key);
            default
        }
    }
}

/// Log which environment was selected.
pub fn log_environment(environment: Environment, flag: Option<&str>) {
    let specified = flag.and_then(parse_environment).is_some()
        || std::env::var("APP_ENV")
            .ok()
            .and_then(|name| parse_environment(&name))
            .is_some();

    if specified {
        info!("using {} environment", environment);
    } else {
        info!(
            "environment not specified or not recognized, using {}",
            environment
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_from_flag() {
        assert_eq!(determine_environment(Some("dev")), Environment::Dev);
        assert_eq!(determine_environment(Some("prod")), Environment::Prod);
        assert_eq!(determine_environment(Some("local")), Environment::Local);
    }

    // Everything that depends on APP_ENV lives in one test so the parallel
    // runner cannot interleave writes to it.
    #[test]
    fn environment_precedence() {
        std::env::remove_var("APP_ENV");
        assert_eq!(determine_environment(None), Environment::Local);
        assert_eq!(determine_environment(Some("staging")), Environment::Local);
        assert_eq!(determine_environment(Some("")), Environment::Local);

        std::env::set_var("APP_ENV", "prod");
        assert_eq!(determine_environment(None), Environment::Prod);
        // Flag wins over APP_ENV
        assert_eq!(determine_environment(Some("dev")), Environment::Dev);
        // Unrecognized flag behaves as unset, APP_ENV still applies
        assert_eq!(determine_environment(Some("staging")), Environment::Prod);

        std::env::remove_var("APP_ENV");
    }

    #[test]
    fn env_file_names_per_environment() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();

        assert_eq!(env_file_path(Environment::Dev, base), base.join(".env.dev"));
        assert_eq!(env_file_path(Environment::Prod, base), base.join(".env.prod"));
        // No .env.local on disk: plain .env
        assert_eq!(env_file_path(Environment::Local, base), base.join(".env"));

        std::fs::write(base.join(".env.local"), "").unwrap();
        assert_eq!(
            env_file_path(Environment::Local, base),
            base.join(".env.local")
        );
    }

    #[test]
    fn missing_env_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(dir.path(), Environment::Prod).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    // DB_PORT and SERVER_PORT are fixed names, so all assertions that touch
    // them live in one test to avoid clashing under the parallel runner.
    #[test]
    fn settings_from_env_with_defaults_and_overrides() {
        std::env::remove_var("DB_HOST");
        std::env::remove_var("SERVER_PORT");
        std::env::set_var("DB_PORT", "1234");

        let settings = Settings::from_env(Environment::Local);
        assert_eq!(settings.database.port, 1234);
        assert_eq!(settings.database.host, "localhost");
        assert_eq!(settings.server.port, 8080);

        // Malformed numbers degrade to the default instead of failing
        std::env::set_var("DB_PORT", "notanumber");
        let settings = Settings::from_env(Environment::Local);
        assert_eq!(settings.database.port, 5432);

        std::env::remove_var("DB_PORT");
    }

    #[test]
    fn connection_string_format() {
        let db = DatabaseSettings {
            host: "db.internal".into(),
            port: 5433,
            user: "person".into(),
            password: "secret".into(),
            name: "people".into(),
            ssl_mode: "require".into(),
        };
        assert_eq!(
            db.connection_string(),
            "host=db.internal port=5433 user=person password=secret dbname=people sslmode=require"
        );
    }
}

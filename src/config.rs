use std::env;
use std::fmt;
use std::str::FromStr;
use anyhow::{anyhow, Context, Result};

/// Which `RecordStore` implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Spanner,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spanner" => Ok(StoreBackend::Spanner),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("expected 'spanner' or 'memory', got '{}'", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Spanner => f.write_str("spanner"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub spanner_emulator_host: Option<String>,
    pub spanner_project: String,
    pub spanner_instance: String,
    pub spanner_database: String,
    pub products_table: String,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let store_backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "spanner".to_string())
            .parse::<StoreBackend>()
            .context("STORE_BACKEND must be 'spanner' or 'memory'")?;

        let spanner_emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        // The Spanner coordinates only matter when Spanner is the backend
        let spanner_var = |name: &str| -> Result<String> {
            match store_backend {
                StoreBackend::Spanner => env::var(name)
                    .with_context(|| format!("{} environment variable is required", name)),
                StoreBackend::Memory => Ok(env::var(name).unwrap_or_default()),
            }
        };

        let spanner_project = spanner_var("SPANNER_PROJECT")?;
        let spanner_instance = spanner_var("SPANNER_INSTANCE")?;
        let spanner_database = spanner_var("SPANNER_DATABASE")?;

        let products_table = env::var("PRODUCTS_TABLE")
            .unwrap_or_else(|_| "products".to_string());

        if !is_valid_table_name(&products_table) {
            return Err(anyhow!(
                "PRODUCTS_TABLE must contain only letters, digits and underscores, got '{}'",
                products_table
            ));
        }

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            store_backend,
            spanner_emulator_host,
            spanner_project,
            spanner_instance,
            spanner_database,
            products_table,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {}", self.store_backend);
        if self.store_backend == StoreBackend::Spanner {
            tracing::info!("  Spanner emulator: {}",
                self.spanner_emulator_host.as_deref().unwrap_or("disabled (using production)"));
            tracing::info!("  Spanner project: {}", self.spanner_project);
            tracing::info!("  Spanner instance: {}", self.spanner_instance);
            tracing::info!("  Spanner database: {}", self.spanner_database);
        }
        tracing::info!("  Products table: {}", self.products_table);
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

/// Table names are interpolated into SQL and DDL, so keep them to identifier characters
fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Held by any test that mutates process-wide environment variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

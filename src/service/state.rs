//! Service state management.
//!
//! Holds the shared catalog handle passed to every handler.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::catalog::{self, Catalog};
use crate::error::CatalogError;

/// Environment variable naming a JSON catalog file.
pub const CATALOG_PATH_ENV: &str = "BOOKING_CATALOG";

/// Shared service state.
#[derive(Debug, Clone)]
pub struct ServiceState {
    /// The showing catalog. Read-only apart from per-showing ledgers.
    pub catalog: Arc<Catalog>,
    started_at: DateTime<Utc>,
}

impl ServiceState {
    /// Create service state around a catalog handle.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            started_at: Utc::now(),
        }
    }

    /// Create service state from environment variables.
    ///
    /// Loads the file named by `BOOKING_CATALOG` and installs it as the
    /// process-wide catalog. Falls back to the built-in showings if unset.
    ///
    /// # Errors
    ///
    /// Any [`CatalogError`] from loading the file, or
    /// [`CatalogError::AlreadyInstalled`] if the process-wide catalog was
    /// already set.
    pub fn from_env() -> Result<Self, CatalogError> {
        let catalog = match std::env::var(CATALOG_PATH_ENV) {
            Ok(path) if !path.is_empty() => {
                let loaded = Catalog::from_path(&path)?;
                info!(path = %path, showings = loaded.len(), "Catalog loaded from file");
                catalog::install(loaded)?
            }
            _ => {
                info!("{} not set, using built-in showings", CATALOG_PATH_ENV);
                catalog::instance()
            }
        };
        Ok(Self::new(catalog))
    }

    /// When this state was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Seconds since this state was created.
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}

//! Configuration loading
//!
//! Loads introspection settings from environment variables, optionally
//! reading from a .env file first.

use crate::prelude::OrascopeError;
use std::{env, path::Path};
use tracing::{debug, error, trace, warn};

/// Largest accepted probe bound. The describe probe should never fetch more
/// than a handful of rows whatever the table size.
pub const MAX_PROBE_ROWS: u32 = 100;

const PROBE_ROWS_VAR: &str = "ORASCOPE_PROBE_ROWS";

/// Introspection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectConfig {
    probe_rows: u32,
}

impl Default for IntrospectConfig {
    fn default() -> Self {
        Self { probe_rows: 1 }
    }
}

impl IntrospectConfig {
    /// Load configuration from environment variables
    ///
    /// Expected variables:
    /// - ORASCOPE_PROBE_ROWS (default: 1, max: 100)
    pub fn from_env() -> Result<Self, OrascopeError> {
        debug!("Loading introspection configuration from environment");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OrascopeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let probe_rows = match lookup(PROBE_ROWS_VAR) {
            Some(raw) => parse_probe_rows(&raw)?,
            None => {
                trace!("{} not set, using default", PROBE_ROWS_VAR);
                Self::default().probe_rows
            }
        };

        debug!(probe_rows = ?probe_rows, "Configuration loaded");

        Ok(Self { probe_rows })
    }

    /// Load a .env file and then read configuration from environment
    pub fn load(env_file: &Path) -> Result<Self, OrascopeError> {
        if env_file.exists() {
            debug!(path = ?env_file, "Loading environment file");
            dotenvy::from_path(env_file).map_err(|e| {
                error!(path = ?env_file, error = ?e, "Failed to load environment file");
                OrascopeError::Config(format!("Failed to load {}: {}", env_file.display(), e))
            })?;
        } else {
            warn!(path = ?env_file, "Environment file not found, using existing environment");
        }

        Self::from_env()
    }

    /// Set the probe bound, clamped to [`MAX_PROBE_ROWS`]
    pub fn with_probe_rows(mut self, probe_rows: u32) -> Self {
        if probe_rows > MAX_PROBE_ROWS {
            warn!(value = ?probe_rows, max = ?MAX_PROBE_ROWS, "Probe bound clamped");
        }
        self.probe_rows = probe_rows.min(MAX_PROBE_ROWS);
        self
    }

    /// Upper bound on rows fetched by the describe probe
    pub fn probe_rows(&self) -> u32 {
        self.probe_rows
    }
}

fn parse_probe_rows(raw: &str) -> Result<u32, OrascopeError> {
    let rows = raw.trim().parse::<u32>().map_err(|e| {
        error!(value = ?raw, error = ?e, "Invalid {} value", PROBE_ROWS_VAR);
        OrascopeError::Config(format!("{} must be a non-negative integer", PROBE_ROWS_VAR))
    })?;

    if rows > MAX_PROBE_ROWS {
        error!(value = ?rows, max = ?MAX_PROBE_ROWS, "{} out of range", PROBE_ROWS_VAR);
        return Err(OrascopeError::Config(format!(
            "{} must be at most {}",
            PROBE_ROWS_VAR, MAX_PROBE_ROWS
        )));
    }

    Ok(rows)
}

//! Run configuration
//!
//! Settings come from a key lookup, normally CLI flags layered over
//! environment variables (a `.env` file is sourced before lookup).
//!
//! Keys:
//! - `DATASYNC_SERVER`: SQL Server host, optionally `host,port` or `host\instance` (required)
//! - `DATASYNC_DATABASE`: Database name (required)
//! - `DATASYNC_TABLE`: Table to clean, e.g. `dbo.Diwali` (required)
//! - `DATASYNC_CSV`: CSV file to load alongside the table (optional)
//! - `DATASYNC_DRIVER`: ODBC driver name (optional, defaults to `ODBC Driver 17 for SQL Server`)
//! - `DATASYNC_AUTH`: `trusted` or `sql` (optional, defaults to `trusted`)
//! - `DATASYNC_USERNAME` / `DATASYNC_PASSWORD`: Login for `sql` auth (optional)
//! - `DATASYNC_LOG_FILE`: Log destination (optional, defaults to `data_processing.log`)

use crate::client::{AuthType, ConnectionSettings, DbAuth};
use crate::table::TableName;
use eyre::{Context, Result, eyre};
use std::path::PathBuf;

pub const SERVER_VAR: &str = "DATASYNC_SERVER";
pub const DATABASE_VAR: &str = "DATASYNC_DATABASE";
pub const TABLE_VAR: &str = "DATASYNC_TABLE";
pub const CSV_VAR: &str = "DATASYNC_CSV";
pub const DRIVER_VAR: &str = "DATASYNC_DRIVER";
pub const AUTH_VAR: &str = "DATASYNC_AUTH";
pub const USERNAME_VAR: &str = "DATASYNC_USERNAME";
pub const PASSWORD_VAR: &str = "DATASYNC_PASSWORD";
pub const LOG_FILE_VAR: &str = "DATASYNC_LOG_FILE";

pub const DEFAULT_LOG_FILE: &str = "data_processing.log";

/// Everything one run needs
#[derive(Debug)]
pub struct SyncConfig {
    pub connection: ConnectionSettings,
    pub table: TableName,
    pub csv_path: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl SyncConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| eyre!("{} is not set", key));

        let server = required(SERVER_VAR)?;
        let database = required(DATABASE_VAR)?;
        let table_name = required(TABLE_VAR)?;
        let table = TableName::parse(&table_name)
            .with_context(|| format!("Invalid {}: {}", TABLE_VAR, table_name))?;

        let auth_type = match get(AUTH_VAR) {
            Some(value) => value
                .parse::<AuthType>()
                .map_err(|_| eyre!("Invalid {}: {} (expected trusted or sql)", AUTH_VAR, value))?,
            None => AuthType::Trusted,
        };
        let username = get(USERNAME_VAR);
        let password = get(PASSWORD_VAR);
        if auth_type == AuthType::Sql && (username.is_none() || password.is_none()) {
            eyre::bail!(
                "{}=sql requires {} and {}",
                AUTH_VAR,
                USERNAME_VAR,
                PASSWORD_VAR
            );
        }

        let mut connection = ConnectionSettings::new(server, database)
            .with_auth(DbAuth::new(&auth_type, username, password));
        if let Some(driver) = get(DRIVER_VAR) {
            connection = connection.with_driver(driver);
        }

        Ok(Self {
            connection,
            table,
            csv_path: get(CSV_VAR).map(PathBuf::from),
            log_file: get(LOG_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}

use clap::{Parser, builder::styling};
use datasync::client::AuthType;
use datasync::config::{self, SyncConfig};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::Path;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// datasync: fetch a SQL Server table, clean it, and write it back in place
#[derive(Parser)]
#[command(name = "datasync", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source settings from (skipped when missing)
    #[arg(short, long, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long)]
    debug: bool,

    /// SQL Server host [env: DATASYNC_SERVER]
    #[arg(short, long)]
    server: Option<String>,

    /// Database name [env: DATASYNC_DATABASE]
    #[arg(short, long)]
    database: Option<String>,

    /// Table to clean, e.g. dbo.Diwali [env: DATASYNC_TABLE]
    #[arg(short, long)]
    table: Option<String>,

    /// CSV file to load alongside the table [env: DATASYNC_CSV]
    #[arg(long)]
    csv: Option<String>,

    /// ODBC driver name [env: DATASYNC_DRIVER]
    #[arg(long)]
    driver: Option<String>,

    /// Authentication method [env: DATASYNC_AUTH]
    #[arg(long, value_enum)]
    auth: Option<AuthType>,

    /// Log file, appended to [env: DATASYNC_LOG_FILE]
    #[arg(long)]
    log_file: Option<String>,
}

impl Cli {
    /// Flag value for a config key, falling back to the environment
    fn lookup(&self, key: &str) -> Option<String> {
        let flag = match key {
            config::SERVER_VAR => self.server.clone(),
            config::DATABASE_VAR => self.database.clone(),
            config::TABLE_VAR => self.table.clone(),
            config::CSV_VAR => self.csv.clone(),
            config::DRIVER_VAR => self.driver.clone(),
            config::LOG_FILE_VAR => self.log_file.clone(),
            config::AUTH_VAR => self.auth.as_ref().map(|auth| match auth {
                AuthType::Trusted => "trusted".to_string(),
                AuthType::Sql => "sql".to_string(),
            }),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let config = SyncConfig::from_lookup(|key| cli.lookup(key))?;
    let _guard = datasync::logging::init(&config.log_file, cli.debug)?;

    log::info!(
        "datasync {}: {} on {}/{}",
        env!("CARGO_PKG_VERSION"),
        config.table,
        config.connection.server,
        config.connection.database
    );

    let summary = datasync::cli::run_sync(&config)?;

    if let Some((rows, columns)) = summary.csv_shape {
        println!(
            "{} CSV loaded: {} rows, {} columns",
            "✓".green(),
            rows,
            columns
        );
    }
    println!(
        "{} {} rows written to {}",
        "✓".green(),
        summary.rows_written.bright_white(),
        config.table.bright_black()
    );
    println!("  Log: {}", config.log_file.display().bright_black());

    Ok(())
}

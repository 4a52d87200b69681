//! Command-line interface for Exploreo.
//!
//! Subcommands work directly against the configured store:
//! - `serve` - Run the web server (the default when no command is given)
//! - `seed` - Insert the sample activity catalog
//! - `search` - Run an activity search and print the matches
//! - `config check` - Validate the configuration file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::{self, query::ActivityFilter, seeders};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "exploreo")]
#[command(author, version, about = "Seasonal travel activity planner", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "EXPLOREO_CONFIG", default_value = "exploreo.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// True when the server should run
    pub fn is_serve(&self) -> bool {
        matches!(self.command, None | Some(Commands::Serve))
    }
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web server
    Serve,

    /// Insert the sample activity catalog
    Seed {
        /// Seed alongside existing rows or replace them (default: only an empty table)
        #[arg(long, value_enum)]
        mode: Option<SeedModeArg>,
    },

    /// Search activities by location and month
    Search {
        /// Location text (case-insensitive substring)
        #[arg(default_value = "Bali")]
        location: String,
        /// Month name, e.g. "February"
        #[arg(default_value = "February")]
        month: String,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeedModeArg {
    Add,
    Replace,
}

impl From<SeedModeArg> for seeders::SeedMode {
    fn from(arg: SeedModeArg) -> Self {
        match arg {
            SeedModeArg::Add => seeders::SeedMode::Add,
            SeedModeArg::Replace => seeders::SeedMode::Replace,
        }
    }
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate and summarise the configuration file
    Check,
}

/// Run a non-serve CLI command
pub async fn run_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Seed { mode }) => {
            let mode = mode.map(seeders::SeedMode::from).unwrap_or_default();
            cmd_seed(&cli.config, mode).await
        }
        Some(Commands::Search { location, month }) => cmd_search(&cli.config, location, month).await,
        Some(Commands::Config(ConfigCommands::Check)) => cmd_config_check(&cli.config),
        // Serving is handled in main.rs
        Some(Commands::Serve) | None => Ok(()),
    }
}

async fn open_store(config_path: &Path) -> Result<db::DbPool> {
    let config = Config::load(config_path)?;
    db::init(&config.database)
        .await
        .context("Failed to open the activity store")
}

async fn cmd_seed(config_path: &Path, mode: seeders::SeedMode) -> Result<()> {
    let pool = open_store(config_path).await?;
    let report = seeders::seed_activities(&pool, mode).await?;

    if mode == seeders::SeedMode::IfEmpty && report.inserted == 0 {
        println!(
            "[!!] The store already holds {} activities; nothing inserted.",
            report.existing
        );
        println!("Use --mode add to append the samples or --mode replace to start over.");
    } else {
        if report.deleted > 0 {
            println!("Removed {} existing activities", report.deleted);
        }
        println!("[OK] Inserted {} sample activities", report.inserted);
    }

    pool.close().await;
    Ok(())
}

async fn cmd_search(config_path: &Path, location: &str, month: &str) -> Result<()> {
    let pool = open_store(config_path).await?;
    let filter = ActivityFilter::new(Some(location), Some(month));
    let activities = db::activities::search(&pool, &filter).await?;

    println!(
        "Activities in {} during {}: {}",
        filter.location().unwrap_or("All"),
        filter.month().unwrap_or("All"),
        activities.len()
    );
    println!();

    if activities.is_empty() {
        println!("No activities found.");
    } else {
        println!("{:<32} {:<22} {:<14} {:>8}", "NAME", "LOCATION", "CATEGORY", "PRICE");
        println!("{}", "-".repeat(79));
        for activity in &activities {
            println!(
                "{:<32} {:<22} {:<14} {:>8}",
                truncate(&activity.name, 32),
                truncate(&activity.location, 22),
                truncate(&activity.category, 14),
                activity.price_display()
            );
        }
    }

    pool.close().await;
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn cmd_config_check(config_path: &Path) -> Result<()> {
    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("A default configuration will be used when starting the server.");
        println!("To create a custom configuration, copy exploreo.example.toml to exploreo.toml");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("Server:");
            println!("  Host:         {}", config.server.host);
            println!("  Port:         {}", config.server.port);
            println!("  Static Dir:   {}", config.server.static_dir.display());
            println!();
            println!("Database:");
            println!("  URL:          {}", config.database.url);
            println!("  Connections:  {}", config.database.max_connections);
            println!("  Timeout:      {}s", config.database.acquire_timeout_secs);
            println!();
            println!("Auth:");
            println!("  Session TTL:  {}h", config.auth.session_ttl_hours);
            println!(
                "  Secure Cookies: {}",
                if config.auth.secure_cookies {
                    "Enabled"
                } else {
                    "Disabled"
                }
            );
            println!(
                "  Admin Account: {}",
                config.auth.admin_email.as_deref().unwrap_or("Not configured")
            );
            println!();
            println!("Logging:");
            println!("  Level:        {}", config.logging.level);
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {:#}", e);
            anyhow::bail!("Configuration validation failed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_serves() {
        let cli = Cli::try_parse_from(["exploreo"]).unwrap();
        assert!(cli.is_serve());
        assert_eq!(cli.config, PathBuf::from("exploreo.toml"));
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["exploreo", "search"]).unwrap();
        match cli.command {
            Some(Commands::Search { location, month }) => {
                assert_eq!(location, "Bali");
                assert_eq!(month, "February");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!Cli::try_parse_from(["exploreo", "search"]).unwrap().is_serve());
    }

    #[test]
    fn test_seed_mode() {
        let cli = Cli::try_parse_from(["exploreo", "seed", "--mode", "replace"]).unwrap();
        match cli.command {
            Some(Commands::Seed { mode }) => {
                assert_eq!(mode, Some(SeedModeArg::Replace));
                assert_eq!(
                    seeders::SeedMode::from(SeedModeArg::Replace),
                    seeders::SeedMode::Replace
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["exploreo", "seed", "--mode", "merge"]).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Tegallalang Rice Terrace Trek", 12), "Tegallala...");
    }
}

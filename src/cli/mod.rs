//! CLI module - Command-line interface for the horoscope service
//!
//! This module provides a structured CLI using clap for argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::Period;

/// Horoscope API - daily, weekly and monthly readings per zodiac sign
#[derive(Parser)]
#[command(name = "horoscope-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file; otherwise the default locations are searched
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server and the cache purge scheduler (default)
    #[command(alias = "web")]
    Serve,

    /// Look up one reading through the cache and print it as JSON
    #[command(alias = "get")]
    Fetch {
        /// daily, weekly or monthly
        period: Period,
        /// Zodiac sign name
        sign: String,
        /// Day for daily readings: TODAY, TOMORROW, YESTERDAY or YYYY-MM-DD
        #[arg(long, default_value = "TODAY")]
        day: String,
    },

    /// Remove cached readings older than their retention window
    Purge,

    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::parse_from(["horoscope-api", "fetch", "weekly", "leo"]);
        match cli.command {
            Some(Commands::Fetch { period, sign, day }) => {
                assert_eq!(period, Period::Weekly);
                assert_eq!(sign, "leo");
                assert_eq!(day, "TODAY");
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_default_is_none() {
        let cli = Cli::parse_from(["horoscope-api", "--config", "x.toml"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}

//! MBO CLI Library
//!
//! Batch-uploads MISP objects described in delimited (CSV) files to a MISP
//! event.
//!
//! # Overview
//!
//! One invocation is one linear pipeline:
//!
//! - **Record loading**: CSV rows become [`records::ObjectRecord`]s
//! - **Template fetch**: object templates are listed from MISP and indexed
//!   by name once ([`api::TemplateIndex`])
//! - **Event resolution**: target an existing event (`-e`) or create a new
//!   one (`-i`)
//! - **Submission**: per record, attributes are generated from a local
//!   object definition and the object is posted to the event
//!
//! `--dryrun` runs the same pipeline but prints built objects instead of
//! calling the submission endpoint. Every failure is fatal; nothing is
//! retried and already-submitted objects are not rolled back.

pub mod api;
pub mod commands;
pub mod config;
pub mod definitions;
pub mod error;
pub mod object;
pub mod records;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// MBO - upload a CSV of objects to a MISP event
///
/// Long flag names match the original tool verbatim (underscores included)
/// so existing wrapper scripts keep working.
#[derive(Parser, Debug)]
#[command(name = "mbo")]
#[command(author, version, about = "Upload a CSV of OBJECTS to a MISP EVENT")]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["event", "info"])
))]
pub struct Cli {
    /// MISP URL (overrides the config file)
    #[arg(long = "misp_url", value_name = "URL")]
    pub misp_url: Option<String>,

    /// MISP API key (overrides the config file)
    #[arg(long = "misp_key", value_name = "API_KEY")]
    pub misp_key: Option<String>,

    /// Validate the MISP SSL certificate (overrides the config file)
    #[arg(long = "misp_validate_cert", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub misp_validate_cert: Option<bool>,

    /// Directory with custom object definitions (misp-objects layout)
    #[arg(long = "custom_objects", value_name = "DIR")]
    pub custom_objects_path: Option<PathBuf>,

    /// CSV delimiter
    #[arg(long, value_name = "CHAR")]
    pub delim: Option<char>,

    /// CSV quote character
    #[arg(long, value_name = "CHAR")]
    pub quotechar: Option<char>,

    /// Fail on rows whose field count differs from the header
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub strictcsv: Option<bool>,

    /// Print built objects instead of sending them to MISP
    #[arg(long)]
    pub dryrun: bool,

    /// Print debug information to stderr (also enabled by the DEBUG env var)
    #[arg(short, long)]
    pub verbose: bool,

    /// Existing event to add the objects to
    #[arg(short, long, value_name = "ID|UUID")]
    pub event: Option<String>,

    /// Info field (title) for a new event to create
    #[arg(short, long, value_name = "TITLE")]
    pub info: Option<String>,

    /// Event distribution level, new events only (overrides the config file)
    #[arg(
        long = "dist",
        visible_alias = "distribution",
        value_name = "0-4",
        value_parser = clap::value_parser!(u8).range(0..=4)
    )]
    pub distribution: Option<u8>,

    /// CSV file(s) to create the objects from
    #[arg(short = 'c', long = "csv", value_name = "PATH", required = true, num_args = 1..)]
    pub csv: Vec<PathBuf>,

    /// Config file location
    #[arg(long, value_name = "PATH", default_value = "config.toml")]
    pub config: PathBuf,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_and_info_are_mutually_exclusive() {
        let result =
            Cli::try_parse_from(["mbo", "-e", "42", "-i", "title", "-c", "objects.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_event_or_info_is_required() {
        let result = Cli::try_parse_from(["mbo", "-c", "objects.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_csv_is_required() {
        let result = Cli::try_parse_from(["mbo", "-e", "42"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_multiple_csv_paths() {
        let cli = Cli::try_parse_from(["mbo", "-e", "42", "-c", "a.csv", "b.csv"]).unwrap();
        assert_eq!(cli.csv, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
    }

    #[test]
    fn test_distribution_range() {
        assert!(Cli::try_parse_from(["mbo", "-i", "t", "-c", "a.csv", "--dist", "4"]).is_ok());
        assert!(Cli::try_parse_from(["mbo", "-i", "t", "-c", "a.csv", "--dist", "5"]).is_err());
        // --distribution is an alias for --dist
        let cli =
            Cli::try_parse_from(["mbo", "-i", "t", "-c", "a.csv", "--distribution", "2"]).unwrap();
        assert_eq!(cli.distribution, Some(2));
    }

    #[test]
    fn test_overridable_flags_default_to_none() {
        let cli = Cli::try_parse_from(["mbo", "-e", "42", "-c", "a.csv"]).unwrap();
        assert!(cli.misp_validate_cert.is_none());
        assert!(cli.strictcsv.is_none());

        let cli = Cli::try_parse_from([
            "mbo",
            "-e",
            "42",
            "-c",
            "a.csv",
            "--misp_validate_cert",
            "--strictcsv",
        ])
        .unwrap();
        assert_eq!(cli.misp_validate_cert, Some(true));
        assert_eq!(cli.strictcsv, Some(true));
    }
}

//! Configuration for the MBO CLI
//!
//! Values come from two places with a fixed precedence: command-line flags
//! beat the TOML config file, and the file beats built-in defaults. The file
//! has a `[misp]` section (endpoint, key, certificate validation, custom
//! object definitions, default distribution) and a `[csv_reader]` section
//! (delimiter, quote character, strict parsing).

use crate::error::{CliError, Result};
use crate::Cli;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default delimiter when neither flag nor config file set one.
pub const DEFAULT_DELIMITER: char = ',';

/// Default quote character when neither flag nor config file set one.
pub const DEFAULT_QUOTE: char = '"';

/// Raw config file contents (`config.toml`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub misp: MispSection,

    #[serde(default)]
    pub csv_reader: CsvReaderSection,
}

/// `[misp]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MispSection {
    pub url: Option<String>,
    pub key: Option<String>,
    pub validate_cert: Option<bool>,
    pub custom_objects_path: Option<PathBuf>,
    pub default_distribution: Option<u8>,
}

/// `[csv_reader]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsvReaderSection {
    pub delimiter: Option<char>,
    pub quote_character: Option<char>,
    pub strict_csv_parsing: Option<bool>,
}

impl FileConfig {
    /// Load the config file if it exists; a missing file is fine (flags may
    /// carry everything), a file that fails to parse is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            CliError::config(format!("failed to parse '{}': {}", path.display(), e))
        })
    }
}

/// Fully-resolved settings after merging flags over the file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub misp_url: String,
    pub misp_key: String,
    pub validate_cert: bool,
    pub custom_objects_path: Option<PathBuf>,
    pub default_distribution: Option<u8>,
    pub delimiter: u8,
    pub quote: u8,
    pub strict_csv: bool,
}

impl Settings {
    /// Merge CLI flags over file values and validate the result.
    pub fn resolve(cli: &Cli, file: &FileConfig) -> Result<Self> {
        let misp_url = cli
            .misp_url
            .clone()
            .or_else(|| file.misp.url.clone())
            .ok_or_else(|| CliError::config("MISP URL is not set (--misp_url or [misp] url)"))?;

        let misp_key = cli
            .misp_key
            .clone()
            .or_else(|| file.misp.key.clone())
            .ok_or_else(|| CliError::config("MISP API key is not set (--misp_key or [misp] key)"))?;

        let delimiter = cli
            .delim
            .or(file.csv_reader.delimiter)
            .unwrap_or(DEFAULT_DELIMITER);
        let quote = cli
            .quotechar
            .or(file.csv_reader.quote_character)
            .unwrap_or(DEFAULT_QUOTE);

        Ok(Self {
            misp_url,
            misp_key,
            validate_cert: cli
                .misp_validate_cert
                .or(file.misp.validate_cert)
                .unwrap_or(true),
            custom_objects_path: cli
                .custom_objects_path
                .clone()
                .or_else(|| file.misp.custom_objects_path.clone()),
            default_distribution: cli.distribution.or(file.misp.default_distribution),
            delimiter: ascii_byte(delimiter, "delimiter")?,
            quote: ascii_byte(quote, "quote character")?,
            strict_csv: cli
                .strictcsv
                .or(file.csv_reader.strict_csv_parsing)
                .unwrap_or(false),
        })
    }
}

/// The csv reader works on bytes, so separators must be single ASCII chars.
fn ascii_byte(c: char, what: &str) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(CliError::config(format!(
            "{} '{}' is not an ASCII character",
            what, c
        )))
    }
}

//! Error types for the MBO CLI
//!
//! Every fatal condition in the upload pipeline has its own variant with a
//! message that tells the operator what to check. All of them terminate the
//! run with exit code 1; nothing is retried in-process.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Comprehensive error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file is missing a required value or failed to parse
    #[error("Configuration error: {0}. Check your config file or pass the value on the command line.")]
    Config(String),

    /// Input file does not exist
    #[error("File not found: '{0}'. Verify the path exists and you have read permissions.")]
    FileNotFound(String),

    /// A row's field count did not match the header (strict mode only)
    #[error("Malformed row in '{file}' at line {line}: {detail}. Fix the file or drop --strictcsv to parse leniently.")]
    MalformedRow {
        file: String,
        line: u64,
        detail: String,
    },

    /// Object template listing from MISP failed or had an unexpected shape
    #[error("Could not fetch object templates from MISP: {0}. Check the server URL and API key.")]
    TemplateFetch(String),

    /// Event creation was rejected by MISP
    #[error("Error creating the new event: {0}")]
    ContainerCreation(String),

    /// A record's fields could not be mapped to attributes for its object kind
    #[error("Error generating attributes for object '{kind}': {detail}. Custom objects usually need --custom_objects pointing at their definitions.")]
    AttributeGeneration { kind: String, detail: String },

    /// Record names an object kind with no matching remote template
    #[error("Template for type '{kind}' not found! Valid types are: {valid}")]
    UnknownTemplate { kind: String, valid: String },

    /// MISP rejected an object submission
    #[error("Error in MISP response: {0}. Objects submitted before this one are NOT rolled back.")]
    Submission(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your connection and the MISP URL.")]
    Http(#[from] reqwest::Error),

    /// Delimited-input parsing failed
    #[error("Failed to parse delimited input: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a template fetch error
    pub fn template_fetch(msg: impl Into<String>) -> Self {
        Self::TemplateFetch(msg.into())
    }

    /// Create a container creation error
    pub fn container_creation(msg: impl Into<String>) -> Self {
        Self::ContainerCreation(msg.into())
    }

    /// Create an attribute generation error
    pub fn attribute_generation(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::AttributeGeneration {
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    /// Create an unknown template error listing every valid template name
    pub fn unknown_template(kind: impl Into<String>, valid_names: &[String]) -> Self {
        Self::UnknownTemplate {
            kind: kind.into(),
            valid: valid_names.join(", "),
        }
    }

    /// Create a submission error
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }
}

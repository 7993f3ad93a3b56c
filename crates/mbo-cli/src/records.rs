//! Record loading from delimited input files
//!
//! Turns one or more CSV files into an ordered sequence of [`ObjectRecord`]s.
//! Each row describes one MISP object: the `object` column names the template
//! kind, `distribution` and `comment` are per-object overrides, and every
//! other non-empty column contributes one (name, value) field.
//!
//! Multiple columns can feed the same field name by suffixing the header with
//! `__<anything>` (e.g. `ip__1`, `ip__2` both produce `ip`). That convention
//! is load-bearing for existing spreadsheets, so it lives in exactly one
//! function: [`field_base_name`].

use crate::error::{CliError, Result};
use std::path::Path;

/// Reserved column: names the object template kind.
const KIND_COLUMN: &str = "object";
/// Reserved column: per-object distribution override.
const DISTRIBUTION_COLUMN: &str = "distribution";
/// Reserved column: per-object comment.
const COMMENT_COLUMN: &str = "comment";

/// One row group from the input, representing one object to submit.
///
/// Immutable once built; `distribution` and `comment` are applied to the
/// generated object right before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Lower-cased template name this record should match
    pub kind: String,

    /// Override for the distribution level of this object
    pub distribution: Option<String>,

    /// Free-text annotation
    pub comment: Option<String>,

    /// Ordered (name, value) pairs, one per non-empty data column.
    /// Duplicate names are kept, not merged.
    pub fields: Vec<(String, String)>,
}

/// Strip the `__` disambiguation suffix from a column header and lower-case it.
///
/// `ip__1` -> `ip`, `Name__dst` -> `name`, `sha256` -> `sha256`.
pub fn field_base_name(header: &str) -> String {
    header
        .split("__")
        .next()
        .unwrap_or(header)
        .to_lowercase()
}

/// Load object records from one or more delimited files.
///
/// Files are processed in argument order and rows in file order; the result
/// is a plain concatenation, never an interleaving. Any failure aborts the
/// whole run with no partial result.
///
/// In `strict` mode a row whose field count differs from the header fails
/// with [`CliError::MalformedRow`]; otherwise extra cells are ignored and
/// missing cells are treated as absent.
pub fn load_records(
    paths: &[impl AsRef<Path>],
    delimiter: u8,
    quote: u8,
    strict: bool,
) -> Result<Vec<ObjectRecord>> {
    let mut records = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }

        load_file(path, delimiter, quote, strict, &mut records)?;
    }

    Ok(records)
}

fn load_file(
    path: &Path,
    delimiter: u8,
    quote: u8,
    strict: bool,
    out: &mut Vec<ObjectRecord>,
) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .flexible(!strict)
        .from_path(path)?;

    let headers = reader.headers()?.clone();

    let kind_idx = headers.iter().position(|h| h == KIND_COLUMN);
    let dist_idx = headers.iter().position(|h| h == DISTRIBUTION_COLUMN);
    let comment_idx = headers.iter().position(|h| h == COMMENT_COLUMN);

    // No `object` column means no row in this file can produce a record.
    let Some(kind_idx) = kind_idx else {
        tracing::warn!(file = %path.display(), "Input has no 'object' column, skipping file");
        return Ok(());
    };

    for row in reader.records() {
        let row = row.map_err(|e| malformed_or_csv(e, path))?;

        let kind = row.get(kind_idx).unwrap_or("");
        if kind.is_empty() || kind.starts_with('#') {
            continue;
        }

        let mut fields = Vec::new();
        for (i, header) in headers.iter().enumerate() {
            if i == kind_idx || Some(i) == dist_idx || Some(i) == comment_idx {
                continue;
            }
            // Lenient mode: a short row simply has no cell here.
            let value = row.get(i).unwrap_or("");
            if !value.is_empty() {
                fields.push((field_base_name(header), value.to_string()));
            }
        }

        out.push(ObjectRecord {
            kind: kind.to_lowercase(),
            distribution: dist_idx
                .and_then(|i| row.get(i))
                .filter(|v| !v.is_empty())
                .map(String::from),
            comment: comment_idx
                .and_then(|i| row.get(i))
                .filter(|v| !v.is_empty())
                .map(String::from),
            fields,
        });
    }

    Ok(())
}

/// Map a csv error to [`CliError::MalformedRow`] when it is a strict-mode
/// field-count mismatch, passing everything else through as a parse error.
fn malformed_or_csv(err: csv::Error, path: &Path) -> CliError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return CliError::MalformedRow {
            file: path.display().to_string(),
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            detail: format!("expected {} fields, got {}", expected_len, len),
        };
    }

    CliError::Csv(err)
}

//! Error types for dataset ingestion and export.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing tabular datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The CSV layer failed (I/O, encoding, or record framing).
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// A column the schema requires is absent from the header row.
    #[error("column `{column}` is missing from {path}")]
    MissingColumn {
        /// The header name the schema asked for.
        column: String,
        /// The file whose header was inspected.
        path: Utf8PathBuf,
    },
    /// A row could not be converted into a point or rating.
    ///
    /// Rows are rejected rather than coerced: a defaulted location would
    /// corrupt every downstream density count for that business.
    #[error("row {line} of {path}: column `{column}` holds `{value}`, expected a number")]
    MalformedRow {
        /// 1-based line number in the source file.
        line: u64,
        /// The offending column.
        column: String,
        /// The cell content as read.
        value: String,
        /// The file the row came from.
        path: Utf8PathBuf,
    },
    /// Creating or writing the output file failed.
    #[error("failed to write {path}: {source}")]
    WriteOutput {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

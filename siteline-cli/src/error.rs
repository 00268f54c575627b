//! Error types emitted by the Siteline CLI.

use camino::Utf8PathBuf;
use thiserror::Error;

use siteline_core::EnrichError;
use siteline_data::DatasetError;

/// Errors emitted by the Siteline CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Reading an input table or writing the output table failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The enrichment pipeline rejected the data.
    #[error(transparent)]
    Enrich(#[from] EnrichError),
    /// Creating the JSON output file failed.
    #[error("failed to create {path}: {source}")]
    CreateOutput {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Serializing the enriched records to JSON failed.
    #[error("failed to serialize enriched output: {0}")]
    SerializeJson(#[source] serde_json::Error),
}

//! Ingestion error types and the messages shown to dashboard users.

use s1s2_core::CoreError;
use thiserror::Error;

/// Shown when the upload's extension is not a supported spreadsheet format.
pub const UNSUPPORTED_MESSAGE: &str = "This file type is not supported.";

/// Shown for every other ingestion failure.
pub const PROCESSING_ERROR_MESSAGE: &str = "There was an error processing this file.";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file type: {filename}")]
    UnsupportedFileType { filename: String },

    #[error("file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unreadable workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no sheets")]
    MissingSheet,

    #[error("file has no header row")]
    MissingHeader,

    #[error("missing required column '{column}' (found: {})", .found.join(", "))]
    MissingColumn {
        column: &'static str,
        found: Vec<String>,
    },

    #[error(transparent)]
    Dataset(#[from] CoreError),

    #[error("{count} label(s) outside the impact mapping, first: '{first}' for {risk}")]
    UnknownLabels {
        count: usize,
        first: String,
        risk: String,
    },
}

impl IngestError {
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFileType { .. })
    }

    /// The message the dashboard shows in place of the table.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        if self.is_unsupported() {
            UNSUPPORTED_MESSAGE
        } else {
            PROCESSING_ERROR_MESSAGE
        }
    }
}

//! # s1s2-ingest
//!
//! Turns an uploaded spreadsheet into a [`Dataset`].
//!
//! The format is picked from the filename: `.csv` is read as UTF-8 text,
//! any extension containing `xls` is read as a workbook (first sheet). Columns
//! are located by header name. Labels are kept verbatim; they are checked
//! against the impact mapping only when [`IngestOptions::strict_labels`] is
//! set.
//!
//! Every failure is an [`IngestError`] whose
//! [`user_message`](IngestError::user_message) is safe to show on the page.

mod columns;
mod delimited;
mod error;
mod format;
mod workbook;

pub use columns::ColumnMap;
pub use error::{IngestError, PROCESSING_ERROR_MESSAGE, UNSUPPORTED_MESSAGE};
pub use format::FileFormat;

use s1s2_core::Dataset;

#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Fail on labels outside the impact mapping.
    pub strict_labels: bool,
}

/// Parse an uploaded file into a dataset.
///
/// # Errors
///
/// Returns `IngestError::UnsupportedFileType` for unrecognized extensions and
/// another `IngestError` variant for any parse or validation failure.
pub fn ingest(
    bytes: &[u8],
    filename: &str,
    options: IngestOptions,
) -> Result<Dataset, IngestError> {
    let format = FileFormat::detect(filename).ok_or_else(|| IngestError::UnsupportedFileType {
        filename: filename.to_string(),
    })?;

    let rows = match format {
        FileFormat::Csv => delimited::parse(bytes)?,
        FileFormat::Workbook => workbook::parse(bytes)?,
    };
    let dataset = Dataset::new(rows)?;

    if options.strict_labels {
        let unknown = dataset.unknown_labels();
        if let Some(first) = unknown.first() {
            return Err(IngestError::UnknownLabels {
                count: unknown.len(),
                first: first.label.clone(),
                risk: first.risk_name.clone(),
            });
        }
    }

    tracing::debug!(filename, ?format, rows = dataset.len(), "ingested upload");
    Ok(dataset)
}

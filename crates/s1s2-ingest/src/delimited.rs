//! CSV reader.

use csv::{ReaderBuilder, Trim};
use s1s2_core::RiskRow;

use crate::columns::ColumnMap;
use crate::error::IngestError;

/// Parse UTF-8 CSV text with a header row into rows, in file order.
///
/// Headers are trimmed; cell values are kept as written. A record with a
/// different field count from the header is an error.
///
/// # Errors
///
/// Returns `IngestError::Encoding`, `IngestError::Csv`, or
/// `IngestError::MissingColumn`.
pub fn parse(bytes: &[u8]) -> Result<Vec<RiskRow>, IngestError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let columns = ColumnMap::resolve(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(columns.row(|index| record.get(index)));
    }
    Ok(rows)
}

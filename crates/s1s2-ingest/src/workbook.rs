//! Excel-family workbook reader (first sheet only).

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use s1s2_core::RiskRow;

use crate::columns::ColumnMap;
use crate::error::IngestError;

/// Parse the first sheet of a workbook. The first non-blank row is the
/// header row; fully blank rows are skipped.
///
/// # Errors
///
/// Returns `IngestError::Workbook` for unreadable bytes,
/// `IngestError::MissingSheet`, `IngestError::MissingHeader`, or
/// `IngestError::MissingColumn`.
pub fn parse(bytes: &[u8]) -> Result<Vec<RiskRow>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::MissingSheet)??;

    let mut records = range
        .rows()
        .map(|cells| cells.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|cell| !cell.trim().is_empty()));

    let headers = records.next().ok_or(IngestError::MissingHeader)?;
    let columns = ColumnMap::resolve(&headers)?;

    Ok(records
        .map(|cells| columns.row(|index| cells.get(index).map(String::as_str)))
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn corrupt_bytes_are_a_workbook_error() {
        let err = parse(b"definitely not a zip or ole2 container").expect_err("corrupt");
        assert!(matches!(err, IngestError::Workbook(_)));
    }

    #[test]
    fn skips_blank_rows_and_reads_first_sheet_only() {
        let rows = parse(include_bytes!("../tests/fixtures/risks.xlsx")).expect("valid workbook");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], RiskRow::new("Fraud", "low", "medium"));
        assert_eq!(rows[2].risk_name, "2024");
        assert!(rows.iter().all(|row| row.risk_name != "Notes sheet risk"));
    }

    #[test]
    fn numeric_cells_render_as_text() {
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("中高".into())), "中高");
    }
}

//! End-to-end ingestion of uploaded bytes, as the dashboard sees them.

use pretty_assertions::assert_eq;
use rstest::rstest;
use s1s2_core::{ControlKind, ControlState, TablePage};
use s1s2_ingest::{
    IngestError, IngestOptions, PROCESSING_ERROR_MESSAGE, UNSUPPORTED_MESSAGE, ingest,
};

const SAMPLE_CSV: &str = "\
risk,esg_impact,financial_impact
Supply chain disruption,high,medium-high
Carbon pricing,medium,high
Data breach,low,medium
";

fn many_rows(n: usize) -> String {
    let mut csv = String::from("risk,esg,financial\n");
    for i in 1..=n {
        csv.push_str(&format!("Risk {i},medium,low\n"));
    }
    csv
}

#[test]
fn valid_csv_preserves_row_count_and_order() {
    let dataset = ingest(SAMPLE_CSV.as_bytes(), "risks.csv", IngestOptions::default())
        .expect("valid upload");

    assert_eq!(
        dataset.names(),
        vec!["Supply chain disruption", "Carbon pricing", "Data breach"]
    );
    assert_eq!(dataset.rows()[1].financial_label, "high");
}

#[rstest]
#[case(3)]
#[case(10)]
#[case(27)]
fn first_table_page_shows_at_most_ten(#[case] n: usize) {
    let dataset = ingest(many_rows(n).as_bytes(), "bulk.csv", IngestOptions::default())
        .expect("valid upload");
    assert_eq!(dataset.len(), n);
    assert_eq!(TablePage::paginate(dataset.rows(), 0).rows.len(), n.min(10));
}

#[test]
fn chinese_worksheet_is_accepted() {
    let csv = "風險,對於企業ESG面的衝擊,對於企業財務面衝擊\nRisk 1,中高,低\nRisk 2,高,中\n";
    let dataset = ingest(csv.as_bytes(), "s1s2.csv", IngestOptions::default())
        .expect("valid upload");
    let controls = ControlState::seed(&dataset);
    assert_eq!(controls.axis_scores(ControlKind::Esg), vec![3, 4]);
    assert_eq!(controls.axis_scores(ControlKind::Financial), vec![1, 2]);
}

#[rstest]
#[case("notes.txt")]
#[case("risks.json")]
#[case("risks")]
fn unsupported_extension_reports_unsupported_type(#[case] filename: &str) {
    let err = ingest(SAMPLE_CSV.as_bytes(), filename, IngestOptions::default())
        .expect_err("unsupported");
    assert!(err.is_unsupported());
    assert_eq!(err.user_message(), UNSUPPORTED_MESSAGE);
}

#[test]
fn missing_column_reports_generic_error() {
    let csv = "risk,esg_impact\nFlood,high\n";
    let err = ingest(csv.as_bytes(), "risks.csv", IngestOptions::default())
        .expect_err("financial column missing");
    assert!(matches!(err, IngestError::MissingColumn { column: "financial_impact", .. }));
    assert_eq!(err.user_message(), PROCESSING_ERROR_MESSAGE);
}

/// First sheet "Risks": a blank leading row, Chinese headers plus an extra
/// notes column, a blank row between records, and a numeric risk name.
/// Second sheet "Notes" holds a row that must never be read.
const WORKBOOK: &[u8] = include_bytes!("fixtures/risks.xlsx");

#[rstest]
#[case("risks.xlsx")]
#[case("RISKS.XLSX")]
fn workbook_first_sheet_is_ingested_in_order(#[case] filename: &str) {
    let dataset = ingest(WORKBOOK, filename, IngestOptions::default()).expect("valid workbook");

    assert_eq!(dataset.names(), vec!["Flood", "Fraud", "2024"]);
    assert_eq!(dataset.rows()[0].esg_label, "高");
    assert_eq!(dataset.rows()[0].financial_label, "中高");
    assert!(dataset.unknown_labels().is_empty());

    let controls = ControlState::seed(&dataset);
    assert_eq!(controls.axis_scores(ControlKind::Esg), vec![4, 1, 2]);
    assert_eq!(controls.axis_scores(ControlKind::Financial), vec![3, 2, 1]);
}

#[test]
fn workbook_bytes_under_csv_name_are_not_csv() {
    let err = ingest(WORKBOOK, "risks.csv", IngestOptions::default())
        .expect_err("zip bytes are not utf-8 csv");
    assert_eq!(err.user_message(), PROCESSING_ERROR_MESSAGE);
}

#[test]
fn corrupt_workbook_reports_generic_error() {
    let err = ingest(b"PK\x03\x04garbage", "risks.xlsx", IngestOptions::default())
        .expect_err("corrupt workbook");
    assert!(!err.is_unsupported());
    assert_eq!(err.user_message(), PROCESSING_ERROR_MESSAGE);
}

#[test]
fn duplicate_risk_names_report_generic_error() {
    let csv = "risk,esg,financial\nFlood,low,low\nFlood,high,high\n";
    let err = ingest(csv.as_bytes(), "risks.csv", IngestOptions::default())
        .expect_err("duplicate names");
    assert!(matches!(err, IngestError::Dataset(_)));
    assert_eq!(err.user_message(), PROCESSING_ERROR_MESSAGE);
}

#[test]
fn unknown_labels_are_kept_verbatim_by_default() {
    let csv = "risk,esg,financial\nFlood,catastrophic,low\n";
    let dataset = ingest(csv.as_bytes(), "risks.csv", IngestOptions::default())
        .expect("lenient upload");
    assert_eq!(dataset.rows()[0].esg_label, "catastrophic");
    assert_eq!(dataset.unknown_labels().len(), 1);
    assert_eq!(
        ControlState::seed(&dataset).axis_scores(ControlKind::Esg),
        vec![1]
    );
}

#[test]
fn strict_labels_rejects_unknown_labels() {
    let csv = "risk,esg,financial\nFlood,catastrophic,low\n";
    let err = ingest(
        csv.as_bytes(),
        "risks.csv",
        IngestOptions {
            strict_labels: true,
        },
    )
    .expect_err("strict upload");
    match &err {
        IngestError::UnknownLabels { count, first, risk } => {
            assert_eq!(*count, 1);
            assert_eq!(first, "catastrophic");
            assert_eq!(risk, "Flood");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.user_message(), PROCESSING_ERROR_MESSAGE);
}

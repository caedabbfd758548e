use std::path::Path;

use anyhow::Context;
use s1s2_config::S1s2Config;
use s1s2_core::{ControlState, Dataset, MatrixFigure, TablePage, UnknownLabel};
use s1s2_ingest::IngestOptions;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RenderArgs;
use crate::output::{self, TableView};
use crate::view;

/// Everything the dashboard would show for one file, minus the controls.
#[derive(Debug, Serialize)]
pub struct RenderReport {
    pub source: String,
    pub table: TablePage,
    pub figure: MatrixFigure,
    pub unknown_labels: Vec<UnknownLabel>,
}

impl TableView for RenderReport {
    const HEADERS: &'static [&'static str] = &["#", "risk", "esg", "financial", "y", "x"];

    fn table_rows(&self) -> Vec<Vec<String>> {
        self.table
            .rows
            .iter()
            .enumerate()
            .map(|(offset, row)| {
                vec![
                    (self.table.first_row + offset + 1).to_string(),
                    row.risk_name.clone(),
                    row.esg_label.clone(),
                    row.financial_label.clone(),
                    row.esg_score().level().to_score().to_string(),
                    row.financial_score().level().to_score().to_string(),
                ]
            })
            .collect()
    }
}

/// Handle `s1s2 render`.
pub fn handle(args: &RenderArgs, config: &S1s2Config, flags: &GlobalFlags) -> anyhow::Result<()> {
    let options = IngestOptions {
        strict_labels: config.ingest.strict_labels,
    };
    let report = build_report(args, options)?;

    if let Some(path) = &args.svg {
        std::fs::write(path, view::svg::render(&report.figure))
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote matrix svg");
    }

    output::output(&report, flags.format)
}

fn build_report(args: &RenderArgs, options: IngestOptions) -> anyhow::Result<RenderReport> {
    let (source, dataset) = match &args.file {
        Some(path) => (path.display().to_string(), load(path, options)?),
        None => ("sample".to_string(), Dataset::default()),
    };

    let unknown_labels = dataset.unknown_labels();
    for unknown in &unknown_labels {
        tracing::warn!(
            risk = %unknown.risk_name,
            column = %unknown.column,
            label = %unknown.label,
            "unrecognized impact label scored as low"
        );
    }

    let controls = ControlState::seed(&dataset);
    let figure = MatrixFigure::from_controls(&dataset.names(), &controls)?;
    let table = TablePage::paginate(dataset.rows(), args.page);

    Ok(RenderReport {
        source,
        table,
        figure,
        unknown_labels,
    })
}

fn load(path: &Path, options: IngestOptions) -> anyhow::Result<Dataset> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    s1s2_ingest::ingest(&bytes, &filename, options)
        .map_err(|error| anyhow::anyhow!("{} ({error})", error.user_message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn args(file: Option<PathBuf>, page: usize) -> RenderArgs {
        RenderArgs {
            file,
            page,
            svg: None,
            strict_labels: false,
        }
    }

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn sample_dataset_without_file() {
        let report = build_report(&args(None, 0), IngestOptions::default()).expect("report");
        assert_eq!(report.source, "sample");
        assert_eq!(report.table.total_rows, 5);
        assert_eq!(report.figure.markers.len(), 5);
        assert!(report.unknown_labels.is_empty());

        let rows = report.table_rows();
        assert_eq!(
            rows[2],
            vec!["3", "Risk 3", "medium-high", "medium-high", "3", "3"]
        );
    }

    #[test]
    fn csv_file_with_unknown_label() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "risks.csv",
            "Risk Name,ESG Impact,Financial Impact\nFlood,high,huge\n",
        );
        let report = build_report(&args(Some(path), 0), IngestOptions::default()).expect("report");
        assert_eq!(report.unknown_labels.len(), 1);
        assert_eq!(report.unknown_labels[0].label, "huge");
        assert_eq!(report.figure.markers[0].x, 1);
        assert_eq!(report.figure.markers[0].y, 4);
    }

    #[test]
    fn strict_labels_reject_with_generic_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "risks.csv",
            "Risk Name,ESG Impact,Financial Impact\nFlood,high,huge\n",
        );
        let error = build_report(
            &args(Some(path), 0),
            IngestOptions {
                strict_labels: true,
            },
        )
        .expect_err("strict labels");
        assert!(
            error
                .to_string()
                .starts_with("There was an error processing this file.")
        );
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "notes.txt", "hello");
        let error =
            build_report(&args(Some(path), 0), IngestOptions::default()).expect_err("txt file");
        assert!(
            error
                .to_string()
                .starts_with("This file type is not supported.")
        );
    }

    #[test]
    fn page_past_end_clamps_and_numbers_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut csv = String::from("Risk Name,ESG Impact,Financial Impact\n");
        for i in 1..=12 {
            csv.push_str(&format!("R{i},low,medium\n"));
        }
        let path = write(&dir, "many.csv", &csv);
        let report = build_report(&args(Some(path), 9), IngestOptions::default()).expect("report");
        assert_eq!(report.table.page, 1);
        let rows = report.table_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "11");
        assert_eq!(rows[1][1], "R12");
    }

    #[test]
    fn writes_svg_when_requested() {
        let dir = tempfile::tempdir().expect("tempdir");
        let svg_path = dir.path().join("matrix.svg");
        let render_args = RenderArgs {
            svg: Some(svg_path.clone()),
            ..args(None, 0)
        };
        let flags = GlobalFlags {
            format: crate::cli::OutputFormat::Raw,
            quiet: true,
            verbose: false,
        };
        handle(&render_args, &S1s2Config::default(), &flags).expect("render");
        let svg = std::fs::read_to_string(svg_path).expect("svg written");
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches(r#"<g class="marker""#).count(), 5);
    }
}

use std::path::Path;

/// Spreadsheet formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated text with a header row.
    Csv,
    /// Excel-family workbook (`xls`, `xlsx`, `xlsm`, `xlsb`); first sheet only.
    Workbook,
}

impl FileFormat {
    /// Pick a format from the filename's extension, ignoring case.
    #[must_use]
    pub fn detect(filename: &str) -> Option<Self> {
        let extension = Path::new(filename.trim())
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        if extension == "csv" {
            Some(Self::Csv)
        } else if extension.contains("xls") {
            Some(Self::Workbook)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("risks.csv", Some(FileFormat::Csv))]
    #[case("RISKS.CSV", Some(FileFormat::Csv))]
    #[case("risks.xlsx", Some(FileFormat::Workbook))]
    #[case("risks.xls", Some(FileFormat::Workbook))]
    #[case("risks.xlsm", Some(FileFormat::Workbook))]
    #[case("risks.txt", None)]
    #[case("csv", None)]
    #[case("risks.csv.txt", None)]
    #[case("", None)]
    fn detects_by_extension(#[case] filename: &str, #[case] expected: Option<FileFormat>) {
        assert_eq!(FileFormat::detect(filename), expected);
    }
}

//! Header-name resolution shared by the CSV and workbook readers.

use s1s2_core::RiskRow;

use crate::error::IngestError;

/// A required column and the headers that name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Risk,
    Esg,
    Financial,
}

impl Column {
    const fn name(self) -> &'static str {
        match self {
            Self::Risk => "risk",
            Self::Esg => "esg_impact",
            Self::Financial => "financial_impact",
        }
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Risk => &["risk", "risk_name", "risk name", "風險"],
            Self::Esg => &[
                "esg",
                "esg_impact",
                "esg impact",
                "esg_label",
                "對於企業esg面的衝擊",
            ],
            Self::Financial => &[
                "financial",
                "financial_impact",
                "financial impact",
                "financial_label",
                "對於企業財務面衝擊",
            ],
        }
    }

    fn matches(self, header: &str) -> bool {
        let normalized = header.trim_start_matches('\u{feff}').trim().to_lowercase();
        self.aliases().contains(&normalized.as_str())
    }
}

/// Positions of the three required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    risk: usize,
    esg: usize,
    financial: usize,
}

impl ColumnMap {
    /// Locate every required column by name. Extra columns are ignored; the
    /// first matching header wins.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::MissingColumn` for the first column not found.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, IngestError> {
        let find = |column: Column| {
            headers
                .iter()
                .position(|header| column.matches(header.as_ref()))
                .ok_or_else(|| IngestError::MissingColumn {
                    column: column.name(),
                    found: headers.iter().map(|h| h.as_ref().to_string()).collect(),
                })
        };

        Ok(Self {
            risk: find(Column::Risk)?,
            esg: find(Column::Esg)?,
            financial: find(Column::Financial)?,
        })
    }

    /// Build a row from a record; cells past the end of a short record read
    /// as empty.
    pub fn row<'a>(&self, cell: impl Fn(usize) -> Option<&'a str>) -> RiskRow {
        let get = |index| cell(index).unwrap_or_default().to_string();
        RiskRow::new(get(self.risk), get(self.esg), get(self.financial))
    }
}

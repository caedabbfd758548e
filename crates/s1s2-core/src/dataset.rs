//! Risk rows and the in-memory dataset they live in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::impact::{LabelScore, score_for_label};

/// One enterprise risk item as read from a worksheet.
///
/// Labels are kept verbatim. They are resolved against the impact mapping
/// only when controls are seeded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RiskRow {
    pub risk_name: String,
    pub esg_label: String,
    pub financial_label: String,
}

impl RiskRow {
    #[must_use]
    pub fn new(
        risk_name: impl Into<String>,
        esg_label: impl Into<String>,
        financial_label: impl Into<String>,
    ) -> Self {
        Self {
            risk_name: risk_name.into(),
            esg_label: esg_label.into(),
            financial_label: financial_label.into(),
        }
    }

    #[must_use]
    pub fn esg_score(&self) -> LabelScore {
        score_for_label(&self.esg_label)
    }

    #[must_use]
    pub fn financial_score(&self) -> LabelScore {
        score_for_label(&self.financial_label)
    }
}

/// A row whose label fell outside the mapping.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnknownLabel {
    pub row: usize,
    pub risk_name: String,
    pub column: String,
    pub label: String,
}

/// The full set of rows for one load. Replaced wholesale on ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Dataset {
    rows: Vec<RiskRow>,
}

const SAMPLE_LABELS: [&str; 5] = ["medium", "low", "medium-high", "medium", "low"];

impl Default for Dataset {
    /// Five sample risks with identical ESG and financial labels.
    fn default() -> Self {
        let rows = SAMPLE_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| RiskRow::new(format!("Risk {}", i + 1), *label, *label))
            .collect();
        Self { rows }
    }
}

impl Dataset {
    /// Build a dataset, rejecting empty or duplicate risk names.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyRiskName` or `CoreError::DuplicateRisk`.
    pub fn new(rows: Vec<RiskRow>) -> Result<Self, CoreError> {
        let mut seen = std::collections::HashSet::with_capacity(rows.len());
        for (row, risk) in rows.iter().enumerate() {
            let name = risk.risk_name.trim();
            if name.is_empty() {
                return Err(CoreError::EmptyRiskName { row });
            }
            if !seen.insert(name) {
                return Err(CoreError::DuplicateRisk {
                    name: name.to_string(),
                });
            }
        }
        Ok(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[RiskRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Risk names in row order, used as marker labels.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.risk_name.clone()).collect()
    }

    /// Every label that does not resolve through the impact mapping.
    #[must_use]
    pub fn unknown_labels(&self) -> Vec<UnknownLabel> {
        let mut unknown = Vec::new();
        for (row, risk) in self.rows.iter().enumerate() {
            for (column, label, score) in [
                ("esg", &risk.esg_label, risk.esg_score()),
                ("financial", &risk.financial_label, risk.financial_score()),
            ] {
                if score.is_fallback() {
                    unknown.push(UnknownLabel {
                        row,
                        risk_name: risk.risk_name.clone(),
                        column: column.to_string(),
                        label: label.clone(),
                    });
                }
            }
        }
        unknown
    }
}

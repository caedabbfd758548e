//! Per-row selection controls and their current values.
//!
//! Each row of a [`Dataset`] owns two controls, one per axis, keyed by
//! [`ControlId`]. Control values are seeded from the row labels and then move
//! independently: nothing here writes back into the dataset.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::errors::CoreError;
use crate::impact::ImpactLevel;

/// Which axis a control drives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Esg,
    Financial,
}

impl ControlKind {
    pub const ALL: [Self; 2] = [Self::Esg, Self::Financial];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Esg => "esg",
            Self::Financial => "financial",
        }
    }

    /// Human label shown next to the control and on the chart axis.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Esg => "ESG impact",
            Self::Financial => "Financial impact",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a single control.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct ControlId {
    pub kind: ControlKind,
    pub row: usize,
}

impl ControlId {
    #[must_use]
    pub const fn new(kind: ControlKind, row: usize) -> Self {
        Self { kind, row }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.row)
    }
}

/// A requested value change for one control, as posted by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ControlChange {
    pub kind: ControlKind,
    pub row: usize,
    pub score: u8,
}

impl ControlChange {
    #[must_use]
    pub const fn id(self) -> ControlId {
        ControlId::new(self.kind, self.row)
    }
}

/// Current value of every control for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    rows: usize,
    values: BTreeMap<ControlId, ImpactLevel>,
}

impl ControlState {
    /// Seed one control per row and axis from the row labels.
    ///
    /// Unknown labels seed the fallback level.
    #[must_use]
    pub fn seed(dataset: &Dataset) -> Self {
        let mut values = BTreeMap::new();
        for (row, risk) in dataset.rows().iter().enumerate() {
            values.insert(
                ControlId::new(ControlKind::Esg, row),
                risk.esg_score().level(),
            );
            values.insert(
                ControlId::new(ControlKind::Financial, row),
                risk.financial_score().level(),
            );
        }
        Self {
            rows: dataset.len(),
            values,
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn get(&self, id: ControlId) -> Option<ImpactLevel> {
        self.values.get(&id).copied()
    }

    /// Validate a change without applying it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownControl` or `CoreError::InvalidScore`.
    pub fn check(&self, change: ControlChange) -> Result<ImpactLevel, CoreError> {
        let id = change.id();
        if change.row >= self.rows {
            return Err(CoreError::UnknownControl {
                control: id.to_string(),
                row: change.row,
                rows: self.rows,
            });
        }
        ImpactLevel::from_score(change.score).ok_or_else(|| CoreError::InvalidScore {
            control: id.to_string(),
            score: change.score,
        })
    }

    /// Apply a batch of changes. Either every change applies or none does.
    ///
    /// Returns the number of controls whose value actually changed.
    ///
    /// # Errors
    ///
    /// Returns the first validation error in the batch.
    pub fn apply(&mut self, changes: &[ControlChange]) -> Result<usize, CoreError> {
        let checked = changes
            .iter()
            .map(|change| self.check(*change).map(|level| (change.id(), level)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut changed = 0;
        for (id, level) in checked {
            if self.values.insert(id, level) != Some(level) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Scores for one axis in row order.
    #[must_use]
    pub fn axis_scores(&self, kind: ControlKind) -> Vec<u8> {
        (0..self.rows)
            .map(|row| {
                self.get(ControlId::new(kind, row))
                    .unwrap_or(ImpactLevel::Low)
                    .to_score()
            })
            .collect()
    }
}

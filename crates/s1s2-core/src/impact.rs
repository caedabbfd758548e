//! Qualitative impact levels and their ordinal scores.
//!
//! The same mapping is used for both matrix axes (ESG impact and financial
//! impact). Labels are matched case-insensitively with surrounding whitespace
//! ignored; the Chinese labels used by the legacy S1S2 worksheets are
//! accepted as aliases.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Level applied to a label that is not part of the mapping.
pub const FALLBACK_LEVEL: ImpactLevel = ImpactLevel::Low;

/// Score of [`FALLBACK_LEVEL`].
pub const FALLBACK_SCORE: u8 = FALLBACK_LEVEL.to_score();

/// One of the four qualitative severity levels.
///
/// ```text
/// low (1) < medium (2) < medium-high (3) < high (4)
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ImpactLevel {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl ImpactLevel {
    /// All levels in ascending severity. This is the option order of every
    /// selection control and the tick order of both chart axes.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::MediumHigh, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::MediumHigh => "medium-high",
            Self::High => "high",
        }
    }

    /// Ordinal score in `1..=4`.
    #[must_use]
    pub const fn to_score(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::MediumHigh => 3,
            Self::High => 4,
        }
    }

    #[must_use]
    pub const fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::MediumHigh),
            4 => Some(Self::High),
            _ => None,
        }
    }

    /// Resolve a label as written in a worksheet cell.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "low" | "低" => Some(Self::Low),
            "medium" | "中" => Some(Self::Medium),
            "medium-high" | "medium_high" | "medium high" | "中高" => Some(Self::MediumHigh),
            "high" | "高" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical labels in control/tick order.
#[must_use]
pub fn labels() -> [&'static str; 4] {
    ImpactLevel::ALL.map(ImpactLevel::as_str)
}

/// Result of mapping a raw label to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelScore {
    /// The label is part of the mapping.
    Mapped(ImpactLevel),
    /// The label is unknown and the fallback level was substituted.
    Fallback,
}

impl LabelScore {
    #[must_use]
    pub const fn level(self) -> ImpactLevel {
        match self {
            Self::Mapped(level) => level,
            Self::Fallback => FALLBACK_LEVEL,
        }
    }

    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// Map a raw label, substituting [`FALLBACK_SCORE`] for unknown labels.
#[must_use]
pub fn score_for_label(label: &str) -> LabelScore {
    ImpactLevel::from_label(label).map_or(LabelScore::Fallback, LabelScore::Mapped)
}

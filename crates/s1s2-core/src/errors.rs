//! Error types shared by the S1S2 crates.
//!
//! Ingestion and configuration errors live in their own crates; the binary
//! converges them with `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Two rows in one load share a risk name.
    #[error("Duplicate risk name: {name}")]
    DuplicateRisk { name: String },

    /// A row has no risk name.
    #[error("Row {row} has an empty risk name")]
    EmptyRiskName { row: usize },

    /// A control addressed a row that does not exist.
    #[error("Control {control} addresses row {row} but the dataset has {rows} rows")]
    UnknownControl {
        control: String,
        row: usize,
        rows: usize,
    },

    /// A control value is outside `1..=4`.
    #[error("Invalid score {score} for control {control}")]
    InvalidScore { control: String, score: u8 },

    /// Matrix inputs do not line up row for row.
    #[error("Matrix inputs differ in length: {names} names, {financial} financial, {esg} ESG")]
    LengthMismatch {
        names: usize,
        financial: usize,
        esg: usize,
    },
}

//! # s1s2-core
//!
//! Domain types for the S1S2 risk matrix dashboard.
//!
//! - The impact mapping shared by both axes (`low` .. `high` ↔ 1..4)
//! - Risk rows and the dataset they are loaded into
//! - Typed per-row control identities and their current values
//! - Fixed-size table pagination
//! - The matrix figure description (heatmap, markers, axes)
//! - Cross-cutting error types

pub mod controls;
pub mod dataset;
pub mod errors;
pub mod impact;
pub mod matrix;
pub mod table;

pub use controls::{ControlChange, ControlId, ControlKind, ControlState};
pub use dataset::{Dataset, RiskRow, UnknownLabel};
pub use errors::CoreError;
pub use impact::{ImpactLevel, LabelScore};
pub use matrix::MatrixFigure;
pub use table::{TABLE_PAGE_SIZE, TablePage};

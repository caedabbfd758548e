//! Upload ingestion settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Reject uploads containing labels outside the impact mapping instead of
    /// scoring them as `low`.
    #[serde(default)]
    pub strict_labels: bool,
}

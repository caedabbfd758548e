//! Per-browser dashboard sessions.
//!
//! Each session owns its dataset and control values. The only shared input
//! is the seed dataset, which is cloned into every new session. Sessions are
//! owned by the request loop and never touched concurrently.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use s1s2_core::{ControlChange, ControlState, CoreError, Dataset, MatrixFigure, UnknownLabel};
use s1s2_ingest::{IngestError, IngestOptions};

/// Recomputes the chart from the current control values.
///
/// Invoked once per accepted control batch and once per dataset change.
pub type Recompute = fn(&[String], &ControlState) -> Result<MatrixFigure, CoreError>;

/// Random session identifier carried in the `s1s2_session` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// 16 random bytes, hex encoded.
    pub fn generate() -> anyhow::Result<Self> {
        let mut bytes = [0u8; 16];
        getrandom::fill(&mut bytes)
            .map_err(|e| anyhow::anyhow!("failed to generate session id: {e}"))?;
        Ok(Self(bytes.iter().map(|b| format!("{b:02x}")).collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of an upload as the page reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The dataset was replaced. Unknown labels were scored as `low`.
    Loaded {
        rows: usize,
        unknown_labels: Vec<UnknownLabel>,
    },
    /// The upload was refused; the previous dataset is untouched.
    Rejected { message: &'static str },
}

pub struct Session {
    dataset: Dataset,
    controls: ControlState,
    figure: MatrixFigure,
    recompute: Recompute,
    last_seen: Instant,
}

impl Session {
    pub fn new(seed: Dataset, now: Instant) -> Result<Self, CoreError> {
        Self::with_recompute(seed, MatrixFigure::from_controls, now)
    }

    pub fn with_recompute(
        dataset: Dataset,
        recompute: Recompute,
        now: Instant,
    ) -> Result<Self, CoreError> {
        let controls = ControlState::seed(&dataset);
        let figure = recompute(&dataset.names(), &controls)?;
        Ok(Self {
            dataset,
            controls,
            figure,
            recompute,
            last_seen: now,
        })
    }

    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub const fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub const fn figure(&self) -> &MatrixFigure {
        &self.figure
    }

    fn touch(&mut self, now: Instant) {
        self.last_seen = now;
    }

    /// Replace the dataset and regenerate every control from it.
    pub fn replace_dataset(&mut self, dataset: Dataset) -> Result<(), CoreError> {
        let controls = ControlState::seed(&dataset);
        let figure = (self.recompute)(&dataset.names(), &controls)?;
        self.dataset = dataset;
        self.controls = controls;
        self.figure = figure;
        Ok(())
    }

    /// Ingest an upload. A failed upload leaves the session unchanged.
    pub fn upload(&mut self, bytes: &[u8], filename: &str, options: IngestOptions) -> UploadOutcome {
        let dataset = match s1s2_ingest::ingest(bytes, filename, options) {
            Ok(dataset) => dataset,
            Err(error) => return reject(filename, &error),
        };

        let unknown_labels = dataset.unknown_labels();
        for unknown in &unknown_labels {
            tracing::warn!(
                filename,
                row = unknown.row,
                risk = %unknown.risk_name,
                column = %unknown.column,
                label = %unknown.label,
                "label outside the impact mapping, scoring as low"
            );
        }

        let rows = dataset.len();
        if let Err(error) = self.replace_dataset(dataset) {
            return reject(filename, &IngestError::Dataset(error));
        }
        tracing::info!(filename, rows, "dataset replaced from upload");
        UploadOutcome::Loaded {
            rows,
            unknown_labels,
        }
    }

    /// Apply a batch of control changes and recompute the chart once.
    ///
    /// The dataset is never modified. A rejected batch changes nothing.
    pub fn apply_controls(&mut self, batch: &[ControlChange]) -> Result<&MatrixFigure, CoreError> {
        let mut controls = self.controls.clone();
        let changed = controls.apply(batch)?;
        let figure = (self.recompute)(&self.dataset.names(), &controls)?;
        self.controls = controls;
        self.figure = figure;
        tracing::debug!(batch = batch.len(), changed, "controls applied");
        Ok(&self.figure)
    }
}

fn reject(filename: &str, error: &IngestError) -> UploadOutcome {
    tracing::warn!(filename, %error, "upload rejected");
    UploadOutcome::Rejected {
        message: error.user_message(),
    }
}

/// All live sessions, keyed by cookie value.
pub struct SessionStore {
    seed: Dataset,
    ttl: Duration,
    sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new(seed: Dataset, ttl: Duration) -> Self {
        Self {
            seed,
            ttl,
            sessions: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// The live session named by the cookie, marked as seen at `now`.
    ///
    /// Idle sessions are evicted first, so an expired cookie yields `None`.
    pub fn lookup(&mut self, cookie: Option<&str>, now: Instant) -> Option<SessionId> {
        self.evict_idle(now);

        let id = SessionId(cookie?.to_string());
        let session = self.sessions.get_mut(&id)?;
        session.touch(now);
        Some(id)
    }

    /// Start a fresh session from the seed under a new random id.
    pub fn create(&mut self, now: Instant) -> anyhow::Result<SessionId> {
        self.evict_idle(now);

        let id = SessionId::generate()?;
        let session = Session::new(self.seed.clone(), now)?;
        self.sessions.insert(id.clone(), session);
        tracing::debug!(session = %id, live = self.len(), "session started");
        Ok(id)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    fn evict_idle(&mut self, now: Instant) {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_seen) < ttl);
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "idle sessions evicted");
        }
    }
}

//! Seed dataset loading.
//!
//! # Responsibility
//! - Parse `{ "subjects": [...], "tasks": [...] }` JSON documents.
//! - Build fresh in-memory stores from a validated dataset.
//! - Write a dataset snapshot back out in the same layout.
//!
//! # Invariants
//! - Every record passes `Entity::validate()` before a store is built.
//! - Ids are unique per entity family.
//! - Task subject ids are not checked; dangling references are allowed.

use super::memory::MemoryStore;
use super::StoreError;
use crate::clock::Clock;
use crate::model::subject::Subject;
use crate::model::task::Task;
use crate::model::{validate_collection, ValidationError};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const BUILTIN_SEED_JSON: &str = include_str!("../../data/seed.json");

pub type SeedResult<T> = Result<T, SeedError>;

/// Seed parsing and validation errors.
#[derive(Debug)]
pub enum SeedError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(ValidationError),
    Store(StoreError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to access seed file `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed seed data: {err}"),
            Self::Invalid(err) => write!(f, "invalid seed record: {err}"),
            Self::Store(err) => write!(f, "failed to build seeded store: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<ValidationError> for SeedError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<StoreError> for SeedError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Invalid(err) => Self::Invalid(err),
            other => Self::Store(other),
        }
    }
}

/// Persisted state layout: plain lists of subjects and tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Pair of stores built from one seed dataset.
pub struct SeededStores {
    pub tasks: MemoryStore<Task>,
    pub subjects: MemoryStore<Subject>,
}

impl SeedData {
    /// Default dataset bundled with the crate.
    pub fn builtin() -> SeedResult<Self> {
        Self::from_json_str(BUILTIN_SEED_JSON)
    }

    /// Parses and validates a JSON seed document.
    pub fn from_json_str(json: &str) -> SeedResult<Self> {
        let seed: SeedData = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Reads and validates a JSON seed file.
    pub fn load(path: impl AsRef<Path>) -> SeedResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let seed = Self::from_json_str(&json)?;
        info!(
            "event=seed_load module=store status=ok subjects={} tasks={}",
            seed.subjects.len(),
            seed.tasks.len()
        );
        Ok(seed)
    }

    /// Encodes the dataset as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> SeedResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the dataset to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> SeedResult<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "event=seed_save module=store status=ok subjects={} tasks={} path={}",
            self.subjects.len(),
            self.tasks.len(),
            path.display()
        );
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_collection(&self.subjects)?;
        validate_collection(&self.tasks)
    }

    /// Builds fresh stores owning a copy of this dataset.
    pub fn into_stores(
        self,
        clock: Arc<dyn Clock>,
        task_latency: Duration,
        subject_latency: Duration,
    ) -> SeedResult<SeededStores> {
        let tasks = MemoryStore::with_records(clock.clone(), self.tasks)?.with_latency(task_latency);
        let subjects =
            MemoryStore::with_records(clock, self.subjects)?.with_latency(subject_latency);
        Ok(SeededStores { tasks, subjects })
    }
}

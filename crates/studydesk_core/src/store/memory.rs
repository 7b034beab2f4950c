//! In-process store with simulated I/O latency.
//!
//! # Responsibility
//! - Hold one entity collection behind an async lock.
//! - Reproduce an out-of-process store's call contract for tests and demos.
//!
//! # Invariants
//! - Every call sleeps for the configured latency before touching state.
//! - Records are copied on the way in and out.
//! - A failed update leaves the stored record untouched.

use super::{Store, StoreError, StoreResult};
use crate::clock::Clock;
use crate::model::{validate_collection, Entity, EntityId};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Latency applied to task store calls by default.
pub const DEFAULT_TASK_LATENCY: Duration = Duration::from_millis(300);
/// Latency applied to subject store calls by default.
pub const DEFAULT_SUBJECT_LATENCY: Duration = Duration::from_millis(200);

/// In-memory store for one entity family.
pub struct MemoryStore<E: Entity> {
    records: RwLock<Vec<E>>,
    latency: Duration,
    clock: Arc<dyn Clock>,
}

impl<E: Entity> MemoryStore<E> {
    /// Creates an empty store without latency.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            latency: Duration::ZERO,
            clock,
        }
    }

    /// Creates a store pre-populated with `records`.
    ///
    /// # Errors
    /// - `StoreError::Invalid` when any record breaks its invariants or two
    ///   records share an id.
    pub fn with_records(clock: Arc<dyn Clock>, records: Vec<E>) -> StoreResult<Self> {
        validate_collection(&records)?;

        Ok(Self {
            records: RwLock::new(records),
            latency: Duration::ZERO,
            clock,
        })
    }

    /// Sets the fixed delay applied before every operation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Number of stored records, without simulated latency.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl<E: Entity> Store<E> for MemoryStore<E> {
    async fn get_all(&self) -> StoreResult<Vec<E>> {
        let started_at = Instant::now();
        self.simulate_latency().await;

        let records = self.records.read().await;
        debug!(
            "event=store_get_all module=store status=ok kind={} count={} duration_ms={}",
            E::KIND,
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records.clone())
    }

    async fn get_by_id(&self, id: EntityId) -> StoreResult<E> {
        let started_at = Instant::now();
        self.simulate_latency().await;

        let records = self.records.read().await;
        match records.iter().find(|record| record.id() == id) {
            Some(record) => {
                debug!(
                    "event=store_get module=store status=ok kind={} id={id} duration_ms={}",
                    E::KIND,
                    started_at.elapsed().as_millis()
                );
                Ok(record.clone())
            }
            None => {
                debug!(
                    "event=store_get module=store status=error kind={} id={id} error_code=not_found duration_ms={}",
                    E::KIND,
                    started_at.elapsed().as_millis()
                );
                Err(StoreError::not_found(E::KIND, id))
            }
        }
    }

    async fn create(&self, draft: E::Draft) -> StoreResult<E> {
        let started_at = Instant::now();
        self.simulate_latency().await;

        let mut records = self.records.write().await;
        let id = next_id(&records)?;
        let entity = E::from_draft(id, draft, self.clock.now_utc()).map_err(|err| {
            warn!(
                "event=store_create module=store status=error kind={} error_code=invalid error={err}",
                E::KIND
            );
            StoreError::from(err)
        })?;
        records.push(entity.clone());

        debug!(
            "event=store_create module=store status=ok kind={} id={id} duration_ms={}",
            E::KIND,
            started_at.elapsed().as_millis()
        );
        Ok(entity)
    }

    async fn update(&self, id: EntityId, patch: E::Patch) -> StoreResult<E> {
        let started_at = Instant::now();
        self.simulate_latency().await;

        let mut records = self.records.write().await;
        let Some(index) = records.iter().position(|record| record.id() == id) else {
            debug!(
                "event=store_update module=store status=error kind={} id={id} error_code=not_found",
                E::KIND
            );
            return Err(StoreError::not_found(E::KIND, id));
        };

        let mut updated = records[index].clone();
        updated.apply_patch(patch, self.clock.now_utc());
        if let Err(err) = updated.validate() {
            warn!(
                "event=store_update module=store status=error kind={} id={id} error_code=invalid error={err}",
                E::KIND
            );
            return Err(err.into());
        }
        records[index] = updated.clone();

        debug!(
            "event=store_update module=store status=ok kind={} id={id} duration_ms={}",
            E::KIND,
            started_at.elapsed().as_millis()
        );
        Ok(updated)
    }

    async fn delete(&self, id: EntityId) -> StoreResult<bool> {
        let started_at = Instant::now();
        self.simulate_latency().await;

        let mut records = self.records.write().await;
        let Some(index) = records.iter().position(|record| record.id() == id) else {
            debug!(
                "event=store_delete module=store status=error kind={} id={id} error_code=not_found duration_ms={}",
                E::KIND,
                started_at.elapsed().as_millis()
            );
            return Err(StoreError::not_found(E::KIND, id));
        };
        records.remove(index);

        debug!(
            "event=store_delete module=store status=ok kind={} id={id} duration_ms={}",
            E::KIND,
            started_at.elapsed().as_millis()
        );
        Ok(true)
    }
}

fn next_id<E: Entity>(records: &[E]) -> StoreResult<EntityId> {
    match records.iter().map(E::id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable(format!("{} id space exhausted", E::KIND))),
    }
}

//! The sync orchestrator: decides when the merged policy is rendered,
//! versioned, and pushed.
//!
//! Triggers are debounced: every call re-arms a trailing timer, so rapid
//! edits coalesce into one push that fires a quiet period after the last
//! trigger. Callers that need the outcome register a one-shot waiter and
//! all waiters of a window receive the same result. Forced syncs and
//! rollbacks bypass the debounce and run synchronously.
//!
//! The only shared mutable state is [`DebounceState`], guarded by one
//! mutex; the merge/render/push work always runs outside it, so an
//! in-flight push never blocks new triggers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::oneshot;

use aclstack_core::types::DbId;
use aclstack_core::{CoreError, Policy};
use aclstack_db::models::{NewPolicyVersion, PolicyVersion};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::ledger::{PushOutcome, VersionLedger};
use crate::merger::PolicyMerger;
use crate::store::ResourceStore;
use crate::PolicyClient;

/// Outcome of one sync cycle, shared by every waiter of the window.
#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Failed,
}

impl SyncResult {
    fn success(version_id: DbId, version_number: i64) -> Self {
        Self {
            status: SyncStatus::Success,
            version_id: Some(version_id),
            version_number: Some(version_number),
            error: None,
        }
    }

    fn push_failed(version_id: DbId, version_number: i64, error: String) -> Self {
        Self {
            status: SyncStatus::Failed,
            version_id: Some(version_id),
            version_number: Some(version_number),
            error: Some(error),
        }
    }

    /// A cycle that died before a version was recorded (merge or ledger
    /// failure in a background timer, where there is no caller to return
    /// an error to).
    fn infra_failed(error: String) -> Self {
        Self {
            status: SyncStatus::Failed,
            version_id: None,
            version_number: None,
            error: Some(error),
        }
    }
}

/// Debounce bookkeeping. `generation` stands in for a cancellable timer
/// handle: arming bumps it, and a fired timer that observes a stale
/// generation exits without syncing.
#[derive(Default)]
struct DebounceState {
    pending: bool,
    generation: u64,
    waiters: Vec<oneshot::Sender<SyncResult>>,
}

struct Inner {
    merger: PolicyMerger,
    ledger: Arc<dyn VersionLedger>,
    client: Arc<dyn PolicyClient>,
    config: SyncConfig,
    state: Mutex<DebounceState>,
}

/// Coordinates rendering, versioning, and pushing of the merged policy.
///
/// Cheap to clone; all clones share the same debounce state.
#[derive(Clone)]
pub struct SyncOrchestrator {
    inner: Arc<Inner>,
}

impl SyncOrchestrator {
    pub fn new(
        store: Arc<dyn ResourceStore>,
        ledger: Arc<dyn VersionLedger>,
        client: Arc<dyn PolicyClient>,
        config: SyncConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                merger: PolicyMerger::new(store),
                ledger,
                client,
                config,
                state: Mutex::new(DebounceState::default()),
            }),
        }
    }

    /// Fire-and-forget trigger. No-op when auto-sync is disabled;
    /// otherwise (re-)arms the trailing debounce timer, coalescing with any
    /// trigger already in flight.
    pub fn trigger_sync(&self) {
        if !self.inner.config.auto_sync_enabled {
            return;
        }
        self.arm_debounce(None);
    }

    /// Trigger a sync and wait for its result.
    ///
    /// With auto-sync disabled this bypasses debouncing entirely and runs
    /// an immediate synchronous cycle. Otherwise it registers a one-shot
    /// waiter under the same timer-reset logic as
    /// [`trigger_sync`](Self::trigger_sync); every waiter of a window
    /// receives the identical result. Dropping the returned future abandons
    /// the wait without
    /// cancelling the scheduled sync or affecting other waiters.
    pub async fn trigger_sync_and_wait(&self) -> Result<SyncResult, SyncError> {
        if !self.inner.config.auto_sync_enabled {
            return self.inner.run_cycle(None).await;
        }
        let (tx, rx) = oneshot::channel();
        self.arm_debounce(Some(tx));
        rx.await.map_err(|_| SyncError::Interrupted)
    }

    /// Run a sync cycle immediately, ignoring the debounce.
    ///
    /// Cancels any pending timer. Because that timer will now never fire,
    /// waiters already registered for it are drained and handed this
    /// sync's result instead of being left to starve.
    pub async fn force_sync(&self) -> Result<SyncResult, SyncError> {
        {
            let mut state = self.inner.lock_state();
            state.generation = state.generation.wrapping_add(1);
            state.pending = false;
        }
        let result = match self.inner.run_cycle(None).await {
            Ok(result) => result,
            Err(e) => {
                self.inner
                    .notify_waiters(SyncResult::infra_failed(e.to_string()));
                return Err(e);
            }
        };
        self.inner.notify_waiters(result.clone());
        Ok(result)
    }

    /// Push the exact policy content of a recorded version as a brand-new
    /// forward version. History is never rewound or deleted.
    pub async fn rollback(&self, version_id: DbId) -> Result<SyncResult, SyncError> {
        let version = self
            .inner
            .ledger
            .get(version_id)
            .await?
            .ok_or(SyncError::VersionNotFound(version_id))?;
        let policy: Policy = serde_json::from_str(&version.rendered_policy)
            .map_err(|source| SyncError::Snapshot {
                version: version_id,
                source,
            })?;
        tracing::info!(
            version_id,
            version_number = version.version_number,
            "Rolling back to recorded policy version"
        );
        self.inner.run_cycle(Some(policy)).await
    }

    /// The merged policy as it would be pushed right now.
    pub async fn get_merged_policy(&self) -> Result<Policy, CoreError> {
        self.inner.merger.merge().await
    }

    /// List recorded versions, newest first.
    pub async fn list_versions(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PolicyVersion>, CoreError> {
        self.inner.ledger.list(limit, offset).await
    }

    /// Fetch one recorded version.
    pub async fn get_version(&self, id: DbId) -> Result<Option<PolicyVersion>, CoreError> {
        self.inner.ledger.get(id).await
    }

    /// Bump the generation, mark pending, optionally register a waiter, and
    /// spawn the timer task for the new generation.
    fn arm_debounce(&self, waiter: Option<oneshot::Sender<SyncResult>>) {
        let generation = {
            let mut state = self.inner.lock_state();
            state.generation = state.generation.wrapping_add(1);
            state.pending = true;
            if let Some(waiter) = waiter {
                state.waiters.push(waiter);
            }
            state.generation
        };
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.debounce_fire(generation).await;
        });
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, DebounceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Timer body: sleep out the debounce window, then run the cycle if
    /// this timer is still the current one.
    async fn debounce_fire(&self, generation: u64) {
        tokio::time::sleep(self.config.debounce).await;
        {
            let state = self.lock_state();
            // A later trigger re-armed the window, or a forced sync already
            // ran; either way this timer is stale.
            if state.generation != generation || !state.pending {
                return;
            }
        }

        let result = match self.run_cycle(None).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Debounced sync cycle aborted before push");
                SyncResult::infra_failed(e.to_string())
            }
        };

        {
            let mut state = self.lock_state();
            if state.generation == generation {
                state.pending = false;
            }
        }
        self.notify_waiters(result);
    }

    /// Drain the waiter list and deliver one shared result.
    fn notify_waiters(&self, result: SyncResult) {
        let waiters = std::mem::take(&mut self.lock_state().waiters);
        for waiter in waiters {
            // A dropped receiver just means that caller stopped waiting.
            let _ = waiter.send(result.clone());
        }
    }

    /// One full sync cycle: merge (or take the given snapshot), render,
    /// allocate the next version number, record a pending ledger entry,
    /// fetch the remote tag best-effort, push, and record the outcome.
    ///
    /// Merge, render, and ledger failures are hard errors; a rejected or
    /// unreachable remote is a normal outcome returned as a failed result.
    async fn run_cycle(&self, snapshot: Option<Policy>) -> Result<SyncResult, SyncError> {
        let policy = match snapshot {
            Some(policy) => policy,
            None => self.merger.merge().await?,
        };
        let rendered = serde_json::to_string(&policy)?;

        let next_number = self
            .ledger
            .latest()
            .await?
            .map(|v| v.version_number)
            .unwrap_or(0)
            + 1;
        let version = self
            .ledger
            .create(NewPolicyVersion {
                version_number: next_number,
                rendered_policy: rendered.clone(),
            })
            .await?;

        let expected_tag = match self.client.get_policy().await {
            Ok((_, tag)) => tag,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Could not fetch remote policy tag; pushing unconditionally"
                );
                None
            }
        };

        match self
            .client
            .set_policy(&rendered, expected_tag.as_deref())
            .await
        {
            Ok(new_tag) => {
                self.ledger
                    .record_outcome(version.id, PushOutcome::Success { remote_tag: new_tag })
                    .await?;
                tracing::info!(
                    version_id = version.id,
                    version_number = next_number,
                    "Policy pushed"
                );
                Ok(SyncResult::success(version.id, next_number))
            }
            Err(e) => {
                let message = e.to_string();
                self.ledger
                    .record_outcome(
                        version.id,
                        PushOutcome::Failed {
                            error: message.clone(),
                        },
                    )
                    .await?;
                tracing::warn!(
                    version_id = version.id,
                    version_number = next_number,
                    error = %message,
                    "Policy push failed"
                );
                Ok(SyncResult::push_failed(version.id, next_number, message))
            }
        }
    }
}

//! The version-ledger interface and its Postgres implementation.

use async_trait::async_trait;

use aclstack_core::types::DbId;
use aclstack_core::CoreError;
use aclstack_db::models::{NewPolicyVersion, PolicyVersion};
use aclstack_db::repositories::PolicyVersionRepo;
use aclstack_db::DbPool;

/// Outcome of one push attempt, recorded on the pending ledger row.
#[derive(Debug, Clone)]
pub enum PushOutcome {
    Success { remote_tag: String },
    Failed { error: String },
}

/// Append-only record of every render+push attempt.
///
/// `version_number` allocation is read-latest-then-increment and therefore
/// assumes a single orchestrator instance per ledger; the unique index on
/// the column turns a violated assumption into a loud failure.
#[async_trait]
pub trait VersionLedger: Send + Sync {
    /// Append a new pending version.
    async fn create(&self, input: NewPolicyVersion) -> Result<PolicyVersion, CoreError>;

    /// Fetch a version by ID.
    async fn get(&self, id: DbId) -> Result<Option<PolicyVersion>, CoreError>;

    /// The highest-numbered version, or `None` for an empty ledger.
    async fn latest(&self) -> Result<Option<PolicyVersion>, CoreError>;

    /// List versions, newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PolicyVersion>, CoreError>;

    /// Transition a pending version to its final status exactly once.
    async fn record_outcome(&self, id: DbId, outcome: PushOutcome) -> Result<(), CoreError>;
}

/// [`VersionLedger`] backed by the `policy_versions` table.
pub struct PgVersionLedger {
    pool: DbPool,
}

impl PgVersionLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("database error: {e}"))
}

#[async_trait]
impl VersionLedger for PgVersionLedger {
    async fn create(&self, input: NewPolicyVersion) -> Result<PolicyVersion, CoreError> {
        PolicyVersionRepo::create(&self.pool, &input)
            .await
            .map_err(db_err)
    }

    async fn get(&self, id: DbId) -> Result<Option<PolicyVersion>, CoreError> {
        PolicyVersionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_err)
    }

    async fn latest(&self) -> Result<Option<PolicyVersion>, CoreError> {
        PolicyVersionRepo::latest(&self.pool).await.map_err(db_err)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PolicyVersion>, CoreError> {
        PolicyVersionRepo::list(&self.pool, limit, offset)
            .await
            .map_err(db_err)
    }

    async fn record_outcome(&self, id: DbId, outcome: PushOutcome) -> Result<(), CoreError> {
        let updated = match outcome {
            PushOutcome::Success { remote_tag } => {
                PolicyVersionRepo::record_success(&self.pool, id, &remote_tag)
                    .await
                    .map_err(db_err)?
            }
            PushOutcome::Failed { error } => {
                PolicyVersionRepo::record_failure(&self.pool, id, &error)
                    .await
                    .map_err(db_err)?
            }
        };
        match updated {
            Some(_) => Ok(()),
            None => Err(CoreError::not_found("policy version", id)),
        }
    }
}

//! Audit log repository.
//!
//! The trail is append-only and best-effort advisory: mutations call
//! `append_async` after committing, and a failed audit insert never rolls
//! the primary operation back.

use sqlx::PgPool;

use domain::models::{AuditEntry, NewAuditEntry};
use domain::QaError;

use crate::entities::AuditLogEntity;

/// Repository for the compliance audit trail.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends one entry.
    pub async fn append(&self, entry: &NewAuditEntry) -> Result<AuditEntry, QaError> {
        let entity = sqlx::query_as::<_, AuditLogEntity>(
            r#"
            INSERT INTO audit_log (actor, action, details, ip_address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, timestamp, actor, action, details, ip_address
            "#,
        )
        .bind(&entry.user)
        .bind(entry.action.as_str())
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Appends an entry without blocking the caller (fire and forget).
    ///
    /// Failure is logged and swallowed; the audit trail does not gate the
    /// primary mutation.
    pub fn append_async(&self, entry: NewAuditEntry) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let repo = AuditLogRepository::new(pool);
            if let Err(e) = repo.append(&entry).await {
                tracing::error!(
                    action = entry.action.as_str(),
                    "Failed to append audit entry: {}",
                    e
                );
            }
        });
    }

    /// The most recent entries, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditEntry>, QaError> {
        let entities = sqlx::query_as::<_, AuditLogEntity>(
            r#"
            SELECT id, timestamp, actor, action, details, ip_address
            FROM audit_log
            ORDER BY timestamp DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}

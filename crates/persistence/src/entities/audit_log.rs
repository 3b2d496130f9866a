//! Audit log entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::AuditEntry;

/// Database row mapping for the audit_log table.
///
/// The column is named `actor` (`user` is a reserved word); the domain
/// model keeps the historical `user` field name.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    pub details: String,
    pub ip_address: Option<String>,
}

impl From<AuditLogEntity> for AuditEntry {
    fn from(entity: AuditLogEntity) -> Self {
        Self {
            id: entity.id,
            timestamp: entity.timestamp,
            user: entity.actor,
            action: entity.action,
            details: entity.details,
            ip_address: entity.ip_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_converts_to_domain() {
        let entity = AuditLogEntity {
            id: 99,
            timestamp: Utc::now(),
            actor: "admin".to_string(),
            action: "SAVE_QA".to_string(),
            details: "DAILY QA saved for Linac 1 on 2024-04-02".to_string(),
            ip_address: Some("10.0.0.7".to_string()),
        };

        let entry: AuditEntry = entity.into();
        assert_eq!(entry.user, "admin");
        assert_eq!(entry.action, "SAVE_QA");
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn unknown_historical_tags_survive() {
        // Action stays text end to end; tags written by older versions load
        // without parsing.
        let entity = AuditLogEntity {
            id: 1,
            timestamp: Utc::now(),
            actor: "admin".to_string(),
            action: "RESTORE".to_string(),
            details: String::new(),
            ip_address: None,
        };

        let entry: AuditEntry = entity.into();
        assert_eq!(entry.action, "RESTORE");
    }
}

//! Compliance audit trail models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category tags for audited actions.
///
/// The tags are stored as text so that historical entries survive renames
/// and user deletion; this enum exists for the writing side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Login,
    Logout,
    SaveQa,
    SaveUnit,
    SaveReading,
    SaveUser,
    Export,
    Backup,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Login => "LOGIN",
            AuditAction::Logout => "LOGOUT",
            AuditAction::SaveQa => "SAVE_QA",
            AuditAction::SaveUnit => "SAVE_UNIT",
            AuditAction::SaveReading => "SAVE_READING",
            AuditAction::SaveUser => "SAVE_USER",
            AuditAction::Export => "EXPORT",
            AuditAction::Backup => "BACKUP",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOGIN" => Ok(AuditAction::Login),
            "LOGOUT" => Ok(AuditAction::Logout),
            "SAVE_QA" => Ok(AuditAction::SaveQa),
            "SAVE_UNIT" => Ok(AuditAction::SaveUnit),
            "SAVE_READING" => Ok(AuditAction::SaveReading),
            "SAVE_USER" => Ok(AuditAction::SaveUser),
            "EXPORT" => Ok(AuditAction::Export),
            "BACKUP" => Ok(AuditAction::Backup),
            other => Err(format!("Unknown audit action: {}", other)),
        }
    }
}

/// An immutable audit trail entry.
///
/// `user` is the acting principal's name captured as plain text, decoupled
/// from the users table so history survives account deletion. `action` is
/// kept as text for the same reason. Entries are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub action: String,
    pub details: String,
    pub ip_address: Option<String>,
}

/// Input for appending one audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user: String,
    pub action: AuditAction,
    pub details: String,
    pub ip_address: Option<String>,
}

impl NewAuditEntry {
    pub fn new(
        user: impl Into<String>,
        action: AuditAction,
        details: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            action,
            details: details.into(),
            ip_address: None,
        }
    }

    pub fn with_ip(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tags_round_trip() {
        for action in [
            AuditAction::Login,
            AuditAction::Logout,
            AuditAction::SaveQa,
            AuditAction::SaveUnit,
            AuditAction::SaveReading,
            AuditAction::SaveUser,
            AuditAction::Export,
            AuditAction::Backup,
        ] {
            assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), action);
        }
    }

    #[test]
    fn tags_use_the_historical_format() {
        assert_eq!(AuditAction::SaveQa.as_str(), "SAVE_QA");
        assert_eq!(AuditAction::Login.as_str(), "LOGIN");
        assert!("save_qa".parse::<AuditAction>().is_err());
    }

    #[test]
    fn entry_builder_carries_source_address() {
        let entry = NewAuditEntry::new("admin", AuditAction::SaveUnit, "Unit saved")
            .with_ip(Some("10.0.0.7".to_string()));

        assert_eq!(entry.user, "admin");
        assert_eq!(entry.action, AuditAction::SaveUnit);
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.7"));
    }
}

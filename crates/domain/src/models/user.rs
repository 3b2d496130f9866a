//! User accounts and role capabilities.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Closed role enumeration.
///
/// Authorization is decided through the capability methods below, never by
/// comparing role strings at call sites.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Physicist,
    Therapist,
}

impl Role {
    /// User management (create, update, deactivate accounts).
    pub fn can_manage_users(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Viewing the compliance audit trail.
    pub fn can_view_audit_log(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Full data export and backup operations.
    pub fn can_export_data(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Physicist => "physicist",
            Role::Therapist => "therapist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "physicist" => Ok(Role::Physicist),
            "therapist" => Ok(Role::Therapist),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A user account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// User representation safe to return over the wire (no credential hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

/// Request payload for creating a user account.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub full_name: String,

    pub role: Role,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial-update payload for a user; absent fields keep their value.
/// A present `password` is re-hashed before storage.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    #[validate(length(max = 100))]
    pub full_name: Option<String>,

    pub role: Option<Role>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_holds_privileged_capabilities() {
        assert!(Role::Admin.can_manage_users());
        assert!(Role::Admin.can_view_audit_log());
        assert!(Role::Admin.can_export_data());

        for role in [Role::Physicist, Role::Therapist] {
            assert!(!role.can_manage_users());
            assert!(!role.can_view_audit_log());
            assert!(!role.can_export_data());
        }
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Admin, Role::Physicist, Role::Therapist] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("operator".parse::<Role>().is_err());
    }

    #[test]
    fn view_drops_credential_hash() {
        let user = User {
            id: 1,
            username: "admin".to_string(),
            email: "admin@hospital.local".to_string(),
            password_hash: "$argon2id$...".to_string(),
            full_name: "System Administrator".to_string(),
            role: Role::Admin,
            active: true,
            created_at: Utc::now(),
            last_login: None,
        };

        let view = UserView::from(user);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["username"], "admin");
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn create_request_validates_shape() {
        let request = CreateUserRequest {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            full_name: String::new(),
            role: Role::Therapist,
            active: true,
        };
        let errors = validator::Validate::validate(&request).unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}

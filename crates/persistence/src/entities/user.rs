//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::user::Role;
use domain::models::User;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
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

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            password_hash: entity.password_hash,
            full_name: entity.full_name,
            role: entity.role,
            active: entity.active,
            created_at: entity.created_at,
            last_login: entity.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_converts_to_domain() {
        let entity = UserEntity {
            id: 2,
            username: "jsmith".to_string(),
            email: "jsmith@hospital.local".to_string(),
            password_hash: "$argon2id$...".to_string(),
            full_name: "Jordan Smith".to_string(),
            role: Role::Physicist,
            active: true,
            created_at: Utc::now(),
            last_login: None,
        };

        let user: User = entity.into();
        assert_eq!(user.username, "jsmith");
        assert_eq!(user.role, Role::Physicist);
        assert!(user.last_login.is_none());
    }
}

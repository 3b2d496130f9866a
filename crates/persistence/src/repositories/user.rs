//! User repository for database operations.

use chrono::Utc;
use sqlx::PgPool;

use domain::models::user::{CreateUserRequest, UpdateUserRequest};
use domain::models::User;
use domain::QaError;

use crate::entities::UserEntity;
use crate::repositories::is_unique_violation;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, full_name, role, active, created_at, last_login";

/// Repository for user accounts.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a user by username (login lookup).
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, QaError> {
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Finds a user by id.
    pub async fn find(&self, id: i64) -> Result<User, QaError> {
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(QaError::UserNotFound(id))?;

        Ok(entity.into())
    }

    /// Lists all accounts in insertion order.
    pub async fn list(&self) -> Result<Vec<User>, QaError> {
        let entities = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Creates a user. The caller supplies the already-hashed credential.
    pub async fn create(
        &self,
        request: &CreateUserRequest,
        password_hash: &str,
    ) -> Result<User, QaError> {
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, role, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&request.username)
        .bind(&request.email)
        .bind(password_hash)
        .bind(&request.full_name)
        .bind(request.role)
        .bind(request.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                QaError::DuplicateUser
            } else {
                QaError::Storage(e)
            }
        })?;

        Ok(entity.into())
    }

    /// Partially updates a user; a present `password_hash` replaces the
    /// stored credential.
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateUserRequest,
        password_hash: Option<String>,
    ) -> Result<User, QaError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(QaError::UserNotFound(id))?;

        let username = request.username.clone().unwrap_or(current.username);
        let email = request.email.clone().unwrap_or(current.email);
        let full_name = request.full_name.clone().unwrap_or(current.full_name);
        let role = request.role.unwrap_or(current.role);
        let active = request.active.unwrap_or(current.active);
        let password_hash = password_hash.unwrap_or(current.password_hash);

        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, full_name = $5,
                role = $6, active = $7
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .bind(&full_name)
        .bind(role)
        .bind(active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                QaError::DuplicateUser
            } else {
                QaError::Storage(e)
            }
        })?;

        tx.commit().await?;
        Ok(entity.into())
    }

    /// Stamps a successful login.
    pub async fn touch_last_login(&self, id: i64) -> Result<(), QaError> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

//! Startup bootstrap: default admin account and default units.
//!
//! Runs after migrations. Both steps are idempotent — they only act when
//! the corresponding table is empty, so a restarted or scaled deployment
//! never duplicates the seed data.

use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};

use shared::password::{hash_password, PasswordError};

use crate::config::AuthConfig;

/// Error types for startup bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// Seeds the default admin account and default units on first start.
pub async fn run(pool: &PgPool, config: &AuthConfig) -> Result<(), BootstrapError> {
    ensure_default_admin(pool, config).await?;
    ensure_default_units(pool).await?;
    Ok(())
}

/// Creates the `admin` account when no users exist yet.
async fn ensure_default_admin(pool: &PgPool, config: &AuthConfig) -> Result<(), BootstrapError> {
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if user_count > 0 {
        return Ok(());
    }

    let password_hash = hash_password(&config.bootstrap_admin_password)?;

    let user_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, password_hash, full_name, role, active)
        VALUES ('admin', 'admin@hospital.local', $1, 'System Administrator', 'admin', true)
        RETURNING id
        "#,
    )
    .bind(&password_hash)
    .fetch_one(pool)
    .await?;

    info!(user_id, "Default admin user created (username: admin)");
    warn!("SECURITY: change the default admin password immediately after first login");

    Ok(())
}

/// Creates the two default linac units when no units exist yet.
async fn ensure_default_units(pool: &PgPool) -> Result<(), BootstrapError> {
    let unit_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM units")
        .fetch_one(pool)
        .await?;

    if unit_count > 0 {
        return Ok(());
    }

    let defaults: [(&str, &str, &str, Vec<&str>, Vec<&str>, Vec<&str>); 2] = [
        (
            "Linac 1",
            "Varian",
            "Clinac",
            vec!["6MV", "15MV"],
            vec!["6MeV", "9MeV", "12MeV", "15MeV"],
            vec![],
        ),
        (
            "TrueBeam",
            "Varian",
            "TrueBeam",
            vec!["6MV", "10MV", "15MV"],
            vec!["6MeV", "9MeV", "12MeV", "15MeV", "18MeV"],
            vec!["6MV FFF", "10MV FFF"],
        ),
    ];

    // One transaction so a partial seed never survives a failed start.
    let mut tx = pool.begin().await?;

    for (name, manufacturer, model, photon, electron, fff) in defaults {
        sqlx::query(
            r#"
            INSERT INTO units (name, manufacturer, model, photon_energies,
                               electron_energies, fff_energies)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(name)
        .bind(manufacturer)
        .bind(model)
        .bind(Json(photon))
        .bind(Json(electron))
        .bind(Json(fff))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!("Default units created");
    Ok(())
}

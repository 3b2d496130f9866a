//! Unit repository for database operations.

use sqlx::types::Json;
use sqlx::PgPool;

use domain::models::unit::{CreateUnitRequest, UpdateUnitRequest};
use domain::models::Unit;
use domain::QaError;

use crate::entities::UnitEntity;
use crate::repositories::is_unique_violation;

const UNIT_COLUMNS: &str = "id, name, manufacturer, model, serial_number, location, install_date, \
     photon_energies, electron_energies, fff_energies, active, created_at, updated_at";

/// Repository for linac unit configuration.
#[derive(Clone)]
pub struct UnitRepository {
    pool: PgPool,
}

impl UnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a unit. The name must be unique among all units, active or
    /// not.
    pub async fn create(&self, request: &CreateUnitRequest) -> Result<Unit, QaError> {
        let entity = sqlx::query_as::<_, UnitEntity>(&format!(
            r#"
            INSERT INTO units (name, manufacturer, model, serial_number, location,
                               install_date, photon_energies, electron_energies, fff_energies)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {UNIT_COLUMNS}
            "#,
        ))
        .bind(&request.name)
        .bind(&request.manufacturer)
        .bind(&request.model)
        .bind(&request.serial_number)
        .bind(&request.location)
        .bind(request.install_date)
        .bind(Json(&request.photon_energies))
        .bind(Json(&request.electron_energies))
        .bind(Json(&request.fff_energies))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                QaError::DuplicateName(request.name.clone())
            } else {
                QaError::Storage(e)
            }
        })?;

        Ok(entity.into())
    }

    /// Partially updates a unit; absent fields keep their stored value.
    pub async fn update(&self, id: i64, request: &UpdateUnitRequest) -> Result<Unit, QaError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, UnitEntity>(&format!(
            "SELECT {UNIT_COLUMNS} FROM units WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(QaError::UnitNotFound(id))?;

        let name = request.name.clone().unwrap_or(current.name);
        let manufacturer = request.manufacturer.clone().unwrap_or(current.manufacturer);
        let model = request.model.clone().unwrap_or(current.model);
        let serial_number = request
            .serial_number
            .clone()
            .unwrap_or(current.serial_number);
        let location = request.location.clone().unwrap_or(current.location);
        let install_date = request.install_date.or(current.install_date);
        let photon = request
            .photon_energies
            .clone()
            .unwrap_or(current.photon_energies.0);
        let electron = request
            .electron_energies
            .clone()
            .unwrap_or(current.electron_energies.0);
        let fff = request.fff_energies.clone().unwrap_or(current.fff_energies.0);
        let active = request.active.unwrap_or(current.active);

        let entity = sqlx::query_as::<_, UnitEntity>(&format!(
            r#"
            UPDATE units
            SET name = $2, manufacturer = $3, model = $4, serial_number = $5,
                location = $6, install_date = $7, photon_energies = $8,
                electron_energies = $9, fff_energies = $10, active = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {UNIT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&name)
        .bind(&manufacturer)
        .bind(&model)
        .bind(&serial_number)
        .bind(&location)
        .bind(install_date)
        .bind(Json(&photon))
        .bind(Json(&electron))
        .bind(Json(&fff))
        .bind(active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                QaError::DuplicateName(name.clone())
            } else {
                QaError::Storage(e)
            }
        })?;

        tx.commit().await?;
        Ok(entity.into())
    }

    /// Finds a unit by id.
    pub async fn find(&self, id: i64) -> Result<Unit, QaError> {
        let entity = sqlx::query_as::<_, UnitEntity>(&format!(
            "SELECT {UNIT_COLUMNS} FROM units WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(QaError::UnitNotFound(id))?;

        Ok(entity.into())
    }

    /// Lists units in insertion order (stable, not re-sorted).
    pub async fn list(&self, active_only: bool) -> Result<Vec<Unit>, QaError> {
        let sql = if active_only {
            format!("SELECT {UNIT_COLUMNS} FROM units WHERE active = true ORDER BY id ASC")
        } else {
            format!("SELECT {UNIT_COLUMNS} FROM units ORDER BY id ASC")
        };

        let entities = sqlx::query_as::<_, UnitEntity>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Whether a unit with this id exists.
    pub async fn exists(&self, id: i64) -> Result<bool, QaError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM units WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

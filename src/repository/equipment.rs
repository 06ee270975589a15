//! Equipment repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::PgTx;
use crate::{
    error::{AppError, AppResult},
    models::enums::{EquipmentAvailability, EquipmentCondition},
    models::equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment with optional filters
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT * FROM equipment
            WHERE ($1::text IS NULL OR availability_status = $1)
              AND ($2::text IS NULL OR equipment_type = $2)
            ORDER BY asset_tag
            "#,
        )
        .bind(query.availability.map(|a| a.as_str()))
        .bind(&query.equipment_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Row-locked read used by the issuance and return paths
    pub async fn get_for_update(&self, tx: &mut PgTx<'_>, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Create equipment
    pub async fn create(&self, data: &CreateEquipment, created_by: i32) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment
                (asset_tag, equipment_type, brand, model, serial_number,
                 condition_status, notes, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(&data.asset_tag)
        .bind(&data.equipment_type)
        .bind(&data.brand)
        .bind(&data.model)
        .bind(&data.serial_number)
        .bind(data.condition_status.unwrap_or(EquipmentCondition::Good).as_str())
        .bind(&data.notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Asset tag already in use".to_string())
            }
            _ => AppError::from(e),
        })?;
        Ok(row)
    }

    /// Update equipment master data
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateEquipment,
        updated_by: i32,
    ) -> AppResult<Equipment> {
        let current = self.get_by_id(id).await?;

        let row = sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment SET
                asset_tag = $2,
                equipment_type = $3,
                brand = $4,
                model = $5,
                serial_number = $6,
                condition_status = $7,
                availability_status = $8,
                notes = $9,
                updated_by = $10,
                updated_at = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.asset_tag.as_ref().unwrap_or(&current.asset_tag))
        .bind(data.equipment_type.as_ref().unwrap_or(&current.equipment_type))
        .bind(data.brand.as_ref().or(current.brand.as_ref()))
        .bind(data.model.as_ref().or(current.model.as_ref()))
        .bind(data.serial_number.as_ref().or(current.serial_number.as_ref()))
        .bind(
            data.condition_status
                .map(|c| c.as_str().to_string())
                .unwrap_or(current.condition_status),
        )
        .bind(
            data.availability_status
                .map(|a| a.as_str().to_string())
                .unwrap_or(current.availability_status),
        )
        .bind(data.notes.as_ref().or(current.notes.as_ref()))
        .bind(updated_by)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;

        Ok(row)
    }

    /// Delete equipment with no transaction history
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::Conflict("Equipment has loan history and cannot be deleted".to_string())
                }
                _ => AppError::from(e),
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Compare-and-swap availability change inside a unit of work.
    ///
    /// Returns false when the row was not in the expected state, in which
    /// case the caller rolls back and reports `InvalidState`.
    pub async fn set_availability(
        &self,
        tx: &mut PgTx<'_>,
        id: i32,
        expected: EquipmentAvailability,
        new: EquipmentAvailability,
        condition: Option<EquipmentCondition>,
        holder: Option<i32>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE equipment SET
                availability_status = $3,
                condition_status = COALESCE($4, condition_status),
                assigned_to_employee_id = $5,
                updated_at = NOW()
            WHERE id = $1 AND availability_status = $2
            "#,
        )
        .bind(id)
        .bind(expected.as_str())
        .bind(new.as_str())
        .bind(condition.map(|c| c.as_str()))
        .bind(holder)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Count equipment per availability status (for stats)
    pub async fn counts_by_availability(&self) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT availability_status, COUNT(*) FROM equipment GROUP BY availability_status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

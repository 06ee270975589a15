//! Employees repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::employee::{CreateEmployee, Employee, EmployeeQuery, EmployeeShort, UpdateEmployee},
};

#[derive(Clone)]
pub struct EmployeesRepository {
    pool: Pool<Postgres>,
}

impl EmployeesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get employee by ID (soft-deleted records are not found)
    pub async fn get_by_id(&self, id: i32) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee with id {} not found", id)))
    }

    /// Compact reference used when embedding people into other responses
    pub async fn get_short(&self, id: i32) -> AppResult<EmployeeShort> {
        sqlx::query_as::<_, EmployeeShort>(
            r#"
            SELECT id, staff_number, firstname, lastname, department
            FROM employees
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee with id {} not found", id)))
    }

    /// List employees with optional name/department filters
    pub async fn list(&self, query: &EmployeeQuery) -> AppResult<Vec<Employee>> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(50).clamp(1, 200);

        let rows = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR firstname ILIKE '%' || $1 || '%'
                   OR lastname ILIKE '%' || $1 || '%'
                   OR staff_number ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR department = $2)
            ORDER BY lastname, firstname
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&query.name)
        .bind(&query.department)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Create a new employee
    pub async fn create(&self, data: &CreateEmployee, created_by: i32) -> AppResult<Employee> {
        let row = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees
                (staff_number, firstname, lastname, work_email, phone, department,
                 grade, position, service_status, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(&data.staff_number)
        .bind(&data.firstname)
        .bind(&data.lastname)
        .bind(&data.work_email)
        .bind(&data.phone)
        .bind(&data.department)
        .bind(&data.grade)
        .bind(&data.position)
        .bind(
            data.service_status
                .map(|s| s.as_str())
                .unwrap_or("permanent"),
        )
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Staff number or work email already in use".to_string())
            }
            _ => AppError::from(e),
        })?;
        Ok(row)
    }

    /// Update an employee record
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateEmployee,
        updated_by: i32,
    ) -> AppResult<Employee> {
        let current = self.get_by_id(id).await?;

        let row = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                staff_number = $2,
                firstname = $3,
                lastname = $4,
                work_email = $5,
                phone = $6,
                department = $7,
                grade = $8,
                position = $9,
                service_status = $10,
                is_active = $11,
                updated_by = $12,
                updated_at = $13
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.staff_number.as_ref().unwrap_or(&current.staff_number))
        .bind(data.firstname.as_ref().unwrap_or(&current.firstname))
        .bind(data.lastname.as_ref().unwrap_or(&current.lastname))
        .bind(data.work_email.as_ref().or(current.work_email.as_ref()))
        .bind(data.phone.as_ref().or(current.phone.as_ref()))
        .bind(data.department.as_ref().or(current.department.as_ref()))
        .bind(data.grade.as_ref().or(current.grade.as_ref()))
        .bind(data.position.as_ref().or(current.position.as_ref()))
        .bind(
            data.service_status
                .map(|s| s.as_str().to_string())
                .unwrap_or(current.service_status),
        )
        .bind(data.is_active.unwrap_or(current.is_active))
        .bind(updated_by)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee with id {} not found", id)))?;

        Ok(row)
    }

    /// Soft-delete an employee
    pub async fn soft_delete(&self, id: i32, deleted_by: i32) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET deleted_at = NOW(), deleted_by = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(deleted_by)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Employee with id {} not found", id)));
        }
        Ok(())
    }

    /// Count active employees (for stats)
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employees WHERE deleted_at IS NULL AND is_active",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

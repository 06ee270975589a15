//! Employees service

use validator::Validate;

use crate::{
    error::AppResult,
    models::claims::UserClaims,
    models::employee::{CreateEmployee, Employee, EmployeeQuery, UpdateEmployee},
    repository::Repository,
};

#[derive(Clone)]
pub struct EmployeesService {
    repository: Repository,
}

impl EmployeesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, claims: &UserClaims, query: &EmployeeQuery) -> AppResult<Vec<Employee>> {
        claims.require_read_employees()?;
        self.repository.employees.list(query).await
    }

    pub async fn get_by_id(&self, id: i32, claims: &UserClaims) -> AppResult<Employee> {
        claims.require_read_employees()?;
        self.repository.employees.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEmployee, claims: &UserClaims) -> AppResult<Employee> {
        claims.require_write_employees()?;
        data.validate()?;
        self.repository.employees.create(data, claims.employee_id).await
    }

    pub async fn update(
        &self,
        id: i32,
        data: &UpdateEmployee,
        claims: &UserClaims,
    ) -> AppResult<Employee> {
        claims.require_write_employees()?;
        data.validate()?;
        self.repository.employees.update(id, data, claims.employee_id).await
    }

    pub async fn delete(&self, id: i32, claims: &UserClaims) -> AppResult<()> {
        claims.require_write_employees()?;
        self.repository.employees.soft_delete(id, claims.employee_id).await
    }
}

use std::sync::Arc;

use log::info;

use crate::errors::AppError;
use crate::models::employee::Employee;
use crate::store::EmployeeStore;

/// Business rules over an [`EmployeeStore`]: email uniqueness, existence
/// checks and whole-record update semantics.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    pub async fn create_employee(&self, mut employee: Employee) -> Result<Employee, AppError> {
        info!("Creating new employee with email: {}", employee.email);
        employee.id = None;

        let mut tx = self.store.begin().await?;
        if tx.exists_by_email(&employee.email).await? {
            return Err(AppError::DuplicateEmail(employee.email));
        }
        let saved = tx.save(employee).await?;
        tx.commit().await?;

        info!("Employee created successfully with ID: {:?}", saved.id);
        Ok(saved)
    }

    pub async fn get_all_employees(&self) -> Result<Vec<Employee>, AppError> {
        info!("Fetching all employees");
        Ok(self.store.find_all().await?)
    }

    pub async fn get_employee_by_id(&self, id: i64) -> Result<Employee, AppError> {
        info!("Fetching employee with ID: {}", id);
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))
    }

    /// Replaces every mutable field of employee `id` with the values in
    /// `patch`. `patch.id` is ignored.
    pub async fn update_employee(&self, id: i64, patch: Employee) -> Result<Employee, AppError> {
        info!("Updating employee with ID: {}", id);

        let mut tx = self.store.begin().await?;
        let mut existing = tx.find_by_id(id).await?.ok_or(AppError::NotFound(id))?;
        if existing.email != patch.email && tx.exists_by_email(&patch.email).await? {
            return Err(AppError::DuplicateEmail(patch.email));
        }
        existing.apply(patch);
        let updated = tx.save(existing).await?;
        tx.commit().await?;

        info!("Employee updated successfully with ID: {}", id);
        Ok(updated)
    }

    pub async fn delete_employee(&self, id: i64) -> Result<(), AppError> {
        info!("Deleting employee with ID: {}", id);

        let mut tx = self.store.begin().await?;
        let employee = tx.find_by_id(id).await?.ok_or(AppError::NotFound(id))?;
        tx.delete(&employee).await?;
        tx.commit().await?;

        info!("Employee deleted successfully with ID: {}", id);
        Ok(())
    }

    pub async fn get_employees_by_department(
        &self,
        department: &str,
    ) -> Result<Vec<Employee>, AppError> {
        info!("Fetching employees by department: {}", department);
        Ok(self.store.find_by_department(department).await?)
    }

    pub async fn get_employees_by_status(&self, status: &str) -> Result<Vec<Employee>, AppError> {
        info!("Fetching employees by status: {}", status);
        Ok(self.store.find_by_status(status).await?)
    }
}

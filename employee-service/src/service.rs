use std::sync::Arc;

use employee_shared::error::{Result, ServiceError};
use employee_shared::models::Employee;
use employee_shared::store::EmployeeStore;
use log::{debug, info};

/// Stateless orchestration over an [`EmployeeStore`].
pub struct EmployeeService<S> {
    store: Arc<S>,
}

impl<S> EmployeeService<S>
where
    S: EmployeeStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn get_all_employees(&self) -> Result<Vec<Employee>> {
        self.store.find_all().await
    }

    /// Saves a new employee, enabling it unless the input says otherwise.
    pub async fn create_employee(&self, mut employee: Employee) -> Result<Employee> {
        if employee.is_enabled.is_none() {
            employee.is_enabled = Some(true);
        }

        let created = self.store.save(employee).await?;
        info!("Created employee {}", created.id.as_deref().unwrap_or_default());
        Ok(created)
    }

    pub async fn get_employee_by_id(&self, id: &str) -> Result<Option<Employee>> {
        self.store.find_by_id(id).await
    }

    pub async fn delete_employee_by_id(&self, id: &str) -> Result<()> {
        self.store.delete_by_id(id).await?;
        info!("Deleted employee {}", id);
        Ok(())
    }

    /// Replaces the profile fields of an existing employee.
    ///
    /// name, email, role, about, profile_pic and phone_number are taken from
    /// `input`; password and is_enabled keep their stored values.
    pub async fn update_employee(&self, id: &str, input: Employee) -> Result<Employee> {
        let mut existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Employee not found: {}", id)))?;

        debug!("Updating employee {}", id);
        existing.name = input.name;
        existing.email = input.email;
        existing.role = input.role;
        existing.about = input.about;
        existing.profile_pic = input.profile_pic;
        existing.phone_number = input.phone_number;

        self.store.save(existing).await
    }
}

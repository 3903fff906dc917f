use async_trait::async_trait;

use crate::error::{Result, ServiceError};
use crate::models::{Employee, MAX_ABOUT_LENGTH};

// Expose the DynamoDB store module
pub mod dynamo;
// In-memory store used for local runs and tests
pub mod memory;

/// EmployeeStore trait defining the interface for employee storage implementations
#[async_trait]
pub trait EmployeeStore: Send + Sync + 'static {
    /// Gets every stored employee
    async fn find_all(&self) -> Result<Vec<Employee>>;

    /// Gets an employee by ID, `None` when no such record exists
    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>>;

    /// Inserts or overwrites an employee.
    ///
    /// Records without an `id`, or with an `id` the store does not know, are
    /// inserted with a fresh `created_at`. Known records are overwritten and
    /// keep their stored `created_at`. `updated_at` is stamped on every save.
    /// Fails with [`ServiceError::ConstraintViolation`] when another record
    /// already uses the same email.
    async fn save(&self, employee: Employee) -> Result<Employee>;

    /// Deletes an employee; deleting an unknown ID is not an error
    async fn delete_by_id(&self, id: &str) -> Result<()>;
}

/// Checks the column constraints every store enforces before writing.
pub fn validate_employee(employee: &Employee) -> Result<()> {
    if employee.name.trim().is_empty() {
        return Err(ServiceError::ValidationError("name must not be empty".into()));
    }

    if employee.email.trim().is_empty() {
        return Err(ServiceError::ValidationError("email must not be empty".into()));
    }

    if let Some(about) = &employee.about {
        if about.chars().count() > MAX_ABOUT_LENGTH {
            return Err(ServiceError::ValidationError(format!(
                "about must be at most {} characters",
                MAX_ABOUT_LENGTH
            )));
        }
    }

    Ok(())
}

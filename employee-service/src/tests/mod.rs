use async_trait::async_trait;
use employee_shared::error::{Result, ServiceError};
use employee_shared::models::Employee;
use employee_shared::store::EmployeeStore;

mod employee_tests;

/// Store whose every call fails, for exercising the error paths
pub struct FailingStore;

#[async_trait]
impl EmployeeStore for FailingStore {
    async fn find_all(&self) -> Result<Vec<Employee>> {
        Err(ServiceError::InternalError("store unavailable".into()))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Employee>> {
        Err(ServiceError::InternalError("store unavailable".into()))
    }

    async fn save(&self, _employee: Employee) -> Result<Employee> {
        Err(ServiceError::InternalError("store unavailable".into()))
    }

    async fn delete_by_id(&self, _id: &str) -> Result<()> {
        Err(ServiceError::InternalError("store unavailable".into()))
    }
}

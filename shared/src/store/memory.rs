use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use log::debug;
use uuid::Uuid;

use super::{validate_employee, EmployeeStore};
use crate::error::{Result, ServiceError};
use crate::models::{next_update_timestamp, now, Employee};

/// In-memory implementation of EmployeeStore
///
/// Every write holds the single write lock for its whole duration, so the
/// email uniqueness check and the insert are atomic.
#[derive(Clone, Default)]
pub struct MemoryEmployeeStore {
    employees: Arc<RwLock<HashMap<String, Employee>>>,
}

impl MemoryEmployeeStore {
    /// Creates a new empty in-memory employee store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with initial data.
    ///
    /// Records are taken as-is; records without an id are skipped.
    pub fn with_data(initial_data: Vec<Employee>) -> Self {
        let employees = initial_data
            .into_iter()
            .filter_map(|employee| employee.id.clone().map(|id| (id, employee)))
            .collect();

        Self {
            employees: Arc::new(RwLock::new(employees)),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.employees.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn find_all(&self) -> Result<Vec<Employee>> {
        let employees = self
            .employees
            .read()
            .map_err(|_| ServiceError::InternalError("Failed to acquire read lock".into()))?;

        let mut all: Vec<Employee> = employees.values().cloned().collect();
        // HashMap iteration order is arbitrary; keep listings stable
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(all)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        let employees = self
            .employees
            .read()
            .map_err(|_| ServiceError::InternalError("Failed to acquire read lock".into()))?;

        Ok(employees.get(id).cloned())
    }

    async fn save(&self, mut employee: Employee) -> Result<Employee> {
        validate_employee(&employee)?;

        let mut employees = self
            .employees
            .write()
            .map_err(|_| ServiceError::InternalError("Failed to acquire write lock".into()))?;

        let id = employee
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let email_taken = employees
            .iter()
            .any(|(other_id, other)| other_id != &id && other.email == employee.email);
        if email_taken {
            return Err(ServiceError::ConstraintViolation(format!(
                "Email already in use: {}",
                employee.email
            )));
        }

        match employees.get(&id) {
            Some(stored) => {
                debug!("Overwriting employee {}", id);
                employee.created_at = stored.created_at;
                employee.updated_at = Some(next_update_timestamp(stored.updated_at));
            }
            None => {
                debug!("Inserting employee {}", id);
                let created = now();
                employee.created_at = Some(created);
                employee.updated_at = Some(created);
            }
        }

        employee.id = Some(id.clone());
        employees.insert(id, employee.clone());

        Ok(employee)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let mut employees = self
            .employees
            .write()
            .map_err(|_| ServiceError::InternalError("Failed to acquire write lock".into()))?;

        if employees.remove(id).is_none() {
            debug!("Delete of unknown employee {} ignored", id);
        }

        Ok(())
    }
}

use axum::{
    extract::{Path, State},
    Json,
};
use employee_shared::store::EmployeeStore;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{CreateEmployeeRequest, EmployeeResponse, UpdateEmployeeRequest};
use crate::service::EmployeeService;

pub const DELETED_MESSAGE: &str = "Employee deleted!";

// GET /employees
pub async fn get_employees<S>(
    State(service): State<Arc<EmployeeService<S>>>,
) -> Result<Json<Vec<EmployeeResponse>>>
where
    S: EmployeeStore,
{
    let employees = service.get_all_employees().await?;

    Ok(Json(
        employees.into_iter().map(EmployeeResponse::from).collect(),
    ))
}

// POST /employees
pub async fn create_employee<S>(
    State(service): State<Arc<EmployeeService<S>>>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>>
where
    S: EmployeeStore,
{
    let created = service.create_employee(payload.into()).await?;

    Ok(Json(EmployeeResponse::from(created)))
}

// GET /employees/:id
// An unknown id is answered with a `null` body, not a 404
pub async fn get_employee<S>(
    State(service): State<Arc<EmployeeService<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Option<EmployeeResponse>>>
where
    S: EmployeeStore,
{
    let employee = service.get_employee_by_id(&id).await?;

    Ok(Json(employee.map(EmployeeResponse::from)))
}

// PUT /employees/:id
pub async fn update_employee<S>(
    State(service): State<Arc<EmployeeService<S>>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>>
where
    S: EmployeeStore,
{
    let updated = service.update_employee(&id, payload.into()).await?;

    Ok(Json(EmployeeResponse::from(updated)))
}

// DELETE /employees/:id
pub async fn delete_employee<S>(
    State(service): State<Arc<EmployeeService<S>>>,
    Path(id): Path<String>,
) -> Result<&'static str>
where
    S: EmployeeStore,
{
    service.delete_employee_by_id(&id).await?;

    Ok(DELETED_MESSAGE)
}

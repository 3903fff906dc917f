use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use employee_shared::models::Employee;

// Request DTOs

/// Body of `POST /employees`
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub role: Option<String>,
    pub about: Option<String>,
    pub profile_pic: Option<String>,
    pub phone_number: Option<String>,
    pub is_enabled: Option<bool>,
}

impl From<CreateEmployeeRequest> for Employee {
    fn from(req: CreateEmployeeRequest) -> Self {
        Employee {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
            about: req.about,
            profile_pic: req.profile_pic,
            phone_number: req.phone_number,
            is_enabled: req.is_enabled,
            ..Default::default()
        }
    }
}

/// Body of `PUT /employees/:id`
///
/// Only these fields are replaced on update; absent optional fields clear the
/// stored value. Any `password` or `isEnabled` in the body is ignored.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub about: Option<String>,
    pub profile_pic: Option<String>,
    pub phone_number: Option<String>,
}

impl From<UpdateEmployeeRequest> for Employee {
    fn from(req: UpdateEmployeeRequest) -> Self {
        Employee {
            name: req.name,
            email: req.email,
            role: req.role,
            about: req.about,
            profile_pic: req.profile_pic,
            phone_number: req.phone_number,
            ..Default::default()
        }
    }
}

// Response DTOs

/// Wire representation of an employee. Never carries the password.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub about: Option<String>,
    pub profile_pic: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_enabled: bool,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id.unwrap_or_default(),
            name: employee.name,
            email: employee.email,
            role: employee.role,
            about: employee.about,
            profile_pic: employee.profile_pic,
            phone_number: employee.phone_number,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
            // Column default for records written before the flag existed
            is_enabled: employee.is_enabled.unwrap_or(true),
        }
    }
}

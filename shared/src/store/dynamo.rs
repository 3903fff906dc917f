use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, TransactWriteItem};
use aws_sdk_dynamodb::Client;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_dynamo::{from_item, to_item};
use std::collections::HashMap;
use uuid::Uuid;

use super::{validate_employee, EmployeeStore};
use crate::error::{
    cancellation_reasons, failed_condition_indexes, has_transaction_conflict, map_dynamo_error,
    map_get_dynamo_error, map_scan_dynamo_error, Result, ServiceError,
};
use crate::models::{next_update_timestamp, now, Employee};

// Employee Store Constants
pub const TABLE_NAME: &str = "employee-table";
pub const EMAIL_TABLE_NAME: &str = "employee-email-table";

// Claim condition: the email is free, or already held by this employee
const CLAIM_CONDITION: &str = "attribute_not_exists(email) OR employeeId = :employee_id";

// Record condition: the record still holds the email it was read with
const RECORD_EMAIL_CONDITION: &str = "#email = :stored_email";

// Deletes re-read and retry when a concurrent write moves the record
const DELETE_ATTEMPTS: usize = 3;

/// Row of the email table recording which employee owns an address
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct EmailClaim {
    email: String,
    employee_id: String,
}

/// One item of a write transaction, kept to explain a failed condition
#[derive(Debug, Clone, PartialEq)]
enum WriteStep {
    InsertRecord(String),
    OverwriteRecord(String),
    DeleteRecord(String),
    ClaimEmail(String),
    ReleaseEmail(String),
}

impl WriteStep {
    fn condition_failed(&self) -> ServiceError {
        match self {
            WriteStep::InsertRecord(id) => {
                ServiceError::ConstraintViolation(format!("Employee already exists: {}", id))
            }
            WriteStep::OverwriteRecord(id) | WriteStep::DeleteRecord(id) => {
                ServiceError::ConstraintViolation(format!(
                    "Employee {} was changed by a concurrent write",
                    id
                ))
            }
            WriteStep::ClaimEmail(email) => {
                ServiceError::ConstraintViolation(format!("Email already in use: {}", email))
            }
            WriteStep::ReleaseEmail(email) => ServiceError::InternalError(format!(
                "Email claim for {} is held by another employee",
                email
            )),
        }
    }
}

/// DynamoDB store for employees
///
/// Records live in the employee table keyed by `id`. Email uniqueness is
/// enforced through a second table keyed by `email`; every write touching a
/// record and its email claim goes through one `TransactWriteItems` call.
pub struct DynamoEmployeeStore {
    client: Client,
    table_name: String,
    email_table_name: String,
}

impl DynamoEmployeeStore {
    /// Creates a new DynamoDB store using the default AWS configuration chain
    pub async fn new(table_name: impl Into<String>, email_table_name: impl Into<String>) -> Self {
        // Use the recommended defaults() function with latest behavior version
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let client = Client::new(&config);

        Self::with_client_and_tables(client, table_name.into(), email_table_name.into())
    }

    /// Creates a new DynamoDB store with the specified client and table names.
    /// This is mainly useful for testing with a local DynamoDB instance.
    pub fn with_client_and_tables(
        client: Client,
        table_name: String,
        email_table_name: String,
    ) -> Self {
        info!(
            "Using DynamoDB tables '{}' (employees) and '{}' (emails)",
            table_name, email_table_name
        );
        Self {
            client,
            table_name,
            email_table_name,
        }
    }

    fn insert_employee(&self, employee: &Employee) -> Result<TransactWriteItem> {
        let item: HashMap<String, AttributeValue> = to_item(employee)?;

        let put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(id)")
            .build()?;

        Ok(TransactWriteItem::builder().put(put).build())
    }

    /// Overwrites a record only while it still holds the email read before the write
    fn overwrite_employee(
        &self,
        employee: &Employee,
        stored_email: &str,
    ) -> Result<TransactWriteItem> {
        let item: HashMap<String, AttributeValue> = to_item(employee)?;

        let put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression(format!(
                "attribute_exists(id) AND {}",
                RECORD_EMAIL_CONDITION
            ))
            .expression_attribute_names("#email", "email")
            .expression_attribute_values(
                ":stored_email",
                AttributeValue::S(stored_email.to_string()),
            )
            .build()?;

        Ok(TransactWriteItem::builder().put(put).build())
    }

    fn delete_employee(&self, id: &str, stored_email: &str) -> Result<TransactWriteItem> {
        let key = HashMap::from([("id".to_string(), AttributeValue::S(id.to_string()))]);

        let delete = Delete::builder()
            .table_name(&self.table_name)
            .set_key(Some(key))
            .condition_expression(RECORD_EMAIL_CONDITION)
            .expression_attribute_names("#email", "email")
            .expression_attribute_values(
                ":stored_email",
                AttributeValue::S(stored_email.to_string()),
            )
            .build()?;

        Ok(TransactWriteItem::builder().delete(delete).build())
    }

    fn claim_email(&self, email: &str, employee_id: &str) -> Result<TransactWriteItem> {
        let claim = EmailClaim {
            email: email.to_string(),
            employee_id: employee_id.to_string(),
        };
        let item: HashMap<String, AttributeValue> = to_item(claim)?;

        let put = Put::builder()
            .table_name(&self.email_table_name)
            .set_item(Some(item))
            .condition_expression(CLAIM_CONDITION)
            .expression_attribute_values(
                ":employee_id",
                AttributeValue::S(employee_id.to_string()),
            )
            .build()?;

        Ok(TransactWriteItem::builder().put(put).build())
    }

    fn release_email(&self, email: &str, employee_id: &str) -> Result<TransactWriteItem> {
        let key = HashMap::from([("email".to_string(), AttributeValue::S(email.to_string()))]);

        // Never drop a claim that belongs to someone else
        let delete = Delete::builder()
            .table_name(&self.email_table_name)
            .set_key(Some(key))
            .condition_expression(CLAIM_CONDITION)
            .expression_attribute_values(
                ":employee_id",
                AttributeValue::S(employee_id.to_string()),
            )
            .build()?;

        Ok(TransactWriteItem::builder().delete(delete).build())
    }

    /// Runs the writes as one transaction. A cancelled transaction is
    /// explained by the first write whose condition failed.
    async fn commit(&self, writes: Vec<(WriteStep, TransactWriteItem)>) -> Result<()> {
        let (steps, items): (Vec<WriteStep>, Vec<TransactWriteItem>) =
            writes.into_iter().unzip();

        let err = match self
            .client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await
        {
            Ok(_) => return Ok(()),
            Err(err) => err,
        };

        let reasons = cancellation_reasons(&err);
        let failed = failed_condition_indexes(reasons);
        if let Some(step) = failed.first().and_then(|index| steps.get(*index)) {
            debug!("Transaction cancelled by {:?}", step);
            return Err(step.condition_failed());
        }
        if has_transaction_conflict(reasons) {
            return Err(ServiceError::ConstraintViolation(
                "Employee records were changed by a concurrent write".to_string(),
            ));
        }

        Err(map_dynamo_error("transact_write_items", err))
    }
}

#[async_trait]
impl EmployeeStore for DynamoEmployeeStore {
    /// Scans the whole employee table, following pagination
    async fn find_all(&self) -> Result<Vec<Employee>> {
        let mut employees = Vec::new();
        let mut last_key = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .consistent_read(true)
                .set_exclusive_start_key(last_key.take())
                .send()
                .await
                .map_err(map_scan_dynamo_error)?;

            for item in response.items() {
                let employee: Employee = from_item(item.clone())?;
                employees.push(employee);
            }

            match response.last_evaluated_key() {
                Some(key) => last_key = Some(key.clone()),
                None => break,
            }
        }

        debug!("Scanned {} employees", employees.len());
        employees.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(employees)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        let key = HashMap::from([("id".to_string(), AttributeValue::S(id.to_string()))]);

        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_dynamo_error)?;

        match response.item() {
            Some(item) => {
                let employee: Employee = from_item(item.clone())?;
                Ok(Some(employee))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, mut employee: Employee) -> Result<Employee> {
        validate_employee(&employee)?;

        let stored = match &employee.id {
            Some(id) => self.find_by_id(id).await?,
            None => None,
        };

        let id = employee
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        employee.id = Some(id.clone());

        let mut writes = Vec::new();
        match stored {
            Some(stored) => {
                debug!("Overwriting employee {}", id);
                employee.created_at = stored.created_at;
                employee.updated_at = Some(next_update_timestamp(stored.updated_at));

                // Claim the saved email even when unchanged, so a release that
                // raced this write cannot leave the record without a claim
                writes.push((
                    WriteStep::ClaimEmail(employee.email.clone()),
                    self.claim_email(&employee.email, &id)?,
                ));
                writes.push((
                    WriteStep::OverwriteRecord(id.clone()),
                    self.overwrite_employee(&employee, &stored.email)?,
                ));
                if stored.email != employee.email {
                    writes.push((
                        WriteStep::ReleaseEmail(stored.email.clone()),
                        self.release_email(&stored.email, &id)?,
                    ));
                }
            }
            None => {
                debug!("Inserting employee {}", id);
                let created = now();
                employee.created_at = Some(created);
                employee.updated_at = Some(created);

                writes.push((
                    WriteStep::ClaimEmail(employee.email.clone()),
                    self.claim_email(&employee.email, &id)?,
                ));
                writes.push((
                    WriteStep::InsertRecord(id.clone()),
                    self.insert_employee(&employee)?,
                ));
            }
        }

        self.commit(writes).await?;

        Ok(employee)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        for _ in 0..DELETE_ATTEMPTS {
            let Some(stored) = self.find_by_id(id).await? else {
                debug!("Delete of unknown employee {} ignored", id);
                return Ok(());
            };

            let writes = vec![
                (
                    WriteStep::DeleteRecord(id.to_string()),
                    self.delete_employee(id, &stored.email)?,
                ),
                (
                    WriteStep::ReleaseEmail(stored.email.clone()),
                    self.release_email(&stored.email, id)?,
                ),
            ];

            match self.commit(writes).await {
                // The record changed or vanished since it was read
                Err(ServiceError::ConstraintViolation(reason)) => {
                    debug!("Retrying delete of employee {}: {}", id, reason);
                }
                other => return other,
            }
        }

        Err(ServiceError::ConstraintViolation(format!(
            "Employee {} kept changing during delete",
            id
        )))
    }
}

//! # DynamoDB test utilities
//!
//! These utilities set up and manage DynamoDB Local tables for tests that
//! run against a real store.
//!
//! ## Example
//! ```rust,ignore
//! use employee_shared::test_utils::test_logging::init_test_logging;
//! use employee_shared::test_utils::dynamo_test_utils;
//!
//! # async fn example() {
//! init_test_logging();
//! if dynamo_test_utils::use_dynamodb() {
//!     let client = dynamo_test_utils::create_dynamo_client().await;
//!     dynamo_test_utils::create_employee_tables(&client, "employees", "employee-emails")
//!         .await
//!         .unwrap();
//! }
//! # }
//! ```

use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use std::error::Error;
// Use log macros, but ensure test_logging::init_test_logging() is called in test files
use log::{debug, error, info};

// Constants for DynamoDB tests
pub const DYNAMO_LOCAL_URI: &str = "http://localhost:8000";

// Helper to check if DynamoDB integration tests should be used
pub fn use_dynamodb() -> bool {
    std::env::var("USE_DYNAMODB").unwrap_or_default() == "true"
}

// Helper to set up a DynamoDB client for local testing
pub async fn create_dynamo_client() -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .endpoint_url(DYNAMO_LOCAL_URI)
        .load()
        .await;

    Client::new(&config)
}

// Helper to (re)create a table whose only key is a string hash key
pub async fn create_hash_key_table(
    client: &Client,
    table_name: &str,
    key_attribute: &str,
) -> Result<(), Box<dyn Error>> {
    info!("Creating dynamo table '{}' keyed by '{}'", table_name, key_attribute);

    // Check if table already exists
    let tables = client.list_tables().send().await?;
    if tables.table_names().contains(&table_name.to_string()) {
        info!("Table '{}' already exists, deleting it first...", table_name);
        client.delete_table().table_name(table_name).send().await?;

        // Wait for table deletion to complete
        loop {
            let tables = client.list_tables().send().await?;
            if !tables.table_names().contains(&table_name.to_string()) {
                info!("Table '{}' successfully deleted!", table_name);
                break;
            }
            debug!("Table '{}' still exists, waiting...", table_name);
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        }
    }

    let key = KeySchemaElement::builder()
        .attribute_name(key_attribute)
        .key_type(KeyType::Hash)
        .build()?;

    let key_attr = AttributeDefinition::builder()
        .attribute_name(key_attribute)
        .attribute_type(ScalarAttributeType::S)
        .build()?;

    client
        .create_table()
        .table_name(table_name)
        .key_schema(key)
        .attribute_definitions(key_attr)
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(5)
                .write_capacity_units(5)
                .build()?,
        )
        .send()
        .await?;

    // Wait for the table to become ACTIVE before running tests
    info!("Waiting for table '{}' to become ACTIVE...", table_name);
    loop {
        let resp = client.describe_table().table_name(table_name).send().await?;
        let status = resp.table().and_then(|desc| desc.table_status());
        if status == Some(&TableStatus::Active) {
            break;
        }
        debug!("Table '{}' status: {:?}", table_name, status);
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    }

    info!("Table '{}' is ready for testing!", table_name);
    Ok(())
}

// Helper to create both tables the employee store needs
pub async fn create_employee_tables(
    client: &Client,
    table_name: &str,
    email_table_name: &str,
) -> Result<(), Box<dyn Error>> {
    create_hash_key_table(client, table_name, "id").await?;
    create_hash_key_table(client, email_table_name, "email").await
}

// Helper to clean a DynamoDB table between tests
pub async fn clear_dynamo_table(client: &Client, table_name: &str, key_attribute: &str) {
    let mut last_key = None;
    loop {
        let scan_resp = match client
            .scan()
            .table_name(table_name)
            .set_exclusive_start_key(last_key.take())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                // Ignore scan errors to keep the test running
                error!("Failed to scan table '{}': {}", table_name, e);
                break;
            }
        };

        for item in scan_resp.items() {
            let Some(AttributeValue::S(key)) = item.get(key_attribute) else {
                continue;
            };

            if let Err(e) = client
                .delete_item()
                .table_name(table_name)
                .key(key_attribute, AttributeValue::S(key.clone()))
                .send()
                .await
            {
                error!(
                    "Failed to delete item '{}' from table '{}': {}",
                    key, table_name, e
                );
            }
        }

        match scan_resp.last_evaluated_key() {
            Some(key) => last_key = Some(key.clone()),
            None => break,
        }
    }
}

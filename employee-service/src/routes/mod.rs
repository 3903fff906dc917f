use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware,
    routing::get,
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{Config, StoreBackend};
use crate::handlers::employee_handlers::{
    create_employee, delete_employee, get_employee, get_employees, update_employee,
};
use crate::service::EmployeeService;
use employee_shared::store::{
    dynamo::DynamoEmployeeStore, memory::MemoryEmployeeStore, EmployeeStore,
};

/// Creates a router backed by the store the configuration selects
pub async fn create_router(config: &Config) -> Router {
    match config.store_backend {
        StoreBackend::DynamoDb => {
            info!("Creating router with DynamoDB store");
            let store =
                DynamoEmployeeStore::new(&config.table_name, &config.email_table_name).await;
            create_router_with_store(Arc::new(store), config)
        }
        StoreBackend::Memory => {
            warn!("Creating router with in-memory store; data is lost on restart");
            create_router_with_store(Arc::new(MemoryEmployeeStore::new()), config)
        }
    }
}

/// Creates a router with a given store implementation
pub fn create_router_with_store<S>(store: Arc<S>, config: &Config) -> Router
where
    S: EmployeeStore + 'static,
{
    let prefix = config.base_path.as_str();
    info!("Setting up API routes with prefix: '{}'", prefix);

    let service = Arc::new(EmployeeService::new(store));

    // Only the configured origin may call the API from a browser; list mode
    // leaves other origins without an allow header
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([config.cors_allowed_origin.clone()]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    info!("CORS configured for origin {:?}", config.cors_allowed_origin);

    // Logging middleware to trace all requests
    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        let response = next.run(req).await;
        info!("Responding with status {}", response.status());
        response
    }

    let api_routes = Router::new()
        .route("/employees", get(get_employees::<S>).post(create_employee::<S>))
        .route(
            "/employees/:id",
            get(get_employee::<S>)
                .put(update_employee::<S>)
                .delete(delete_employee::<S>),
        )
        .with_state(service);

    let router = if prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(prefix, api_routes)
    };

    router
        .fallback(|req: Request| async move {
            warn!("No route matched for: {} {}", req.method(), req.uri());
            (
                StatusCode::NOT_FOUND,
                "The requested resource was not found".to_string(),
            )
        })
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}

//! StaffDesk Server - HR & ICT Resource Administration
//!
//! A Rust REST API server for HR and ICT asset administration.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use staffdesk_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("staffdesk_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StaffDesk Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository.clone(),
        config.email.clone(),
        config.provisioning.clone(),
    )
    .expect("Failed to create services");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        repository,
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Employees
        .route("/employees", get(api::employees::list_employees))
        .route("/employees", post(api::employees::create_employee))
        .route("/employees/:id", get(api::employees::get_employee))
        .route("/employees/:id", put(api::employees::update_employee))
        .route("/employees/:id", delete(api::employees::delete_employee))
        // Equipment catalog
        .route("/equipment", get(api::equipment::list_equipment))
        .route("/equipment", post(api::equipment::create_equipment))
        .route("/equipment/:id", get(api::equipment::get_equipment))
        .route("/equipment/:id", put(api::equipment::update_equipment))
        .route("/equipment/:id", delete(api::equipment::delete_equipment))
        // Email applications
        .route("/email-applications", get(api::email_applications::list_email_applications))
        .route("/email-applications", post(api::email_applications::create_email_application))
        .route("/email-applications/:id", get(api::email_applications::get_email_application))
        .route("/email-applications/:id", put(api::email_applications::update_email_application))
        .route("/email-applications/:id", delete(api::email_applications::delete_email_application))
        .route("/email-applications/:id/submit", post(api::email_applications::submit_email_application))
        .route("/email-applications/:id/cancel", post(api::email_applications::cancel_email_application))
        .route("/email-applications/:id/decision", post(api::email_applications::decide_email_application))
        .route("/email-applications/:id/provision", post(api::email_applications::provision_email_application))
        .route("/email-applications/:id/approvals", get(api::email_applications::list_email_application_approvals))
        // Loan applications
        .route("/loan-applications", get(api::loan_applications::list_loan_applications))
        .route("/loan-applications", post(api::loan_applications::create_loan_application))
        .route("/loan-applications/flag-overdue", post(api::loan_applications::flag_overdue))
        .route("/loan-applications/:id", get(api::loan_applications::get_loan_application))
        .route("/loan-applications/:id", put(api::loan_applications::update_loan_application))
        .route("/loan-applications/:id", delete(api::loan_applications::delete_loan_application))
        .route("/loan-applications/:id/submit", post(api::loan_applications::submit_loan_application))
        .route("/loan-applications/:id/cancel", post(api::loan_applications::cancel_loan_application))
        .route("/loan-applications/:id/decision", post(api::loan_applications::decide_loan_application))
        .route("/loan-applications/:id/approvals", get(api::loan_applications::list_loan_application_approvals))
        .route("/loan-applications/:id/issue", post(api::loan_applications::issue_equipment))
        .route("/loan-applications/:id/transactions", get(api::loan_applications::list_loan_transactions))
        // Loan transactions
        .route("/loan-transactions/:id/return", post(api::loan_applications::return_equipment))
        // Approval queue
        .route("/approvals/pending", get(api::approvals::list_pending_approvals))
        // Leave requests
        .route("/leave-requests", get(api::leave::list_leave_requests))
        .route("/leave-requests", post(api::leave::create_leave_request))
        .route("/leave-requests/:id/decision", post(api::leave::decide_leave_request))
        .route("/leave-requests/:id/cancel", post(api::leave::cancel_leave_request))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

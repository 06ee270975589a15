//! StaffDesk HR & ICT Resource Administration System
//!
//! A Rust implementation of the StaffDesk administration server, providing
//! a REST JSON API for employee records, leave tracking, equipment loans
//! with a multi-stage approval workflow, and mailbox provisioning requests.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: repository::Repository,
    pub services: Arc<services::Services>,
}

//! Configuration loading and management for the payroll service.
//!
//! This module provides functionality to load service settings and payroll
//! policy from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use edutack_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/edutack").unwrap();
//! println!("Tax rate: {}", config.policy().tax_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EmailConfig, InstitutionConfig, PayrollPolicy, PolicyFile, ServerConfig, ServiceConfig,
    StorageConfig,
};

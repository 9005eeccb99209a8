//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::workflow::PayslipWorkflow;

/// Shared application state.
///
/// Holds the payslip workflow, which owns every backend the handlers use.
#[derive(Clone)]
pub struct AppState {
    workflow: Arc<PayslipWorkflow>,
}

impl AppState {
    /// Creates a new application state around the workflow.
    pub fn new(workflow: PayslipWorkflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
        }
    }

    /// Returns the payslip workflow.
    pub fn workflow(&self) -> &PayslipWorkflow {
        &self.workflow
    }
}

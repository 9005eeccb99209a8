//! Payroll and payslip engine for the Edutack academic management system.
//!
//! This crate aggregates staff attendance for a month, resolves a basic
//! salary, computes earnings and deductions, renders a PDF payslip, stores
//! it uniquely per staff member and month, and emails it to the staff member.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod delivery;
pub mod error;
pub mod models;
pub mod render;
pub mod storage;
pub mod workflow;

//! Persistence seams for payslips, staff and attendance.
//!
//! The workflow only talks to the traits in this module. In-memory
//! implementations back the standalone service and the tests.

mod memory;
mod seed;
mod traits;

pub use memory::{MemoryAttendanceSource, MemoryPayslipStore, MemoryStaffDirectory};
pub use seed::SeedData;
pub use traits::{AttendanceSource, PayslipStore, StaffDirectory};

//! Staff and attendance seed data.
//!
//! Staff and attendance belong to other subsystems. A standalone deployment
//! loads them from a YAML seed file into the in-memory backends.

use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{AttendanceRecord, StaffProfile};

use super::memory::{MemoryAttendanceSource, MemoryStaffDirectory};

/// Seed file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// Staff profiles, in bulk-generation order.
    #[serde(default)]
    pub staff: Vec<StaffProfile>,
    /// Attendance records.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl SeedData {
    /// Loads seed data from a YAML file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        ConfigLoader::load_yaml(path)
    }

    /// Builds in-memory backends holding this data.
    pub fn into_backends(self) -> (MemoryStaffDirectory, MemoryAttendanceSource) {
        (
            MemoryStaffDirectory::new(self.staff),
            MemoryAttendanceSource::new(self.attendance),
        )
    }
}

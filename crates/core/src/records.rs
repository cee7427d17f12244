//! Read-only rows served by the data lookup

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conversation::JobId;

/// An open position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub job_id: JobId,
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub openings: u32,
    #[serde(default)]
    pub contact_email: String,
}

/// Scheduled interview for a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSlot {
    pub job_id: JobId,
    #[serde(default)]
    pub title: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub interviewer: String,
}

/// Staff member with leave entitlements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_no: String,
    pub name: String,
    #[serde(default)]
    pub annual_leave_days: f64,
    #[serde(default)]
    pub casual_leave_days: f64,
    #[serde(default)]
    pub joined_on: Option<NaiveDate>,
}

//! In-memory tables and the queries served from them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use hr_assistant_core::{EmployeeRecord, InterviewSlot, JobId, JobListing};

/// Shortest identifier that may match a name substring
const MIN_NAME_NEEDLE: usize = 3;

/// Jobs, interviews and staff rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupTables {
    pub jobs: Vec<JobListing>,
    pub interviews: Vec<InterviewSlot>,
    #[serde(alias = "staff")]
    pub employees: Vec<EmployeeRecord>,
}

impl LookupTables {
    /// First interview row for the job
    pub fn interview_for(&self, job_id: JobId) -> Option<&InterviewSlot> {
        self.interviews.iter().find(|slot| slot.job_id == job_id)
    }

    /// Exact employee number (case-insensitive), else the first name containing
    /// the identifier when it is at least three characters long
    pub fn find_employee(&self, id_or_name: &str) -> Option<&EmployeeRecord> {
        let needle = id_or_name.trim();
        if needle.is_empty() {
            return None;
        }
        if let Some(record) = self
            .employees
            .iter()
            .find(|e| e.employee_no.trim().eq_ignore_ascii_case(needle))
        {
            return Some(record);
        }
        if needle.chars().count() < MIN_NAME_NEEDLE {
            return None;
        }
        let needle = needle.to_lowercase();
        self.employees
            .iter()
            .find(|e| e.name.to_lowercase().contains(&needle))
    }

    /// Small built-in data set for local runs
    pub fn sample() -> Self {
        let job = |id: u64, title: &str, department: &str, openings: u32, email: &str| JobListing {
            job_id: JobId::new(id),
            title: title.to_string(),
            department: department.to_string(),
            location: "Head Office".to_string(),
            openings,
            contact_email: email.to_string(),
        };
        let employee = |no: &str, name: &str, annual: f64, casual: f64, joined: Option<NaiveDate>| {
            EmployeeRecord {
                employee_no: no.to_string(),
                name: name.to_string(),
                annual_leave_days: annual,
                casual_leave_days: casual,
                joined_on: joined,
            }
        };

        Self {
            jobs: vec![
                job(101, "Software Engineer", "Technology", 2, "tech.hiring@example.com"),
                job(102, "Accountant", "Finance", 1, "finance.hiring@example.com"),
                job(103, "HR Executive", "Human Resources", 1, "hr@example.com"),
            ],
            interviews: vec![InterviewSlot {
                job_id: JobId::new(101),
                title: "Software Engineer".to_string(),
                date: "2026-11-02".to_string(),
                time: "10:00 AM".to_string(),
                location: "Head Office, Meeting Room 2".to_string(),
                interviewer: "Engineering Manager".to_string(),
            }],
            employees: vec![
                employee("E1001", "Perera", 14.0, 7.0, NaiveDate::from_ymd_opt(2019, 3, 1)),
                employee("E1002", "Silva", 14.0, 7.0, NaiveDate::from_ymd_opt(2021, 8, 16)),
                employee("E1003", "Fernando", 10.5, 7.0, None),
            ],
        }
    }
}

//! Spreadsheet-backed data lookup
//!
//! Reads a workbook (xlsx, xls or ods) once with calamine and serves the rows
//! from memory. Expected sheets, matched case-insensitively:
//!
//! | Sheet | Columns |
//! |---|---|
//! | `Jobs` | `JOB_ID`, `TITLE`, `DEPARTMENT`, `LOCATION`, `OPENINGS`, `CONTACT_EMAIL` |
//! | `Interviews` | `JOB_ID`, `TITLE`, `DATE`, `TIME`, `LOCATION`, `INTERVIEWER` |
//! | `Staff` (or `Sheet1`) | `EMP_NO`, `LNAME`, `Annual Entitle`, `Casual Entitle`, `FADAY` |
//!
//! A missing sheet yields an empty table.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use calamine::Reader;
use chrono::NaiveDate;

use hr_assistant_core::{
    DataLookup, EmployeeRecord, InterviewSlot, JobId, JobListing, LookupError,
};

use crate::error::PersistenceError;
use crate::memory::InMemoryLookup;
use crate::tables::LookupTables;

const JOBS_SHEETS: &[&str] = &["Jobs"];
const INTERVIEWS_SHEETS: &[&str] = &["Interviews"];
const STAFF_SHEETS: &[&str] = &["Staff", "Sheet1"];

/// Rows of one sheet as trimmed cell text, header first
pub type SheetRows = Vec<Vec<String>>;

/// Lookup over a workbook loaded at startup
#[derive(Debug, Clone)]
pub struct SpreadsheetLookup {
    inner: InMemoryLookup,
}

impl SpreadsheetLookup {
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if !path.exists() {
            return Err(PersistenceError::FileNotFound(path.display().to_string()));
        }
        let mut workbook = calamine::open_workbook_auto(path)
            .map_err(|e| PersistenceError::Spreadsheet(format!("failed to open workbook: {}", e)))?;
        let sheet_names: Vec<String> = workbook.sheet_names().iter().map(|s| s.to_string()).collect();

        let mut read = |candidates: &[&str]| -> Result<Option<SheetRows>, PersistenceError> {
            let Some(name) = candidates.iter().find_map(|wanted| {
                sheet_names.iter().find(|n| n.eq_ignore_ascii_case(wanted))
            }) else {
                tracing::warn!(path = %path.display(), sheets = ?candidates, "Sheet not found, table left empty");
                return Ok(None);
            };
            let range = workbook
                .worksheet_range(name)
                .map_err(|e| PersistenceError::Spreadsheet(format!("sheet '{}': {}", name, e)))?;
            let rows = range
                .rows()
                .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
                .collect();
            Ok(Some(rows))
        };

        let jobs = read(JOBS_SHEETS)?;
        let interviews = read(INTERVIEWS_SHEETS)?;
        let staff = read(STAFF_SHEETS)?;
        let lookup = Self::from_rows(jobs.as_deref(), interviews.as_deref(), staff.as_deref())?;

        let tables = lookup.inner.tables();
        tracing::info!(
            path = %path.display(),
            jobs = tables.jobs.len(),
            interviews = tables.interviews.len(),
            employees = tables.employees.len(),
            "Loaded workbook"
        );
        Ok(lookup)
    }

    /// Build from raw sheet rows; `None` means the sheet is absent
    pub fn from_rows(
        jobs: Option<&[Vec<String>]>,
        interviews: Option<&[Vec<String>]>,
        staff: Option<&[Vec<String>]>,
    ) -> Result<Self, PersistenceError> {
        let tables = LookupTables {
            jobs: jobs.map(parse_jobs).transpose()?.unwrap_or_default(),
            interviews: interviews.map(parse_interviews).transpose()?.unwrap_or_default(),
            employees: staff.map(parse_staff).transpose()?.unwrap_or_default(),
        };
        Ok(Self {
            inner: InMemoryLookup::new(tables),
        })
    }

    pub fn tables(&self) -> &LookupTables {
        self.inner.tables()
    }
}

#[async_trait]
impl DataLookup for SpreadsheetLookup {
    async fn list_open_jobs(&self) -> Result<Vec<JobListing>, LookupError> {
        self.inner.list_open_jobs().await
    }

    async fn interview_for(&self, job_id: JobId) -> Result<Option<InterviewSlot>, LookupError> {
        self.inner.interview_for(job_id).await
    }

    async fn lookup_employee(
        &self,
        id_or_name: &str,
    ) -> Result<Option<EmployeeRecord>, LookupError> {
        self.inner.lookup_employee(id_or_name).await
    }
}

/// Header name to column index
struct Columns<'a> {
    sheet: &'a str,
    index: HashMap<String, usize>,
}

impl<'a> Columns<'a> {
    fn from_header(
        sheet: &'a str,
        header: &[String],
        required: &[&str],
    ) -> Result<Self, PersistenceError> {
        let index: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| (header_key(name), i))
            .collect();
        for column in required {
            if !index.contains_key(&header_key(column)) {
                return Err(PersistenceError::MissingColumn {
                    sheet: sheet.to_string(),
                    column: column.to_string(),
                });
            }
        }
        Ok(Self { sheet, index })
    }

    fn get<'r>(&self, row: &'r [String], column: &str) -> &'r str {
        self.index
            .get(&header_key(column))
            .and_then(|&i| row.get(i))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    fn invalid(&self, row: usize, reason: String) -> PersistenceError {
        PersistenceError::InvalidRow {
            sheet: self.sheet.to_string(),
            row,
            reason,
        }
    }
}

fn header_key(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Data rows with their 1-based sheet row numbers, skipping blank rows
fn data_rows(rows: &[Vec<String>]) -> impl Iterator<Item = (usize, &[String])> {
    rows.iter()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
        .map(|(i, row)| (i + 1, row.as_slice()))
}

/// Integer cell; spreadsheet numbers often arrive as `101` or `101.0`
fn parse_whole(value: &str) -> Option<u64> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    let f = value.parse::<f64>().ok()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

fn parse_jobs(rows: &[Vec<String>]) -> Result<Vec<JobListing>, PersistenceError> {
    let Some(header) = rows.first() else {
        return Ok(Vec::new());
    };
    let cols = Columns::from_header("Jobs", header, &["JOB_ID", "TITLE"])?;

    data_rows(rows)
        .map(|(n, row)| {
            let raw_id = cols.get(row, "JOB_ID");
            let job_id = parse_whole(raw_id)
                .ok_or_else(|| cols.invalid(n, format!("invalid job id '{}'", raw_id)))?;
            let raw_openings = cols.get(row, "OPENINGS");
            let openings = if raw_openings.is_empty() {
                0
            } else {
                parse_whole(raw_openings)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| cols.invalid(n, format!("invalid openings '{}'", raw_openings)))?
            };
            Ok(JobListing {
                job_id: JobId::new(job_id),
                title: cols.get(row, "TITLE").to_string(),
                department: cols.get(row, "DEPARTMENT").to_string(),
                location: cols.get(row, "LOCATION").to_string(),
                openings,
                contact_email: cols.get(row, "CONTACT_EMAIL").to_string(),
            })
        })
        .collect()
}

fn parse_interviews(rows: &[Vec<String>]) -> Result<Vec<InterviewSlot>, PersistenceError> {
    let Some(header) = rows.first() else {
        return Ok(Vec::new());
    };
    let cols = Columns::from_header("Interviews", header, &["JOB_ID", "DATE", "TIME"])?;

    data_rows(rows)
        .map(|(n, row)| {
            let raw_id = cols.get(row, "JOB_ID");
            let job_id = parse_whole(raw_id)
                .ok_or_else(|| cols.invalid(n, format!("invalid job id '{}'", raw_id)))?;
            let raw_date = cols.get(row, "DATE");
            let date = parse_date(raw_date)
                .map(|d| d.to_string())
                .unwrap_or_else(|| raw_date.to_string());
            Ok(InterviewSlot {
                job_id: JobId::new(job_id),
                title: cols.get(row, "TITLE").to_string(),
                date,
                time: cols.get(row, "TIME").to_string(),
                location: cols.get(row, "LOCATION").to_string(),
                interviewer: cols.get(row, "INTERVIEWER").to_string(),
            })
        })
        .collect()
}

fn parse_staff(rows: &[Vec<String>]) -> Result<Vec<EmployeeRecord>, PersistenceError> {
    let Some(header) = rows.first() else {
        return Ok(Vec::new());
    };
    let cols = Columns::from_header("Staff", header, &["EMP_NO", "LNAME"])?;

    let days = |n: usize, row: &[String], column: &str| -> Result<f64, PersistenceError> {
        let raw = cols.get(row, column);
        if raw.is_empty() {
            return Ok(0.0);
        }
        raw.parse::<f64>()
            .map_err(|_| cols.invalid(n, format!("invalid {} '{}'", column, raw)))
    };

    data_rows(rows)
        .map(|(n, row)| {
            let raw_joined = cols.get(row, "FADAY");
            let joined_on = if raw_joined.is_empty() {
                None
            } else {
                let parsed = parse_date(raw_joined);
                if parsed.is_none() {
                    tracing::warn!(row = n, value = raw_joined, "Unrecognised FADAY value");
                }
                parsed
            };
            Ok(EmployeeRecord {
                employee_no: cols.get(row, "EMP_NO").to_string(),
                name: cols.get(row, "LNAME").to_string(),
                annual_leave_days: days(n, row, "Annual Entitle")?,
                casual_leave_days: days(n, row, "Casual Entitle")?,
                joined_on,
            })
        })
        .collect()
}

/// Dates as text (`2021-08-16`, `2021-08-16T00:00:00`, `16/08/2021`) or as
/// spreadsheet serial numbers
fn parse_date(value: &str) -> Option<NaiveDate> {
    let day_part = value.split(['T', ' ']).next().unwrap_or(value);
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(day_part, format) {
            return Some(date);
        }
    }
    let serial = value.parse::<f64>().ok()?;
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    // Serial day 0 is 1899-12-30 in the 1900 date system
    NaiveDate::from_ymd_opt(1899, 12, 30)?
        .checked_add_days(chrono::Days::new(serial.floor() as u64))
}

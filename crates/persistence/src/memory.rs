//! In-memory data lookup

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use hr_assistant_core::{DataLookup, EmployeeRecord, InterviewSlot, JobId, JobListing, LookupError};

use crate::error::PersistenceError;
use crate::tables::LookupTables;

/// Lookup over tables built in code or loaded from YAML
#[derive(Debug, Clone, Default)]
pub struct InMemoryLookup {
    tables: Arc<LookupTables>,
}

impl InMemoryLookup {
    pub fn new(tables: LookupTables) -> Self {
        Self {
            tables: Arc::new(tables),
        }
    }

    /// Built-in sample tables
    pub fn sample() -> Self {
        Self::new(LookupTables::sample())
    }

    /// Load tables from a YAML file with `jobs`, `interviews` and `employees`
    pub fn from_yaml_file(path: &Path) -> Result<Self, PersistenceError> {
        if !path.exists() {
            return Err(PersistenceError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let tables: LookupTables = serde_yaml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            jobs = tables.jobs.len(),
            interviews = tables.interviews.len(),
            employees = tables.employees.len(),
            "Loaded data tables"
        );
        Ok(Self::new(tables))
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }
}

#[async_trait]
impl DataLookup for InMemoryLookup {
    async fn list_open_jobs(&self) -> Result<Vec<JobListing>, LookupError> {
        Ok(self.tables.jobs.clone())
    }

    async fn interview_for(&self, job_id: JobId) -> Result<Option<InterviewSlot>, LookupError> {
        Ok(self.tables.interview_for(job_id).cloned())
    }

    async fn lookup_employee(
        &self,
        id_or_name: &str,
    ) -> Result<Option<EmployeeRecord>, LookupError> {
        Ok(self.tables.find_employee(id_or_name).cloned())
    }
}

//! Data sources for the HR assistant
//!
//! Provides read-only lookups for:
//! - Open job listings
//! - Interview schedules
//! - Staff leave entitlements
//!
//! Tables are loaded once at startup (built-in samples, a YAML file or a
//! spreadsheet) and served from memory.

pub mod error;
pub mod memory;
pub mod spreadsheet;
pub mod tables;

use std::sync::Arc;

use hr_assistant_config::{DataConfig, DataSource};
use hr_assistant_core::DataLookup;

pub use error::PersistenceError;
pub use memory::InMemoryLookup;
pub use spreadsheet::SpreadsheetLookup;
pub use tables::LookupTables;

/// Open the data source selected in configuration
pub fn open_lookup(config: &DataConfig) -> Result<Arc<dyn DataLookup>, PersistenceError> {
    let lookup: Arc<dyn DataLookup> = match (config.source, config.path.as_deref()) {
        (DataSource::Inline, _) => Arc::new(InMemoryLookup::sample()),
        (DataSource::Yaml, Some(path)) => Arc::new(InMemoryLookup::from_yaml_file(path)?),
        (DataSource::Spreadsheet, Some(path)) => Arc::new(SpreadsheetLookup::open(path)?),
        (source, None) => {
            return Err(PersistenceError::MissingPath(format!("{:?}", source)));
        }
    };
    Ok(lookup)
}

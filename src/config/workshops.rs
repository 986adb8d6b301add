//! Workshop catalog source

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::workshop::{CatalogError, WorkshopCatalog};

/// Uses the embedded catalog unless `catalog_path` points at a YAML document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkshopsConfig {
    pub catalog_path: Option<PathBuf>,
}

impl WorkshopsConfig {
    pub fn load_catalog(&self) -> Result<WorkshopCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => WorkshopCatalog::from_path(path),
            None => Ok(WorkshopCatalog::builtin().clone()),
        }
    }
}

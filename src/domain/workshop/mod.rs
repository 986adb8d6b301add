//! Workshop module - track definitions and the catalog that holds them.

mod catalog;
pub(crate) mod definition;

pub use catalog::{CatalogError, WorkshopCatalog};
pub use definition::WorkshopDefinition;

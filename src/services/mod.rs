// Service exports
pub mod postgres;

pub use postgres::{CatalogClient, DataAccessError};

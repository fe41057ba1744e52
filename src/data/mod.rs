//! Data module - CSV loading, schema checks and filtering

mod filter;
mod loader;
mod schema;
pub mod table;

pub use filter::{FilterEngine, FilterOptions, FilterSelection};
pub use loader::{DataLoader, LoaderError};
pub use schema::{SchemaError, SchemaGuard};
pub use table::{CrimeRecord, RecordTable};

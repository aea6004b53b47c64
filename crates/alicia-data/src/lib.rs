//! The write-through record cache and pluggable data source.
//!
//! Directors never touch a [`DataSource`] directly; they go through a
//! [`Cache`] owned by the `DataDirector` (see `alicia-server::data`),
//! which serializes all retrieval and storage onto its own tick so a
//! slow disk or database can never stall a listener's reactor thread.

pub mod cache;
pub mod director;
pub mod entity;
pub mod error;
pub mod field;
pub mod file_source;
pub mod record;
pub mod source;

pub use cache::Cache;
pub use director::DataDirector;
pub use error::{DataError, DataResult};
pub use field::Field;
pub use record::Record;
pub use source::DataSource;

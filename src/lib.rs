pub mod analyzers;
pub mod cache;
pub mod coerce;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod output;
pub mod schema;
pub mod stats;

pub use analyzers::aggregate::{counts, record_count};
pub use analyzers::category::{Category, categorize, categorize_all};
pub use analyzers::types::CategoryCount;
pub use error::{AirError, Result};
pub use filter::{DateRange, filter};
pub use loader::load;
pub use model::{CanonicalRecord, CategorizedRecord, Dataset};
pub use output::export;

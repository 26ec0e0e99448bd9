pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod process;
pub mod selection;
pub mod store;

pub use config::Config;
pub use dataset::{Chapter2, Chapter2Record, Dataset, Economic, EconomicRecord};
pub use error::{FetchError, LoadError, MalformedRow};
pub use store::{DatasetStore, LoadOutcome, LoadReport, Snapshot};

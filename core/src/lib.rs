//! Complaint desk core: classification, dashboard queries and analytics
//! over citizen complaints, backed by a SQLite complaint table.

pub mod analytics;
pub mod classifier;
pub mod complaint;
pub mod config;
pub mod desk;
pub mod error;
pub mod query;
pub mod store;
pub mod timeline;
pub mod tracking;
pub mod types;

pub use analytics::{aggregate, aggregate_at, Stats};
pub use classifier::{classify, Classification};
pub use complaint::{Complaint, ComplaintDraft};
pub use desk::ComplaintDesk;
pub use error::{DeskError, DeskResult};
pub use query::{query, Filter, QueryParams, SortBy};

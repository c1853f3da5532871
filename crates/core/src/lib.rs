//! Core library: asset discovery, time-window filtering, sorting, tree building
//! and expansion-state reconciliation.

pub mod browser;
pub mod clock;
pub mod config;
pub mod error;
pub mod expansion;
pub mod filter;
pub mod metadata;
pub mod models;
pub mod scanner;
pub mod search;
pub mod sort;
pub mod tree;

pub use browser::AssetBrowser;
pub use error::BrowserError;
pub use metadata::MetadataProvider;
pub use models::{AssetRecord, SortDirection, SortKey, TimeRange};

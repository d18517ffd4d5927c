//! Resource caching
//!
//! Keeps instance ids, instance tag keys/values and bucket names available
//! for completion without querying AWS on every start.
//!
//! # Architecture
//!
//! - [`category`] - The four resource categories and their cache markers
//! - [`set`] - In-memory collections and per-category refresh flags
//! - [`parse`] - Parses provider text output into collections
//! - [`cache`] - Reads and writes the sectioned cache file
//! - [`store`] - Decides between cache and provider on refresh
//!
//! # Example
//!
//! ```ignore
//! use awsrc::provider::AwsCli;
//! use awsrc::resource::{RefreshFlags, ResourceStore};
//!
//! async fn warm() {
//!     let mut store = ResourceStore::new(AwsCli::default(), "data/RESOURCES.txt", RefreshFlags::default());
//!     store.refresh(false).await;
//!     println!("{:?}", store.resources().bucket_names);
//! }
//! ```

pub mod cache;
mod category;
pub mod parse;
mod set;
mod store;

pub use category::Category;
pub use set::{RefreshFlags, ResourceSet};
pub use store::{RefreshReport, RefreshSource, ResourceStore};

//! awsrc - cached AWS inventory for command completion
//!
//! Instance ids, instance tag keys and values, and S3 bucket names are read
//! from a local cache file, or queried from AWS when the cache is missing or
//! a refresh is forced.

pub mod config;
pub mod error;
pub mod provider;
pub mod resource;

pub use error::ResourceError;

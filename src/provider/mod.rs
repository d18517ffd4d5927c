//! Provider access
//!
//! The store never talks to AWS directly. It asks a [`ResourceProvider`] for
//! the raw text output of one listing per resource category and parses the
//! result itself.
//!
//! # Module Structure
//!
//! - [`aws_cli`] - Runs the `aws` command line tool as a subprocess
//!
//! # Example
//!
//! ```ignore
//! use awsrc::provider::{AwsCli, ResourceProvider};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let cli = AwsCli::new("aws");
//!     let listing = cli.bucket_names().await?;
//!     println!("{}", listing);
//!     Ok(())
//! }
//! ```

pub mod aws_cli;

pub use aws_cli::AwsCli;

use crate::resource::Category;
use anyhow::Result;

/// Source of live resource listings
///
/// Each method returns the provider's raw text output. Authentication,
/// region and profile selection are the implementation's concern.
#[allow(async_fn_in_trait)]
pub trait ResourceProvider {
    /// Instance ids across all reservations
    async fn instance_ids(&self) -> Result<String>;

    /// Tag keys of all tagged instances
    async fn instance_tag_keys(&self) -> Result<String>;

    /// Tag values of all tagged instances
    async fn instance_tag_values(&self) -> Result<String>;

    /// Bucket listing, one bucket per line with the name last
    async fn bucket_names(&self) -> Result<String>;

    /// Dispatch to the listing for `category`
    async fn query(&self, category: Category) -> Result<String> {
        match category {
            Category::InstanceIds => self.instance_ids().await,
            Category::InstanceTagKeys => self.instance_tag_keys().await,
            Category::InstanceTagValues => self.instance_tag_values().await,
            Category::BucketNames => self.bucket_names().await,
        }
    }
}

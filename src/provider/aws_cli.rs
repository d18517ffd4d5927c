//! AWS CLI Provider
//!
//! Runs `aws` subcommands with text output and captures stdout.

use super::ResourceProvider;
use crate::resource::Category;
use anyhow::{bail, Context, Result};
use tokio::process::Command;

/// Provider backed by the `aws` command line tool
#[derive(Debug, Clone)]
pub struct AwsCli {
    /// Program to execute
    pub program: String,
    /// Named profile passed as `--profile`
    pub profile: Option<String>,
    /// Region passed as `--region`
    pub region: Option<String>,
}

impl AwsCli {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            profile: None,
            region: None,
        }
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    /// Full argument list for a category's listing command
    pub fn args_for(&self, category: Category) -> Vec<String> {
        let base: &[&str] = match category {
            Category::InstanceIds => &[
                "ec2",
                "describe-instances",
                "--query",
                "Reservations[].Instances[].[InstanceId]",
                "--output",
                "text",
            ],
            Category::InstanceTagKeys => &[
                "ec2",
                "describe-instances",
                "--filters",
                "Name=tag-key,Values=*",
                "--query",
                "Reservations[].Instances[].Tags[].Key",
                "--output",
                "text",
            ],
            Category::InstanceTagValues => &[
                "ec2",
                "describe-instances",
                "--filters",
                "Name=tag-value,Values=*",
                "--query",
                "Reservations[].Instances[].Tags[].Value",
                "--output",
                "text",
            ],
            Category::BucketNames => &["s3", "ls"],
        };

        let mut args: Vec<String> = base.iter().map(|s| s.to_string()).collect();

        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        if let Some(region) = &self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }

        args
    }

    async fn run(&self, category: Category) -> Result<String> {
        let args = self.args_for(category);

        tracing::info!("Executing: {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            bail!("{} exited with {}: {}", self.program, code, stderr.trim());
        }

        String::from_utf8(output.stdout)
            .with_context(|| format!("{} produced non UTF-8 output", self.program))
    }
}

impl Default for AwsCli {
    fn default() -> Self {
        Self::new("aws")
    }
}

impl ResourceProvider for AwsCli {
    async fn instance_ids(&self) -> Result<String> {
        self.run(Category::InstanceIds).await
    }

    async fn instance_tag_keys(&self) -> Result<String> {
        self.run(Category::InstanceTagKeys).await
    }

    async fn instance_tag_values(&self) -> Result<String> {
        self.run(Category::InstanceTagValues).await
    }

    async fn bucket_names(&self) -> Result<String> {
        self.run(Category::BucketNames).await
    }
}

use anyhow::{Context, Result};
use awsrc::config::Config;
use awsrc::provider::AwsCli;
use awsrc::resource::{Category, RefreshFlags, RefreshSource, ResourceStore};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Cached AWS inventory for shell completion
#[derive(Parser, Debug)]
#[command(name = "awsrc", version, about, long_about = None)]
struct Args {
    /// Cache file to read and write
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    /// AWS profile passed to the aws CLI
    #[arg(long, global = true)]
    profile: Option<String>,

    /// AWS region passed to the aws CLI
    #[arg(long, global = true)]
    region: Option<String>,

    /// Do not query instance ids
    #[arg(long, global = true)]
    no_instance_ids: bool,

    /// Do not query instance tag keys and values
    #[arg(long, global = true)]
    no_instance_tags: bool,

    /// Do not query bucket names
    #[arg(long, global = true)]
    no_bucket_names: bool,

    /// Suppress status lines
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Load resources from cache, querying AWS if there is none
    Refresh {
        /// Ignore the cache and query AWS
        #[arg(short, long)]
        force: bool,
    },
    /// Print cached resources
    Show {
        /// One of: ids, tag-keys, tag-values, buckets (all when omitted)
        category: Option<Category>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print entries of a category starting with a prefix
    Complete {
        /// One of: ids, tag-keys, tag-values, buckets
        category: Category,
        /// Prefix to match
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("awsrc started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("awsrc").join("awsrc.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".awsrc").join("awsrc.log");
    }
    PathBuf::from("awsrc.log")
}

/// Config flags, with CLI `--no-*` switches turning categories off
fn effective_flags(config: &Config, args: &Args) -> RefreshFlags {
    let flags = config.refresh_flags();
    RefreshFlags {
        instance_ids: flags.instance_ids && !args.no_instance_ids,
        instance_tags: flags.instance_tags && !args.no_instance_tags,
        bucket_names: flags.bucket_names && !args.no_bucket_names,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = Config::load();
    let cache_file = config.effective_cache_file(args.cache_file.clone());

    tracing::info!("Using cache file: {:?}", cache_file);

    match args.command {
        None => run_refresh(open_store(&config, &args, cache_file), false, args.quiet).await,
        Some(Cmd::Refresh { force }) => {
            run_refresh(open_store(&config, &args, cache_file), force, args.quiet).await
        }
        Some(Cmd::Show { category, json }) => {
            let shown_path = cache_file.display().to_string();
            // Keep stdout clean for the listing
            let mut store = open_store(&config, &args, cache_file).quiet();
            store.refresh(false).await;
            let resources = store.resources();

            if resources.is_empty() {
                eprintln!("No resources cached in {}", shown_path);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(resources)?);
            } else {
                let categories = match category {
                    Some(c) => vec![c],
                    None => Category::ALL.to_vec(),
                };
                for c in categories {
                    println!("{}", c.marker());
                    for entry in resources.values(c) {
                        println!("{}", entry);
                    }
                }
            }
        }
        Some(Cmd::Complete {
            ref category,
            ref prefix,
        }) => {
            let mut store = open_store(&config, &args, cache_file).quiet();
            store.refresh(false).await;
            for entry in store.resources().completions(*category, prefix) {
                println!("{}", entry);
            }
        }
        Some(Cmd::Config) => {
            println!("cache file: {}", cache_file.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn open_store(config: &Config, args: &Args, cache_file: PathBuf) -> ResourceStore<AwsCli> {
    let provider = AwsCli::new(&config.effective_program())
        .with_profile(args.profile.clone().or_else(|| config.profile.clone()))
        .with_region(args.region.clone().or_else(|| config.region.clone()));

    ResourceStore::new(provider, cache_file, effective_flags(config, args))
}

async fn run_refresh(mut store: ResourceStore<AwsCli>, force: bool, quiet: bool) {
    if quiet {
        store = store.quiet();
    }

    let report = store.refresh(force).await;
    if quiet {
        return;
    }

    let resources = store.resources();
    let origin = match report.source {
        RefreshSource::Cache => "cache",
        RefreshSource::Live => "AWS",
    };
    println!(
        "{} instance ids, {} tag keys, {} tag values, {} buckets (from {})",
        resources.instance_ids.len(),
        resources.instance_tag_keys.len(),
        resources.instance_tag_values.len(),
        resources.bucket_names.len(),
        origin
    );
    if !report.failures.is_empty() {
        println!("{} queries failed, previous values kept", report.failures.len());
    }
}

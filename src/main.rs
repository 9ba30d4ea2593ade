use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tickmerge::config::{Config, DEFAULT_OUTPUT, DEFAULT_PREFIX, DEFAULT_ROOT_DIR};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge rows for one ticker prefix from a tree of CSV files into a single time-sorted CSV"
)]
struct Args {
    /// Directory searched recursively for .csv files.
    #[arg(long, default_value = DEFAULT_ROOT_DIR)]
    root: PathBuf,
    /// Keep rows whose Ticker starts with this text (case-sensitive).
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,
    /// Consolidated CSV to write; replaced if it exists.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

impl Args {
    fn into_config(self) -> Config {
        Config::new(self.root, self.prefix, self.output)
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cfg = Args::parse().into_config();

    tickmerge::run(&cfg)?;
    info!("all done");
    Ok(())
}

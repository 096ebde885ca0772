use std::path::PathBuf;

use clap::{ArgAction, Parser};
use shardget_fetch::core::is_reserved_header;

#[derive(Clone, Debug, Parser)]
#[command(name = "shardget", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct App {
    #[arg(help = "URL of the resource to download")]
    pub url: String,

    #[arg(
        short,
        long,
        env = "SHARDGET_CONCURRENCY",
        value_parser = parse_concurrency,
        help = "Number of byte ranges fetched concurrently [default: 16]"
    )]
    pub concurrency: Option<usize>,

    #[arg(short, long, help = "Write to this file instead of stdout")]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'H',
        long = "header",
        value_name = "NAME: VALUE",
        value_parser = parse_header,
        help = "Extra request header, may be repeated"
    )]
    pub headers: Vec<(String, String)>,

    #[arg(long, help = "Do not draw the progress bar")]
    pub no_progress: bool,

    #[arg(long, value_name = "MS", help = "Progress refresh interval [default: 100]")]
    pub progress_interval: Option<u64>,

    #[arg(long, value_name = "SECS", help = "Give up connecting after this many seconds")]
    pub connect_timeout: Option<u64>,

    #[arg(long, env = "SHARDGET_CONFIG", help = "TOML file with default settings")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count, help = "Log more (-v info, -vv debug)")]
    pub verbose: u8,
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `NAME: VALUE`, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in `{s}`"));
    }
    if is_reserved_header(name) {
        return Err(format!("`{name}` is set per shard and cannot be overridden"));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use shardget_fetch::{DownloadOptions, Downloader, ProgressCounter, ReqwestClient};
use tokio::io::AsyncWrite;
use tracing::info;

use crate::cli::{App, Config, Settings};
use crate::ui::ProgressReporter;

mod cli;
mod logging;
mod ui;

fn main() -> ExitCode {
    let app = App::parse();
    logging::init(app.verbose);

    match run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(app: App) -> Result<()> {
    let config = match &app.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let settings = Settings::resolve(app, config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    runtime.block_on(download(settings))
}

async fn download(settings: Settings) -> Result<()> {
    let client = match settings.connect_timeout {
        Some(timeout) => ReqwestClient::with_connect_timeout(timeout),
        None => ReqwestClient::new(),
    }
    .context("building HTTP client")?;

    let options = DownloadOptions::default()
        .concurrency(settings.concurrency)
        .headers(settings.headers.iter().cloned());
    let downloader = Downloader::new(client).with_options(options);

    let resource = downloader
        .probe(&settings.url)
        .await
        .with_context(|| format!("probing {}", settings.url))?;

    let mut output: Box<dyn AsyncWrite + Unpin + Send> = match &settings.output {
        Some(path) => Box::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("opening output {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };

    let progress = ProgressCounter::new();
    let reporter = settings.progress.then(|| {
        ProgressReporter::new(progress.clone(), resource.length, settings.progress_interval).spawn()
    });

    let result = downloader.download(&resource, &mut output, &progress).await;

    if let Some(handle) = reporter {
        if result.is_ok() {
            // Lets the bar draw its final state and newline.
            let _ = handle.await;
        } else {
            handle.abort();
        }
    }

    let report = result.with_context(|| {
        format!(
            "downloading {} in {} shards",
            settings.url,
            downloader.shard_count(&resource)
        )
    })?;
    info!(bytes = report.bytes, elapsed = ?report.elapsed, "done");

    Ok(())
}

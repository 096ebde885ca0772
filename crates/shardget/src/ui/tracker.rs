use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;
use shardget_fetch::ProgressCounter;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

const PB_STYLE: &str = "[{bar:40.cyan/blue}] {percent:>3}% {pos}/{len}";

const PB_CHARS: &str = "█▓░";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.progress_chars(PB_CHARS))
});

/// Redraws a status line on stderr from the shared byte counter.
///
/// Only ever reads the counter, so it cannot hold up a fetcher or the
/// writer; dropping it changes nothing about the download.
pub struct ProgressReporter {
    counter: ProgressCounter,
    total: u64,
    interval: Duration,
    pb: ProgressBar,
}

impl ProgressReporter {
    pub fn new(counter: ProgressCounter, total: u64, interval: Duration) -> Self {
        let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };

        Self {
            counter,
            total,
            interval,
            pb,
        }
    }

    pub fn with_draw_target(self, target: ProgressDrawTarget) -> Self {
        self.pb.set_draw_target(target);
        self
    }

    pub fn spawn(self) -> JoinHandle<u64> {
        tokio::spawn(self.run())
    }

    /// Sample the counter every interval until it reaches the total, then
    /// finish the line. Returns the last sampled byte count.
    pub async fn run(self) -> u64 {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let done = self.counter.get().min(self.total);
            self.pb.set_position(done);

            if done >= self.total {
                self.pb.finish();
                return done;
            }
        }
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the route safety toolchain.
//!
//! Provides an `indicatif` spinner behind the [`LoadingIndicator`] trait,
//! plus [`init_logger`] which sets up `indicatif-log-bridge` so that
//! `log::info!` and friends are suspended while the spinner redraws.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use route_safety_client::loading::LoadingIndicator;

pub use indicatif::MultiProgress;

/// An `indicatif` spinner that implements [`LoadingIndicator`].
///
/// The spinner is added to the [`MultiProgress`] on `show()` and removed
/// on `hide()`, so it can be reused across analyses.
pub struct IndicatifLoading {
    multi: MultiProgress,
    style: ProgressStyle,
    bar: Mutex<Option<ProgressBar>>,
}

impl IndicatifLoading {
    /// Creates a hidden spinner drawn through `multi`.
    #[must_use]
    pub fn spinner(multi: &MultiProgress) -> Arc<dyn LoadingIndicator> {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}...")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        Arc::new(Self {
            multi: multi.clone(),
            style,
            bar: Mutex::new(None),
        })
    }
}

impl LoadingIndicator for IndicatifLoading {
    fn show(&self, message: &str) {
        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        let bar = bar.get_or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new_spinner());
            bar.set_style(self.style.clone());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        bar.set_message(message.to_string());
    }

    fn hide(&self) {
        let bar = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(bar) = bar {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while the spinner redraws.
///
/// Returns the [`MultiProgress`] that the spinner must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Logger may already be set (e.g., in tests)

    log::set_max_level(level);

    multi
}

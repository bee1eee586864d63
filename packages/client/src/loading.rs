//! Loading indicator shown while pipeline requests are outstanding.
//!
//! [`LoadingIndicator`] decouples the pipeline from any rendering backend
//! (an `indicatif` spinner in the CLI, nothing in tests). The pipeline
//! never calls it directly; it holds a [`LoadingGuard`], which hides the
//! indicator exactly once when dropped, whichever way the pipeline exits.

use std::sync::Arc;

/// Trait for showing and hiding a busy indicator.
pub trait LoadingIndicator: Send + Sync {
    /// Makes the indicator visible (if it isn't) with `message`.
    fn show(&self, message: &str);

    /// Hides the indicator.
    fn hide(&self);
}

/// A [`LoadingIndicator`] that ignores all calls.
pub struct NullLoading;

impl LoadingIndicator for NullLoading {
    fn show(&self, _message: &str) {}
    fn hide(&self) {}
}

/// Returns a shared [`NullLoading`] instance.
#[must_use]
pub fn null_loading() -> Arc<dyn LoadingIndicator> {
    Arc::new(NullLoading)
}

/// Keeps a [`LoadingIndicator`] visible for the guard's lifetime.
pub struct LoadingGuard<'a> {
    indicator: &'a dyn LoadingIndicator,
}

impl<'a> LoadingGuard<'a> {
    /// Shows `indicator` with `message` and returns the guard.
    #[must_use]
    pub fn show(indicator: &'a dyn LoadingIndicator, message: &str) -> Self {
        indicator.show(message);
        Self { indicator }
    }

    /// Updates the message for the next pipeline phase.
    pub fn phase(&self, message: &str) {
        log::debug!("{message}...");
        self.indicator.show(message);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}

//! The single dismissable failure slot shown to the user.

use std::sync::Mutex;

/// Holds the most recent user-initiated failure, if any.
///
/// There is no queue: a newer failure replaces the old one, and poll
/// failures never land here; they are logged and absorbed instead of
/// interrupting the user.
#[derive(Debug, Default)]
pub struct ErrorBanner {
    current: Mutex<Option<String>>,
}

impl ErrorBanner {
    /// Create an empty banner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the banner with a new failure message.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex has been poisoned.
    pub fn raise(&self, message: impl Into<String>) {
        *self.current.lock().expect("banner mutex poisoned") = Some(message.into());
    }

    /// Clear the banner.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex has been poisoned.
    pub fn dismiss(&self) {
        *self.current.lock().expect("banner mutex poisoned") = None;
    }

    /// The currently displayed failure, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex has been poisoned.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.current.lock().expect("banner mutex poisoned").clone()
    }
}

//! Redirect hook for rejected sessions.

use std::fmt;

use tracing::info;

/// Front-end hook invoked when the session is rejected and the user must be
/// sent back to the application root (the login screen).
pub trait Navigator: Send + Sync + fmt::Debug {
    /// Leaves the current view for the application root.
    fn redirect_to_root(&self);
}

/// Navigator that only records the redirect in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect_to_root(&self) {
        info!("session ended; returning to application root");
    }
}

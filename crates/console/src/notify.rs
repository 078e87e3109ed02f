//! Terminal notification sink.

use std::io::Write;

use domain::services::{Notification, Notifier, TracingNotifier};

/// Where the console sends notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleNotifier {
    /// `[Title] description` lines on stderr.
    #[default]
    Stderr,
    /// Structured log events only (`--quiet`).
    Log,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        if quiet {
            ConsoleNotifier::Log
        } else {
            ConsoleNotifier::Stderr
        }
    }
}

pub fn format_notification(notification: &Notification) -> String {
    format!("[{}] {}", notification.title, notification.description)
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match self {
            ConsoleNotifier::Stderr => {
                let line = format_notification(&notification);
                let mut stderr = std::io::stderr().lock();
                if writeln!(stderr, "{}", line).is_err() {
                    tracing::debug!(%line, "Could not write notification");
                }
            }
            ConsoleNotifier::Log => TracingNotifier.notify(notification),
        }
    }
}

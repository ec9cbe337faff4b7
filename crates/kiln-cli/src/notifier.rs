//! Terminal delivery for compile-error notifications.

use kiln_pipeline::{Notification, Notifier};
use tracing::error;

use crate::ui;

/// Prints notifications to stderr and mirrors them into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        error!(
            title = %notification.title,
            subtitle = %notification.subtitle,
            "{}",
            notification.message
        );

        let line = if notification.subtitle.is_empty() {
            format!("[{}] {}", notification.title, notification.message)
        } else {
            format!(
                "[{}] {} ({})",
                notification.title, notification.message, notification.subtitle
            )
        };
        ui::error(&line);
    }
}

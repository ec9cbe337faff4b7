//! Compile-error notifications.
//!
//! The actual delivery (desktop notification, terminal bell, log line) is up
//! to the [`Notifier`] implementation; this module only decides what to send.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Delivery side channel for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub subtitle: String,
    pub icon: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    /// Any level the bundler sends that kiln does not act on (`info`, ...)
    #[serde(other)]
    Other,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
            Severity::Other => f.write_str("other"),
        }
    }
}

/// A compile error as reported by the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileError {
    pub name: String,
    /// Loader-prefixed request, e.g. `vue-loader!./src/App.vue`
    #[serde(default)]
    pub file: Option<String>,
}

/// Turns compile failures into notifications.
#[derive(Clone)]
pub struct ErrorNotifier {
    title: String,
    icon: PathBuf,
    sink: Arc<dyn Notifier>,
}

impl ErrorNotifier {
    pub fn new(title: impl Into<String>, icon: impl Into<PathBuf>, sink: Arc<dyn Notifier>) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            sink,
        }
    }

    /// Notify about the first error of a failed compilation. Any other
    /// severity and empty error lists are ignored.
    pub fn on_errors(&self, severity: Severity, errors: &[CompileError]) {
        if severity != Severity::Error {
            return;
        }
        let Some(error) = errors.first() else {
            return;
        };

        let subtitle = error
            .file
            .as_deref()
            .and_then(|file| file.rsplit('!').next())
            .unwrap_or_default()
            .to_string();

        self.sink.notify(&Notification {
            title: self.title.clone(),
            message: format!("{severity}: {}", error.name),
            subtitle,
            icon: self.icon.clone(),
        });
    }
}

impl fmt::Debug for ErrorNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorNotifier")
            .field("title", &self.title)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Notification>>);

    impl Notifier for Recorder {
        fn notify(&self, notification: &Notification) {
            self.0.lock().unwrap().push(notification.clone());
        }
    }

    fn notifier() -> (ErrorNotifier, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (
            ErrorNotifier::new("shop", "build/logo.png", recorder.clone()),
            recorder,
        )
    }

    fn error(name: &str, file: Option<&str>) -> CompileError {
        CompileError {
            name: name.to_string(),
            file: file.map(str::to_string),
        }
    }

    #[test]
    fn warnings_are_not_notified() {
        let (notifier, recorder) = notifier();
        notifier.on_errors(Severity::Warning, &[error("ModuleWarning", None)]);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn error_subtitle_is_last_request_segment() {
        let (notifier, recorder) = notifier();
        notifier.on_errors(
            Severity::Error,
            &[
                error("ModuleBuildError", Some("loader!./src/App.vue")),
                error("Second", Some("./src/other.js")),
            ],
        );

        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].subtitle, "./src/App.vue");
        assert_eq!(seen[0].message, "error: ModuleBuildError");
        assert_eq!(seen[0].title, "shop");
        assert_eq!(seen[0].icon, PathBuf::from("build/logo.png"));
    }

    #[test]
    fn missing_file_gives_empty_subtitle() {
        let (notifier, recorder) = notifier();
        notifier.on_errors(Severity::Error, &[error("SyntaxError", None)]);
        assert_eq!(recorder.0.lock().unwrap()[0].subtitle, "");
    }

    #[test]
    fn empty_error_list_is_ignored() {
        let (notifier, recorder) = notifier();
        notifier.on_errors(Severity::Error, &[]);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn severity_parses_lowercase() {
        let severity: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(severity, Severity::Warning);
    }

    #[test]
    fn unknown_severity_parses_as_other_and_is_skipped() {
        let severity: Severity = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(severity, Severity::Other);

        let (notifier, recorder) = notifier();
        notifier.on_errors(severity, &[error("ModuleNotice", Some("./src/main.js"))]);
        assert!(recorder.0.lock().unwrap().is_empty());
    }
}

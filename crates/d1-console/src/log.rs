//! Timestamped on-screen debug log.

use chrono::Local;

/// Shown by the log panel until the first entry arrives.
pub const LOG_PLACEHOLDER: &str = "Debug log...";

/// Append-only operator log. Lines carry a local wall-clock timestamp;
/// nothing is persisted and nothing is capped, the log lives and dies
/// with the console process.
#[derive(Debug, Default)]
pub struct DebugLog {
    lines: Vec<String>,
}

impl DebugLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `[HH:MM:SS] message`.
    pub fn push(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::debug!("{message}");
        self.lines
            .push(format!("[{}] {message}", Local::now().format("%H:%M:%S")));
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Newest `count` lines, oldest first. The panel renders this so the
    /// latest entry is always visible.
    #[must_use]
    pub fn tail(&self, count: usize) -> &[String] {
        let start = self.lines.len().saturating_sub(count);
        &self.lines[start..]
    }
}

//! SQL logging via `tracing`.
//!
//! Events are emitted on two targets:
//! - `pgclause.sql`: one event per executed statement (tag, param count, SQL)
//! - `pgclause.placeholder`: a warning when a fragment's markers and bound
//!   values disagree
//!
//! Enable via the crate feature `tracing` (on by default). No subscriber is
//! installed here; the application picks one.

use serde::Deserialize;

/// Event level for statement logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::str::FromStr for LogLevel {
    type Err = crate::error::ClauseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(crate::error::ClauseError::config(format!(
                "unknown log level: {other}"
            ))),
        }
    }
}

/// Emits the statement about to be executed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqlLogger {
    /// Whether statement events are emitted at all.
    pub enabled: bool,
    /// Event level.
    pub level: LogLevel,
    /// Truncate long SQL strings (in bytes, on a char boundary). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLogger {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Debug,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLogger {
    /// Create a new logger with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the event level.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Turn statement events off.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// Emit one statement event.
    #[cfg(feature = "tracing")]
    pub fn log_statement(&self, tag: Option<&str>, sql: &str, param_count: usize) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    LogLevel::Error => tracing::error!($($field)*),
                    LogLevel::Warn  => tracing::warn!($($field)*),
                    LogLevel::Info  => tracing::info!($($field)*),
                    LogLevel::Debug => tracing::debug!($($field)*),
                    LogLevel::Trace => tracing::trace!($($field)*),
                }
            };
        }

        if !self.enabled {
            return;
        }
        let sql = self.truncate_sql(sql);
        let tag = tag.unwrap_or("-");
        emit_at_level!(
            self.level,
            target: "pgclause.sql",
            tag,
            param_count,
            sql = %sql,
        );
    }

    /// Emit one statement event (no-op without the `tracing` feature).
    #[cfg(not(feature = "tracing"))]
    pub fn log_statement(&self, _tag: Option<&str>, _sql: &str, _param_count: usize) {}
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(feature = "tracing")]
pub(crate) fn placeholder_mismatch(fragment: &str, markers: usize, values: usize) {
    tracing::warn!(
        target: "pgclause.placeholder",
        markers,
        values,
        fragment = %truncate_sql_bytes(fragment, 200),
        "placeholder markers do not match bound values"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn placeholder_mismatch(_fragment: &str, _markers: usize, _values: usize) {}

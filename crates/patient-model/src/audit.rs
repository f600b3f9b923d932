//! Append-only audit trail of record operations.
//!
//! Successful operations go to the `info` channel and rejected ones to the
//! `error` channel. One trail is built at startup and shared by every
//! [`crate::PatientRecord`] through a [`SharedAuditTrail`] handle.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;

/// Default file for the `info` channel.
pub const DEFAULT_INFO_LOG: &str = "info.log";

/// Default file for the `error` channel.
pub const DEFAULT_ERROR_LOG: &str = "errors.log";

/// Timestamp layout of file audit lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// `message` with control characters escaped, so one record is one line.
fn single_line(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for c in message.chars() {
        if c.is_control() {
            escaped.extend(c.escape_default());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Logical channel of an audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditChannel {
    /// Successful creation, mutation or save.
    Info,
    /// Rejected value or forbidden mutation.
    Error,
}

impl AuditChannel {
    /// Channel name written into each line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for AuditChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Destination for audit lines.
pub trait AuditTrail: Send + Sync {
    /// Append one message to the given channel.
    fn record(&self, channel: AuditChannel, message: &str);

    /// Append to the `info` channel.
    fn info(&self, message: &str) {
        self.record(AuditChannel::Info, message);
    }

    /// Append to the `error` channel.
    fn error(&self, message: &str) {
        self.record(AuditChannel::Error, message);
    }
}

/// Shared handle passed to every record.
pub type SharedAuditTrail = Arc<dyn AuditTrail>;

/// Audit trail backed by two line-oriented files.
///
/// Files are opened on each write (and created on the first one), so nothing
/// is held open between operations. Writes are traced at debug level under
/// target `audit` with the channel and path only, never the message text.
#[derive(Debug, Clone)]
pub struct FileAuditTrail {
    info_path: PathBuf,
    error_path: PathBuf,
}

impl FileAuditTrail {
    pub fn new(info_path: impl Into<PathBuf>, error_path: impl Into<PathBuf>) -> Self {
        Self {
            info_path: info_path.into(),
            error_path: error_path.into(),
        }
    }

    /// Trail writing to `info.log` and `errors.log` in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_INFO_LOG), dir.join(DEFAULT_ERROR_LOG))
    }

    /// Wrap into a shared handle.
    pub fn shared(self) -> SharedAuditTrail {
        Arc::new(self)
    }

    pub fn info_path(&self) -> &Path {
        &self.info_path
    }

    pub fn error_path(&self) -> &Path {
        &self.error_path
    }

    fn path_for(&self, channel: AuditChannel) -> &Path {
        match channel {
            AuditChannel::Info => &self.info_path,
            AuditChannel::Error => &self.error_path,
        }
    }

    fn append_line(path: &Path, channel: AuditChannel, message: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        writeln!(file, "{timestamp} - {channel} - {message}")
    }
}

impl Default for FileAuditTrail {
    fn default() -> Self {
        Self::new(DEFAULT_INFO_LOG, DEFAULT_ERROR_LOG)
    }
}

impl AuditTrail for FileAuditTrail {
    fn record(&self, channel: AuditChannel, message: &str) {
        let path = self.path_for(channel);
        tracing::debug!(target: "audit", %channel, path = %path.display(), "audit line written");
        if let Err(error) = Self::append_line(path, channel, &single_line(message)) {
            tracing::warn!(
                path = %path.display(),
                %error,
                "failed to write audit line"
            );
        }
    }
}

/// One captured audit line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub channel: AuditChannel,
    pub message: String,
}

/// In-memory audit trail.
#[derive(Debug, Default)]
pub struct MemoryAuditTrail {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured lines in write order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages captured on one channel.
    pub fn messages(&self, channel: AuditChannel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.channel == channel)
            .map(|entry| entry.message)
            .collect()
    }
}

impl AuditTrail for MemoryAuditTrail {
    fn record(&self, channel: AuditChannel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AuditEntry {
                channel,
                message: single_line(message),
            });
    }
}

/// Audit trail that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuditTrail;

impl AuditTrail for NullAuditTrail {
    fn record(&self, _channel: AuditChannel, _message: &str) {}
}

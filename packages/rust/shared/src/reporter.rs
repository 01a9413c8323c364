//! Observer for enumeration and assembly events.
//!
//! The enumerator and assembler never log on their own; they report to the
//! [`Reporter`] they are handed. [`TracingReporter`] forwards events to
//! `tracing`, [`SilentReporter`] drops them.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::types::UserRecord;

/// Why an account was left out of the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Primary group differs from the policy's group.
    WrongGroup { group_id: u32 },
    /// No public web directory in the home directory.
    NoPublicDir,
    /// Hidden sentinel present in the public directory.
    Hidden,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongGroup { group_id } => write!(f, "primary group {group_id} not listed"),
            Self::NoPublicDir => f.write_str("public directory is missing"),
            Self::Hidden => f.write_str("user is marked as hidden"),
        }
    }
}

/// Callback for reporting enumeration and assembly status.
pub trait Reporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when an account fails a visibility filter.
    fn account_skipped(&self, username: &str, reason: SkipReason);
    /// Called when a visible user has no index page.
    fn index_missing(&self, username: &str);
    /// Called when a visible user's index page exists but cannot be read.
    fn index_unreadable(&self, username: &str, path: &Path, error: &std::io::Error);
    /// Called for every user record produced.
    fn user_listed(&self, record: &UserRecord);
    /// Called once the aggregate document is built.
    fn document_assembled(&self, user_count: usize);
}

/// No-op reporter for headless/test usage.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn phase(&self, _name: &str) {}
    fn account_skipped(&self, _username: &str, _reason: SkipReason) {}
    fn index_missing(&self, _username: &str) {}
    fn index_unreadable(&self, _username: &str, _path: &Path, _error: &std::io::Error) {}
    fn user_listed(&self, _record: &UserRecord) {}
    fn document_assembled(&self, _user_count: usize) {}
}

/// Reporter that emits structured `tracing` events.
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn phase(&self, name: &str) {
        info!(phase = name, "starting phase");
    }

    fn account_skipped(&self, username: &str, reason: SkipReason) {
        debug!(username, %reason, "skipping account");
    }

    fn index_missing(&self, username: &str) {
        debug!(username, "index page is missing");
    }

    fn index_unreadable(&self, username: &str, path: &Path, error: &std::io::Error) {
        warn!(username, path = %path.display(), %error, "index page unreadable, listing without title");
    }

    fn user_listed(&self, record: &UserRecord) {
        debug!(
            username = %record.username,
            title = record.title.as_deref().unwrap_or("-"),
            mtime = record.mtime,
            "listed user"
        );
    }

    fn document_assembled(&self, user_count: usize) {
        info!(user_count, "document assembled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reason_display() {
        assert_eq!(
            SkipReason::WrongGroup { group_id: 1000 }.to_string(),
            "primary group 1000 not listed"
        );
        assert_eq!(SkipReason::Hidden.to_string(), "user is marked as hidden");
    }
}

//! Core domain types for tildegen.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when an index page exists but carries no usable `<title>`.
pub const PLACEHOLDER_TITLE: &str = "~somebody";

/// Format of `last_generated` (UTC, second precision).
const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Static key/value metadata copied into the aggregate document.
pub type Metadata = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// AccountEntry
// ---------------------------------------------------------------------------

/// A single entry from the system account database. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountEntry {
    /// Login name.
    pub name: String,
    /// Numeric user id.
    pub uid: u32,
    /// Primary group id.
    pub primary_group_id: u32,
    /// Home directory.
    pub home_directory: PathBuf,
}

// ---------------------------------------------------------------------------
// VisibilityPolicy
// ---------------------------------------------------------------------------

/// Rules deciding which accounts are listed. Frozen for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPolicy {
    /// Primary group an account must belong to.
    pub group_id: u32,
    /// Public web directory, relative to the home directory.
    pub public_html: PathBuf,
    /// Opt-out sentinel inside the public directory.
    pub hidden_file: String,
    /// Index page inside the public directory.
    pub index_file: String,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            group_id: 100,
            public_html: PathBuf::from("public_html"),
            hidden_file: ".hidden".into(),
            index_file: "index.html".into(),
        }
    }
}

impl VisibilityPolicy {
    /// The account's public web directory.
    pub fn public_dir(&self, account: &AccountEntry) -> PathBuf {
        account.home_directory.join(&self.public_html)
    }
}

// ---------------------------------------------------------------------------
// UserRecord
// ---------------------------------------------------------------------------

/// One listed tilde user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Account name.
    pub username: String,
    /// Page title, placeholder, or `None` when there is no index page.
    pub title: Option<String>,
    /// Index page modification time (Unix seconds), `0` without an index page.
    pub mtime: i64,
}

impl UserRecord {
    /// A listed user whose index page is missing or unreadable.
    pub fn without_index(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            title: None,
            mtime: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// AggregateDocument
// ---------------------------------------------------------------------------

/// The single document handed to renderers.
///
/// Computed fields always win over metadata keys of the same name, and
/// `user_count` always equals `users.len()`.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateDocument {
    #[serde(flatten)]
    metadata: Metadata,
    users: Vec<UserRecord>,
    user_count: usize,
    last_generated: String,
}

impl AggregateDocument {
    /// Keys owned by the document itself.
    pub const RESERVED_KEYS: [&'static str; 3] = ["users", "user_count", "last_generated"];

    /// Build a document, dropping any metadata that collides with computed fields.
    pub fn new(mut metadata: Metadata, users: Vec<UserRecord>, generated_at: DateTime<Utc>) -> Self {
        for key in Self::RESERVED_KEYS {
            if metadata.remove(key).is_some() {
                tracing::debug!(key, "metadata key overwritten by computed field");
            }
        }

        Self {
            metadata,
            user_count: users.len(),
            users,
            last_generated: generated_at.format(GENERATED_FORMAT).to_string(),
        }
    }

    /// Static metadata, without the reserved keys.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Listed users, ordered by username.
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// Number of listed users.
    pub fn user_count(&self) -> usize {
        self.user_count
    }

    /// Assembly time, `YYYY-MM-DD HH:MM:SS` UTC.
    pub fn last_generated(&self) -> &str {
        &self.last_generated
    }
}

//! Tilde user discovery.
//!
//! Walks the account database, keeps the accounts that pass the visibility
//! filters (group, public directory, hidden sentinel) and probes each
//! survivor's index page for a title and modification time.
//!
//! Nothing in here fails past its own boundary: a user whose index page
//! cannot be read is still listed, just without metadata.

mod accounts;
mod fs;
mod title;

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tildegen_shared::{AccountEntry, Reporter, SkipReason, UserRecord, VisibilityPolicy};
use tracing::instrument;

pub use accounts::{AccountSource, load_accounts, parse_passwd};
pub use fs::{Filesystem, LocalFs};
pub use title::extract_title;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// List every visible user on the local filesystem, ordered by username.
pub fn enumerate_visible_users(
    accounts: &[AccountEntry],
    policy: &VisibilityPolicy,
    reporter: &dyn Reporter,
) -> Vec<UserRecord> {
    enumerate_with(&LocalFs, accounts, policy, reporter)
}

/// List every visible user using the given filesystem.
///
/// Accounts are sorted by name before filtering. When a name occurs more
/// than once, the first entry in database order wins.
#[instrument(skip_all, fields(accounts = accounts.len(), group_id = policy.group_id))]
pub fn enumerate_with(
    fs: &dyn Filesystem,
    accounts: &[AccountEntry],
    policy: &VisibilityPolicy,
    reporter: &dyn Reporter,
) -> Vec<UserRecord> {
    reporter.phase("Enumerating users");

    let mut sorted: Vec<&AccountEntry> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted.dedup_by(|later, earlier| later.name == earlier.name);

    let mut users = Vec::new();
    for account in sorted {
        if let Err(reason) = check_visibility(fs, account, policy) {
            reporter.account_skipped(&account.name, reason);
            continue;
        }

        let record = probe_index(fs, account, policy, reporter);
        reporter.user_listed(&record);
        users.push(record);
    }

    users
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Apply the visibility filters in order, stopping at the first failure.
fn check_visibility(
    fs: &dyn Filesystem,
    account: &AccountEntry,
    policy: &VisibilityPolicy,
) -> Result<(), SkipReason> {
    if account.primary_group_id != policy.group_id {
        return Err(SkipReason::WrongGroup {
            group_id: account.primary_group_id,
        });
    }

    let public_dir = policy.public_dir(account);
    if !fs.is_dir(&public_dir) {
        return Err(SkipReason::NoPublicDir);
    }

    if fs.exists(&public_dir.join(&policy.hidden_file)) {
        return Err(SkipReason::Hidden);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Index probing
// ---------------------------------------------------------------------------

fn probe_index(
    fs: &dyn Filesystem,
    account: &AccountEntry,
    policy: &VisibilityPolicy,
    reporter: &dyn Reporter,
) -> UserRecord {
    let index_path = policy.public_dir(account).join(&policy.index_file);

    if !fs.is_file(&index_path) {
        reporter.index_missing(&account.name);
        return UserRecord::without_index(&account.name);
    }

    match read_index(fs, &index_path) {
        Ok((title, mtime)) => UserRecord {
            username: account.name.clone(),
            title: Some(title),
            mtime,
        },
        Err(error) => {
            reporter.index_unreadable(&account.name, &index_path, &error);
            UserRecord::without_index(&account.name)
        }
    }
}

/// Read the page fully, then query its modification time.
fn read_index(fs: &dyn Filesystem, path: &Path) -> std::io::Result<(String, i64)> {
    let html = fs.read_to_string(path)?;
    let modified = fs.modified(path)?;
    Ok((extract_title(&html), unix_seconds(modified)))
}

/// Whole seconds since the Unix epoch, negative for earlier times.
fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

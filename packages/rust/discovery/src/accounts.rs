//! Account database access and `passwd(5)` parsing.

use std::path::{Path, PathBuf};
use std::process::Command;

use tildegen_shared::{AccountEntry, Result, TildegenError};
use tracing::{debug, info};

/// Number of colon-separated fields in a passwd line.
const PASSWD_FIELDS: usize = 7;

/// Where the account list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSource {
    /// `getent passwd`: every account the system's NSS backends know about.
    Getent,
    /// A `passwd(5)` file, read directly.
    File(PathBuf),
}

impl AccountSource {
    /// Use the given passwd file if there is one, `getent` otherwise.
    pub fn from_override(passwd_file: Option<&Path>) -> Self {
        match passwd_file {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Getent,
        }
    }

    /// Read every account from this source.
    pub fn load(&self) -> Result<Vec<AccountEntry>> {
        match self {
            Self::Getent => load_getent(),
            Self::File(path) => load_accounts(path),
        }
    }
}

/// Enumerate accounts through `getent passwd`.
fn load_getent() -> Result<Vec<AccountEntry>> {
    let output = Command::new("getent")
        .arg("passwd")
        .output()
        .map_err(|e| TildegenError::accounts(format!("running getent passwd: {e}")))?;

    if !output.status.success() {
        return Err(TildegenError::accounts(format!(
            "getent passwd exited with {}",
            output.status
        )));
    }

    let accounts = parse_passwd(&String::from_utf8_lossy(&output.stdout));
    info!(count = accounts.len(), "loaded accounts from getent");
    Ok(accounts)
}

/// Parse passwd-format content into account entries.
///
/// Blank lines and `#` comments are ignored. Malformed lines are skipped.
pub fn parse_passwd(content: &str) -> Vec<AccountEntry> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let entry = parse_line(trimmed);
            if entry.is_none() {
                debug!(line = idx + 1, "skipping malformed passwd line");
            }
            entry
        })
        .collect()
}

fn parse_line(line: &str) -> Option<AccountEntry> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() != PASSWD_FIELDS || fields[0].is_empty() {
        return None;
    }

    Some(AccountEntry {
        name: fields[0].to_string(),
        uid: fields[2].parse().ok()?,
        primary_group_id: fields[3].parse().ok()?,
        home_directory: PathBuf::from(fields[5]),
    })
}

/// Read and parse the account database at `path`.
pub fn load_accounts(path: &Path) -> Result<Vec<AccountEntry>> {
    let content = std::fs::read_to_string(path).map_err(|e| TildegenError::io(path, e))?;
    let accounts = parse_passwd(&content);
    debug!(path = %path.display(), count = accounts.len(), "loaded account database");
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
root:x:0:0:root:/root:/bin/bash
# local accounts
alice:x:1001:100:Alice,,,:/home/alice:/bin/bash

bob:x:1002:1002::/home/bob:/usr/bin/zsh
";

    #[test]
    fn parses_valid_lines() {
        let accounts = parse_passwd(SAMPLE);
        assert_eq!(accounts.len(), 3);

        let alice = &accounts[1];
        assert_eq!(alice.name, "alice");
        assert_eq!(alice.uid, 1001);
        assert_eq!(alice.primary_group_id, 100);
        assert_eq!(alice.home_directory, PathBuf::from("/home/alice"));
    }

    #[test]
    fn skips_malformed_lines() {
        let content = "\
good:x:1:100::/home/good:/bin/sh
short:x:2:100
badgid:x:3:users::/home/badgid:/bin/sh
:x:4:100::/home/anon:/bin/sh
";
        let accounts = parse_passwd(content);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "good");
    }

    #[test]
    fn preserves_file_order() {
        let content = "zeta:x:3:100::/home/zeta:/bin/sh\nalpha:x:1:100::/home/alpha:/bin/sh\n";
        let names: Vec<_> = parse_passwd(content).into_iter().map(|a| a.name).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn source_defaults_to_getent() {
        assert_eq!(AccountSource::from_override(None), AccountSource::Getent);
        assert_eq!(
            AccountSource::from_override(Some(Path::new("/srv/passwd"))),
            AccountSource::File(PathBuf::from("/srv/passwd"))
        );
    }

    #[test]
    fn file_source_reads_only_that_file() {
        let path = std::env::temp_dir().join(format!("tildegen-passwd-{}", uuid::Uuid::now_v7()));
        std::fs::write(&path, "solo:x:1500:100::/home/solo:/bin/sh\n").unwrap();

        let accounts = AccountSource::File(path.clone()).load().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "solo");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn getent_source_includes_root() {
        // Hosts without getent have nothing to check here.
        if Command::new("getent").arg("passwd").output().is_err() {
            return;
        }
        let accounts = AccountSource::Getent.load().unwrap();
        assert!(accounts.iter().any(|a| a.name == "root" && a.uid == 0));
    }

    #[test]
    fn missing_database_is_an_error() {
        let result = load_accounts(Path::new("/nonexistent/passwd"));
        assert!(matches!(result, Err(TildegenError::Io { .. })));
    }
}

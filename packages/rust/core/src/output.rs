//! Atomic output file writing.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use tildegen_shared::{Result, TildegenError};

/// Metadata for one written output file.
#[derive(Debug, Clone)]
pub struct OutputMeta {
    /// Format identifier, e.g. `json`.
    pub format: String,
    /// Destination path.
    pub path: PathBuf,
    /// SHA-256 of the written content.
    pub sha256: String,
    pub size_bytes: usize,
}

/// Write `content` to `path` via a sibling temp file and a rename.
///
/// Readers of `path` see either the old file or the complete new one.
/// The parent directory must already exist.
pub fn write_output(format: &str, path: &Path, content: &str) -> Result<OutputMeta> {
    let file_name = path
        .file_name()
        .ok_or_else(|| TildegenError::validation(format!("{} has no file name", path.display())))?;
    let temp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    std::fs::write(&temp, content).map_err(|e| TildegenError::io(&temp, e))?;

    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(TildegenError::io(path, e));
    }

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    debug!(format, path = %path.display(), size = content.len(), "wrote output");

    Ok(OutputMeta {
        format: format.to_string(),
        path: path.to_path_buf(),
        sha256: hash,
        size_bytes: content.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tildegen-output-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn writes_content_and_checksum() {
        let tmp = temp_dir();
        let path = tmp.join("tilde.json");

        let meta = write_output("json", &path, "{}").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert_eq!(meta.size_bytes, 2);
        assert_eq!(
            meta.sha256,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn replaces_existing_file_without_leftovers() {
        let tmp = temp_dir();
        let path = tmp.join("tilde.yaml");
        std::fs::write(&path, "old").unwrap();

        write_output("yaml", &path, "new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        let leftovers: Vec<_> = std::fs::read_dir(&tmp)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_parent_is_an_io_error() {
        let tmp = temp_dir();
        let path = tmp.join("missing").join("tilde.json");
        let result = write_output("json", &path, "{}");
        assert!(matches!(result, Err(TildegenError::Io { .. })));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}

//! Disk-backed storage for uploaded files.
//!
//! Uploads are written under `<root>/<bucket>/<uuid>.<ext>`. The visitor's
//! original file name is kept only as metadata and never used to build a path.

use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Extensions accepted for every upload field.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx", "xls", "xlsx", "csv", "txt",
];

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("The submitted file is empty.")]
    Empty,

    #[error("File is too large (limit is {limit} bytes).")]
    TooLarge { limit: usize },

    #[error("File type .{0} is not allowed.")]
    ExtensionNotAllowed(String),

    #[error("File has no extension.")]
    MissingExtension,

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// The upload itself was unacceptable, as opposed to a server-side failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StorageError::Empty
                | StorageError::TooLarge { .. }
                | StorageError::ExtensionNotAllowed(_)
                | StorageError::MissingExtension
        )
    }
}

/// Metadata describing a file written by [`FileStore::save`].
///
/// Tables that own exactly one file embed these columns and flatten them.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredFile {
    pub storage_key: String,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub sha256: String,
}

/// An uploaded file part before it is stored.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Browsers send an empty part when a file input is left blank.
    pub fn is_blank(&self) -> bool {
        self.file_name.trim().is_empty() && self.bytes.is_empty()
    }
}

pub struct FileStore {
    root: PathBuf,
    max_bytes: usize,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Checks an upload without writing it, returning its lowercased extension.
    pub fn check(&self, upload: &Upload) -> Result<String, StorageError> {
        if upload.bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(StorageError::TooLarge {
                limit: self.max_bytes,
            });
        }
        let ext = Path::new(upload.file_name.trim())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or(StorageError::MissingExtension)?;
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(StorageError::ExtensionNotAllowed(ext));
        }
        Ok(ext)
    }

    /// Validates and writes an upload into `bucket`.
    pub async fn save(&self, bucket: &str, upload: &Upload) -> Result<StoredFile, StorageError> {
        let ext = self.check(upload)?;
        if !is_safe_segment(bucket) {
            return Err(StorageError::InvalidKey(bucket.to_string()));
        }

        let storage_key = format!("{}/{}.{}", bucket, Uuid::now_v7(), ext);
        let path = self.root.join(&storage_key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &upload.bytes).await?;

        let content_type = upload
            .content_type
            .clone()
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .unwrap_or_else(|| {
                mime_guess::from_ext(&ext)
                    .first_or_octet_stream()
                    .to_string()
            });

        let stored = StoredFile {
            storage_key,
            original_name: sanitize_file_name(&upload.file_name),
            content_type,
            size_bytes: upload.bytes.len() as i64,
            sha256: checksum(&upload.bytes),
        };

        info!(
            storage_key = %stored.storage_key,
            size_bytes = stored.size_bytes,
            "Stored upload"
        );

        Ok(stored)
    }

    fn key_path(&self, storage_key: &str) -> Result<PathBuf, StorageError> {
        let key = Path::new(storage_key);
        let valid = !storage_key.is_empty()
            && key
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }
        Ok(self.root.join(key))
    }

    /// Reads a previously stored file.
    pub async fn read(&self, storage_key: &str) -> Result<Vec<u8>, StorageError> {
        Ok(tokio::fs::read(self.key_path(storage_key)?).await?)
    }

    /// Deletes a stored file.
    pub async fn remove(&self, storage_key: &str) -> Result<(), StorageError> {
        tokio::fs::remove_file(self.key_path(storage_key)?).await?;
        Ok(())
    }

    /// Removes a file whose database row was never written. Failures are
    /// logged so the caller can return the original error.
    pub async fn discard(&self, storage_key: &str) {
        match self.remove(storage_key).await {
            Ok(()) => info!(storage_key = %storage_key, "Discarded unreferenced upload"),
            Err(e) => warn!(storage_key = %storage_key, error = %e, "Could not discard upload"),
        }
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Hex-encoded SHA-256 of the file contents.
pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Reduces a client-supplied file name to a safe display/download name.
pub fn sanitize_file_name(name: &str) -> String {
    // Browsers on Windows may send the full client path.
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, bytes: &[u8]) -> Upload {
        Upload {
            file_name: name.to_string(),
            content_type: None,
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn check_rejects_empty_and_oversized() {
        let store = FileStore::new("/tmp/unused", 4);
        assert!(matches!(store.check(&upload("a.pdf", b"")), Err(StorageError::Empty)));
        assert!(matches!(
            store.check(&upload("a.pdf", b"12345")),
            Err(StorageError::TooLarge { limit: 4 })
        ));
    }

    #[test]
    fn check_enforces_extension_list() {
        let store = FileStore::new("/tmp/unused", 1024);
        assert_eq!(store.check(&upload("Prices.XLSX", b"x")).unwrap(), "xlsx");
        assert!(matches!(
            store.check(&upload("run.exe", b"x")),
            Err(StorageError::ExtensionNotAllowed(ext)) if ext == "exe"
        ));
        assert!(matches!(
            store.check(&upload("README", b"x")),
            Err(StorageError::MissingExtension)
        ));
    }

    #[test]
    fn sanitize_strips_paths_and_quotes() {
        assert_eq!(sanitize_file_name(r"C:\Users\me\id card.pdf"), "id card.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("a\"b.pdf"), "ab.pdf");
        assert_eq!(sanitize_file_name("   "), "upload");
        assert_eq!(sanitize_file_name(".hidden.txt"), "hidden.txt");
    }

    #[test]
    fn checksum_is_hex_sha256() {
        let sum = checksum(b"hello");
        assert_eq!(sum.len(), 64);
        assert_eq!(
            sum,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[tokio::test]
    async fn save_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), 1024);

        let stored = store
            .save("vault", &upload("scan.pdf", b"%PDF-1.4 test"))
            .await
            .unwrap();

        assert!(stored.storage_key.starts_with("vault/"));
        assert!(stored.storage_key.ends_with(".pdf"));
        assert_eq!(stored.original_name, "scan.pdf");
        assert_eq!(stored.content_type, "application/pdf");
        assert_eq!(stored.size_bytes, 13);

        let bytes = store.read(&stored.storage_key).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn read_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), 1024);
        assert!(matches!(
            store.read("../secret.txt").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.read("/etc/passwd").await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn save_rejects_unsafe_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), 1024);
        assert!(matches!(
            store.save("../up", &upload("a.txt", b"x")).await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn remove_deletes_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), 1024);
        let stored = store.save("vault", &upload("id.png", b"png")).await.unwrap();

        store.remove(&stored.storage_key).await.unwrap();
        assert!(!dir.path().join(&stored.storage_key).exists());
        assert!(matches!(
            store.read(&stored.storage_key).await,
            Err(StorageError::Io(_))
        ));
        assert!(matches!(
            store.remove("../vault/x.png").await,
            Err(StorageError::InvalidKey(_))
        ));

        // Discarding a missing file only logs.
        store.discard(&stored.storage_key).await;
    }
}

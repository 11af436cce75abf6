/**
 * Filesystem Blob Store
 *
 * Uploads are written to `<upload_dir>/<uuid>.<ext>`, where `ext` is the
 * (sanitized) extension of the client's file name. The returned reference is
 * that path, so it keeps the extension the content endpoint needs to pick a
 * MIME type.
 *
 * `retrieve` only accepts references that name a file directly inside the
 * upload directory.
 */
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

use super::{BlobError, BlobStore};

const MAX_EXTENSION_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, BlobError> {
        let path = Path::new(reference);
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| BlobError::InvalidReference(reference.to_string()))?;

        let mut components = relative.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(path.to_path_buf()),
            _ => Err(BlobError::InvalidReference(reference.to_string())),
        }
    }
}

fn sanitized_extension(original_name: Option<&str>) -> Option<String> {
    let ext = Path::new(original_name?).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, original_name: Option<&str>, bytes: Bytes) -> Result<String, BlobError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.root.join(file_name);

        tokio::fs::write(&path, &bytes).await?;
        tracing::info!("[Blob] Stored {} bytes at {}", bytes.len(), path.display());

        Ok(path.to_string_lossy().into_owned())
    }

    async fn retrieve(&self, reference: &str) -> Result<Bytes, BlobError> {
        let path = self.resolve(reference)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("[Blob] Missing blob {}", reference);
                Err(BlobError::NotFound(reference.to_string()))
            }
            Err(e) => Err(BlobError::Io(e)),
        }
    }

    async fn remove(&self, reference: &str) -> Result<(), BlobError> {
        let path = self.resolve(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("[Blob] Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BlobError::NotFound(reference.to_string()))
            }
            Err(e) => Err(BlobError::Io(e)),
        }
    }
}

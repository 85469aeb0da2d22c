//! Image/video uploads for image layout objects.
//!
//! The layout only ever stores the reference returned by the storage
//! service. Uploads go through [`MediaStorage`]; repeated uploads of the
//! same bytes are served from a caller-owned [`UploadCache`].

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::editor::LayoutEditor;
use crate::error::{Error, Result};
use crate::layout::LayoutObject;

#[derive(Debug, Clone)]
pub struct MediaFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn is_supported(&self) -> bool {
        self.content_type.starts_with("image/") || self.content_type.starts_with("video/")
    }

    /// Hex sha256 of the file contents.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// An object-storage backend. Returns an opaque URL for the stored file.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn upload(&self, file: &MediaFile) -> Result<String>;
}

/// Stores uploads under a local directory and hands back `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    dir: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn upload(&self, file: &MediaFile) -> Result<String> {
        if !file.is_supported() {
            return Err(Error::Upload(format!(
                "unsupported content type '{}'; expected an image or video",
                file.content_type
            )));
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let digest = file.digest();
        let path = self
            .dir
            .join(format!("{}-{}", &digest[..12], sanitize_file_name(&file.name)));
        tokio::fs::write(&path, &file.bytes).await?;
        Ok(format!("file://{}", path.display()))
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Content digest -> stored URL, scoped to whoever owns it.
#[derive(Debug, Default, Clone)]
pub struct UploadCache {
    urls: HashMap<String, String>,
}

impl UploadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file: &MediaFile) -> Option<&str> {
        self.urls.get(&file.digest()).map(|s| s.as_str())
    }

    pub fn insert(&mut self, file: &MediaFile, url: String) {
        self.urls.insert(file.digest(), url);
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn clear(&mut self) {
        self.urls.clear();
    }
}

/// Upload `file` and point the image object at `index` to the result.
///
/// On failure the object is left as it was and the error is returned for
/// the form to display.
pub async fn upload_image<S: MediaStorage + ?Sized>(
    editor: &mut LayoutEditor,
    index: usize,
    storage: &S,
    cache: &mut UploadCache,
    file: MediaFile,
) -> Result<String> {
    let len = editor.len();
    match editor.get(index) {
        Some(LayoutObject::Image(_)) => {}
        Some(other) => {
            return Err(Error::Upload(format!(
                "object {} is a {}, not an image",
                index,
                other.kind()
            )))
        }
        None => return Err(Error::IndexOutOfRange { index, len }),
    }

    let url = match cache.get(&file) {
        Some(url) => url.to_string(),
        None => {
            let url = storage.upload(&file).await.inspect_err(|e| {
                warn!(file = %file.name, error = %e, "upload failed");
            })?;
            info!(file = %file.name, bytes = file.bytes.len(), %url, "uploaded");
            cache.insert(&file, url.clone());
            url
        }
    };

    let mut patch = Map::new();
    patch.insert("src".to_string(), Value::String(url.clone()));
    editor.update(index, &patch)?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStorage {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MediaStorage for CountingStorage {
        async fn upload(&self, file: &MediaFile) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://cdn.example.com/{}", file.name))
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl MediaStorage for FailingStorage {
        async fn upload(&self, _file: &MediaFile) -> Result<String> {
            Err(Error::Upload("bucket unavailable".into()))
        }
    }

    fn jpeg(name: &str, bytes: &[u8]) -> MediaFile {
        MediaFile {
            name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn cache_skips_repeat_uploads() {
        let storage = CountingStorage {
            calls: AtomicUsize::new(0),
        };
        let mut cache = UploadCache::new();
        let mut editor = LayoutEditor::new();
        editor.add(LayoutKind::Image);
        editor.add(LayoutKind::Image);

        let a = upload_image(&mut editor, 0, &storage, &mut cache, jpeg("a.jpg", b"abc"))
            .await
            .unwrap();
        let b = upload_image(&mut editor, 1, &storage, &mut cache, jpeg("b.jpg", b"abc"))
            .await
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(storage.calls.load(Ordering::SeqCst), 1);
        let LayoutObject::Image(img) = &editor.objects()[1] else {
            panic!("expected image");
        };
        assert_eq!(img.src, "https://cdn.example.com/a.jpg");
    }

    #[tokio::test]
    async fn failure_leaves_object_untouched() {
        let mut cache = UploadCache::new();
        let mut editor = LayoutEditor::new();
        editor.add(LayoutKind::Image);
        let before = editor.objects()[0].clone();

        let err = upload_image(&mut editor, 0, &FailingStorage, &mut cache, jpeg("a.jpg", b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upload(_)));
        assert_eq!(editor.objects()[0], before);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn rejects_non_image_targets() {
        let mut cache = UploadCache::new();
        let mut editor = LayoutEditor::new();
        editor.add(LayoutKind::Text);
        let storage = CountingStorage {
            calls: AtomicUsize::new(0),
        };
        let err = upload_image(&mut editor, 0, &storage, &mut cache, jpeg("a.jpg", b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upload(_)));
        assert_eq!(storage.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn local_storage_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path().join("media"));
        let url = storage.upload(&jpeg("../look.jpg", b"pixels")).await.unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("-look.jpg"));

        let pdf = MediaFile {
            name: "brief.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: vec![1],
        };
        assert!(storage.upload(&pdf).await.is_err());
    }
}

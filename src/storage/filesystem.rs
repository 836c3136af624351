use crate::storage::backend::{StoreError, TemplateStore};
use async_trait::async_trait;
use plated_template::{OwnerKey, Template};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One pretty-printed JSON file per owner key: `<dir>/<key>.json`.
///
/// Writes go to a temp file in the same directory which is then renamed over
/// the target, so readers see either the old or the new template.
#[derive(Debug, Clone)]
pub struct FilesystemTemplateStore {
    base_path: PathBuf,
}

impl FilesystemTemplateStore {
    pub async fn new(base_path: PathBuf) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(&base_path)
            .await
            .map_err(|source| StoreError::Io {
                path: base_path.clone(),
                source,
            })?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    // Owner keys are restricted to [A-Za-z0-9_-], so they are safe file names.
    fn file_path(&self, key: &OwnerKey) -> PathBuf {
        self.base_path.join(format!("{}.json", key.as_str()))
    }
}

#[async_trait]
impl TemplateStore for FilesystemTemplateStore {
    async fn get_template(&self, key: &OwnerKey) -> Result<Option<Template>, StoreError> {
        let path = self.file_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    async fn save_template(&self, key: &OwnerKey, template: Template) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&template).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        let dir = self.base_path.clone();
        let target = self.file_path(key);

        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, &json))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn write_atomically(dir: &Path, target: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: target.to_path_buf(),
        source,
    };
    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(contents).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(target).map_err(|e| io_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plated_template::{builtin_template, BasePdf, BlankPdf, Field};
    use plated_types::Rect;

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemTemplateStore::new(dir.path().join("templates")).await.unwrap();
        let key = OwnerKey::recipe("tart-42").unwrap();

        let mut template = builtin_template();
        template.base_pdf = Some(BasePdf::Blank(BlankPdf::a4()));
        store.save_template(&key, template.clone()).await.unwrap();

        assert!(store.base_path().join("tart-42.json").exists());
        assert_eq!(store.get_template(&key).await.unwrap(), Some(template));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemTemplateStore::new(dir.path().to_path_buf()).await.unwrap();
        assert_eq!(store.get_template(&OwnerKey::Default).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_save_wins_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemTemplateStore::new(dir.path().to_path_buf()).await.unwrap();
        let first = Template::single_page(vec![Field::text("title", Rect::new(0.0, 0.0, 10.0, 10.0))]);
        let second = Template::single_page(vec![Field::text("steps", Rect::new(0.0, 20.0, 10.0, 10.0))]);

        store.save_template(&OwnerKey::Default, first).await.unwrap();
        store.save_template(&OwnerKey::Default, second.clone()).await.unwrap();

        assert_eq!(store.get_template(&OwnerKey::Default).await.unwrap(), Some(second));
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[tokio::test]
    async fn test_unparsable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.json"), b"{ not json").unwrap();
        let store = FilesystemTemplateStore::new(dir.path().to_path_buf()).await.unwrap();

        assert!(matches!(
            store.get_template(&OwnerKey::Default).await,
            Err(StoreError::Corrupt { .. })
        ));
    }
}

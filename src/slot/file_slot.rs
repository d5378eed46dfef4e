use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::traits::StorageSlot;

/// A storage slot backed by a local file
#[derive(Clone, Debug, PartialEq)]
pub struct FileSlot {
    backing_file: PathBuf,
}

impl FileSlot {
    pub fn new(path: &Path) -> Self {
        Self { backing_file: PathBuf::from(path) }
    }

    /// Get the path to the backing file
    pub fn path(&self) -> &Path {
        &self.backing_file
    }

    fn file_name(&self) -> String {
        self.backing_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// A unique sibling of the backing file, that new content is written to before replacing the backing file
    fn temporary_file(&self) -> PathBuf {
        let unique = Uuid::new_v4().to_hyphenated().to_string();
        self.backing_file.with_file_name(format!(".{}.{}.tmp", self.file_name(), unique))
    }

    /// Delete the temporary files left over by writes that have been interrupted before they could be renamed
    async fn remove_stray_temporary_files(&self, folder: &Path) {
        let prefix = format!(".{}.", self.file_name());
        let mut entries = match tokio::fs::read_dir(folder).await {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Unable to list folder {:?}: {}", folder, err);
                return;
            },
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => {
                    log::warn!("Unable to list folder {:?}: {}", folder, err);
                    break;
                },
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&prefix) && name.ends_with(".tmp") {
                log::debug!("Removing stray temporary file {:?}", entry.path());
                if let Err(err) = tokio::fs::remove_file(entry.path()).await {
                    log::warn!("Unable to remove {:?}: {}", entry.path(), err);
                }
            }
        }
    }
}

#[async_trait]
impl StorageSlot for FileSlot {
    async fn read(&self) -> Result<Option<String>, Box<dyn Error>> {
        let path = &self.backing_file;
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Unable to read file {:?}: {}", path, err).into()),
        }
    }

    /// The new content is written aside first, then moved over the backing file.
    /// Interrupted writes thus never leave a truncated document behind.
    async fn write(&self, content: String) -> Result<(), Box<dyn Error>> {
        let path = &self.backing_file;
        let folder = match path.parent() {
            Some(folder) if folder.as_os_str().is_empty() == false => folder,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(folder).await
            .map_err(|err| format!("Unable to create folder {:?}: {}", folder, err))?;
        self.remove_stray_temporary_files(folder).await;

        let temporary = self.temporary_file();
        if let Err(err) = tokio::fs::write(&temporary, content).await {
            let _ = tokio::fs::remove_file(&temporary).await;
            return Err(format!("Unable to write file {:?}: {}", temporary, err).into());
        }
        if let Err(err) = tokio::fs::rename(&temporary, path).await {
            let _ = tokio::fs::remove_file(&temporary).await;
            return Err(format!("Unable to replace file {:?}: {}", path, err).into());
        }
        Ok(())
    }
}

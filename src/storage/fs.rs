use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{QrCraftError, QrCraftResult};
use crate::storage::{FolderKey, ObjectStore, UploadFile, join_url, object_key};

/// Object store backed by a local directory served under `public_base_url`.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStore {
    /// Store objects below `root`; URLs are `public_base_url/<key>`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Directory objects are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_object(&self, key: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store dir '{}'", parent.display()))?;
        }
        // `create_new` keeps a key collision from clobbering an existing object.
        let mut f = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("create object '{}'", path.display()))?;
        std::io::Write::write_all(&mut f, bytes)
            .with_context(|| format!("write object '{}'", path.display()))?;
        Ok(())
    }
}

impl ObjectStore for FsObjectStore {
    #[tracing::instrument(skip(self, file), fields(name = %file.name, len = file.bytes.len()))]
    fn store(&self, file: &UploadFile, folder: FolderKey) -> QrCraftResult<String> {
        file.validate()?;
        let key = object_key(folder, &file.extension());
        self.write_object(&key, &file.bytes)
            .map_err(|e| QrCraftError::upload(format!("{e:#}")))?;
        tracing::debug!(%key, "stored object");
        Ok(join_url(&self.public_base_url, &key))
    }
}

use std::path::{Path, PathBuf};

use crate::{Error, Result, config, debug, types::Token};

#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

/// Reads and writes the serialized OAuth token.
///
/// There is only ever one token on disk; every successful exchange or
/// refresh overwrites it.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    /// Store at the configured token path.
    pub fn from_config() -> Self {
        Self::new(config::token_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the token.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the token file does not exist
    /// - [`Error::Decode`] if it does not hold a serialized token
    /// - [`Error::Io`] for any other read failure
    pub async fn load(&self) -> Result<Token> {
        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::read(&self.path, e))?;

        serde_json::from_str(&content).map_err(|source| Error::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the token with owner-only permissions.
    ///
    /// The token goes to a sibling temp file which is then renamed over the
    /// token file, so a failed write never leaves a truncated token behind.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the directory cannot be created or either the write
    /// or the rename fails. The previous token file is untouched in that case.
    pub async fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::write(parent, e))?;
        }

        let json = serde_json::to_string_pretty(token).map_err(|e| {
            Error::write(&self.path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        let temp = self.temp_path();
        if let Err(e) = Self::write_private(&temp, &json).await {
            let _ = async_fs::remove_file(&temp).await;
            return Err(e);
        }
        if let Err(e) = async_fs::rename(&temp, &self.path).await {
            let _ = async_fs::remove_file(&temp).await;
            return Err(Error::write(&self.path, e));
        }

        debug!("Saved token to {}", self.path.display());
        Ok(())
    }

    /// `.<file name>.tmp` next to the token file; the rename stays on one
    /// filesystem.
    pub fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "token".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    #[cfg(unix)]
    async fn write_private(path: &Path, contents: &str) -> Result<()> {
        use async_fs::unix::OpenOptionsExt;
        use std::os::unix::fs::PermissionsExt;

        // create with 0600, then clamp a leftover temp file as well
        async_fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(TOKEN_FILE_MODE)
            .open(path)
            .await
            .map_err(|e| Error::write(path, e))?;
        async_fs::set_permissions(path, std::fs::Permissions::from_mode(TOKEN_FILE_MODE))
            .await
            .map_err(|e| Error::write(path, e))?;

        async_fs::write(path, contents)
            .await
            .map_err(|e| Error::write(path, e))
    }

    #[cfg(not(unix))]
    async fn write_private(path: &Path, contents: &str) -> Result<()> {
        async_fs::write(path, contents)
            .await
            .map_err(|e| Error::write(path, e))
    }
}

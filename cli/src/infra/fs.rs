//! Filesystem infrastructure: implements the `LocalFs` port.

use std::any::Any;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::LocalFs;

/// Production filesystem implementation of `LocalFs`.
pub struct HostFs;

impl LocalFs for HostFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_writable(&self, dir: &Path) -> bool {
        tempfile::Builder::new()
            .prefix(".write-probe")
            .tempfile_in(dir)
            .is_ok()
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content).with_context(|| format!("writing file {}", path.display()))
    }

    fn write_private(&self, path: &Path, content: &str) -> Result<()> {
        self.write(path, content)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn write_scratch(
        &self,
        dir: &Path,
        prefix: &str,
        suffix: &str,
        content: &str,
    ) -> Result<(PathBuf, Box<dyn Any + Send>)> {
        use std::io::Write;

        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(dir)
            .with_context(|| format!("creating scratch file in {}", dir.display()))?;
        file.write_all(content.as_bytes())
            .and_then(|()| file.flush())
            .with_context(|| format!("writing scratch file {}", file.path().display()))?;
        let path = file.path().to_path_buf();
        Ok((path, Box::new(file)))
    }
}

/// Directory holding the running installer, and the installer's file name.
///
/// # Errors
///
/// Returns an error if the executable path cannot be determined.
pub fn installer_location() -> Result<(PathBuf, String)> {
    let exe = std::env::current_exe().context("cannot determine installer location")?;
    let dir = exe
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow::anyhow!("installer path has no parent: {}", exe.display()))?;
    let name = exe
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("installer path has no file name: {}", exe.display()))?;
    Ok((dir, name))
}

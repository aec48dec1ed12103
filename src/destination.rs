use crate::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the credentials for a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    /// Two-line settings file on disk
    File(PathBuf),
    /// Interactive prompt (`-` on the command line)
    Prompt,
}

impl SettingSource {
    pub fn parse(value: &str) -> Self {
        if value.trim() == crate::constants::STDIN_SETTING {
            Self::Prompt
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

/// Picks the folder downloads are written to.
///
/// An explicit `folder` always wins. Otherwise the folder holding the settings
/// file is used; with the interactive prompt there is no such folder, so
/// `folder` is mandatory.
///
/// # Errors
///
/// Returns `InvalidInput` when the prompt is used without a folder, and
/// `DestinationNotWritable` when the chosen folder fails [`ensure_writable`].
pub fn resolve_destination(setting: &SettingSource, folder: Option<&Path>) -> AppResult<PathBuf> {
    let destination = match (folder, setting) {
        (Some(folder), _) => folder.to_path_buf(),
        (None, SettingSource::File(path)) => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
        (None, SettingSource::Prompt) => {
            return Err(AppError::InvalidInput(
                "Set the folder option to pass username and password interactively".to_string(),
            ))
        }
    };

    ensure_writable(&destination)?;
    Ok(destination)
}

/// Checks that `path` is an existing directory the current user can create files in.
pub fn ensure_writable(path: &Path) -> AppResult<()> {
    let not_writable = |reason: String| AppError::DestinationNotWritable {
        path: path.to_path_buf(),
        reason,
    };

    if !path.is_dir() {
        return Err(not_writable("not a directory".to_string()));
    }

    // The check file is removed when dropped.
    tempfile::NamedTempFile::new_in(path).map_err(|e| not_writable(e.to_string()))?;
    debug!(path = %path.display(), "Destination is writable");
    Ok(())
}

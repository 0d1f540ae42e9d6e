use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Copy `source` to `backup` unless a backup already exists.
/// Returns whether a backup was created. An existing backup is never touched.
pub fn ensure_backup(source: &Path, backup: &Path) -> Result<bool> {
    if backup.exists() {
        debug!(backup = %backup.display(), "Backup already exists");
        return Ok(false);
    }

    fs::copy(source, backup).context(format!(
        "Failed to back up {} to {}",
        source.display(),
        backup.display()
    ))?;
    info!(source = %source.display(), backup = %backup.display(), "Created backup");
    Ok(true)
}

/// Replace `path` with `contents` without ever leaving a half-written file.
///
/// A symlinked `path` is resolved first and its target is replaced, so the
/// link itself survives. The temp file lives next to the target so the final
/// rename stays on one filesystem. It is removed if anything fails before the
/// rename.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)
        .context(format!("Failed to create temp file in {}", dir.display()))?;
    temp.write_all(contents.as_bytes())
        .context(format!("Failed to write temp file for {}", path.display()))?;
    temp.as_file()
        .sync_all()
        .context(format!("Failed to flush temp file for {}", path.display()))?;

    // Keep the original file's permissions, NamedTempFile creates 0600
    if let Ok(metadata) = fs::metadata(&target) {
        fs::set_permissions(temp.path(), metadata.permissions())
            .context(format!("Failed to copy permissions of {}", target.display()))?;
    }

    temp.persist(&target)
        .context(format!("Failed to replace {}", target.display()))?;
    debug!(path = %path.display(), target = %target.display(), "Wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_created_once() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("hyprland.conf");
        let backup = temp.path().join("hyprland.conf.bak");
        fs::write(&source, "monitor = DP-1, 1920x1080@60, 0x0, 1\n").unwrap();

        assert!(ensure_backup(&source, &backup).unwrap());
        let first = fs::read(&backup).unwrap();

        // Source changes after the first run must not leak into the backup
        fs::write(&source, "monitor = DP-2, 1920x1080@60, 0x0, 1\n").unwrap();
        assert!(!ensure_backup(&source, &backup).unwrap());

        assert_eq!(fs::read(&backup).unwrap(), first);
    }

    #[test]
    fn test_backup_is_verbatim() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("config");
        let backup = temp.path().join("config.bak");
        let bytes = b"{\n    \"output\": [\"DP-1\", ],\r\n}\n";
        fs::write(&source, bytes).unwrap();

        ensure_backup(&source, &backup).unwrap();
        assert_eq!(fs::read(&backup).unwrap(), bytes);
    }

    #[test]
    fn test_backup_missing_source_is_error() {
        let temp = TempDir::new().unwrap();
        let result = ensure_backup(&temp.path().join("missing"), &temp.path().join("missing.bak"));

        assert!(result.is_err());
        assert!(!temp.path().join("missing.bak").exists());
    }

    #[test]
    fn test_write_atomically_replaces_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        fs::write(&path, "old\n").unwrap();

        write_atomically(&path, "new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        // Only the target remains, no stray temp files
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomically_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_atomically(&path, "new\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomically_follows_symlink() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let dotfiles = temp.path().join("dotfiles");
        let config = temp.path().join("config");
        fs::create_dir_all(&dotfiles).unwrap();
        fs::create_dir_all(&config).unwrap();
        let target = dotfiles.join("hyprland.conf");
        let link = config.join("hyprland.conf");
        fs::write(&target, "old\n").unwrap();
        symlink(&target, &link).unwrap();

        write_atomically(&link, "new\n").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&target).unwrap(), "new\n");
        assert_eq!(fs::read_to_string(&link).unwrap(), "new\n");
        // The temp file was created next to the target, not the link
        assert_eq!(fs::read_dir(&config).unwrap().count(), 1);
        assert_eq!(fs::read_dir(&dotfiles).unwrap().count(), 1);
    }
}

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// Writes `data` to `path` without ever leaving a partially written `path`.
///
/// The data is written to `<path>.new`, synced to disk, and then renamed to
/// `path`.  `<path>.new` is removed if any step fails.
pub fn save_data<P>(data: &[u8], path: P) -> std::io::Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let new_path = append_extension(path, "new");
    let result = write_and_rename(data, path, &new_path);
    if result.is_err() && new_path.exists() {
        if let Err(err) = std::fs::remove_file(&new_path) {
            tracing::warn!(%err, new_path = %new_path.display(), "Failed to remove <path>.new");
        }
    }
    result
}

fn write_and_rename(data: &[u8], path: &Path, new_path: &Path) -> std::io::Result<()> {
    {
        let mut file = std::fs::File::create(new_path).inspect_err(|err| {
            tracing::error!(%err, path = %path.display(), "Failed to create <path>.new file");
        })?;
        tracing::debug!(path = %path.display(), "Created <path>.new file for saving data");

        file.write_all(data).inspect_err(|err| {
            tracing::error!(%err, path = %path.display(), "Failed to write data to <path>.new");
        })?;
        tracing::debug!(
            nwritten = data.len(),
            path = %path.display(),
            "Wrote data to <path>.new file"
        );

        file.sync_all().inspect_err(|err| {
            tracing::error!(%err, path = %path.display(), "Failed to sync <path>.new file to disk");
        })?;
        tracing::debug!(path = %path.display(), "Sync <path>.new file to disk");
    }

    std::fs::rename(new_path, path).inspect_err(|err| {
        tracing::error!(%err, path = %path.display(), "Failed to rename <path>.new to <path>");
    })?;
    tracing::debug!(path = %path.display(), "Renamed <path>.new to <path>");

    Ok(())
}

pub fn append_extension<P, S>(path: P, ext: S) -> PathBuf
where
    P: AsRef<Path>,
    S: AsRef<OsStr>,
{
    let path = path.as_ref();
    match path.extension() {
        Some(last_ext) => {
            let mut last_ext = last_ext.to_os_string();
            last_ext.push(".");
            last_ext.push(ext);
            path.with_extension(last_ext)
        }
        None => path.with_extension(ext),
    }
}

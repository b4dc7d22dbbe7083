
use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::Error;
use crate::file_util;
use crate::model::Database;
use crate::model::TagValue;

pub const BACKUP_EXTENSION: &str = "backup";

/// A tag binding converted from the legacy shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub list: String,
    pub link_id: String,
    pub tag: String,
}

#[derive(Debug)]
pub struct Migration {
    pub database: Database,
    pub conversions: Vec<Conversion>,
}

#[derive(Debug)]
pub struct MigrationReport {
    pub conversions: Vec<Conversion>,
    pub backup: PathBuf,
}

#[derive(Debug, thiserror::Error)]
#[error("List [{list}] linkid [{}]: {reason}", .link_id.as_deref().unwrap_or("-"))]
pub struct InvalidTagBinding {
    pub list: String,
    pub link_id: Option<String>,
    pub reason: String,
}

/// Converts every legacy tag binding into a list of tags.
///
/// Bindings already in the current shape, including `null` ones, are left
/// untouched, so migrating an already migrated database yields the same
/// database and no conversions.
pub fn migrate(mut database: Database) -> Result<Migration, InvalidTagBinding> {
    let mut conversions = vec![];
    for (list_name, list) in database.lists.iter_mut() {
        let bindings = match list.tag_bindings_mut() {
            Ok(Some(bindings)) => bindings,
            Ok(None) => continue,
            Err(reason) => {
                return Err(InvalidTagBinding {
                    list: list_name.clone(),
                    link_id: None,
                    reason,
                });
            }
        };
        for (link_id, value) in bindings.iter_mut() {
            let tag_value = TagValue::try_from(&*value).map_err(|err| InvalidTagBinding {
                list: list_name.clone(),
                link_id: Some(link_id.clone()),
                reason: err.to_string(),
            })?;
            if let TagValue::Legacy(tag) = &tag_value {
                tracing::debug!(list = %list_name, %link_id, %tag, "Converted to list");
                conversions.push(Conversion {
                    list: list_name.clone(),
                    link_id: link_id.clone(),
                    tag: tag.clone(),
                });
                *value = Value::from(tag_value.into_tags());
            }
        }
    }
    Ok(Migration {
        database,
        conversions,
    })
}

/// Migrates the database file at `path` in place.
///
/// The original file is kept at `<path>.backup`.
pub fn migrate_file<P>(path: P) -> Result<MigrationReport, Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let database = load(path)?;

    tracing::info!(file = %path.display(), "Migrating...");
    let migration = migrate(database).map_err(|err| Error::malformed_input(path, err))?;

    let backup = persist(path, &migration.database)?;
    tracing::info!(
        file = %path.display(),
        backup = %backup.display(),
        nconversions = migration.conversions.len(),
        "Migrated successfully"
    );

    Ok(MigrationReport {
        conversions: migration.conversions,
        backup,
    })
}

/// Same as `migrate_file()`, but no file is changed.
pub fn dry_run_file<P>(path: P) -> Result<Vec<Conversion>, Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let database = load(path)?;
    let migration = migrate(database).map_err(|err| Error::malformed_input(path, err))?;
    tracing::info!(
        file = %path.display(),
        nconversions = migration.conversions.len(),
        "Dry run"
    );
    Ok(migration.conversions)
}

pub fn load<P>(path: P) -> Result<Database, Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.to_owned()),
        _ => Error::IoError(err),
    })?;
    tracing::debug!(file = %path.display(), nread = data.len(), "Loaded");
    Database::from_slice(&data).map_err(|err| Error::malformed_input(path, err))
}

pub fn backup_path<P>(path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    file_util::append_extension(path, BACKUP_EXTENSION)
}

/// Renames `path` to `<path>.backup`, then saves `database` to `path`.
///
/// Nothing is changed if the backup cannot be made.  If saving fails after
/// the rename, the backup is left in place and has to be restored manually.
pub fn persist<P>(path: P, database: &Database) -> Result<PathBuf, Error>
where
    P: AsRef<Path>,
{
    persist_with(path.as_ref(), database, |data, path| {
        file_util::save_data(data, path)
    })
}

fn persist_with<W>(path: &Path, database: &Database, write: W) -> Result<PathBuf, Error>
where
    W: FnOnce(&[u8], &Path) -> std::io::Result<()>,
{
    let backup = backup_path(path);
    if backup.exists() {
        return Err(Error::BackupFailed {
            path: path.to_owned(),
            backup,
            reason: "backup file already exists".to_string(),
        });
    }
    if let Err(err) = std::fs::rename(path, &backup) {
        return Err(Error::BackupFailed {
            path: path.to_owned(),
            backup,
            reason: err.to_string(),
        });
    }
    tracing::debug!(file = %path.display(), backup = %backup.display(), "Backed up");

    let result = database
        .to_vec()
        .map_err(std::io::Error::from)
        .and_then(|data| write(&data, path));
    if let Err(err) = result {
        tracing::error!(
            %err,
            file = %path.display(),
            backup = %backup.display(),
            "Failed to save the migrated database"
        );
        return Err(Error::WriteFailed {
            path: path.to_owned(),
            backup,
            source: err,
        });
    }
    tracing::debug!(file = %path.display(), "Saved");

    Ok(backup)
}

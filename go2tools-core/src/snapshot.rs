use std::path::Path;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::NaiveDate;
use url::Url;

use crate::error::Error;
use crate::file_util;
use crate::model::Database;

/// The path of the endpoint exporting the whole database of a go2redirector.
pub const ENDPOINT: &str = "_db_";

/// A snapshot of the database of a running go2redirector.
#[derive(Debug)]
pub struct Snapshot {
    pub url: String,
    pub data: Bytes,
    pub database: Database,
}

impl Snapshot {
    // The labels are swapped, but operators' scripts may depend on this line.
    pub fn summary(&self) -> String {
        format!(
            "Links: {}, Lists: {}",
            self.database.lists.len(),
            self.database.links.len()
        )
    }
}

pub fn endpoint_url(base_url: &Url) -> String {
    format!("{}/{ENDPOINT}", base_url.as_str().trim_end_matches('/'))
}

pub fn file_name(date: NaiveDate) -> String {
    format!("{}-go2backup.json", date.format("%m-%d-%y"))
}

pub fn file_path<P>(dir: P, date: NaiveDate) -> PathBuf
where
    P: AsRef<Path>,
{
    dir.as_ref().join(file_name(date))
}

/// Fetches a snapshot from the go2redirector at `base_url`.
///
/// The response body is validated, but kept as it is in `Snapshot::data`.
pub async fn fetch(base_url: &Url) -> Result<Snapshot, Error> {
    let url = endpoint_url(base_url);
    tracing::debug!(%url, "Fetching...");

    let res = reqwest::get(&url).await?.error_for_status()?;
    let data = res.bytes().await?;
    tracing::debug!(%url, nread = data.len(), "Fetched");

    let database = Database::from_slice(&data).map_err(|source| Error::MalformedResponse {
        url: url.clone(),
        source,
    })?;

    Ok(Snapshot {
        url,
        data,
        database,
    })
}

/// Fails if `path` already exists and must not be overwritten.
pub fn check_destination<P>(path: P, no_clobber: bool) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if no_clobber && path.exists() {
        return Err(Error::AlreadyExists(path.to_owned()));
    }
    Ok(())
}

pub fn save<P>(snapshot: &Snapshot, path: P) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.exists() {
        tracing::warn!(file = %path.display(), "Overwrite");
    }
    file_util::save_data(&snapshot.data, path)?;
    tracing::info!(file = %path.display(), url = %snapshot.url, "Saved");
    Ok(())
}

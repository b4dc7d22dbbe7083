use std::path::PathBuf;

use clap::Args;
use url::Url;

use go2tools_core::error::Error;
use go2tools_core::snapshot;

/// Back up the database of a running go2redirector.
///
/// The database is fetched from <URL>/_db_ and saved to
/// <OUTPUT_DIR>/<MM-DD-YY>-go2backup.json.  This is useful for maintaining an
/// off-box backup.
///
/// An existing backup file of the same day is overwritten unless
/// --no-clobber is specified.
#[derive(Args, Debug)]
#[command(verbatim_doc_comment)]
pub struct CommandLine {
    /// Directory where the backup file is saved.
    #[arg(short, long, env = "GO2TOOLS_BACKUP_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Fail if the backup file already exists.
    #[arg(long)]
    no_clobber: bool,

    /// HTTP/HTTPS URL of the redirector, including the port if nonstandard.
    url: Url,
}

pub async fn main(cl: &CommandLine) -> Result<(), Error> {
    let today = chrono::Local::now().date_naive();
    let path = snapshot::file_path(&cl.output_dir, today);

    println!(
        "running backup of remote go2redirector db to: {}",
        path.display()
    );
    snapshot::check_destination(&path, cl.no_clobber)?;

    let snapshot = snapshot::fetch(&cl.url).await?;
    println!("{}", snapshot.summary());

    snapshot::save(&snapshot, &path)?;
    println!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tempfile::TempDir;

    const DB: &str = r#"{"Lists":{"A":{}},"Links":{"x":{}}}"#;

    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    fn command_line(temp_dir: &TempDir, url: Url, no_clobber: bool) -> CommandLine {
        CommandLine {
            output_dir: temp_dir.path().to_owned(),
            no_clobber,
            url,
        }
    }

    fn entries(temp_dir: &TempDir) -> Vec<PathBuf> {
        std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    #[tokio::test]
    async fn test_main() {
        let temp_dir = TempDir::new().unwrap();
        let url = serve(Router::new().route("/_db_", get(|| async { DB }))).await;

        let result = main(&command_line(&temp_dir, url, false)).await;
        assert_matches!(result, Ok(()));

        let files = entries(&temp_dir);
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("-go2backup.json"));
        assert_eq!(std::fs::read(&files[0]).unwrap(), DB.as_bytes());
    }

    #[tokio::test]
    async fn test_main_server_error() {
        let temp_dir = TempDir::new().unwrap();
        let url = serve(Router::new().route(
            "/_db_",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "error") }),
        ))
        .await;

        let result = main(&command_line(&temp_dir, url, false)).await;
        assert_matches!(result, Err(Error::FetchFailed(_)));
        assert!(entries(&temp_dir).is_empty());
    }

    #[tokio::test]
    async fn test_main_malformed_response() {
        let temp_dir = TempDir::new().unwrap();
        let url = serve(Router::new().route("/_db_", get(|| async { "not json" }))).await;

        let result = main(&command_line(&temp_dir, url, false)).await;
        assert_matches!(result, Err(Error::MalformedResponse { .. }));
        assert!(entries(&temp_dir).is_empty());
    }

    #[tokio::test]
    async fn test_main_no_clobber() {
        let temp_dir = TempDir::new().unwrap();
        let url = serve(Router::new().route("/_db_", get(|| async { DB }))).await;

        let today = chrono::Local::now().date_naive();
        let path = snapshot::file_path(temp_dir.path(), today);
        std::fs::write(&path, b"previous").unwrap();

        let result = main(&command_line(&temp_dir, url, true)).await;
        assert_matches!(result, Err(Error::AlreadyExists(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    }
}

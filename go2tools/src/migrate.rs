use std::path::PathBuf;

use clap::Args;

use go2tools_core::error::Error;
use go2tools_core::migrate;

/// Convert legacy tag bindings in a database file.
///
/// Older versions of go2redirector bound a single tag to a link in a list.
/// The current version binds a list of tags.  Run this command if the
/// redirector fails to load <DB_FILE> due to JSON unmarshalling errors.
///
/// <DB_FILE> is renamed to <DB_FILE>.backup before the converted database is
/// saved.  The command fails if <DB_FILE>.backup already exists.
///
/// Don't run this command while the redirector is running.
#[derive(Args, Debug)]
#[command(verbatim_doc_comment)]
pub struct CommandLine {
    /// Show tag bindings to be converted without changing any file.
    #[arg(long)]
    dry_run: bool,

    /// Path to the database file in JSON format.
    db_file: PathBuf,
}

pub fn main(cl: &CommandLine) -> Result<(), Error> {
    if cl.dry_run {
        let conversions = migrate::dry_run_file(&cl.db_file)?;
        for conv in conversions.iter() {
            println!(
                "List [{}] linkid [{}] tag [{}] will be converted to list",
                conv.list, conv.link_id, conv.tag
            );
        }
        println!("{} tag bindings will be converted", conversions.len());
        return Ok(());
    }

    let report = migrate::migrate_file(&cl.db_file)?;
    for conv in report.conversions.iter() {
        println!(
            "List [{}] linkid [{}] tag [{}] converted to list",
            conv.list, conv.link_id, conv.tag
        );
    }
    println!(
        "conversion complete, backup saved to {}",
        report.backup.display()
    );
    Ok(())
}

//! Output writers for an aggregation run.
//!
//! # Submodules
//!
//! - [`json`]: Serializes the [`FrontPage`](crate::models::FrontPage) for a
//!   rendering layer or API consumer
//! - [`text`]: A plain terminal listing, including the "no news" state
//!
//! Both write to a file when a path is given and to stdout otherwise.

pub mod json;
pub mod text;

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

/// Write `contents` to `path`, creating parent directories, or to stdout.
#[instrument(level = "info", skip(contents), fields(bytes = contents.len()))]
pub async fn emit(contents: &str, path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await?;
            }
            fs::write(path, contents).await?;
            info!(path = %path.display(), "Wrote output");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(contents.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Overrides the database location when set.
pub const DB_ENV_VAR: &str = "HONOKA_DB";

const APP_DIR: &str = "honoka";
const DEFAULT_DB_NAME: &str = "data.db";

/// Database path for this process, with its parent directory created.
pub fn db_path() -> Result<PathBuf> {
    resolve_db_path(std::env::var_os(DB_ENV_VAR), dirs::data_dir())
}

pub fn resolve_db_path(
    override_path: Option<OsString>,
    data_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    let path = match override_path.filter(|p| !p.is_empty()) {
        Some(p) => PathBuf::from(p),
        None => data_dir
            .ok_or(Error::NoDataDir)?
            .join(APP_DIR)
            .join(DEFAULT_DB_NAME),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::DataDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    Ok(path)
}

use std::{env, io, path::PathBuf};

use anyhow::{Context, Result};

/// `$HOME/.tf`, holds the default log file, the config file and the application logs.
pub fn application_default_path() -> Result<PathBuf> {
    let home = env::var("HOME").context("Couldn't find HOME")?;
    let mut path = PathBuf::from(home);
    path.push(".tf");
    Ok(path)
}

/// Same as [application_default_path] but makes sure the directory exists.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = application_default_path()?;

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

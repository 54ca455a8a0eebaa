use anyhow::{Result, anyhow};
use std::path::PathBuf;

pub fn get_daytodo_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".daytodo"))
}

/// Directory holding the JSON file backend's `<key>.json` files.
pub fn get_data_dir() -> Result<PathBuf> {
    let dir = get_daytodo_dir()?;
    Ok(dir.join("data"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let dir = get_daytodo_dir()?;
    Ok(dir.join("config.toml"))
}

pub fn get_database_path() -> Result<PathBuf> {
    let dir = get_daytodo_dir()?;
    Ok(dir.join("daytodo.db"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    let dir = get_daytodo_dir()?;
    Ok(dir.join("logs"))
}

pub fn get_crash_log_path() -> Result<PathBuf> {
    let dir = get_daytodo_dir()?;
    Ok(dir.join("crash.log"))
}

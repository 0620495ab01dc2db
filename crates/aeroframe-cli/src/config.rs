//! Configuration loading – reads `~/.aeroframe/config.toml`.
//!
//! A missing file falls back to the built-in defaults; a file that exists
//! but does not parse is a startup error, never silently replaced by
//! defaults.  `AEROFRAME_*` environment variables override individual
//! fields after the file is read.

use std::fs;
use std::path::{Path, PathBuf};

use aeroframe_types::RelayConfig;

/// Return the config path: `$AEROFRAME_CONFIG` when set, otherwise
/// `~/.aeroframe/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("AEROFRAME_CONFIG") {
        return PathBuf::from(path);
    }
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".aeroframe").join("config.toml")
}

/// Load the config, falling back to defaults when no file exists, then
/// apply environment overrides.  The caller still runs
/// [`RelayConfig::validate`] before anything is published.
pub fn load() -> Result<RelayConfig, String> {
    let mut cfg = load_from(&config_path())?.unwrap_or_default();
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Load the config from a specific path.  Returns `None` if the file does
/// not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<RelayConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config at {}: {e}", path.display()))?;
    let cfg: RelayConfig =
        toml::from_str(&raw).map_err(|e| format!("failed to parse config: {e}"))?;
    Ok(Some(cfg))
}

/// Apply `AEROFRAME_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `AEROFRAME_SENSOR_FRAME` | `frames.sensor` |
/// | `AEROFRAME_BODY_FRAME` | `frames.body` |
/// | `AEROFRAME_IMAGE_WIDTH` | `image_width` |
/// | `AEROFRAME_IMAGE_HEIGHT` | `image_height` |
pub fn apply_env_overrides(cfg: &mut RelayConfig) {
    if let Ok(v) = std::env::var("AEROFRAME_SENSOR_FRAME") {
        cfg.frames.sensor = v;
    }
    if let Ok(v) = std::env::var("AEROFRAME_BODY_FRAME") {
        cfg.frames.body = v;
    }
    if let Ok(v) = std::env::var("AEROFRAME_IMAGE_WIDTH")
        && let Ok(width) = v.parse::<u32>()
    {
        cfg.image_width = width;
    }
    if let Ok(v) = std::env::var("AEROFRAME_IMAGE_HEIGHT")
        && let Ok(height) = v.parse::<u32>()
    {
        cfg.image_height = height;
    }
}

//! Platform-specific paths.

use crate::config::ResolverConfig;
use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/synthscan/`
/// - macOS: `~/Library/Application Support/synthscan/`
/// - Windows: `%APPDATA%\synthscan\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Parent directory under which staged downloads create their scratch directories.
pub fn staging_root(resolver: &ResolverConfig) -> PathBuf {
    resolver
        .staging_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_path_ends_with_toml() {
        let path = config_file_path().unwrap();
        assert!(path.to_string_lossy().contains("synthscan"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_staging_root_prefers_configured_dir() {
        let resolver = ResolverConfig {
            staging_dir: Some(PathBuf::from("/var/tmp/scratch")),
            ..ResolverConfig::default()
        };
        assert_eq!(staging_root(&resolver), PathBuf::from("/var/tmp/scratch"));
    }

    #[test]
    fn test_staging_root_falls_back_to_temp_dir() {
        let resolver = ResolverConfig::default();
        assert_eq!(staging_root(&resolver), std::env::temp_dir());
    }
}

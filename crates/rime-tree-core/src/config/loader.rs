//! Configuration file discovery and loading

use super::rime_tree_config::RimeTreeConfig;
use crate::{Result, RimeTreeError};
use std::path::{Path, PathBuf};

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".rimetreerc.json",
    ".rimetreerc.toml",
    "rime-tree.yaml",
    "rime-tree.yml",
    "rime-tree.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// Each directory is searched for [`CONFIG_FILE_NAMES`] in order, moving
    /// up until a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| RimeTreeError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load and validate configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<RimeTreeConfig> {
        let config = RimeTreeConfig::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `custom_path`, or auto-discover it from `start_dir`
    /// (default: the current directory)
    ///
    /// An explicit path must exist. When discovery finds nothing the default
    /// configuration is used.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<RimeTreeConfig> {
        let config_path = if let Some(path) = custom_path {
            if !path.exists() {
                return Err(RimeTreeError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        } else {
            Self::auto_discover(start_dir.unwrap_or_else(|| Path::new(".")))?
        };

        match config_path {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(RimeTreeConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_auto_discover_from_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("schemas/nested");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "rime-tree.yaml", "layers: {}\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "rime-tree.yaml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "rime-tree.json", "{}");
        create_temp_config(temp_dir.path(), ".rimetreerc.toml", "");
        create_temp_config(temp_dir.path(), "rime-tree.yaml", "{}\n");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".rimetreerc.toml");
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            "custom.yaml",
            "layers:\n  sharedDir: /srv/rime\n",
        );

        let config = ConfigLoader::load(Some(&path), None).unwrap();
        assert_eq!(config.shared_dir(), PathBuf::from("/srv/rime"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = ConfigLoader::load(Some(Path::new("/nonexistent/rime-tree.yaml")), None);
        assert!(matches!(result, Err(RimeTreeError::Config { .. })));
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            "rime-tree.yaml",
            "documents:\n  extension: ''\n",
        );
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}

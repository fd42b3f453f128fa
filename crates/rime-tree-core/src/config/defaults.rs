//! Platform default locations of the Rime data directories

use std::path::{Path, PathBuf};

const LINUX_SHARED_DIR: &str = "/usr/share/rime-data";
const MACOS_SHARED_DIR: &str = "/Library/Input Methods/Squirrel.app/Contents/SharedSupport";
const WEASEL_DATA_GLOB: &str = "C:/Program Files (x86)/Rime/weasel-*/data";
const WEASEL_FALLBACK_DIR: &str = "C:/Program Files (x86)/Rime/data";

/// User directories of the Linux frontends, most common first
const LINUX_USER_DIRS: &[&str] = &[
    ".config/ibus/rime",
    ".local/share/fcitx5/rime",
    ".config/fcitx/rime",
];

/// Shared (program data) directory of the platform's Rime frontend
pub fn default_shared_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        last_match(WEASEL_DATA_GLOB).unwrap_or_else(|| PathBuf::from(WEASEL_FALLBACK_DIR))
    } else if cfg!(target_os = "macos") {
        PathBuf::from(MACOS_SHARED_DIR)
    } else {
        PathBuf::from(LINUX_SHARED_DIR)
    }
}

/// User directory of the platform's Rime frontend
pub fn default_user_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::config_dir().unwrap_or_default().join("Rime")
    } else if cfg!(target_os = "macos") {
        dirs::home_dir().unwrap_or_default().join("Library/Rime")
    } else {
        linux_user_dir(&dirs::home_dir().unwrap_or_default(), |p| p.is_dir())
    }
}

/// First existing frontend directory under `home`, ibus when none exists
fn linux_user_dir(home: &Path, exists: impl Fn(&Path) -> bool) -> PathBuf {
    LINUX_USER_DIRS
        .iter()
        .map(|relative| home.join(relative))
        .find(|candidate| exists(candidate))
        .unwrap_or_else(|| home.join(LINUX_USER_DIRS[0]))
}

/// Match of `pattern` with the highest version; weasel installs one
/// `weasel-<version>/data` directory per version
fn last_match(pattern: &str) -> Option<PathBuf> {
    glob::glob(pattern)
        .ok()?
        .filter_map(|entry| entry.ok())
        .max_by_key(|path| version_key(path))
}

/// `[0, 15, 0]` for `.../weasel-0.15.0/data`
fn version_key(path: &Path) -> Vec<u64> {
    path.parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('-'))
        .map(|(_, version)| {
            version
                .split('.')
                .map(|part| part.parse().unwrap_or(0))
                .collect()
        })
        .unwrap_or_default()
}

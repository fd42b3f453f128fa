//! Configuration system for rime-tree
//!
//! Settings come from an optional config file, discovered by walking up from
//! the working directory (see [`CONFIG_FILE_NAMES`]). YAML, JSON and
//! TOML are accepted. Anything left unset falls back to the platform's Rime
//! locations and the standard document conventions.
//!
//! ## Example Configuration (rime-tree.yaml)
//!
//! ```yaml
//! layers:
//!   sharedDir: /usr/share/rime-data
//!   userDir: ~/.local/share/fcitx5/rime
//! documents:
//!   customSuffix: .custom
//! ```

mod defaults;
mod loader;
mod merge;
mod rime_tree_config;

pub use defaults::{default_shared_dir, default_user_dir};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use rime_tree_config::{
    DEFAULT_SHARED_LABEL, DEFAULT_USER_LABEL, DocumentsConfiguration, LayersConfiguration,
    RimeTreeConfig,
};

//! Configuration types for rime-tree

use super::defaults;
use crate::layout::DocumentLayout;
use crate::{Result, RimeTreeError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Label of the shared layer folder when none is configured
pub const DEFAULT_SHARED_LABEL: &str = "Default";

/// Label of the user layer folder when none is configured
pub const DEFAULT_USER_LABEL: &str = "User";

/// Top-level configuration
///
/// ```yaml
/// layers:
///   sharedDir: /usr/share/rime-data
///   userDir: ~/.local/share/fcitx5/rime
///   sharedLabel: Default
///   userLabel: User
/// documents:
///   extension: .yaml
///   dictionaryExtension: .dict.yaml
///   customSuffix: .custom
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RimeTreeConfig {
    /// Where the two layers live and how they are labelled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<LayersConfiguration>,

    /// Document naming conventions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentsConfiguration>,
}

/// Layer directories
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayersConfiguration {
    #[schemars(description = "Shared (program default) data directory")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_dir: Option<PathBuf>,

    #[schemars(description = "User data directory")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_dir: Option<PathBuf>,

    #[schemars(description = "Label of the shared layer in the tree")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_label: Option<String>,

    #[schemars(description = "Label of the user layer in the tree")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_label: Option<String>,
}

/// Document naming conventions
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsConfiguration {
    #[schemars(description = "Extension of configuration documents, e.g. '.yaml'")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    #[schemars(description = "Extension of dictionaries, which are never loaded")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary_extension: Option<String>,

    #[schemars(description = "Suffix marking override documents, e.g. '.custom'")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_suffix: Option<String>,
}

impl RimeTreeConfig {
    /// Load configuration from a YAML, JSON or TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| RimeTreeError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let parsed: std::result::Result<Self, String> = match ext {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            _ => Err("Unsupported file extension (expected .yaml, .yml, .json or .toml)".to_string()),
        };
        parsed.map_err(|message| {
            RimeTreeError::config_error(format!("{}: {}", path.display(), message))
        })
    }

    /// Config with only the layer directories set
    pub fn with_dirs(shared_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        Self {
            layers: Some(LayersConfiguration {
                shared_dir: Some(shared_dir.into()),
                user_dir: Some(user_dir.into()),
                ..Default::default()
            }),
            documents: None,
        }
    }

    fn layers_ref(&self) -> Option<&LayersConfiguration> {
        self.layers.as_ref()
    }

    /// Shared layer directory, falling back to the platform default
    pub fn shared_dir(&self) -> PathBuf {
        self.layers_ref()
            .and_then(|l| l.shared_dir.as_deref())
            .map(expand_home)
            .unwrap_or_else(defaults::default_shared_dir)
    }

    /// User layer directory, falling back to the platform default
    pub fn user_dir(&self) -> PathBuf {
        self.layers_ref()
            .and_then(|l| l.user_dir.as_deref())
            .map(expand_home)
            .unwrap_or_else(defaults::default_user_dir)
    }

    pub fn shared_label(&self) -> String {
        self.layers_ref()
            .and_then(|l| l.shared_label.clone())
            .unwrap_or_else(|| DEFAULT_SHARED_LABEL.to_string())
    }

    pub fn user_label(&self) -> String {
        self.layers_ref()
            .and_then(|l| l.user_label.clone())
            .unwrap_or_else(|| DEFAULT_USER_LABEL.to_string())
    }

    /// Document naming conventions with defaults applied
    pub fn layout(&self) -> DocumentLayout {
        let mut layout = DocumentLayout::default();
        if let Some(documents) = &self.documents {
            if let Some(extension) = &documents.extension {
                layout.document_extension = extension.clone();
            }
            if let Some(extension) = &documents.dictionary_extension {
                layout.dictionary_extension = extension.clone();
            }
            if let Some(suffix) = &documents.custom_suffix {
                layout.custom_suffix = suffix.clone();
            }
        }
        layout
    }

    /// JSON Schema of the config file, with title and description filled in
    pub fn json_schema() -> serde_json::Value {
        let mut schema = serde_json::to_value(schemars::schema_for!(RimeTreeConfig))
            .unwrap_or_else(|_| serde_json::json!({}));
        schema["title"] = serde_json::json!("rime-tree configuration");
        schema["description"] =
            serde_json::json!("Schema for rime-tree.yaml, rime-tree.json and .rimetreerc files");
        schema
    }

    /// Reject settings the tree cannot work with
    pub fn validate(&self) -> Result<()> {
        let layout = self.layout();
        if layout.document_extension.is_empty() {
            return Err(RimeTreeError::config_error(
                "documents.extension must not be empty",
            ));
        }
        if layout.custom_suffix.is_empty() {
            return Err(RimeTreeError::config_error(
                "documents.customSuffix must not be empty",
            ));
        }
        if !layout
            .dictionary_extension
            .ends_with(&layout.document_extension)
        {
            return Err(RimeTreeError::config_error(format!(
                "documents.dictionaryExtension '{}' must end with the document extension '{}'",
                layout.dictionary_extension, layout.document_extension
            )));
        }

        let (shared, user) = (self.shared_label(), self.user_label());
        if shared == user {
            return Err(RimeTreeError::config_error(format!(
                "layers.sharedLabel and layers.userLabel must differ (both are '{shared}')"
            )));
        }
        Ok(())
    }
}

/// Replace a leading `~` with the home directory
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

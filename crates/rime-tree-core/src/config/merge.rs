//! Configuration merging logic
//!
//! Combines configuration sources, e.g. command-line flags over a config file
//! over built-in defaults.

use super::rime_tree_config::*;

impl RimeTreeConfig {
    /// Merge another config into this one (current takes precedence)
    pub fn merge_with(&mut self, other: RimeTreeConfig) {
        if let Some(other_layers) = other.layers {
            if let Some(ref mut layers) = self.layers {
                layers.merge_with(other_layers);
            } else {
                self.layers = Some(other_layers);
            }
        }

        if let Some(other_documents) = other.documents {
            if let Some(ref mut documents) = self.documents {
                documents.merge_with(other_documents);
            } else {
                self.documents = Some(other_documents);
            }
        }
    }
}

impl LayersConfiguration {
    /// Merge layer settings (current takes precedence)
    pub fn merge_with(&mut self, other: LayersConfiguration) {
        if self.shared_dir.is_none() {
            self.shared_dir = other.shared_dir;
        }
        if self.user_dir.is_none() {
            self.user_dir = other.user_dir;
        }
        if self.shared_label.is_none() {
            self.shared_label = other.shared_label;
        }
        if self.user_label.is_none() {
            self.user_label = other.user_label;
        }
    }
}

impl DocumentsConfiguration {
    /// Merge document conventions (current takes precedence)
    pub fn merge_with(&mut self, other: DocumentsConfiguration) {
        if self.extension.is_none() {
            self.extension = other.extension;
        }
        if self.dictionary_extension.is_none() {
            self.dictionary_extension = other.dictionary_extension;
        }
        if self.custom_suffix.is_none() {
            self.custom_suffix = other.custom_suffix;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_merge_layers_current_wins() {
        let mut cli = RimeTreeConfig {
            layers: Some(LayersConfiguration {
                user_dir: Some(PathBuf::from("/from/cli")),
                ..Default::default()
            }),
            documents: None,
        };
        let file = RimeTreeConfig {
            layers: Some(LayersConfiguration {
                shared_dir: Some(PathBuf::from("/from/file/shared")),
                user_dir: Some(PathBuf::from("/from/file/user")),
                user_label: Some("Mine".to_string()),
                ..Default::default()
            }),
            documents: Some(DocumentsConfiguration {
                custom_suffix: Some(".local".to_string()),
                ..Default::default()
            }),
        };

        cli.merge_with(file);

        assert_eq!(cli.user_dir(), PathBuf::from("/from/cli"));
        assert_eq!(cli.shared_dir(), PathBuf::from("/from/file/shared"));
        assert_eq!(cli.user_label(), "Mine");
        assert_eq!(cli.layout().custom_suffix, ".local");
    }

    #[test]
    fn test_merge_documents() {
        let mut base = DocumentsConfiguration {
            extension: Some(".yml".to_string()),
            dictionary_extension: None,
            custom_suffix: None,
        };
        base.merge_with(DocumentsConfiguration {
            extension: Some(".yaml".to_string()),
            dictionary_extension: Some(".dict.yml".to_string()),
            custom_suffix: None,
        });

        assert_eq!(base.extension.as_deref(), Some(".yml"));
        assert_eq!(base.dictionary_extension.as_deref(), Some(".dict.yml"));
        assert_eq!(base.custom_suffix, None);
    }
}

//! Reserved names of the Rime data layout
//!
//! Every structural string the tree relies on lives here: the document and
//! dictionary extensions, the override suffix, the patch key and the
//! composite-key delimiter. [`DocumentLayout`] is the single place that
//! answers "is this file a document", "what is its key" and "is it custom".

use crate::node::FileKind;

/// Extension of structured configuration documents
pub const DOCUMENT_EXTENSION: &str = ".yaml";

/// Extension of dictionary documents, which are word lists and never loaded
pub const DICTIONARY_EXTENSION: &str = ".dict.yaml";

/// Suffix placed before the extension by user override documents
pub const CUSTOM_SUFFIX: &str = ".custom";

/// Key of the override container inside a custom document
pub const PATCH_KEY: &str = "patch";

/// Delimiter of composite keys such as `menu/page_size`
pub const KEY_DELIMITER: char = '/';

/// File naming conventions for one configuration store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    pub document_extension: String,
    pub dictionary_extension: String,
    pub custom_suffix: String,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            document_extension: DOCUMENT_EXTENSION.to_string(),
            dictionary_extension: DICTIONARY_EXTENSION.to_string(),
            custom_suffix: CUSTOM_SUFFIX.to_string(),
        }
    }
}

impl DocumentLayout {
    /// Whether a file name denotes a configuration document
    pub fn is_eligible(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.document_extension)
            && !file_name.ends_with(&self.dictionary_extension)
    }

    /// Node key for a document: the file name without its extension
    pub fn file_key<'a>(&self, file_name: &'a str) -> &'a str {
        file_name
            .strip_suffix(self.document_extension.as_str())
            .unwrap_or(file_name)
    }

    /// Classify a document key as a default or a custom (override) document
    pub fn file_kind(&self, file_key: &str) -> FileKind {
        if file_key.ends_with(&self.custom_suffix) {
            FileKind::Custom
        } else {
            FileKind::Default
        }
    }

    /// Key of the custom document overriding `base_key`
    pub fn custom_key(&self, base_key: &str) -> String {
        format!("{base_key}{}", self.custom_suffix)
    }
}

/// Split a composite key into its segments
///
/// Keys without the delimiter yield a single segment. Empty segments are kept.
pub fn split_key(key: &str) -> impl Iterator<Item = &str> {
    key.split(KEY_DELIMITER)
}

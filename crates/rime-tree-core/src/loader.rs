//! Loading a layer directory into a folder node

use crate::builder::TreeBuilder;
use crate::document::DocumentParser;
use crate::fs::FileSystem;
use crate::layout::DocumentLayout;
use crate::node::ConfigNode;
use crate::result::ResultExt;
use crate::{Result, RimeTreeError};
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds one folder node per layer directory
#[derive(Clone)]
pub struct LayerLoader {
    fs: Arc<dyn FileSystem>,
    parser: Arc<dyn DocumentParser>,
    layout: DocumentLayout,
}

impl LayerLoader {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        parser: Arc<dyn DocumentParser>,
        layout: DocumentLayout,
    ) -> Self {
        Self { fs, parser, layout }
    }

    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    /// Load every configuration document of `directory` under a folder node
    /// keyed `label`
    ///
    /// Dictionaries and other files are skipped. A document that cannot be
    /// read or parsed is dropped with a warning; only an unreadable directory
    /// fails the load. Documents are keyed by file name, in file name order.
    pub async fn load(&self, directory: &Path, label: &str) -> Result<ConfigNode> {
        let mut names = self.fs.read_directory(directory).await?;
        names.retain(|name| self.layout.is_eligible(name));
        names.sort();

        let reads = names.iter().map(|name| {
            let path = directory.join(name);
            async move {
                let content = self.fs.read_file(&path).await;
                (path, content)
            }
        });
        let contents = join_all(reads).await;

        let mut folder = ConfigNode::folder(label, directory);
        for (name, (path, content)) in names.iter().zip(contents) {
            let document = content.and_then(|bytes| self.build_document(name, &path, bytes));
            if let Some(file) = document.recoverable()? {
                folder.add_child(file);
            }
        }

        info!(
            "Loaded {} of {} documents from {}",
            folder.children().len(),
            names.len(),
            directory.display()
        );
        Ok(folder)
    }

    fn build_document(&self, name: &str, path: &Path, bytes: Vec<u8>) -> Result<ConfigNode> {
        let text = String::from_utf8(bytes).map_err(|_| RimeTreeError::Utf8 {
            path: path.to_path_buf(),
        })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        let parsed = self.parser.parse(path, text)?;

        let key = self.layout.file_key(name);
        let mut file = ConfigNode::file(key, path, self.layout.file_kind(key));
        TreeBuilder::build(parsed, &mut file, path);

        debug!(
            "Built '{}' ({:?}) with {} top-level entries",
            key,
            file.file_kind(),
            file.children().len()
        );
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ScalarValue, YamlDocumentParser};
    use crate::fs::MemoryFileSystem;
    use crate::node::{FileKind, NodeKind};

    fn loader(memory: MemoryFileSystem) -> LayerLoader {
        LayerLoader::new(
            Arc::new(memory),
            Arc::new(YamlDocumentParser),
            DocumentLayout::default(),
        )
    }

    #[tokio::test]
    async fn test_load_folder() {
        let mut memory = MemoryFileSystem::new();
        memory
            .add_file("/user/default.custom.yaml", "patch:\n  menu/page_size: 9\n")
            .add_file("/user/weasel.yaml", "style:\n  horizontal: true\n")
            .add_file("/user/luna_pinyin.dict.yaml", "---\nname: luna\n...\n")
            .add_file("/user/user.txt", "ignored");

        let folder = loader(memory).load(Path::new("/user"), "User").await.unwrap();

        assert_eq!(folder.key(), "User");
        assert_eq!(folder.kind(), NodeKind::Folder);
        assert_eq!(folder.source_path(), Some(Path::new("/user")));
        let keys: Vec<_> = folder.children().keys().cloned().collect();
        assert_eq!(keys, vec!["default.custom", "weasel"]);

        let custom = folder.child("default.custom").unwrap();
        assert_eq!(custom.kind(), NodeKind::File);
        assert_eq!(custom.file_kind(), Some(FileKind::Custom));
        assert_eq!(
            custom.source_path(),
            Some(Path::new("/user/default.custom.yaml"))
        );
        assert_eq!(
            custom.find("patch/menu/page_size").and_then(ConfigNode::value),
            Some(&ScalarValue::Integer(9))
        );
        assert_eq!(
            folder.child("weasel").unwrap().file_kind(),
            Some(FileKind::Default)
        );
    }

    #[tokio::test]
    async fn test_broken_documents_are_dropped() {
        let mut memory = MemoryFileSystem::new();
        memory
            .add_file("/shared/good.yaml", "a: 1\n")
            .add_file("/shared/bad.yaml", "a: [1, 2\n")
            .add_file("/shared/binary.yaml", vec![0xff, 0xfe, 0x00]);

        let folder = loader(memory).load(Path::new("/shared"), "Default").await.unwrap();

        let keys: Vec<_> = folder.children().keys().cloned().collect();
        assert_eq!(keys, vec!["good"]);
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let err = loader(MemoryFileSystem::new())
            .load(Path::new("/nowhere"), "Default")
            .await
            .unwrap_err();
        assert!(matches!(err, RimeTreeError::DirectoryRead { .. }));
    }

    #[tokio::test]
    async fn test_empty_and_bom_documents() {
        let mut memory = MemoryFileSystem::new();
        memory
            .add_file("/shared/empty.yaml", "")
            .add_file("/shared/bom.yaml", "\u{feff}a: 1\n");

        let folder = loader(memory).load(Path::new("/shared"), "Default").await.unwrap();

        assert!(folder.child("empty").unwrap().is_empty());
        assert_eq!(
            folder.find("bom/a").and_then(ConfigNode::value),
            Some(&ScalarValue::Integer(1))
        );
    }
}

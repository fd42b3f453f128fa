//! The configuration tree node
//!
//! Every entry of the store is a [`ConfigNode`]: the root, a layer folder, a
//! document, a composite-key segment, a map entry, a sequence element or a
//! scalar leaf. Parents own their children outright; there are no parent
//! links, navigation is strictly top-down.

use crate::document::ScalarValue;
use crate::layout::{self, PATCH_KEY};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Children of a node, in insertion order
pub type Children = IndexMap<String, ConfigNode>;

/// Structural role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Folder,
    File,
    Node,
    PatchContainer,
}

impl NodeKind {
    /// Kind of a document entry keyed `key` directly under a `parent` node
    ///
    /// This is the only place the reserved patch key is recognised.
    pub fn for_child(parent: NodeKind, key: &str) -> NodeKind {
        if parent == NodeKind::File && key == PATCH_KEY {
            NodeKind::PatchContainer
        } else {
            NodeKind::Node
        }
    }
}

/// Which layer convention a document follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A complete document, as shipped in the shared directory
    Default,
    /// A `*.custom.yaml` override document
    Custom,
}

/// One node of the configuration tree
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNode {
    pub(crate) key: String,
    pub(crate) children: Children,
    pub(crate) value: Option<ScalarValue>,
    pub(crate) source_path: Option<PathBuf>,
    pub(crate) kind: NodeKind,
    pub(crate) is_sequence_element: bool,
    pub(crate) file_kind: Option<FileKind>,
}

impl ConfigNode {
    /// Create an empty node
    pub fn new(key: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            key: key.into(),
            children: Children::new(),
            value: None,
            source_path: None,
            kind,
            is_sequence_element: false,
            file_kind: None,
        }
    }

    /// The tree root, holding one folder per layer
    pub fn root() -> Self {
        Self::new("", NodeKind::Root)
    }

    /// A layer folder; `path` is the layer directory
    pub fn folder(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(key, NodeKind::Folder).with_source_path(path)
    }

    /// A document node
    pub fn file(key: impl Into<String>, path: impl Into<PathBuf>, file_kind: FileKind) -> Self {
        let mut node = Self::new(key, NodeKind::File).with_source_path(path);
        node.file_kind = Some(file_kind);
        node
    }

    /// A branch inside a document
    pub fn branch(key: impl Into<String>, path: Option<&Path>) -> Self {
        let mut node = Self::new(key, NodeKind::Node);
        node.source_path = path.map(Path::to_path_buf);
        node
    }

    /// A scalar leaf inside a document
    pub fn leaf(key: impl Into<String>, value: impl Into<ScalarValue>, path: Option<&Path>) -> Self {
        let mut node = Self::branch(key, path);
        node.value = Some(value.into());
        node
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the node as a positional sequence entry
    pub fn as_sequence_element(mut self) -> Self {
        self.is_sequence_element = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn value(&self) -> Option<&ScalarValue> {
        self.value.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_sequence_element(&self) -> bool {
        self.is_sequence_element
    }

    /// Default/custom classification, set on File nodes only
    pub fn file_kind(&self) -> Option<FileKind> {
        self.file_kind
    }

    pub fn child(&self, key: &str) -> Option<&ConfigNode> {
        self.children.get(key)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut ConfigNode> {
        self.children.get_mut(key)
    }

    /// Attach `child` under this node and return the node now stored at its key
    ///
    /// Inserting a key that is already present is a no-op: the existing child
    /// is returned and `child` is dropped.
    pub fn add_child(&mut self, child: ConfigNode) -> &mut ConfigNode {
        self.children.entry(child.key.clone()).or_insert(child)
    }

    /// Set the scalar payload of a node that has no children
    pub(crate) fn set_value(&mut self, value: ScalarValue) {
        debug_assert!(self.children.is_empty());
        self.value = Some(value);
    }

    pub fn is_leaf(&self) -> bool {
        self.value.is_some() && self.children.is_empty()
    }

    pub fn is_branch(&self) -> bool {
        self.value.is_none()
    }

    /// Neither value nor children: a branch with nothing materialized
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    /// Text shown for the node in a tree view
    pub fn label(&self) -> String {
        match &self.value {
            Some(value) if self.is_sequence_element => format!("- {value}"),
            Some(value) => format!("{}: {value}", self.key),
            None => self.key.clone(),
        }
    }

    /// Resolve a `/`-delimited path of keys below this node
    ///
    /// An empty path resolves to the node itself.
    pub fn find(&self, path: &str) -> Option<&ConfigNode> {
        if path.is_empty() {
            return Some(self);
        }
        layout::split_key(path).try_fold(self, |node, segment| node.child(segment))
    }

    /// Depth-first, pre-order walk over this node and its descendants
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![(0, self)],
        }
    }

    /// Convert the subtree back into a plain YAML value
    ///
    /// Branches whose children are all sequence elements become sequences;
    /// other branches, including empty ones, become mappings.
    pub fn to_value(&self) -> serde_yaml::Value {
        if let Some(value) = &self.value {
            return value.to_yaml();
        }

        let is_sequence = !self.children.is_empty()
            && self.children.values().all(|child| child.is_sequence_element);
        if is_sequence {
            serde_yaml::Value::Sequence(self.children.values().map(Self::to_value).collect())
        } else {
            let mut mapping = serde_yaml::Mapping::new();
            for (key, child) in &self.children {
                mapping.insert(serde_yaml::Value::String(key.clone()), child.to_value());
            }
            serde_yaml::Value::Mapping(mapping)
        }
    }
}

/// Iterator returned by [`ConfigNode::iter`], yielding `(depth, node)`
pub struct Iter<'a> {
    stack: Vec<(usize, &'a ConfigNode)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a ConfigNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.values().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

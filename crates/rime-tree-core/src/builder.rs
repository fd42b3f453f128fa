//! Building configuration nodes from decoded documents
//!
//! Mapping keys containing the `/` delimiter are expanded into one node per
//! segment, so `menu/page_size: 9` and `menu: {page_size: 9}` produce the same
//! tree. Sequence elements are keyed by their position (`"0"`, `"1"`, ...) and
//! flagged as sequence elements.
//!
//! Children are attached with an idempotent insert. When a document names the
//! same node twice, the first entry keeps its value; a repeated branch only
//! gains the keys it did not have yet.

use crate::document::{ParsedNode, ScalarValue};
use crate::layout;
use crate::node::{ConfigNode, NodeKind};
use std::path::Path;
use tracing::debug;

/// Materializes [`ParsedNode`] trees as [`ConfigNode`] subtrees
pub struct TreeBuilder;

impl TreeBuilder {
    /// Populate `destination` so that its subtree mirrors `parsed`
    ///
    /// Every node created records `source_path` as its origin. A null document
    /// adds nothing; an empty mapping leaves `destination` an empty branch.
    pub fn build(parsed: ParsedNode, destination: &mut ConfigNode, source_path: &Path) {
        match parsed {
            ParsedNode::Mapping(pairs) => Self::build_mapping(pairs, destination, source_path),
            ParsedNode::Sequence(items) => Self::build_sequence(items, destination, source_path),
            ParsedNode::Scalar(ScalarValue::Null) => {}
            ParsedNode::Scalar(value) => {
                if destination.is_empty() {
                    destination.set_value(value);
                    destination.source_path = Some(source_path.to_path_buf());
                }
            }
        }
    }

    fn build_mapping(
        pairs: Vec<(String, ParsedNode)>,
        destination: &mut ConfigNode,
        source_path: &Path,
    ) {
        'entries: for (key, value) in pairs {
            let mut segments: Vec<&str> = layout::split_key(&key).collect();
            let tail = segments.pop().unwrap_or_default();

            let mut parent: &mut ConfigNode = &mut *destination;
            for segment in segments {
                let kind = NodeKind::for_child(parent.kind, segment);
                let branch = ConfigNode::branch(segment, Some(source_path)).with_kind(kind);
                parent = parent.add_child(branch);
                // `a: 1` followed by `a/b: 2`
                if parent.is_leaf() {
                    debug!("Ignoring '{}' below leaf '{}'", key, segment);
                    continue 'entries;
                }
            }

            let child = Self::node_for(tail, value, parent.kind, source_path);
            Self::attach(parent, child);
        }
    }

    fn build_sequence(items: Vec<ParsedNode>, destination: &mut ConfigNode, source_path: &Path) {
        for (index, item) in items.into_iter().enumerate() {
            let child = Self::node_for(&index.to_string(), item, destination.kind, source_path)
                .as_sequence_element();
            Self::attach(destination, child);
        }
    }

    fn node_for(
        key: &str,
        value: ParsedNode,
        parent_kind: NodeKind,
        source_path: &Path,
    ) -> ConfigNode {
        let kind = NodeKind::for_child(parent_kind, key);
        match value {
            ParsedNode::Scalar(scalar) => {
                ConfigNode::leaf(key, scalar, Some(source_path)).with_kind(kind)
            }
            ParsedNode::Mapping(pairs) => {
                let mut node = ConfigNode::branch(key, Some(source_path)).with_kind(kind);
                Self::build_mapping(pairs, &mut node, source_path);
                node
            }
            ParsedNode::Sequence(items) => {
                let mut node = ConfigNode::branch(key, Some(source_path)).with_kind(kind);
                Self::build_sequence(items, &mut node, source_path);
                node
            }
        }
    }

    /// Insert `child` unless its key is taken
    ///
    /// A repeated branch descends into the existing one so its new keys are
    /// still attached; a repeated leaf is dropped.
    fn attach(parent: &mut ConfigNode, child: ConfigNode) {
        match parent.children.get_mut(&child.key) {
            Some(existing) if existing.is_branch() && child.is_branch() => {
                for (_, grandchild) in child.children {
                    Self::attach(existing, grandchild);
                }
            }
            Some(existing) => {
                debug!("Keeping first entry for '{}'", existing.key);
            }
            None => {
                parent.add_child(child);
            }
        }
    }
}

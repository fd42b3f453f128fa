//! Merging the user layer onto the shared layer
//!
//! Merging mutates the base tree in place and consumes the patch side:
//! subtrees that have no counterpart in the base are moved into it, never
//! copied. Conflict rules:
//!
//! - a patch scalar overwrites a base leaf holding a different value; a base
//!   branch keeps its children and ignores it
//! - patch children are merged key by key, unknown keys are adopted; a base
//!   leaf receiving children drops its value first
//! - sequences are keyed by position, so a patch sequence overwrites the
//!   base elements it covers and appends the rest; base elements past the
//!   end of the patch are kept

use crate::layout::{DocumentLayout, PATCH_KEY};
use crate::node::{Children, ConfigNode, FileKind, NodeKind};
use crate::{Result, RimeTreeError};
use tracing::{debug, warn};

/// Merge `node_b` onto `node_a`, which must carry the same key
///
/// Returns the merged children of `node_a`. A key mismatch is reported
/// before anything is touched.
pub fn merge_tree(node_a: &mut ConfigNode, node_b: ConfigNode) -> Result<&Children> {
    if node_a.key != node_b.key {
        return Err(RimeTreeError::key_mismatch(&node_a.key, &node_b.key));
    }
    merge_into(node_a, node_b);
    Ok(&node_a.children)
}

/// Merge without checking keys; callers pair the nodes themselves
fn merge_into(node_a: &mut ConfigNode, node_b: ConfigNode) {
    let ConfigNode {
        value,
        children,
        source_path,
        ..
    } = node_b;

    if let Some(value) = value {
        if node_a.value.is_some() && node_a.value.as_ref() != Some(&value) {
            node_a.set_value(value);
            if source_path.is_some() {
                node_a.source_path = source_path;
            }
        } else if node_a.value.is_none() && !node_a.children.is_empty() {
            debug!("Keeping branch '{}' over a scalar patch", node_a.key);
        }
        return;
    }

    if children.is_empty() {
        return;
    }

    // A leaf patched with a branch becomes that branch
    node_a.value = None;

    for (key, child) in children {
        if let Some(existing) = node_a.children.get_mut(&key) {
            merge_into(existing, child);
        } else {
            node_a.children.insert(key, child);
        }
    }
}

/// Applies the user layer onto the shared layer
#[derive(Debug, Clone, Default)]
pub struct PatchEngine {
    layout: DocumentLayout,
}

impl PatchEngine {
    pub fn new(layout: DocumentLayout) -> Self {
        Self { layout }
    }

    /// Merge `user_tree` onto `base_tree`, both layer folders
    ///
    /// 1. Each default-kind user document replaces-by-merge the base document
    ///    of the same key, or is adopted when the base has none.
    /// 2. Each base document `K` then receives the `patch` container of the
    ///    user document `K.custom`, if there is one. Only that document's own
    ///    `patch` entry is consulted.
    ///
    /// Custom documents are never adopted. Returns the merged children of
    /// `base_tree`.
    pub fn apply_patch<'a>(
        &self,
        base_tree: &'a mut ConfigNode,
        user_tree: ConfigNode,
    ) -> Result<&'a Children> {
        let mut customs = Children::new();

        for (key, user_file) in user_tree.children {
            if user_file.kind != NodeKind::File {
                continue;
            }
            let file_kind = user_file.file_kind;
            match file_kind {
                Some(FileKind::Custom) => {
                    customs.insert(key, user_file);
                }
                _ if base_tree.children.contains_key(&key) => {
                    debug!("Merging user document '{}' onto shared copy", key);
                    if let Some(base_file) = base_tree.children.get_mut(&key) {
                        merge_tree(base_file, user_file)?;
                    }
                }
                _ => {
                    debug!("Adopting user document '{}'", key);
                    base_tree.add_child(user_file);
                }
            }
        }

        for (key, base_file) in base_tree.children.iter_mut() {
            if base_file.kind != NodeKind::File {
                continue;
            }
            let Some(mut custom) = customs.shift_remove(&self.layout.custom_key(key)) else {
                continue;
            };
            let Some(patch) = custom.children.shift_remove(PATCH_KEY) else {
                debug!("Custom document for '{}' has no patch", key);
                continue;
            };
            if patch.value.is_some() {
                warn!(
                    "Ignoring scalar patch for '{}' in {}",
                    key,
                    patch
                        .source_path
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                );
                continue;
            }

            debug!(
                "Applying {} patch entries to '{}'",
                patch.children.len(),
                key
            );
            merge_into(base_file, patch);
        }

        Ok(&base_tree.children)
    }
}

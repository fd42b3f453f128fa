//! The layered configuration tree
//!
//! [`RimeConfigurationTree`] loads the shared and user directories, merges the
//! user layer onto the shared one and keeps the result under a single root:
//!
//! ```text
//! <root>
//! ├── Default   shared layer, patched in place: the effective configuration
//! └── User      user layer as found on disk
//! ```

use crate::config::RimeTreeConfig;
use crate::document::{DocumentParser, YamlDocumentParser};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::layout::DocumentLayout;
use crate::loader::LayerLoader;
use crate::node::ConfigNode;
use crate::patch::PatchEngine;
use crate::{Result, RimeTreeError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Which view of the configuration to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layer {
    /// The shared layer folder
    Default,
    /// The user layer folder, unmerged
    User,
    /// The effective configuration
    #[default]
    Merged,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Default => "default",
            Layer::User => "user",
            Layer::Merged => "merged",
        };
        f.write_str(name)
    }
}

impl FromStr for Layer {
    type Err = RimeTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" | "shared" => Ok(Layer::Default),
            "user" => Ok(Layer::User),
            "merged" | "effective" => Ok(Layer::Merged),
            other => Err(RimeTreeError::config_error(format!(
                "Unknown layer '{other}' (expected default, user or merged)"
            ))),
        }
    }
}

/// Owns the shared, user and merged trees of one Rime installation
pub struct RimeConfigurationTree {
    loader: LayerLoader,
    engine: PatchEngine,
    shared_dir: PathBuf,
    user_dir: PathBuf,
    shared_label: String,
    user_label: String,
    root: Option<ConfigNode>,
}

impl RimeConfigurationTree {
    /// Tree over the local file system with YAML documents
    pub fn new(config: &RimeTreeConfig) -> Result<Self> {
        Self::with_backends(
            config,
            Arc::new(LocalFileSystem),
            Arc::new(YamlDocumentParser),
        )
    }

    /// Tree over injected file access and document parsing
    pub fn with_backends(
        config: &RimeTreeConfig,
        fs: Arc<dyn FileSystem>,
        parser: Arc<dyn DocumentParser>,
    ) -> Result<Self> {
        config.validate()?;
        let layout: DocumentLayout = config.layout();

        Ok(Self {
            loader: LayerLoader::new(fs, parser, layout.clone()),
            engine: PatchEngine::new(layout),
            shared_dir: absolute(&config.shared_dir()),
            user_dir: absolute(&config.user_dir()),
            shared_label: config.shared_label(),
            user_label: config.user_label(),
            root: None,
        })
    }

    pub fn shared_dir(&self) -> &Path {
        &self.shared_dir
    }

    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    /// Load both layers from scratch and merge them
    ///
    /// Any previous trees are replaced only once the new ones are complete; if
    /// a layer directory cannot be read the error is returned and the previous
    /// trees stay in place.
    pub async fn build(&mut self) -> Result<&ConfigNode> {
        let started = Instant::now();

        let (base, user) = tokio::join!(
            self.loader.load(&self.shared_dir, &self.shared_label),
            self.loader.load(&self.user_dir, &self.user_label),
        );
        let mut base = base?;
        let user = user?;

        let merged = self.engine.apply_patch(&mut base, user.clone())?;
        info!(
            "Built configuration tree: {} documents in effect ({} user documents) in {:?}",
            merged.len(),
            user.children().len(),
            started.elapsed()
        );

        let mut root = ConfigNode::root();
        root.add_child(base);
        root.add_child(user);
        Ok(&*self.root.insert(root))
    }

    /// Whether [`build`](Self::build) has completed at least once
    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// Root holding the layer folders
    pub fn root(&self) -> Option<&ConfigNode> {
        self.root.as_ref()
    }

    /// The shared layer folder; after a build this is the merged tree
    pub fn default_tree(&self) -> Option<&ConfigNode> {
        self.root.as_ref()?.child(&self.shared_label)
    }

    /// The user layer folder as loaded from disk
    pub fn user_tree(&self) -> Option<&ConfigNode> {
        self.root.as_ref()?.child(&self.user_label)
    }

    /// The effective configuration; the same node as [`default_tree`](Self::default_tree)
    pub fn merged_tree(&self) -> Option<&ConfigNode> {
        self.default_tree()
    }

    pub fn layer(&self, layer: Layer) -> Option<&ConfigNode> {
        match layer {
            Layer::Default => self.default_tree(),
            Layer::User => self.user_tree(),
            Layer::Merged => self.merged_tree(),
        }
    }

    /// Resolve a `/`-delimited path, starting with a document key, in one layer
    pub fn find(&self, layer: Layer, path: &str) -> Option<&ConfigNode> {
        self.layer(layer)?.find(path)
    }

    /// Like [`find`](Self::find), with a missing node as an error
    pub fn get(&self, layer: Layer, path: &str) -> Result<&ConfigNode> {
        self.find(layer, path)
            .ok_or_else(|| RimeTreeError::not_found(path, layer))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

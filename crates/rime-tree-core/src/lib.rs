//! Rime Tree Core
//!
//! Layered configuration trees for the Rime input method engine.
//! A Rime installation keeps program defaults in a shared data directory and
//! user overrides in a user directory. This crate loads both layers into
//! ordered node trees, applies the user's `*.custom` patches onto the shared
//! documents and exposes the effective configuration for lookup and display.

pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod fs;
pub mod layout;
pub mod loader;
pub mod node;
pub mod patch;
pub mod result;
pub mod tree;

// Re-export commonly used types
pub use builder::TreeBuilder;
pub use config::{
    ConfigLoader, DocumentsConfiguration, LayersConfiguration, RimeTreeConfig, default_shared_dir,
    default_user_dir,
};
pub use document::{DocumentParser, ParsedNode, ScalarValue, YamlDocumentParser};
pub use error::{ErrorKind, RimeTreeError};
pub use fs::{FileSystem, LocalFileSystem, MemoryFileSystem};
pub use layout::{DocumentLayout, split_key};
pub use loader::LayerLoader;
pub use node::{Children, ConfigNode, FileKind, NodeKind};
pub use patch::{PatchEngine, merge_tree};
pub use result::{Result, ResultExt};
pub use tree::{Layer, RimeConfigurationTree};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rime_tree_core=info,rime_tree=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .ok();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

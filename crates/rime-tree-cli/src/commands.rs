//! Command implementations

use colored::*;
use rime_tree_core::{
    ConfigLoader, DocumentsConfiguration, Layer, LayersConfiguration, NodeKind,
    RimeConfigurationTree, RimeTreeConfig, RimeTreeError, Result,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::output::{TreeRenderer, file_kind_name, format_value, styled_label};
use crate::{ConfigFormat, ValueFormat};

/// Where the layers come from: a config file and command-line overrides
pub struct LayerSource {
    pub config: Option<PathBuf>,
    pub shared_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl LayerSource {
    /// Command-line directories over the config file over platform defaults
    pub fn resolve_config(&self) -> Result<RimeTreeConfig> {
        let mut config = RimeTreeConfig {
            layers: Some(LayersConfiguration {
                shared_dir: self.shared_dir.clone(),
                user_dir: self.user_dir.clone(),
                ..Default::default()
            }),
            documents: None,
        };
        config.merge_with(ConfigLoader::load(self.config.as_deref(), None)?);
        Ok(config)
    }

    async fn build_tree(&self) -> Result<RimeConfigurationTree> {
        let config = self.resolve_config()?;
        let mut tree = RimeConfigurationTree::new(&config)?;
        debug!(
            "Loading shared layer {} and user layer {}",
            tree.shared_dir().display(),
            tree.user_dir().display()
        );

        let start = Instant::now();
        tree.build().await?;
        info!("Configuration tree ready in {:?}", start.elapsed());
        Ok(tree)
    }
}

/// Tree command implementation
pub async fn tree_command(
    source: &LayerSource,
    layer: Layer,
    depth: Option<usize>,
    path: Option<String>,
) -> Result<()> {
    let tree = source.build_tree().await?;
    let node = tree.get(layer, path.as_deref().unwrap_or_default())?;

    print!("{}", TreeRenderer::new(depth).render(node));
    Ok(())
}

/// Files command implementation
pub async fn files_command(source: &LayerSource, layer: Layer) -> Result<()> {
    let tree = source.build_tree().await?;
    let folder = tree.get(layer, "")?;

    let files: Vec<_> = folder
        .children()
        .values()
        .filter(|node| node.kind() == NodeKind::File)
        .collect();
    let width = files
        .iter()
        .map(|file| file.key().chars().count())
        .max()
        .unwrap_or(0);

    for file in &files {
        let source_path = file
            .source_path()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        println!(
            "{}  {:<7}  {}",
            pad(&styled_label(file), file.key().chars().count(), width),
            file_kind_name(file.file_kind()),
            source_path.dimmed()
        );
    }

    println!(
        "\n{} documents in the {} layer ({})",
        files.len().to_string().bold(),
        layer,
        folder
            .source_path()
            .map(|path| path.display().to_string())
            .unwrap_or_default()
    );
    Ok(())
}

/// Get command implementation
pub async fn get_command(source: &LayerSource, layer: Layer, path: &str) -> Result<()> {
    let tree = source.build_tree().await?;
    let node = tree.get(layer, path)?;

    match node.value() {
        Some(value) => println!("{value}"),
        None => print!("{}", format_value(node, ValueFormat::Yaml)?),
    }
    if let Some(source_path) = node.source_path() {
        println!("{}", format!("# from {}", source_path.display()).dimmed());
    }
    Ok(())
}

/// Show command implementation
pub async fn show_command(
    source: &LayerSource,
    layer: Layer,
    file: &str,
    format: ValueFormat,
) -> Result<()> {
    let tree = source.build_tree().await?;
    let document = tree
        .layer(layer)
        .and_then(|folder| folder.child(file))
        .filter(|node| node.kind() == NodeKind::File)
        .ok_or_else(|| RimeTreeError::not_found(file, layer))?;

    let output = format_value(document, format)?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Config show command implementation
pub async fn config_show_command(source: &LayerSource) -> Result<()> {
    let config = source.resolve_config()?;

    println!("Configuration:");
    println!("==============");
    println!("{}", serialize_yaml(&resolved(&config))?);
    Ok(())
}

/// Config init command implementation
pub async fn config_init_command(format: ConfigFormat, force: bool) -> Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Yaml => "rime-tree.yaml",
        ConfigFormat::Json => ".rimetreerc.json",
        ConfigFormat::Toml => ".rimetreerc.toml",
    };
    let config_path = PathBuf::from(filename);

    if config_path.exists() && !force {
        error!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            filename
        );
        return Err(RimeTreeError::config_error(format!(
            "Configuration file '{filename}' already exists"
        )));
    }

    let config = resolved(&RimeTreeConfig::default());
    let content = match format {
        ConfigFormat::Yaml => serialize_yaml(&config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(&config).map_err(|e| {
            RimeTreeError::config_error(format!("Failed to serialize JSON: {e}"))
        })?,
        ConfigFormat::Toml => toml::to_string_pretty(&config).map_err(|e| {
            RimeTreeError::config_error(format!("Failed to serialize TOML: {e}"))
        })?,
    };

    std::fs::write(&config_path, content)
        .map_err(|e| RimeTreeError::io_error(&config_path, e))?;

    println!("✅ Created configuration file: {filename}");
    println!("   Edit the layer directories to match your Rime frontend.");
    Ok(())
}

/// Config validate command implementation
pub async fn config_validate_command(path: Option<PathBuf>) -> Result<()> {
    debug!("Validating configuration file: {:?}", path);

    let result = match path {
        Some(p) => ConfigLoader::load_from_file(&p),
        None => ConfigLoader::load(None, None),
    };
    match result {
        Ok(config) => {
            println!("✅ Configuration is valid");
            println!("   Shared dir: {}", describe_dir(&config.shared_dir()));
            println!("   User dir:   {}", describe_dir(&config.user_dir()));
            Ok(())
        }
        Err(e) => {
            error!("❌ Configuration validation failed: {}", e);
            Err(e)
        }
    }
}

/// Config schema command implementation
pub async fn config_schema_command() -> Result<()> {
    let schema = serde_json::to_string_pretty(&RimeTreeConfig::json_schema()).map_err(|e| {
        RimeTreeError::internal_error(format!("Failed to serialize schema: {e}"))
    })?;
    println!("{schema}");
    Ok(())
}

/// Every setting spelled out, defaults included
fn resolved(config: &RimeTreeConfig) -> RimeTreeConfig {
    let layout = config.layout();
    RimeTreeConfig {
        layers: Some(LayersConfiguration {
            shared_dir: Some(config.shared_dir()),
            user_dir: Some(config.user_dir()),
            shared_label: Some(config.shared_label()),
            user_label: Some(config.user_label()),
        }),
        documents: Some(DocumentsConfiguration {
            extension: Some(layout.document_extension),
            dictionary_extension: Some(layout.dictionary_extension),
            custom_suffix: Some(layout.custom_suffix),
        }),
    }
}

fn serialize_yaml(config: &RimeTreeConfig) -> Result<String> {
    serde_yaml::to_string(config)
        .map_err(|e| RimeTreeError::config_error(format!("Failed to serialize YAML: {e}")))
}

fn describe_dir(path: &Path) -> String {
    if path.is_dir() {
        path.display().to_string()
    } else {
        format!("{} {}", path.display(), "(missing)".yellow())
    }
}

/// Pad a possibly colored string to `width` visible characters
fn pad(styled: &str, visible_len: usize, width: usize) -> String {
    format!("{styled}{}", " ".repeat(width.saturating_sub(visible_len)))
}

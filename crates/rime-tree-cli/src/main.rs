//! rime-tree CLI
//!
//! Command-line browser for layered Rime configuration

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use rime_tree_core::{Layer, Result, init_tracing};
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "rime-tree")]
#[command(about = "Inspect the shared, user and merged configuration of a Rime installation")]
#[command(version = rime_tree_core::VERSION)]
#[command(
    long_about = "rime-tree loads the shared data directory and the user directory of a Rime\n\
input method installation, applies the user's *.custom.yaml patches and shows the result.\n\
\n\
Examples:\n  \
rime-tree tree --depth 2              # Effective configuration, two levels deep\n  \
rime-tree tree --layer user           # User documents as found on disk\n  \
rime-tree get default/menu/page_size  # Look up one value\n  \
rime-tree show default --format json  # Whole merged document as JSON\n  \
rime-tree config init                 # Write a rime-tree.yaml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (rime-tree.yaml/.rimetreerc.json/.rimetreerc.toml)"
    )]
    config: Option<PathBuf>,

    /// Shared data directory, overriding the config file
    #[arg(long, global = true, env = "RIME_SHARED_DIR")]
    shared_dir: Option<PathBuf>,

    /// User data directory, overriding the config file
    #[arg(long, global = true, env = "RIME_USER_DIR")]
    user_dir: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a configuration tree
    Tree {
        /// Layer to render
        #[arg(short, long, default_value = "merged")]
        layer: LayerArg,

        /// Maximum depth below the starting node
        #[arg(short, long)]
        depth: Option<usize>,

        /// Start at this node, e.g. `default/menu`
        #[arg(help = "Path of the node to start at (default: the whole layer)")]
        path: Option<String>,
    },

    /// List the documents of a layer
    #[command(alias = "ls")]
    Files {
        #[arg(short, long, default_value = "merged")]
        layer: LayerArg,
    },

    /// Print the value of one node
    Get {
        /// Node path, starting with the document key, e.g. `default/menu/page_size`
        path: String,

        #[arg(short, long, default_value = "merged")]
        layer: LayerArg,
    },

    /// Print a whole document
    Show {
        /// Document key, e.g. `default` or `luna_pinyin.schema`
        file: String,

        #[arg(short, long, default_value = "merged")]
        layer: LayerArg,

        /// Output format
        #[arg(short, long, default_value = "yaml")]
        format: ValueFormat,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective settings
    Show,

    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(long, default_value = "yaml", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(help = "Path to configuration file (default: search upward)")]
        path: Option<PathBuf>,
    },

    /// Print the JSON Schema of the configuration file
    Schema,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayerArg {
    /// Effective configuration: shared documents with user patches applied
    Merged,
    /// Shared layer folder
    Default,
    /// User layer as loaded, without merging
    User,
}

impl From<LayerArg> for Layer {
    fn from(layer: LayerArg) -> Self {
        match layer {
            LayerArg::Merged => Layer::Merged,
            LayerArg::Default => Layer::Default,
            LayerArg::User => Layer::User,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ValueFormat {
    Yaml,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    /// YAML configuration format (rime-tree.yaml)
    Yaml,
    /// JSON configuration format (.rimetreerc.json)
    Json,
    /// TOML configuration format (.rimetreerc.toml)
    Toml,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return Ok(());
    }

    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    let log_level = match cli.verbose {
        0 => "rime_tree=error,rime_tree_core=error",
        1 => "rime_tree=warn,rime_tree_core=warn",
        2 => "rime_tree=info,rime_tree_core=info",
        3 => "rime_tree=debug,rime_tree_core=debug",
        _ => "rime_tree=trace,rime_tree_core=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    match run_command(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("rime-tree failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

async fn run_command(cli: Cli) -> Result<()> {
    let source = commands::LayerSource {
        config: cli.config,
        shared_dir: cli.shared_dir,
        user_dir: cli.user_dir,
    };

    match cli.command {
        Some(Commands::Tree { layer, depth, path }) => {
            commands::tree_command(&source, layer.into(), depth, path).await
        }

        Some(Commands::Files { layer }) => commands::files_command(&source, layer.into()).await,

        Some(Commands::Get { path, layer }) => {
            commands::get_command(&source, layer.into(), &path).await
        }

        Some(Commands::Show {
            file,
            layer,
            format,
        }) => commands::show_command(&source, layer.into(), &file, format).await,

        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config_show_command(&source).await,
            ConfigAction::Init { format, force } => {
                commands::config_init_command(format, force).await
            }
            ConfigAction::Validate { path } => {
                commands::config_validate_command(path.or(source.config)).await
            }
            ConfigAction::Schema => commands::config_schema_command().await,
        },

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("rime-tree {}", rime_tree_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                println!(
                    "  Default shared dir: {}",
                    rime_tree_core::default_shared_dir().display()
                );
                println!(
                    "  Default user dir: {}",
                    rime_tree_core::default_user_dir().display()
                );
            } else {
                println!("{}", rime_tree_core::VERSION);
            }
            Ok(())
        }

        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}

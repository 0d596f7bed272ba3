//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use regtune_catalog::ItemClass;

/// regtune - Check, apply and restore declarative registry optimizations
#[derive(Parser, Debug)]
#[command(name = "regtune")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (default: ./regtune.toml, then the user config dir)
    #[arg(long, global = true, env = "REGTUNE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Work on a JSON sandbox file instead of the live registry
    ///
    /// The file is created on first write. Shell commands are logged, not run.
    #[arg(long, global = true, env = "REGTUNE_SANDBOX")]
    pub sandbox: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Item class filter
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassArg {
    Normal,
    Legacy,
    Script,
}

impl From<ClassArg> for ItemClass {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::Normal => ItemClass::Normal,
            ClassArg::Legacy => ItemClass::Legacy,
            ClassArg::Script => ItemClass::Script,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List items with their live status
    List {
        /// Only show items of this class
        #[arg(long, value_enum)]
        class: Option<ClassArg>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Find items matching every keyword
    Search {
        /// Keywords (matched against titles, descriptions, categories,
        /// tags and value names)
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// List available presets
    Presets,

    /// Write the live state as a profile
    Export {
        /// Destination JSON file
        file: PathBuf,
    },

    /// Change selections, preview and apply
    ///
    /// Examples:
    ///   regtune apply --preset AllSelect
    ///   regtune apply --profile office.json --yes
    ///   regtune apply --enable "Show file extensions" --restart
    Apply {
        /// Profile to import before applying
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Preset to select before applying
        #[arg(long)]
        preset: Option<String>,

        /// Select an item by title
        #[arg(long = "enable", value_name = "TITLE")]
        enable: Vec<String>,

        /// Deselect an item by title
        #[arg(long = "disable", value_name = "TITLE")]
        disable: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Restart the desktop shell when an applied item needs it
        #[arg(long)]
        restart: bool,
    },

    /// Re-run every check and report how many items are applied
    Refresh,
}

//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for build results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored console output
    #[default]
    Console,
    /// Markdown tables
    Markdown,
    /// JSON output
    Json,
}

/// CLI arguments for anvil
#[derive(Parser, Debug)]
#[command(name = "anvil")]
#[command(author, version, about = "Run build tools and resolve external components")]
#[command(long_about = r#"
Anvil finds, installs and runs named build tools, resolves the external
components a project requires and executes plans of build tasks.

Tools are looked up in order: built-in tools, installed [[tools]] from the
configuration, [programs] bundles, then [programs] directories and PATH.

Configuration files are loaded from (in priority order):
1. ANVIL_* environment variables (ANVIL_EXECUTION__PARALLEL=false)
2. --config <path>     Explicit config file
3. ./anvil.toml        Project-level config
4. ~/.config/anvil/config.toml   Global config

Example:
  anvil run echo hello world
  anvil batch calls.txt --parallel
  anvil resolve
  anvil tools
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "console", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress per-task progress lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Run everything sequentially
    #[arg(long, global = true)]
    pub no_parallel: bool,

    /// Stop a sequence at its first failure
    #[arg(long, global = true)]
    pub fail_fast: bool,

    /// Switch on a named enablement level (can be specified multiple times)
    #[arg(long = "level", value_name = "NAME", global = true)]
    pub levels: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a single tool
    Run {
        /// Tool name: nickname, namespace/nickname or with @version
        tool: String,
        /// Arguments passed to the tool
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run tool calls listed in a file, one per line
    Batch {
        /// File with one `tool arg...` line per call; `#` starts a comment
        file: PathBuf,
        /// Run the calls concurrently
        #[arg(long)]
        parallel: bool,
    },
    /// Fetch missing external components
    Resolve,
    /// List the tools every finder knows about
    Tools,
}

impl Cli {
    /// Switch on every `--level`
    pub fn active_levels(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(String::as_str)
    }
}

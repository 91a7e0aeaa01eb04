//! Clap derive structures for the `stockroom` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stockroom_core::{SortKey, SortOrder, ViewState};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// stockroom -- product catalog CLI that keeps working offline
#[derive(Debug, Parser)]
#[command(
    name = "stockroom",
    version,
    about = "Manage a product catalog from the command line",
    long_about = "Create, list, update, and delete catalog products.\n\n\
        Every call goes to the catalog service first. When the service is\n\
        unreachable or fails, a local mirror answers instead.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Catalog service base URL (overrides config)
    #[arg(long, env = "STOCKROOM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "STOCKROOM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Local mirror directory (overrides config)
    #[arg(long, env = "STOCKROOM_MIRROR_DIR", global = true)]
    pub mirror_dir: Option<PathBuf>,

    /// JSON file used to seed an empty mirror (overrides config)
    #[arg(long, global = true)]
    pub seed_file: Option<PathBuf>,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "STOCKROOM_INSECURE", global = true)]
    pub insecure: bool,

    /// Output format (overrides config; default: table)
    #[arg(long, short = 'o', env = "STOCKROOM_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

impl GlobalOpts {
    /// Selected output format, `table` when neither flag nor config set one.
    pub fn format(&self) -> &OutputFormat {
        self.output.as_ref().unwrap_or(&OutputFormat::Table)
    }
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products, optionally filtered and sorted
    #[command(alias = "ls")]
    List(ViewArgs),

    /// Show one product
    Get {
        /// Product id (`_id` or `id`)
        id: String,
    },

    /// Create a product
    #[command(alias = "add")]
    Create(ProductFields),

    /// Update a product (PUT, or PATCH with --patch)
    #[command(alias = "edit")]
    Update(UpdateArgs),

    /// Delete one or more products
    #[command(alias = "rm")]
    Delete {
        /// Product ids to delete
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Create a copy of a product named "<name> (copy)"
    #[command(alias = "dup")]
    Duplicate {
        /// Product id to copy
        id: String,
    },

    /// Export the (filtered, sorted) list as CSV
    Export(ExportArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── View Arguments ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortField {
    Price,
    Amount,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Price => Self::Price,
            SortField::Amount => Self::Amount,
        }
    }
}

/// Search and sort arguments shared by `list` and `export`.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Case-insensitive search over name, description, and id
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Sort by a numeric column
    #[arg(long)]
    pub sort: Option<SortField>,

    /// Sort descending (requires --sort)
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl ViewArgs {
    pub fn view_state(&self) -> ViewState {
        let mut view = ViewState::new().with_query(self.search.clone().unwrap_or_default());
        if let Some(field) = self.sort {
            let order = if self.desc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            };
            view = view.with_sort(field.into(), order);
        }
        view
    }
}

// ── Product Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProductFields {
    /// Product name
    #[arg(long)]
    pub name: String,

    /// Unit price (non-negative)
    #[arg(long)]
    pub price: f64,

    /// Units in stock
    #[arg(long)]
    pub amount: u64,

    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,

    /// Image URL (ignored when --image is given)
    #[arg(long)]
    pub image_url: Option<String>,

    /// Image file to upload
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Mark the product active or inactive
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Product id (`_id` or `id`)
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New unit price (non-negative)
    #[arg(long)]
    pub price: Option<f64>,

    /// New stock count
    #[arg(long)]
    pub amount: Option<u64>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New image URL (empty string clears it)
    #[arg(long)]
    pub image_url: Option<String>,

    /// Image file to upload
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Mark the product active or inactive
    #[arg(long)]
    pub active: Option<bool>,

    /// Send a PATCH instead of a PUT
    #[arg(long)]
    pub patch: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Directory for the CSV file (overrides config; default: current dir)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file (guided unless --base-url is given)
    Init {
        /// Catalog service base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Mirror directory
        #[arg(long)]
        mirror_dir: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

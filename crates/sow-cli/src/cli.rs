//! CLI definition using clap

use clap::{Args, Parser, Subcommand};
use sow_domain::model::MAX_GRID_QUANTITY;
use sow_types::{OutputFormat, StorageBackend};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sow-tools")]
#[command(author = "Sow Brand")]
#[command(version)]
#[command(about = "Quotes, sales orders and tech packs for apparel production")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Work on the current quote / sales order
    #[command(subcommand)]
    Quote(QuoteCommand),

    /// Work on the active tech pack
    #[command(subcommand)]
    Techpack(TechpackCommand),

    /// Show or modify configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set library backend
        #[arg(long)]
        set_backend: Option<StorageBackend>,

        /// Set remote library URL
        #[arg(long)]
        set_remote_url: Option<String>,

        /// Set remote library API key
        #[arg(long)]
        set_remote_key: Option<String>,

        /// Set local store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Page selection shared by both print commands
#[derive(Args, Clone)]
pub struct PrintArgs {
    /// Pages to print, e.g. "1,3" or "1-2" (default: all)
    #[arg(long, default_value = "all")]
    pub pages: String,

    /// Write the print file without opening the browser
    #[arg(long)]
    pub no_open: bool,
}

#[derive(Subcommand)]
pub enum QuoteCommand {
    /// Show the current quote
    Show,

    /// Set client fields
    Client {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        contact: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// Free-text observations printed under the items
        #[arg(long)]
        observations: Option<String>,
    },

    /// Append an item, optionally filling it in
    AddItem {
        /// Service name from the catalog
        #[arg(long)]
        service: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        quantity: Option<u32>,

        /// Unit price in reais
        #[arg(long)]
        price: Option<f64>,
    },

    /// Change fields of an item
    EditItem {
        /// Item id (see `quote show`)
        id: String,

        /// Service name; resets the description and SKU
        #[arg(long)]
        service: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        quantity: Option<u32>,

        #[arg(long)]
        price: Option<f64>,
    },

    /// Remove an item
    RemoveItem {
        id: String,
    },

    /// Save the draft explicitly
    SaveDraft,

    /// Print the sales order and mark its number as used
    Print(PrintArgs),

    /// Save a copy to the document library
    Save,

    /// List quotes in the library
    List,

    /// Replace the current quote with a library copy
    Load {
        id: String,
    },

    /// Discard the draft and start a new quote
    Reset {
        /// Confirm discarding unsaved changes
        #[arg(long)]
        yes: bool,
    },

    /// Export the quote to Excel
    Export {
        /// Output Excel file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum TechpackCommand {
    /// Show the active tech pack
    Show,

    /// Set a field by path, e.g. `printSpecs.touch "Toque Zero"`
    Set {
        /// Dotted field path (camelCase, array indices allowed)
        path: String,

        /// JSON value, or plain text
        value: String,
    },

    /// Attach an image (drawing, front, back)
    Image {
        slot: String,
        file: PathBuf,
    },

    /// Remove an image
    ClearImage {
        slot: String,
    },

    /// Add a production grid row
    GridAdd {
        color: String,
    },

    /// Set a quantity in the production grid
    GridSet {
        /// Row id or 1-based row number
        row: String,
        /// Size label (P, M, G, GG, XG)
        size: String,
        #[arg(value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_GRID_QUANTITY)))]
        quantity: u32,
    },

    /// Remove a production grid row
    GridRemove {
        /// Row id or 1-based row number
        row: String,
    },

    /// Print the tech pack pages
    Print(PrintArgs),

    /// Save a copy to the document library
    Save,

    /// List tech packs in the library
    List,

    /// Make a library copy the active tech pack
    Load {
        id: String,
    },

    /// Discard the active tech pack
    Reset {
        #[arg(long)]
        yes: bool,
    },

    /// Export the production grid to Excel
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.2"
/// Format for dev builds: "v0.3.2\ndev: abc1234 2026-10-18 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "vitae", version = get_version())]
#[command(about = "Keep resume data in one crash-safe JSON file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data file to use (overrides config)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the whole document
    Show,

    /// Personal details
    #[command(subcommand, alias = "p")]
    Profile(ProfileCommand),

    /// Categories of entries
    #[command(subcommand, alias = "c")]
    Category(CategoryCommand),

    /// Entries inside a category
    #[command(subcommand, alias = "e")]
    Entry(EntryCommand),

    /// Layout settings used by renderers
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Print the personal details
    Show,

    /// Update personal details (fields not given keep their value)
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Date of birth, YYYY-MM-DD
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        summary: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// List categories in display order
    #[command(alias = "ls")]
    List,

    /// Create an empty category
    Add { name: String },

    /// Delete a category and all of its entries
    #[command(alias = "rm")]
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    /// List entries of a category
    #[command(alias = "ls")]
    List { category: String },

    /// Append an entry to an existing category
    Add {
        category: String,
        name: String,

        /// Optional link
        #[arg(long)]
        link: Option<String>,

        /// Date, defaults to today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an entry by its position (1 is the first entry)
    #[command(alias = "rm")]
    Delete {
        category: String,
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        index: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print current settings
    Show,

    /// Change settings (values are sanitized: columns 1 or 2, separator on/off)
    Set {
        #[arg(long)]
        columns: Option<String>,
        #[arg(long)]
        separator: Option<String>,
    },
}

//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather lookups with saved locations")]
pub struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip the first-run fetch of the default cities
    #[arg(long, global = true)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a city and save it
    Search {
        /// City name, as typed; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Show saved locations, most recent first
    List {
        /// Only show favorite locations
        #[arg(long)]
        favorites: bool,
    },

    /// Remove a saved location by id or city name
    Remove { location: String },

    /// Toggle the favorite mark on a saved location (id or city name)
    Favorite { location: String },

    /// Show recent searches
    History,

    /// Forget all recent searches
    ClearHistory,

    /// Show or change the dark mode preference
    DarkMode {
        #[arg(value_enum)]
        mode: Option<DarkModeArg>,
    },

    /// Re-fetch weather for every saved location
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DarkModeArg {
    On,
    Off,
    Toggle,
}

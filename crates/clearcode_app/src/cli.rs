use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use crate::platform::logging::LogDestination;

/// Strip solution code from editor text, keeping the generated signature and docstring.
#[derive(Debug, Parser)]
#[command(name = "clearcode", version)]
pub struct Cli {
    /// Also write logs to ./clearcode.log.
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Log debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        if self.log_file {
            LogDestination::Both
        } else {
            LogDestination::Terminal
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print (or write back) a source file with everything after its last docstring removed.
    Truncate {
        file: PathBuf,
        #[arg(long)]
        in_place: bool,
    },
    /// Load a saved page and run the clearer against it.
    Clear {
        snapshot: PathBuf,
        /// Address the snapshot was taken from.
        #[arg(long)]
        url: Option<String>,
        /// Clear regardless of the saved toggle, as if it had just been switched on.
        #[arg(long)]
        force: bool,
        /// RON file overriding selectors, retry policy or settle delay.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the cleared editor text here instead of printing it.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        settings_dir: PathBuf,
    },
    /// Switch automatic clearing on or off.
    Toggle {
        #[arg(value_enum)]
        state: ToggleState,
        #[arg(long, default_value = ".")]
        settings_dir: PathBuf,
    },
    /// Show whether automatic clearing is on.
    Status {
        #[arg(long, default_value = ".")]
        settings_dir: PathBuf,
    },
    /// Write default settings, or record an update to `version`.
    Install {
        #[arg(long)]
        update: Option<String>,
        #[arg(long, default_value = ".")]
        settings_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleState {
    On,
    Off,
}

impl ToggleState {
    pub fn enabled(self) -> bool {
        self == ToggleState::On
    }
}

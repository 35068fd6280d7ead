use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pagescan_search::{Direction, SearchConfig, SearchMode};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "pagescan")]
#[command(about = "Pagescan document search CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand)]
enum Action {
    /// Search a document for a pattern
    #[command(name = "-search")]
    Search {
        /// Document to search (.json or plain text)
        document: PathBuf,
        pattern: String,
        /// List every occurrence instead of the first
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        flags: SearchFlags,
    },

    /// Replace every occurrence of a pattern
    #[command(name = "-replace")]
    Replace {
        document: PathBuf,
        pattern: String,
        replacement: String,
        /// Write the result here instead of overwriting the document
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        flags: SearchFlags,
    },

    /// Show help and available actions
    #[command(name = "-help")]
    Help,

    /// Display current configuration
    #[command(name = "-show-config")]
    ShowConfig,

    /// Validate configuration file
    #[command(name = "-validate-config")]
    ValidateConfig,
}

/// Overrides layered on top of the config file
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SearchFlags {
    /// Match letter case exactly
    #[arg(long)]
    pub case_sensitive: bool,
    /// Ignore hyphens inside words
    #[arg(long)]
    pub hyphen_tolerant: bool,
    /// Enable the wildcard dialect
    #[arg(long)]
    pub wildcard: bool,
    /// Search from the end of the document
    #[arg(long)]
    pub backward: bool,
}

impl SearchFlags {
    pub fn apply(&self, mut config: SearchConfig) -> SearchConfig {
        config.case_sensitive |= self.case_sensitive;
        config.hyphen_tolerant |= self.hyphen_tolerant;
        if self.wildcard {
            config.mode = SearchMode::Wildcard;
        }
        if self.backward {
            config.direction = Direction::Backward;
        }
        config
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.action {
        Some(Action::Search {
            document,
            pattern,
            all,
            flags,
        }) => {
            let found = commands::search::run(&document, &pattern, flags, all)?;
            Ok(if found {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(Action::Replace {
            document,
            pattern,
            replacement,
            output,
            flags,
        }) => commands::replace::run(&document, &pattern, &replacement, output.as_deref(), flags)
            .map(|()| ExitCode::SUCCESS),
        Some(Action::Help) => {
            commands::help::run();
            Ok(ExitCode::SUCCESS)
        }
        Some(Action::ShowConfig) => {
            commands::show_config::run();
            Ok(ExitCode::SUCCESS)
        }
        Some(Action::ValidateConfig) => {
            commands::validate_config::run();
            Ok(ExitCode::SUCCESS)
        }
        None => {
            // No subcommand: show help
            commands::help::run();
            Ok(ExitCode::SUCCESS)
        }
    }
}

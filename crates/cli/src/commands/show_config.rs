use pagescan_search::{Direction, SearchConfig, SearchMode};

use crate::config::{config_path, parse_search_config};

pub fn run() {
    let path = match config_path() {
        Some(p) => p,
        None => {
            eprintln!("Could not determine config directory");
            return;
        }
    };

    if !path.exists() {
        println!("# Config file: {} (not created yet)", path.display());
        println!("# Using default configuration");
        println!();
        print!("{}", render(&SearchConfig::default()));
        return;
    }

    println!("# Config file: {}", path.display());
    println!();

    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            if contents.trim().is_empty() {
                println!("# (empty file - using defaults)");
                println!();
            } else {
                print!("{}", contents);
                if !contents.ends_with('\n') {
                    println!();
                }
                println!();
            }
            print!("{}", render(&parse_search_config(&contents)));
        }
        Err(e) => {
            eprintln!("Failed to read config file: {}", e);
        }
    }
}

/// The search settings in effect, in config file syntax
fn render(config: &SearchConfig) -> String {
    format!(
        "# Effective search settings:\n\
         case_sensitive = {}\n\
         hyphen_tolerant = {}\n\
         wildcards = {}\n\
         direction = {}\n",
        config.case_sensitive,
        config.hyphen_tolerant,
        config.mode == SearchMode::Wildcard,
        match config.direction {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    )
}

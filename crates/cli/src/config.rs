use std::path::PathBuf;

use pagescan_search::{Direction, SearchConfig, SearchMode};

/// Returns the path to the config file
pub fn config_path() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.trim().is_empty()
    {
        return Some(PathBuf::from(xdg_config_home).join("pagescan").join("config.txt"));
    }
    dirs::home_dir().map(|p| p.join(".config").join("pagescan").join("config.txt"))
}

/// `(line number, key, value)` for every `key = value` line
pub fn entries(contents: &str) -> Vec<(usize, &str, &str)> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let (key, value) = trimmed.split_once('=')?;
            Some((index + 1, key.trim(), value.trim()))
        })
        .collect()
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_direction(value: &str) -> Option<Direction> {
    match value.trim().to_ascii_lowercase().as_str() {
        "forward" | "down" => Some(Direction::Forward),
        "backward" | "up" => Some(Direction::Backward),
        _ => None,
    }
}

/// Search flags from config file contents; unknown or invalid lines are skipped
pub fn parse_search_config(contents: &str) -> SearchConfig {
    let mut config = SearchConfig::default();

    for (_, key, value) in entries(contents) {
        match key {
            "case_sensitive" => {
                if let Some(enabled) = parse_bool(value) {
                    config.case_sensitive = enabled;
                }
            }
            "hyphen_tolerant" | "concatenate_hyphens" => {
                if let Some(enabled) = parse_bool(value) {
                    config.hyphen_tolerant = enabled;
                }
            }
            "wildcards" | "regexp" => {
                if let Some(enabled) = parse_bool(value) {
                    config.mode = if enabled {
                        SearchMode::Wildcard
                    } else {
                        SearchMode::Literal
                    };
                }
            }
            "direction" => {
                if let Some(direction) = parse_direction(value) {
                    config.direction = direction;
                }
            }
            _ => {}
        }
    }

    config
}

/// Search flags from the config file, or defaults when it is missing
pub fn load_search_config() -> SearchConfig {
    config_path()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .map(|contents| parse_search_config(&contents))
        .unwrap_or_default()
}

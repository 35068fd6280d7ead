use std::{
    env, fs,
    path::{Path, PathBuf},
};

use pagescan_search::{DEFAULT_HISTORY_LIMIT, Direction, MAX_HISTORY_LIMIT, SearchConfig, SearchMode};

const DEFAULT_EXCERPT_CONTEXT: usize = 16;
const MAX_EXCERPT_CONTEXT: usize = 200;

const DEFAULT_CONFIG: &str = "# Search settings\n\
# Match letter case exactly\n\
case_sensitive = false\n\
# Ignore hyphens so words broken across lines still match\n\
hyphen_tolerant = false\n\
# Enable the wildcard dialect: . [a-z] \\x x*\n\
wildcards = false\n\
# Initial search direction (forward|backward)\n\
direction = forward\n\
\n\
# Console settings\n\
# Lines kept in the search history (max 10000)\n\
# history_limit = 200\n\
# Characters of context printed around a match\n\
# excerpt_context = 16\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub history_limit: usize,
    pub excerpt_context: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            excerpt_context: DEFAULT_EXCERPT_CONTEXT,
        }
    }
}

impl AppConfig {
    pub fn load_or_create() -> Self {
        let Some(path) = ensure_config_file() else {
            log::warn!("could not determine a config path, using defaults");
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_contents(&contents),
            Err(e) => {
                log::warn!("failed to read {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_contents(contents: &str) -> Self {
        let mut config = Self::default();
        for (line_number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                log::warn!("config line {}: expected `key = value`", line_number + 1);
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("case_sensitive") {
                if let Some(enabled) = parse_bool(value) {
                    config.search.case_sensitive = enabled;
                }
            } else if key.eq_ignore_ascii_case("hyphen_tolerant")
                || key.eq_ignore_ascii_case("concatenate_hyphens")
            {
                if let Some(enabled) = parse_bool(value) {
                    config.search.hyphen_tolerant = enabled;
                }
            } else if key.eq_ignore_ascii_case("wildcards") || key.eq_ignore_ascii_case("regexp") {
                if let Some(enabled) = parse_bool(value) {
                    config.search.mode = if enabled {
                        SearchMode::Wildcard
                    } else {
                        SearchMode::Literal
                    };
                }
            } else if key.eq_ignore_ascii_case("direction") {
                if let Some(direction) = parse_direction(value) {
                    config.search.direction = direction;
                }
            } else if key.eq_ignore_ascii_case("history_limit") {
                if let Ok(limit) = value.parse::<usize>() {
                    config.history_limit = limit.clamp(1, MAX_HISTORY_LIMIT);
                }
            } else if key.eq_ignore_ascii_case("excerpt_context") {
                if let Ok(context) = value.parse::<usize>() {
                    config.excerpt_context = context.min(MAX_EXCERPT_CONTEXT);
                }
            } else {
                log::debug!("config line {}: ignoring unknown key {key:?}", line_number + 1);
            }
        }

        config
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_direction(value: &str) -> Option<Direction> {
    match value.trim().to_ascii_lowercase().as_str() {
        "forward" | "down" => Some(Direction::Forward),
        "backward" | "up" => Some(Direction::Backward),
        _ => None,
    }
}

pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path()?;
    if !path.exists() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(&path, DEFAULT_CONFIG) {
            log::warn!("failed to create {}: {e}", path.display());
        }
    }
    Some(path)
}

fn config_path() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.trim().is_empty()
    {
        return Some(Path::new(&xdg_config_home).join("pagescan/config.txt"));
    }

    if let Ok(home) = env::var("HOME")
        && !home.trim().is_empty()
    {
        return Some(Path::new(&home).join(".config/pagescan/config.txt"));
    }

    env::current_dir()
        .ok()
        .map(|dir| dir.join(".config/pagescan/config.txt"))
}

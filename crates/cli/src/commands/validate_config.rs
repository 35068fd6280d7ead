use pagescan_search::MAX_HISTORY_LIMIT;

use crate::config::{config_path, parse_bool, parse_direction};

const VALID_KEYS: &[&str] = &[
    "case_sensitive",
    "hyphen_tolerant",
    "concatenate_hyphens",
    "wildcards",
    "regexp",
    "direction",
    "history_limit",
    "excerpt_context",
];

const MAX_EXCERPT_CONTEXT: usize = 200;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn validate(contents: &str) -> Report {
    let mut report = Report::default();

    for (line_num, line) in contents.lines().enumerate() {
        let line_num = line_num + 1;
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            report.errors.push(format!(
                "Line {}: Invalid syntax. Expected 'key = value'",
                line_num
            ));
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if !VALID_KEYS.contains(&key) {
            report
                .warnings
                .push(format!("Line {}: Unknown key '{}'", line_num, key));
            continue;
        }

        match key {
            "case_sensitive" | "hyphen_tolerant" | "concatenate_hyphens" | "wildcards"
            | "regexp" => {
                if parse_bool(value).is_none() {
                    report.errors.push(format!(
                        "Line {}: {} must be true/false, yes/no, on/off or 1/0",
                        line_num, key
                    ));
                }
            }
            "direction" => {
                if parse_direction(value).is_none() {
                    report.errors.push(format!(
                        "Line {}: direction must be 'forward' or 'backward'",
                        line_num
                    ));
                }
            }
            "history_limit" => match value.parse::<usize>() {
                Ok(limit) if (1..=MAX_HISTORY_LIMIT).contains(&limit) => {}
                Ok(_) => report.warnings.push(format!(
                    "Line {}: history_limit is clamped to 1..={}",
                    line_num, MAX_HISTORY_LIMIT
                )),
                Err(_) => report.errors.push(format!(
                    "Line {}: history_limit must be a positive integer",
                    line_num
                )),
            },
            "excerpt_context" => match value.parse::<usize>() {
                Ok(context) if context <= MAX_EXCERPT_CONTEXT => {}
                Ok(_) => report.warnings.push(format!(
                    "Line {}: excerpt_context is capped at {}",
                    line_num, MAX_EXCERPT_CONTEXT
                )),
                Err(_) => report.errors.push(format!(
                    "Line {}: excerpt_context must be a non-negative integer",
                    line_num
                )),
            },
            _ => {}
        }
    }

    report
}

pub fn run() {
    let path = match config_path() {
        Some(p) => p,
        None => {
            eprintln!("Could not determine config directory");
            std::process::exit(1);
        }
    };

    println!("Config file: {}", path.display());

    if !path.exists() {
        println!("Status: File does not exist (using defaults)");
        println!("Result: Valid");
        return;
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            println!("Status: Failed to read file");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let Report { errors, warnings } = validate(&contents);

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        println!("Status: Valid");
        return;
    }

    if !errors.is_empty() {
        println!();
        println!("Errors:");
        for error in &errors {
            println!("  {}", error);
        }
    }

    if !warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &warnings {
            println!("  {}", warning);
        }
    }

    println!();
    if errors.is_empty() {
        println!("Result: Valid (with warnings)");
    } else {
        println!("Result: Invalid");
        std::process::exit(1);
    }
}

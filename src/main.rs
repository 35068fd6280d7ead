mod config;
mod console;
mod worker;

use std::{env, path::PathBuf};

use anyhow::Context;
use pagescan_search::{Document, TextDocument};

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Some(arg) = env::args_os().nth(1) else {
        anyhow::bail!("usage: pagescan <document.json|document.txt>");
    };
    if arg == "--version" {
        println!("pagescan {APP_VERSION}");
        return Ok(());
    }

    let path = PathBuf::from(arg);
    let document = TextDocument::load(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    log::info!(
        "loaded {} ({} pages)",
        path.display(),
        document.page_count()
    );

    let config = config::AppConfig::load_or_create();
    console::run(document, config)
}

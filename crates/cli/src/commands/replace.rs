use std::path::Path;

use anyhow::Context;
use pagescan_search::{SearchSession, TextDocument};

use crate::SearchFlags;
use crate::config::load_search_config;

pub fn run(
    document: &Path,
    pattern: &str,
    replacement: &str,
    output: Option<&Path>,
    flags: SearchFlags,
) -> anyhow::Result<()> {
    let mut doc = TextDocument::load(document)
        .with_context(|| format!("Failed to load {}", document.display()))?;

    let config = flags.apply(load_search_config());
    log::debug!("replacing {pattern:?} in {} with {config:?}", document.display());
    let mut session = SearchSession::new(config);
    session
        .set_query(pattern)
        .with_context(|| format!("Invalid pattern {pattern:?}"))?;

    let replaced = session.replace_all(&mut doc, replacement);
    let target = output.unwrap_or(document);
    doc.save(target)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    println!("Replaced {replaced} occurrence(s) in {}", target.display());
    Ok(())
}

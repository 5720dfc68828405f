//! `profile-finder extract` command.

use std::path::Path;

use crate::error::Error;
use crate::finder::extract::{extract_links, LinkSet};

/// Execute the `extract` command on an HTML file.
///
/// # Errors
///
/// Returns an error string if the file cannot be read.
pub fn run(file: &Path) -> Result<(), String> {
    let html = std::fs::read_to_string(file)
        .map_err(|e| Error::io(format!("reading {}", file.display()), e).to_string())?;
    for line in report_lines(&extract_links(&html)) {
        println!("{line}");
    }
    Ok(())
}

fn report_lines(links: &LinkSet) -> Vec<String> {
    if links.is_empty() {
        return vec!["No links found.".to_string()];
    }
    links.iter().map(|link| format!("{:<16} {}", link.heuristic.as_str(), link.url)).collect()
}

use std::path::Path;

use pdftoc_core::footer::Footer;

use crate::prelude::{println, *};

/// Rewrite `file` in place with a linked table of contents and footers.
///
/// With `json`, the reconstruction report is printed on stdout; otherwise
/// the command is silent.
pub fn run(file: &Path, json: bool, footer: &Footer) -> Result<()> {
    let report = pdf::add_interactive_toc(file, footer)
        .with_context(|| f!("failed to add a table of contents to {}", file.display()))?;

    log::info!(
        "{}: {} entries, backup at {}",
        file.display(),
        report.entries.len(),
        pdf::backup_path(file).display()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

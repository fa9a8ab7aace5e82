//! The `shortmatch validate` command.

use std::path::PathBuf;

use anyhow::Result;

use shortmatch_core::config::load_config_from;
use shortmatch_core::parser;

pub fn execute(definition_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let options = config.match_options();

    let (definitions, failed) = if definition_path.is_dir() {
        let scan = parser::scan_definition_directory(&definition_path)?;
        (scan.loaded, scan.failed)
    } else {
        let definition = parser::parse_definition(&definition_path)?;
        (vec![(definition_path.clone(), definition)], Vec::new())
    };

    let mut total_warnings = 0;

    for (path, definition) in &definitions {
        println!(
            "Definition: {} ({} rules)",
            path.display(),
            definition.rules.len()
        );

        let warnings = parser::validate_definition(definition, &options);
        for w in &warnings {
            let prefix = w
                .rule
                .map(|rule| format!("  [rule {rule}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    for (path, e) in &failed {
        eprintln!("  [{}] ERROR: {e:#}", path.display());
    }

    if !failed.is_empty() {
        anyhow::bail!("{} definition(s) failed to load", failed.len());
    }

    if total_warnings == 0 {
        println!("All definitions valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

use anyhow::{Context, Result};
use colored::Colorize;
use define_remix_app::get_new_page_info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::{debug, info};

use super::{load_config, prepare, print_page_info};
use crate::Cli;

pub async fn execute(cli: &Cli, uri: &str, write: bool) -> Result<()> {
    let (_, config) = load_config(cli)?;
    let app = prepare(config.clone()).await?;
    let known_files = app.handle.known_files().get();
    app.handle.dispose();

    let info = get_new_page_info(&config, &app.manifest, &known_files, uri);
    debug!("Planned page for {:?}: {:?}", uri, info.page_module);
    if !print_page_info(&info) {
        anyhow::bail!("Cannot create page for {:?}", uri);
    }

    if !write {
        println!();
        println!("{}", info.new_page_source_code.dimmed());
        return Ok(());
    }

    if let Some(parent) = info.page_module.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    // Never clobber a file that appeared after the plan was made
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&info.page_module)
        .with_context(|| format!("Failed to create page: {:?}", info.page_module))?;
    file.write_all(info.new_page_source_code.as_bytes())
        .with_context(|| format!("Failed to write page: {:?}", info.page_module))?;
    info!("Created page {:?}", info.page_module);
    println!("{} Created {}", "✓".green().bold(), info.page_module.display());

    Ok(())
}

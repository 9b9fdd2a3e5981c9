use anyhow::{Context, Result};
use colored::Colorize;
use define_remix_app::get_move_page_info;
use std::fs;
use std::path::Path;
use tracing::info;

use super::{load_config, prepare, print_page_info};
use crate::Cli;

pub async fn execute(cli: &Cli, file: &Path, uri: &str, write: bool) -> Result<()> {
    let (project_root, config) = load_config(cli)?;
    let file = if file.is_absolute() {
        file.to_path_buf()
    } else {
        project_root.join(file)
    };

    let app = prepare(config.clone()).await?;
    let known_files = app.handle.known_files().get();
    app.handle.dispose();

    let info = get_move_page_info(&config, &app.manifest, &known_files, &file, uri);
    if !print_page_info(&info) {
        anyhow::bail!("Cannot move {:?} to {:?}", file, uri);
    }
    if !write {
        return Ok(());
    }

    if let Some(parent) = info.page_module.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    if info.page_module.exists() {
        anyhow::bail!("Refusing to overwrite {:?}", info.page_module);
    }
    fs::rename(&file, &info.page_module)
        .with_context(|| format!("Failed to move {:?} to {:?}", file, info.page_module))?;
    info!("Moved {:?} to {:?}", file, info.page_module);
    println!(
        "{} Moved {} → {}",
        "✓".green().bold(),
        file.display(),
        info.page_module.display()
    );

    Ok(())
}

use anyhow::{Context, Result};
use colored::Colorize;
use define_remix_app::{prepare_app, AppManifest, NativeFs};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use super::{load_config, print_json, print_manifest};
use crate::Cli;

pub async fn execute(cli: &Cli, json: bool) -> Result<()> {
    let (project_root, config) = load_config(cli)?;
    let app_dir = config.app_dir.clone();

    let (tx, mut rx) = mpsc::unbounded_channel::<AppManifest>();
    let app = prepare_app(
        Arc::new(NativeFs::new()),
        config,
        Box::new(move |manifest: &AppManifest| {
            let _ = tx.send(manifest.clone());
        }),
    )
    .await
    .with_context(|| format!("Failed to watch app at {:?}", app_dir))?;

    let show = |manifest: &AppManifest| -> Result<()> {
        if json {
            print_json(manifest)
        } else {
            print_manifest(manifest, &project_root);
            Ok(())
        }
    };

    show(&app.manifest)?;
    println!();
    println!("{}", "Watching for changes... (press Ctrl+C to stop)".cyan());

    loop {
        tokio::select! {
            Some(manifest) = rx.recv() => {
                info!("Routes changed: {} routes", manifest.all_routes().count());
                println!();
                println!("{}", "Routes changed".green().bold());
                show(&manifest)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Stopping watch of {:?}", app_dir);
    app.handle.dispose();
    Ok(())
}

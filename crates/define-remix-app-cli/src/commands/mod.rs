pub mod manifest;
pub mod move_page;
pub mod new_page;
pub mod watch;

use anyhow::{Context, Result};
use colored::Colorize;
use define_remix_app::{
    prepare_app, AppConfig, AppManifest, NativeFs, PageInfo, PreparedApp, RouteInfo, Severity,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::Cli;

/// Project root and configuration selected by the global flags
pub fn load_config(cli: &Cli) -> Result<(PathBuf, AppConfig)> {
    let project_root = match &cli.project {
        Some(path) => path.clone(),
        None => env::current_dir()?,
    };
    let mut config = AppConfig::load(&project_root, cli.config.as_deref())?;
    if let Some(pattern) = cli.pattern {
        config.routing_pattern = pattern;
    }
    Ok((project_root, config))
}

/// Prepares the app on the local disk, publishing nothing
pub async fn prepare(config: AppConfig) -> Result<PreparedApp> {
    let app_dir = config.app_dir.clone();
    prepare_app(Arc::new(NativeFs::new()), config, Box::new(|_: &AppManifest| {}))
        .await
        .with_context(|| format!("Failed to read app at {:?}", app_dir))
}

fn print_route(route: &RouteInfo, project_root: &std::path::Path) {
    let module = route
        .page_module
        .strip_prefix(project_root)
        .unwrap_or(&route.page_module);
    let depth = route.extra_data.parent_layout_ids.len();
    let indent = "  ".repeat(depth);
    println!(
        "{}{} {} {}",
        indent,
        route.path_string.cyan(),
        "→".dimmed(),
        module.display()
    );
}

/// Prints a manifest as an indented route list
pub fn print_manifest(manifest: &AppManifest, project_root: &std::path::Path) {
    println!("{}", "Routes".green().bold());
    for route in manifest.all_routes() {
        print_route(route, project_root);
    }

    if !manifest.error_routes.is_empty() {
        println!();
        println!("{}", "Error boundaries".green().bold());
        for route in &manifest.error_routes {
            print_route(route, project_root);
        }
    }

    if !manifest.diagnostics.is_empty() {
        println!();
        println!("{}", "Diagnostics".yellow().bold());
        for diagnostic in &manifest.diagnostics {
            let label = match diagnostic.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            println!("  {}: {} ({})", label, diagnostic.message, diagnostic.file_path.display());
        }
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a page plan, returning whether it is valid
pub fn print_page_info(info: &PageInfo) -> bool {
    if let Some(error) = &info.error_message {
        println!("{} {}", "✗".red().bold(), error);
        return false;
    }

    println!("{} {}", "✓".green().bold(), info.page_module.display());
    if let Some(route) = &info.new_page_route {
        println!("  URL: {}", route.path_string.cyan());
        let layouts: Vec<String> = route
            .parent_layouts
            .iter()
            .map(|l| format!("{}#{}", l.layout_module.display(), l.layout_export_name))
            .collect();
        if !layouts.is_empty() {
            println!("  Layouts: {}", layouts.join(" > "));
        }
    }
    if let Some(warning) = &info.warning_message {
        println!("{} {}", "⚠".yellow().bold(), warning.yellow());
    }
    true
}

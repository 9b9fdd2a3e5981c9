use anyhow::Result;

use super::{load_config, prepare, print_json, print_manifest};
use crate::Cli;

pub async fn execute(cli: &Cli, json: bool) -> Result<()> {
    let (project_root, config) = load_config(cli)?;
    let app = prepare(config).await?;

    if json {
        print_json(&app.manifest)?;
    } else {
        print_manifest(&app.manifest, &project_root);
    }

    app.handle.dispose();
    Ok(())
}

use crate::cli_args::TreeArgs;
use crate::load_config_for_command;
use crate::output::write_to_stdout;
use anyhow::{Context, Result};
use colored::*;
use std::sync::Arc;
use xpack_core::{Config, PathFilter, discover_paths, render_paths};

pub fn handle_tree_command(args: TreeArgs) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_deref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let (config, _) =
        load_config_for_command(&project_root, &args.project_config, &args.filters, None)
            .context("Failed to load configuration for tree command")?;

    let output_path = config.output_path(&project_root);
    let filter = PathFilter::from_config(&config, &project_root, Some(&output_path))
        .context("Failed to build path filters")?;
    let discovered = discover_paths(&project_root, Arc::new(filter), config.ignore.use_gitignore)
        .context("Failed to discover project files")?;

    if discovered.is_empty() {
        eprintln!("{}", "(No files matched)".yellow());
        return Ok(());
    }
    let paths: Vec<&str> = discovered.iter().map(|d| d.relative.as_str()).collect();
    write_to_stdout(&render_paths(&paths))
}

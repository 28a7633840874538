use crate::cli_args::DebugArgs;
use crate::load_config_for_command;
use anyhow::{Context, Result};
use colored::*;
use std::sync::Arc;
use xpack_core::{Config, PathFilter, discover_paths};

pub fn handle_debug_command(args: DebugArgs) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_deref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let (config, config_path) =
        load_config_for_command(&project_root, &args.project_config, &args.filters, None)
            .context("Failed to load configuration for debug command")?;

    let output_path = config.output_path(&project_root);
    log::debug!("Debug: Discovering files...");
    let filter = PathFilter::from_config(&config, &project_root, Some(&output_path))
        .context("Failed to build path filters")?;
    let discovered = discover_paths(&project_root, Arc::new(filter), config.ignore.use_gitignore)
        .context("Failed to discover files for debug")?;
    log::debug!("Debug: {} files discovered.", discovered.len());

    println!("{}", "\n--- Project ---".green().bold().underline());
    println!("{:<14} {}", "Root:".bold(), project_root.display());
    println!(
        "{:<14} {}",
        "Name:".bold(),
        config.effective_project_name(&project_root)
    );
    let source = match &config_path {
        Some(path) => path.display().to_string().normal(),
        None => "(defaults)".dimmed(),
    };
    println!("{:<14} {}", "Config file:".bold(), source);
    println!("{:<14} {}", "Output file:".bold(), output_path.display());

    println!(
        "{}",
        "\n--- Effective Configuration ---"
            .green()
            .bold()
            .underline()
    );
    let config_toml = config
        .to_toml_string()
        .context("Failed to serialize effective config to TOML")?;
    println!("{}", config_toml);

    println!(
        "{}",
        format!("--- Files To Pack ({}) ---", discovered.len())
            .green()
            .bold()
            .underline()
    );
    if discovered.is_empty() {
        println!("{}", "(None)".dimmed());
    } else {
        for path in &discovered {
            println!("- {}", path.relative.cyan());
        }
    }

    println!("{}", "\n--- End Debug Info ---".green().bold());
    Ok(())
}

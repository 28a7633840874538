use crate::cli_args::InitArgs;
use crate::output::write_to_file;
use anyhow::{Context, Result};
use colored::*;
use xpack_core::config::DEFAULT_CONFIG_FILENAME;
use xpack_core::{AppError, Config};

pub fn handle_init_command(args: InitArgs, quiet: bool) -> Result<()> {
    let target = if args.global {
        Config::global_config_path().ok_or_else(|| {
            AppError::Config("No configuration directory is available on this platform".to_string())
        })?
    } else {
        let project_root = Config::determine_project_root(args.project_root.as_deref())
            .context("Failed to determine project root")?;
        project_root.join(DEFAULT_CONFIG_FILENAME)
    };
    log::debug!("Init target: {}", target.display());

    if target.exists() && !args.force {
        return Err(AppError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            target.display()
        ))
        .into());
    }

    let content = Config::default()
        .to_toml_string()
        .context("Failed to serialize default configuration")?;
    write_to_file(&target, &content)?;

    if !quiet {
        println!(
            "{} Config written to: {}",
            "✅".green(),
            target.display().to_string().blue()
        );
    }
    Ok(())
}

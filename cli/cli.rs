mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use std::path::{Path, PathBuf};
use std::process;

use cli_args::{Cli, Commands, FilterOpts, PackArgs, ProjectConfigOpts};
use xpack_core::{AppError, Config, OutputStyle};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = match e.downcast_ref::<AppError>() {
                Some(AppError::Config(_)) => 1,
                Some(AppError::TomlParse(_)) => 1,
                Some(AppError::TomlSerialize(_)) => 1,
                Some(AppError::YamlError(_)) => 1,
                Some(AppError::Io(_)) => 2,
                Some(AppError::FileRead { .. }) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(AppError::Ignore(_)) => 2,
                Some(AppError::Glob(_)) => 2,
                Some(AppError::Security(_)) => 3,
                Some(AppError::InvalidArgument(_)) => 5,
                Some(AppError::TikToken(_)) => 8,
                Some(_) => 1,
                None => 1,
            };

            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }

            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Pack(args) => {
                log::debug!("Executing 'pack' command...");
                commands::pack::handle_pack_command(args, quiet)?;
            }
            Commands::Tree(args) => {
                log::debug!("Executing 'tree' command...");
                commands::tree::handle_tree_command(args)?;
            }
            Commands::Debug(args) => {
                log::debug!("Executing 'debug' command...");
                commands::debug::handle_debug_command(args)?;
            }
            Commands::Init(args) => {
                log::debug!("Executing 'init' command...");
                commands::init::handle_init_command(args, quiet)?;
            }
        },
    }
    Ok(())
}

fn apply_filter_overrides(config: &mut Config, filters: &FilterOpts) {
    if !filters.include.is_empty() {
        config.filters.include = filters.include.clone();
    }
    config
        .filters
        .exclude
        .extend(filters.exclude.iter().cloned());
    if filters.no_gitignore {
        config.ignore.use_gitignore = false;
    }
    if filters.no_default_patterns {
        config.ignore.use_default_patterns = false;
    }
}

fn merge_config_with_cli_overrides(mut config: Config, args: &PackArgs) -> Result<Config> {
    log::trace!("Applying pack command CLI overrides to config...");

    if let Some(style) = &args.style {
        config.output.style = style
            .parse::<OutputStyle>()
            .context("Invalid --style value")?;
    }
    if let Some(output) = &args.output {
        // Relative to the working directory, not the project root.
        let absolute = std::path::absolute(output)
            .with_context(|| format!("Failed to resolve output path {}", output.display()))?;
        config.output.file_path = Some(absolute);
    }
    if let Some(header) = &args.header {
        config.output.header_text = Some(header.clone());
    }
    if let Some(path) = &args.instruction_file {
        config.output.instruction_file_path = Some(path.clone());
    }
    if let Some(len) = args.top_files_len {
        config.output.top_files_length = len;
    }
    if args.no_tree {
        config.output.show_tree = false;
    }
    if args.no_summary {
        config.output.include_summary = false;
    }
    if args.remove_comments {
        config.output.remove_comments = true;
    }
    if args.remove_empty_lines {
        config.output.remove_empty_lines = true;
    }
    if args.line_numbers {
        config.output.show_line_numbers = true;
    }
    if args.no_security_check {
        config.security.enable_security_check = false;
    }
    apply_filter_overrides(&mut config, &args.filters);

    log::trace!("Config after CLI overrides: {:?}", config);
    Ok(config)
}

/// Loads the configuration for a command and applies the shared overrides.
/// Returns the config together with the file it came from, if any.
pub fn load_config_for_command(
    project_root: &Path,
    project_opts: &ProjectConfigOpts,
    filters: &FilterOpts,
    pack_args: Option<&PackArgs>,
) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, config_path) = Config::load(
        project_root,
        project_opts.config.as_deref(),
        project_opts.no_config,
    )
    .context("Failed to load configuration")?;

    if let Some(name) = &project_opts.project_name {
        config.general.project_name = Some(name.clone());
    }

    match pack_args {
        Some(args) => config = merge_config_with_cli_overrides(config, args)?,
        None => apply_filter_overrides(&mut config, filters),
    }

    Ok((config, config_path))
}

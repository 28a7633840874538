use crate::cli_args::PackArgs;
use crate::load_config_for_command;
use crate::output::{print_pack_summary, print_suspicious_files, write_to_file, write_to_stdout};
use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use std::path::Path;
use xpack_core::{
    self as core, Config, RegexSecretScanner, TokenCounter, gather_files, run_security_check,
};

pub fn handle_pack_command(args: PackArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_deref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let (config, _) =
        load_config_for_command(&project_root, &args.project_config, &args.filters, Some(&args))
            .context("Failed to load configuration for pack command")?;

    let output_path = (!args.stdout).then(|| config.output_path(&project_root));

    let gathered = gather_files(&project_root, &config, output_path.as_deref())
        .context("Failed to gather project files")?;
    if !gathered.skipped.is_empty() {
        log::info!(
            "Skipped {} binary or non-UTF-8 files.",
            gathered.skipped.len()
        );
    }
    for err in &gathered.errors {
        log::warn!("{}", err);
    }
    let mut files = gathered.files;

    if config.security.enable_security_check {
        let scanner = RegexSecretScanner::new().context("Failed to build secret scanner")?;
        let suspicious = run_security_check(&files, &scanner);
        if !suspicious.is_empty() {
            files.retain(|file| !suspicious.iter().any(|s| s.path == file.path));
            if !quiet {
                print_suspicious_files(&suspicious);
            }
        }
    } else {
        log::debug!("Security check disabled.");
    }

    let instruction = config
        .read_instruction(&project_root)
        .context("Failed to read instruction file")?;
    let options = config.render_options(instruction, Some(Utc::now()));
    let document = core::render(&files, config.output.style, &options);

    match &output_path {
        Some(path) => {
            write_to_file(path, &document)?;
            if !quiet {
                let counter = TokenCounter::new();
                let summary =
                    core::summarize(&files, &document, &counter, config.output.summary_top_files);
                let destination = display_relative(path, &project_root);
                print_pack_summary(&summary, &destination);
                println!(
                    "{} Packed {} files into {}",
                    "✅".green(),
                    summary.total_files,
                    destination.blue()
                );
            }
        }
        None => write_to_stdout(&document)?,
    }
    Ok(())
}

fn display_relative(path: &Path, project_root: &Path) -> String {
    path.strip_prefix(project_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

use anyhow::{Context, Result};
use byte_unit::{Byte, UnitType};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use xpack_core::{AppError, PackSummary, SuspiciousFile};

pub fn write_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut file = File::create(path).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    file.write_all(content.as_bytes())
        .map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn readable_size(chars: usize) -> String {
    Byte::from_u128(chars as u128)
        .unwrap_or_default()
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

/// Lists the files excluded by the security check.
pub fn print_suspicious_files(suspicious: &[SuspiciousFile]) {
    if suspicious.is_empty() {
        return;
    }
    eprintln!(
        "\n{}",
        " Suspicious files excluded from the pack "
            .yellow()
            .bold()
            .underline()
    );
    for (idx, file) in suspicious.iter().enumerate() {
        eprintln!("{}. {}", idx + 1, file.path.yellow());
        for message in &file.messages {
            eprintln!("   - {}", message.dimmed());
        }
    }
    eprintln!(
        "{}",
        "Review these files and rerun with --no-security-check if they are safe.".dimmed()
    );
}

pub fn print_pack_summary(summary: &PackSummary, destination: &str) {
    println!();
    println!("{}", " Pack Summary ".green().bold().underline());
    println!(
        "{:<20} {}",
        "Total Files:".green(),
        summary.total_files.to_string().cyan()
    );
    println!(
        "{:<20} {} ({})",
        "Total Chars:".green(),
        summary.total_chars.to_string().cyan(),
        readable_size(summary.total_chars).dimmed()
    );
    println!(
        "{:<20} {}",
        "Total Tokens:".green(),
        summary.total_tokens.to_string().cyan()
    );
    println!(
        "{:<20} {} chars, {} tokens",
        "Output:".green(),
        summary.output_chars.to_string().cyan(),
        summary.output_tokens.to_string().cyan()
    );
    println!("{:<20} {}", "Written To:".green(), destination.blue());

    if summary.top_files.is_empty() {
        println!("\n{}", "(No files packed)".yellow());
    } else {
        println!(
            "\n{}",
            format!(" Top {} Files by Tokens ", summary.top_files.len())
                .green()
                .bold()
                .underline()
        );
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Path").fg(Color::Green),
            Cell::new("Chars").fg(Color::Green),
            Cell::new("Size").fg(Color::Green),
            Cell::new("Tokens").fg(Color::Green),
        ]);
        for file in &summary.top_files {
            table.add_row(vec![
                Cell::new(&file.path).fg(Color::Cyan),
                Cell::new(file.chars).set_alignment(CellAlignment::Right),
                Cell::new(readable_size(file.chars))
                    .set_alignment(CellAlignment::Right)
                    .fg(Color::DarkGrey),
                Cell::new(file.tokens).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }
    println!();
}

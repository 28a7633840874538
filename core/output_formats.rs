use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Plain,
    Markdown,
    Xml,
}

impl OutputStyle {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputStyle::Plain => "txt",
            OutputStyle::Markdown => "md",
            OutputStyle::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputStyle::Plain => "plain",
            OutputStyle::Markdown => "markdown",
            OutputStyle::Xml => "xml",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "txt" | "text" => Ok(OutputStyle::Plain),
            "markdown" | "md" => Ok(OutputStyle::Markdown),
            "xml" => Ok(OutputStyle::Xml),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown output style \"{}\" (expected plain, markdown or xml)",
                other
            ))),
        }
    }
}

/// One packed file: its path relative to the project root and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub content: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        FileRecord {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentText {
    pub intro: String,
    pub purpose: String,
    pub file_format: String,
    pub usage_guidelines: Vec<String>,
    pub notes: Vec<String>,
    pub comments_removed_note: String,
    pub empty_lines_removed_note: String,
    pub line_numbers_note: String,
    pub truncated_note: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BuiltinIgnores {
    #[serde(default)]
    pub common: Vec<String>,
    #[serde(default)]
    pub build: Vec<String>,
    #[serde(default)]
    pub lockfiles: Vec<String>,
    #[serde(default)]
    pub binaries: Vec<String>,
}

impl BuiltinIgnores {
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.common
            .iter()
            .chain(&self.build)
            .chain(&self.lockfiles)
            .chain(&self.binaries)
    }
}

static DOCUMENT_TEXT: Lazy<DocumentText> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/document_text.yaml"
    ));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/document_text.yaml")
});
static BUILTIN_IGNORE_PATTERNS: Lazy<BuiltinIgnores> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/builtin_ignores.yaml"
    ));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/builtin_ignores.yaml")
});

pub fn get_document_text() -> &'static DocumentText {
    &DOCUMENT_TEXT
}
pub fn get_builtin_ignore_patterns() -> &'static BuiltinIgnores {
    &BUILTIN_IGNORE_PATTERNS
}

use crate::error::{AppError, Result};
use crate::output_formats::OutputStyle;
use crate::processing::ContentTransforms;
use crate::render::RenderOptions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "xpack.toml";
pub const GLOBAL_CONFIG_DIR: &str = "xpack";
pub const DEFAULT_OUTPUT_BASENAME: &str = "xpack-output";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub ignore: IgnoreConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Defaults to `xpack-output.<ext>` in the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(default)]
    pub style: OutputStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_file_path: Option<PathBuf>,
    #[serde(default = "default_false")]
    pub remove_comments: bool,
    #[serde(default = "default_false")]
    pub remove_empty_lines: bool,
    #[serde(default = "default_false")]
    pub show_line_numbers: bool,
    /// 0 keeps every file.
    #[serde(default)]
    pub top_files_length: usize,
    #[serde(default = "default_summary_top_files")]
    pub summary_top_files: usize,
    #[serde(default = "default_true")]
    pub show_tree: bool,
    #[serde(default = "default_true")]
    pub include_summary: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    #[serde(default = "default_true")]
    pub use_gitignore: bool,
    #[serde(default = "default_true")]
    pub use_default_patterns: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    #[serde(default = "default_true")]
    pub enable_security_check: bool,
}

fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_summary_top_files() -> usize {
    5
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_path: None,
            style: OutputStyle::default(),
            header_text: None,
            instruction_file_path: None,
            remove_comments: default_false(),
            remove_empty_lines: default_false(),
            show_line_numbers: default_false(),
            top_files_length: 0,
            summary_top_files: default_summary_top_files(),
            show_tree: default_true(),
            include_summary: default_true(),
        }
    }
}
impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            use_gitignore: default_true(),
            use_default_patterns: default_true(),
        }
    }
}
impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_security_check: default_true(),
        }
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&Path>) -> Result<PathBuf> {
        let path_to_resolve = match cli_project_root {
            Some(p) => expand(p),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    /// `<config_dir>/xpack/xpack.toml`, when the platform has a config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(GLOBAL_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME))
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&str>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        if let Some(p_str) = cli_config_file {
            let mut path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
            let looks_like_path =
                path.is_absolute() || path.components().count() > 1 || p_str.contains(['/', '\\']);
            if !looks_like_path {
                path = project_root.join(path);
            }
            if !path.exists() && path.extension().is_none() {
                path.set_extension("toml");
            }
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Specified config file not found at path: {}",
                    path.display()
                )));
            }
            log::debug!("Using specified config file: {}", path.display());
            return Ok(Some(path));
        }

        let local_path = project_root.join(DEFAULT_CONFIG_FILENAME);
        if local_path.exists() {
            log::debug!("Using project config file: {}", local_path.display());
            return Ok(Some(local_path));
        }

        match Self::global_config_path() {
            Some(global_path) if global_path.exists() => {
                log::debug!("Using global config file: {}", global_path.display());
                Ok(Some(global_path))
            }
            _ => {
                log::debug!(
                    "No config file specified and none found at {}",
                    local_path.display()
                );
                Ok(None)
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str::<Config>(content)
    }

    /// Resolves and loads the configuration, falling back to defaults when no file applies.
    pub fn load(
        project_root: &Path,
        cli_config_file: Option<&str>,
        cli_disable_config: bool,
    ) -> Result<(Self, Option<PathBuf>)> {
        match Self::resolve_config_path(project_root, cli_config_file, cli_disable_config)? {
            Some(path) => Ok((Self::load_from_path(&path)?, Some(path))),
            None => {
                log::info!("Using default configuration.");
                Ok((Self::default(), None))
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn effective_project_name(&self, project_root: &Path) -> String {
        self.general.project_name.clone().unwrap_or_else(|| {
            project_root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "UnknownProject".to_string())
        })
    }

    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        match &self.output.file_path {
            Some(path) => {
                let expanded = expand(path);
                if expanded.is_absolute() {
                    expanded
                } else {
                    project_root.join(expanded)
                }
            }
            None => project_root.join(format!(
                "{}.{}",
                DEFAULT_OUTPUT_BASENAME,
                self.output.style.extension()
            )),
        }
    }

    /// Reads the instruction file, resolved against the project root.
    pub fn read_instruction(&self, project_root: &Path) -> Result<Option<String>> {
        let Some(path) = &self.output.instruction_file_path else {
            return Ok(None);
        };
        let expanded = expand(path);
        let full_path = if expanded.is_absolute() {
            expanded
        } else {
            project_root.join(expanded)
        };
        fs::read_to_string(&full_path)
            .map(Some)
            .map_err(|e| AppError::FileRead {
                path: full_path,
                source: e,
            })
    }

    pub fn transforms(&self) -> ContentTransforms {
        ContentTransforms {
            remove_comments: self.output.remove_comments,
            remove_empty_lines: self.output.remove_empty_lines,
            show_line_numbers: self.output.show_line_numbers,
        }
    }

    pub fn render_options(
        &self,
        instruction: Option<String>,
        generated_at: Option<DateTime<Utc>>,
    ) -> RenderOptions {
        RenderOptions {
            header_text: self.output.header_text.clone(),
            instruction,
            transforms: self.transforms(),
            top_files_length: self.output.top_files_length,
            show_tree: self.output.show_tree,
            include_summary: self.output.include_summary,
            generated_at,
        }
    }
}

pub mod config;
pub mod error;
pub mod gather;
pub mod language;
pub mod output_formats;
pub mod processing;
pub mod render;
pub mod security;
pub mod sorting;
pub mod summary;
pub mod tree;

pub use config::Config;
pub use error::{AppError, Result};
pub use gather::{DiscoveredPath, GatheredFiles, PathFilter, discover_paths, gather_files, read_files};
pub use output_formats::{
    BuiltinIgnores, DocumentText, FileRecord, OutputStyle, get_builtin_ignore_patterns,
    get_document_text,
};
pub use processing::ContentTransforms;
pub use render::{RenderOptions, render};
pub use security::{RegexSecretScanner, SecretScanner, SuspiciousFile, run_security_check};
pub use sorting::{ParsedPath, compare_paths, sort_paths};
pub use summary::{FileStats, PackSummary, TokenCounter, summarize};
pub use tree::{TreeNode, build_tree, render_paths, render_tree};

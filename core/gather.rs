use crate::config::Config;
use crate::error::{AppError, Result};
use crate::output_formats::{FileRecord, get_builtin_ignore_patterns};
use crate::sorting::{ParsedPath, normalize_separators};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::{WalkBuilder, WalkState};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

// Bytes inspected for a NUL when deciding whether a file is binary.
const BINARY_PROBE_LEN: usize = 8000;

/// A discovered file: absolute location plus its `/`-separated relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPath {
    pub absolute: PathBuf,
    pub relative: String,
}

#[derive(Debug, Default)]
pub struct GatheredFiles {
    pub files: Vec<FileRecord>,
    /// Relative paths skipped as binary or non-UTF-8.
    pub skipped: Vec<String>,
    pub errors: Vec<AppError>,
}

/// Include/exclude decisions for relative paths.
#[derive(Debug)]
pub struct PathFilter {
    include_set: GlobSet,
    has_includes: bool,
    exclude_set: GlobSet,
    builtin_set: Option<GlobSet>,
    output_file: Option<String>,
}

fn process_pattern(pattern: &str) -> String {
    let mut processed = pattern.trim().replace('\\', "/");
    if processed.ends_with('/') && processed.len() > 1 {
        processed.push_str("**");
    }
    // Patterns without a separator match at any depth, like gitignore.
    let anchored = processed.trim_end_matches("/**").contains('/');
    if !anchored && !processed.starts_with("**/") {
        processed = format!("**/{}", processed);
    }
    processed
}

fn build_glob_set_from_vec<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern_str = pattern.as_ref();
        if pattern_str.trim().is_empty() {
            continue;
        }
        let processed_pattern = process_pattern(pattern_str);
        match GlobBuilder::new(&processed_pattern)
            .literal_separator(true)
            .build()
        {
            Ok(glob) => {
                log::trace!(
                    "Adding glob pattern: {} (processed as {})",
                    pattern_str,
                    processed_pattern
                );
                builder.add(glob);
            }
            Err(e) => {
                log::error!("Invalid glob pattern \"{}\": {}", pattern_str, e);
                return Err(AppError::Glob(format!(
                    "Invalid glob pattern \"{}\" (processed as \"{}\"): {}",
                    pattern_str, processed_pattern, e
                )));
            }
        }
    }
    builder.build().map_err(|e| {
        log::error!("Error building glob set: {}", e);
        AppError::Glob(e.to_string())
    })
}

// A directory matches when a path inside it would.
fn set_matches(set: &GlobSet, relative: &str, is_dir: bool) -> bool {
    set.is_match(relative) || (is_dir && set.is_match(format!("{}/__any_child__", relative)))
}

fn ancestors(relative: &str) -> impl Iterator<Item = &str> {
    relative
        .match_indices('/')
        .map(move |(idx, _)| &relative[..idx])
}

impl PathFilter {
    pub fn new<S: AsRef<str>>(
        include: &[S],
        exclude: &[S],
        use_default_patterns: bool,
        output_file: Option<String>,
    ) -> Result<Self> {
        let builtin_set = if use_default_patterns {
            let patterns: Vec<&String> = get_builtin_ignore_patterns().all().collect();
            Some(build_glob_set_from_vec(&patterns)?)
        } else {
            None
        };
        Ok(PathFilter {
            include_set: build_glob_set_from_vec(include)?,
            has_includes: include.iter().any(|p| !p.as_ref().trim().is_empty()),
            exclude_set: build_glob_set_from_vec(exclude)?,
            builtin_set,
            output_file,
        })
    }

    /// Builds the filter for a configuration. `output_path` is excluded when it
    /// lies inside `project_root`.
    pub fn from_config(config: &Config, project_root: &Path, output_path: Option<&Path>) -> Result<Self> {
        let output_file = output_path
            .and_then(|out| pathdiff::diff_paths(out, project_root))
            .filter(|rel| !rel.starts_with(".."))
            .map(|rel| normalize_separators(&rel.to_string_lossy()));
        Self::new(
            &config.filters.include,
            &config.filters.exclude,
            config.ignore.use_default_patterns,
            output_file,
        )
    }

    /// Whether a directory (or file) is excluded, together with everything below it.
    pub fn is_excluded(&self, relative: &str, is_dir: bool) -> bool {
        if relative == ".git" || relative.starts_with(".git/") {
            return true;
        }
        if set_matches(&self.exclude_set, relative, is_dir) {
            log::trace!("Path excluded by explicit exclude set: {}", relative);
            return true;
        }
        if let Some(builtin) = &self.builtin_set {
            if set_matches(builtin, relative, is_dir) {
                log::trace!("Path excluded by built-in ignores: {}", relative);
                return true;
            }
        }
        false
    }

    pub fn includes_file(&self, relative: &str) -> bool {
        if self.output_file.as_deref() == Some(relative) {
            log::trace!("Skipping the output file itself: {}", relative);
            return false;
        }
        if self.is_excluded(relative, false)
            || ancestors(relative).any(|dir| self.is_excluded(dir, true))
        {
            return false;
        }
        if self.has_includes && !self.include_set.is_match(relative) {
            log::trace!("Path not included by explicit include set: {}", relative);
            return false;
        }
        true
    }
}

/// Walks the project root in parallel and returns the files that pass the
/// filter, in display order.
pub fn discover_paths(
    project_root: &Path,
    filter: Arc<PathFilter>,
    use_gitignore: bool,
) -> Result<Vec<DiscoveredPath>> {
    if !project_root.is_dir() {
        return Err(AppError::InvalidArgument(format!(
            "Project root is not a directory: {}",
            project_root.display()
        )));
    }

    let mut builder = WalkBuilder::new(project_root);
    builder.threads(rayon::current_num_threads().min(12));
    builder.hidden(false);
    builder.ignore(use_gitignore);
    builder.git_ignore(use_gitignore);
    // Only ignore files inside the project apply.
    builder.git_global(false);
    builder.git_exclude(use_gitignore);
    builder.require_git(false);

    let prune_root = project_root.to_path_buf();
    let prune_filter = Arc::clone(&filter);
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        if entry.depth() == 0 || !is_dir {
            return true;
        }
        match pathdiff::diff_paths(entry.path(), &prune_root) {
            Some(rel) => !prune_filter.is_excluded(&normalize_separators(&rel.to_string_lossy()), true),
            None => true,
        }
    });
    log::debug!("WalkBuilder configured (gitignore: {})", use_gitignore);

    let walker = builder.build_parallel();
    let project_root_clone = project_root.to_path_buf();
    let (tx_walked, rx_walked) = mpsc::channel::<DiscoveredPath>();
    let tx_for_closure = tx_walked.clone();

    log::info!("Walking project directory: {}", project_root.display());
    walker.run(move || {
        let tx_thread = tx_for_closure.clone();
        let proj_root = project_root_clone.clone();

        Box::new(move |entry_result| {
            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                        return WalkState::Continue;
                    }
                    let path = entry.path();
                    match pathdiff::diff_paths(path, &proj_root) {
                        Some(relative_path) => {
                            let discovered = DiscoveredPath {
                                absolute: path.to_path_buf(),
                                relative: normalize_separators(&relative_path.to_string_lossy()),
                            };
                            if tx_thread.send(discovered).is_err() {
                                log::error!("Receiver dropped for walked paths, stopping walk early.");
                                return WalkState::Quit;
                            }
                        }
                        None => log::warn!("Could not get relative path for: {}", path.display()),
                    }
                }
                Err(e) => log::warn!("Error walking directory: {}", e),
            }
            WalkState::Continue
        })
    });
    drop(tx_walked);

    let mut discovered: Vec<DiscoveredPath> = rx_walked
        .into_iter()
        .filter(|d| filter.includes_file(&d.relative))
        .collect();
    discovered.sort_by_cached_key(|d| ParsedPath::parse(&d.relative));
    log::info!("Discovered {} files.", discovered.len());
    Ok(discovered)
}

enum ReadOutcome {
    Text(FileRecord),
    Skipped(String),
    Failed(AppError),
}

fn read_file(discovered: DiscoveredPath) -> ReadOutcome {
    let bytes = match fs::read(&discovered.absolute) {
        Ok(bytes) => bytes,
        Err(e) => {
            return ReadOutcome::Failed(AppError::FileRead {
                path: discovered.absolute,
                source: e,
            });
        }
    };
    if bytes.iter().take(BINARY_PROBE_LEN).any(|b| *b == 0) {
        log::debug!("Skipping binary file: {}", discovered.relative);
        return ReadOutcome::Skipped(discovered.relative);
    }
    match String::from_utf8(bytes) {
        Ok(content) => ReadOutcome::Text(FileRecord {
            path: discovered.relative,
            content,
        }),
        Err(e) => {
            log::debug!("Skipping non-UTF-8 file: {} ({})", discovered.relative, e);
            ReadOutcome::Skipped(discovered.relative)
        }
    }
}

/// Reads the discovered files in parallel, keeping their order.
pub fn read_files(paths: Vec<DiscoveredPath>) -> GatheredFiles {
    log::info!("Reading content for {} files...", paths.len());
    let outcomes: Vec<ReadOutcome> = paths.into_par_iter().map(read_file).collect();

    let mut gathered = GatheredFiles::default();
    for outcome in outcomes {
        match outcome {
            ReadOutcome::Text(record) => gathered.files.push(record),
            ReadOutcome::Skipped(path) => gathered.skipped.push(path),
            ReadOutcome::Failed(err) => {
                log::warn!("{}", err);
                gathered.errors.push(err);
            }
        }
    }
    log::info!("File reading complete.");
    gathered
}

/// Discovers and reads every file selected by `config`.
pub fn gather_files(
    project_root: &Path,
    config: &Config,
    output_path: Option<&Path>,
) -> Result<GatheredFiles> {
    log::debug!("Starting file gathering process...");
    let filter = PathFilter::from_config(config, project_root, output_path)?;
    let discovered = discover_paths(project_root, Arc::new(filter), config.ignore.use_gitignore)?;
    Ok(read_files(discovered))
}

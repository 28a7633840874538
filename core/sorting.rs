use std::cmp::Ordering;

pub mod comparator;

/// Directory names whose contents are grouped ahead of everything else.
pub const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "spec"];

/// A path string with the attributes the sorter needs, derived once per sort pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub normalized: String,
    pub segments: Vec<String>,
    pub is_directory: bool,
    pub is_relative: bool,
    pub parent_levels: usize,
}

/// Converts backslashes to `/` and collapses runs of separators.
/// A trailing separator survives as a single `/`.
pub fn normalize_separators(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for ch in raw.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(ch);
    }
    normalized
}

impl ParsedPath {
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize_separators(raw);
        let is_directory = normalized.ends_with('/');

        let mut parts = normalized.split('/').peekable();
        let mut is_relative = false;
        let mut parent_levels = 0;
        while let Some(part) = parts.peek() {
            match *part {
                "." => is_relative = true,
                ".." => {
                    is_relative = true;
                    parent_levels += 1;
                }
                _ => break,
            }
            parts.next();
        }

        let segments = parts
            .filter(|part| !part.is_empty() && *part != ".")
            .map(String::from)
            .collect();

        ParsedPath {
            normalized,
            segments,
            is_directory,
            is_relative,
            parent_levels,
        }
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn basename(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    fn is_dir_at(&self, index: usize) -> bool {
        index + 1 < self.segments.len() || self.is_directory
    }

    fn directory_segments(&self) -> &[String] {
        if self.is_directory {
            &self.segments
        } else {
            &self.segments[..self.segments.len().saturating_sub(1)]
        }
    }

    /// Position of the first test directory among the directory segments.
    pub fn test_dir_index(&self) -> Option<usize> {
        self.directory_segments()
            .iter()
            .position(|seg| TEST_DIRS.contains(&seg.as_str()))
    }

    // (group, nesting, depth): test paths first, root-level test dirs before
    // nested ones, shallow before deep. Non-test paths share one key.
    fn test_key(&self) -> (u8, u8, usize) {
        match self.test_dir_index() {
            Some(0) => (0, 0, self.depth()),
            Some(_) => (0, 1, self.depth()),
            None => (1, 0, 0),
        }
    }
}

fn compare_segments(a: &ParsedPath, b: &ParsedPath) -> Ordering {
    for (idx, (seg_a, seg_b)) in a.segments.iter().zip(b.segments.iter()).enumerate() {
        let ord = b
            .is_dir_at(idx)
            .cmp(&a.is_dir_at(idx))
            .then_with(|| comparator::compare_names(seg_a, seg_b));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.segments.len().cmp(&b.segments.len())
}

/// Composite ordering used for every path list in the crate.
pub fn compare_paths(a: &ParsedPath, b: &ParsedPath) -> Ordering {
    a.is_relative
        .cmp(&b.is_relative)
        .then_with(|| b.parent_levels.cmp(&a.parent_levels))
        .then_with(|| a.test_key().cmp(&b.test_key()))
        .then_with(|| compare_segments(a, b))
        .then_with(|| a.normalized.cmp(&b.normalized))
}

impl Ord for ParsedPath {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_paths(self, other)
    }
}

impl PartialOrd for ParsedPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sorts path strings into display order, returning them with normalized separators.
pub fn sort_paths<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    log::trace!("Sorting {} paths", paths.len());
    let mut parsed: Vec<ParsedPath> = paths.iter().map(|p| ParsedPath::parse(p.as_ref())).collect();
    parsed.sort();
    parsed.into_iter().map(|p| p.normalized).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort(paths: &[&str]) -> Vec<String> {
        sort_paths(paths)
    }

    #[test]
    fn normalizes_separators() {
        assert_eq!(normalize_separators("a\\b\\c.txt"), "a/b/c.txt");
        assert_eq!(normalize_separators("a//b///c/"), "a/b/c/");
        assert_eq!(normalize_separators("dir\\\\"), "dir/");
        assert_eq!(normalize_separators(""), "");
    }

    #[test]
    fn parses_attributes() {
        let p = ParsedPath::parse("src//lib/mod.rs");
        assert_eq!(p.segments, vec!["src", "lib", "mod.rs"]);
        assert_eq!(p.depth(), 3);
        assert_eq!(p.basename(), Some("mod.rs"));
        assert!(!p.is_directory);
        assert!(!p.is_relative);

        let d = ParsedPath::parse("src/lib/");
        assert!(d.is_directory);
        assert_eq!(d.basename(), Some("lib"));

        let r = ParsedPath::parse("../../shared/x.rs");
        assert!(r.is_relative);
        assert_eq!(r.parent_levels, 2);
        assert_eq!(r.segments, vec!["shared", "x.rs"]);

        let e = ParsedPath::parse("");
        assert_eq!(e.depth(), 0);
        assert_eq!(e.basename(), None);
    }

    #[test]
    fn empty_and_single_lists_are_unchanged() {
        assert!(sort(&[]).is_empty());
        assert_eq!(sort(&["only.txt"]), vec!["only.txt"]);
    }

    #[test]
    fn hidden_and_priority_files() {
        assert_eq!(sort(&["app.txt", ".env"]), vec![".env", "app.txt"]);
        assert_eq!(
            sort(&["zeta.txt", "package.json"]),
            vec!["package.json", "zeta.txt"]
        );
    }

    #[test]
    fn natural_ordering() {
        assert_eq!(
            sort(&["file10.txt", "file2.txt", "file1.txt"]),
            vec!["file1.txt", "file2.txt", "file10.txt"]
        );
    }

    #[test]
    fn directories_before_files_at_the_same_level() {
        assert_eq!(
            sort(&["b.txt", "a/z.txt", "c/"]),
            vec!["a/z.txt", "c/", "b.txt"]
        );
        assert_eq!(
            sort(&["src/main.rs", "src/bin/tool.rs"]),
            vec!["src/bin/tool.rs", "src/main.rs"]
        );
    }

    #[test]
    fn shallower_prefix_sorts_first() {
        assert_eq!(sort(&["a/b/", "a/"]), vec!["a/", "a/b/"]);
    }

    #[test]
    fn trailing_separator_marks_directory() {
        assert_eq!(sort(&["a", "a/"]), vec!["a/", "a"]);
    }

    #[test]
    fn test_directories_are_grouped_first() {
        assert_eq!(
            sort(&["src/lib.rs", "tests/it.rs", "src/tests/unit.rs"]),
            vec!["tests/it.rs", "src/tests/unit.rs", "src/lib.rs"]
        );
        assert_eq!(
            sort(&["tests/deep/b.rs", "tests/a.rs"]),
            vec!["tests/a.rs", "tests/deep/b.rs"]
        );
    }

    #[test]
    fn relative_paths_sort_last_deepest_first() {
        assert_eq!(
            sort(&["./local.rs", "../up.rs", "plain.rs", "../../top.rs"]),
            vec!["plain.rs", "../../top.rs", "../up.rs", "./local.rs"]
        );
    }

    #[test]
    fn backslashes_are_normalized_in_output() {
        assert_eq!(sort(&["b\\c.txt", "a.txt"]), vec!["b/c.txt", "a.txt"]);
    }

    #[test]
    fn empty_strings_are_kept() {
        assert_eq!(sort(&["a.txt", "", "b.txt"]), vec!["", "a.txt", "b.txt"]);
    }

    #[test]
    fn sorting_twice_is_stable() {
        let input = [
            "src/z.rs",
            "README.md",
            "tests/a.rs",
            ".github/",
            "docs/Guide.md",
            "src/item10.rs",
            "src/item9.rs",
            "../outside.rs",
        ];
        let once = sort(&input);
        let twice = sort_paths(&once);
        assert_eq!(once, twice);
    }
}

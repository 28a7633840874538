// Name-level ordering rules shared by the path sorter and the tree builder.
use std::cmp::Ordering;

/// Files that carry the most context about a project, most important first.
pub const PRIORITY_FILES: &[&str] = &[
    "README.md",
    "README",
    "readme.md",
    "package.json",
    "Cargo.toml",
    "pyproject.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "composer.json",
    "Gemfile",
    "setup.py",
    "requirements.txt",
    "tsconfig.json",
    "Makefile",
    "CMakeLists.txt",
    "Dockerfile",
    "docker-compose.yml",
];

/// Characters that flag a name as needing attention, in precedence order.
pub const SPECIAL_CHARS: &[char] = &['#', '$', '@'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CaseClass {
    Upper,
    Title,
    Other,
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub fn priority_rank(name: &str) -> Option<usize> {
    PRIORITY_FILES.iter().position(|p| *p == name)
}

pub fn special_char_rank(name: &str) -> Option<usize> {
    SPECIAL_CHARS.iter().position(|c| name.contains(*c))
}

/// The name with leading dots and the last extension removed.
pub fn stem(name: &str) -> &str {
    let without_dots = name.trim_start_matches('.');
    match without_dots.rfind('.') {
        Some(idx) if idx > 0 => &without_dots[..idx],
        _ => without_dots,
    }
}

/// Classifies the stem of a name.
pub fn case_class(name: &str) -> CaseClass {
    let mut letters = stem(name).chars().filter(|c| c.is_alphabetic());
    let Some(first) = letters.next() else {
        return CaseClass::Other;
    };
    let rest: Vec<char> = letters.collect();

    let has_upper = first.is_uppercase() || rest.iter().any(|c| c.is_uppercase());
    let has_lower = first.is_lowercase() || rest.iter().any(|c| c.is_lowercase());

    if has_upper && !has_lower {
        CaseClass::Upper
    } else if first.is_uppercase() && !rest.iter().any(|c| c.is_uppercase()) {
        CaseClass::Title
    } else {
        CaseClass::Other
    }
}

fn rank_cmp(a: Option<usize>, b: Option<usize>) -> Ordering {
    a.unwrap_or(usize::MAX).cmp(&b.unwrap_or(usize::MAX))
}

pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn split_runs(name: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_digits: Option<bool> = None;

    for (idx, ch) in name.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match in_digits {
            Some(current) if current != is_digit => {
                runs.push(make_run(&name[start..idx], current));
                start = idx;
                in_digits = Some(is_digit);
            }
            None => in_digits = Some(is_digit),
            _ => {}
        }
    }
    if let Some(current) = in_digits {
        runs.push(make_run(&name[start..], current));
    }
    runs
}

fn make_run(text: &str, digits: bool) -> Run<'_> {
    if digits {
        Run::Digits(text)
    } else {
        Run::Text(text)
    }
}

// Compares digit strings by value without parsing, so arbitrarily long runs work.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn cmp_run(a: &Run<'_>, b: &Run<'_>) -> Ordering {
    match (a, b) {
        (Run::Digits(x), Run::Digits(y)) => cmp_digits(x, y),
        (Run::Digits(_), Run::Text(_)) => Ordering::Less,
        (Run::Text(_), Run::Digits(_)) => Ordering::Greater,
        (Run::Text(x), Run::Text(y)) => cmp_ignore_case(x, y),
    }
}

/// Natural ordering: `file2` sorts before `file10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let runs_a = split_runs(a);
    let runs_b = split_runs(b);

    for (x, y) in runs_a.iter().zip(runs_b.iter()) {
        let ord = cmp_run(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    runs_a.len().cmp(&runs_b.len())
}

/// Compares two path segments through the full rule chain.
///
/// Every tier is a key comparison and the chain ends on a plain byte-wise
/// comparison, so the result is a total order: two names compare equal only
/// when they are identical.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    is_hidden(b)
        .cmp(&is_hidden(a))
        .then_with(|| rank_cmp(priority_rank(a), priority_rank(b)))
        .then_with(|| rank_cmp(special_char_rank(a), special_char_rank(b)))
        .then_with(|| case_class(a).cmp(&case_class(b)))
        .then_with(|| natural_cmp(a, b))
        .then_with(|| cmp_ignore_case(a, b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| compare_names(a, b));
        v
    }

    #[test]
    fn hidden_names_come_first() {
        assert_eq!(sorted(&["app.txt", ".env"]), vec![".env", "app.txt"]);
        assert_eq!(compare_names(".gitignore", "Cargo.toml"), Ordering::Less);
    }

    #[test]
    fn priority_names_follow_list_order() {
        assert_eq!(
            sorted(&["zeta.txt", "package.json"]),
            vec!["package.json", "zeta.txt"]
        );
        assert_eq!(
            sorted(&["Cargo.toml", "README.md", "alpha.rs"]),
            vec!["README.md", "Cargo.toml", "alpha.rs"]
        );
    }

    #[test]
    fn special_characters_rank_by_character() {
        assert_eq!(
            sorted(&["plain.txt", "@scope", "$var", "#notes"]),
            vec!["#notes", "$var", "@scope", "plain.txt"]
        );
    }

    #[test]
    fn stems() {
        assert_eq!(stem("index.js"), "index");
        assert_eq!(stem("archive.tar.gz"), "archive.tar");
        assert_eq!(stem(".env"), "env");
        assert_eq!(stem("Makefile"), "Makefile");
    }

    #[test]
    fn case_classes() {
        assert_eq!(case_class("LICENSE"), CaseClass::Upper);
        assert_eq!(case_class("CHANGELOG.md"), CaseClass::Upper);
        assert_eq!(case_class("Makefile"), CaseClass::Title);
        assert_eq!(case_class("Readme.txt"), CaseClass::Title);
        assert_eq!(case_class("main.rs"), CaseClass::Other);
        assert_eq!(case_class("camelCase.ts"), CaseClass::Other);
        assert_eq!(case_class("123"), CaseClass::Other);
        assert_eq!(case_class(".env"), CaseClass::Other);
    }

    #[test]
    fn upper_then_title_then_other() {
        assert_eq!(
            sorted(&["alpha.rs", "Beta.rs", "GAMMA.rs"]),
            vec!["GAMMA.rs", "Beta.rs", "alpha.rs"]
        );
    }

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(
            sorted(&["file10.txt", "file2.txt", "file1.txt"]),
            vec!["file1.txt", "file2.txt", "file10.txt"]
        );
        assert_eq!(natural_cmp("v007", "v7"), Ordering::Equal);
        assert_eq!(
            natural_cmp("a99999999999999999999999", "a100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn digit_runs_sort_before_text_runs() {
        assert_eq!(natural_cmp("1abc", "abc"), Ordering::Less);
        assert_eq!(natural_cmp("x1", "xa"), Ordering::Less);
        assert_eq!(natural_cmp("x", "x1"), Ordering::Less);
    }

    #[test]
    fn identical_names_only_compare_equal_to_themselves() {
        assert_eq!(compare_names("a.txt", "a.txt"), Ordering::Equal);
        assert_ne!(compare_names("v7", "v007"), Ordering::Equal);
        assert_ne!(compare_names("Ab", "AB"), Ordering::Equal);
    }

    #[test]
    fn empty_names_do_not_panic() {
        assert_eq!(compare_names("", ""), Ordering::Equal);
        assert_eq!(compare_names("", "a"), Ordering::Less);
    }
}

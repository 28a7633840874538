use crate::error::Result;
use crate::output_formats::FileRecord;
use crate::sorting::ParsedPath;
use rayon::prelude::*;
use regex::Regex;

/// A file flagged by a scanner together with the rules that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspiciousFile {
    pub path: String,
    pub messages: Vec<String>,
}

pub trait SecretScanner: Send + Sync {
    fn scan(&self, path: &str, content: &str) -> Option<SuspiciousFile>;
}

const BUILTIN_RULES: &[(&str, &str)] = &[
    (
        "Private key block",
        r"-----BEGIN (?:RSA |EC |DSA |OPENSSH |PGP |ENCRYPTED )?PRIVATE KEY(?: BLOCK)?-----",
    ),
    ("AWS access key id", r"\b(?:AKIA|ASIA)[0-9A-Z]{16}\b"),
    ("GitHub token", r"\bgh[pousr]_[A-Za-z0-9]{36,}\b"),
    ("Slack token", r"\bxox[abposr]-[A-Za-z0-9-]{10,}"),
    ("OpenAI-style API key", r"\bsk-[A-Za-z0-9_-]{20,}"),
    (
        "Hard-coded credential",
        r#"(?i)\b(?:password|passwd|secret|api[_-]?key|access[_-]?token|auth[_-]?token)\b\s*[:=]\s*["'][^"'\s]{8,}["']"#,
    ),
];

struct SecretRule {
    name: String,
    pattern: Regex,
}

pub struct RegexSecretScanner {
    rules: Vec<SecretRule>,
}

impl RegexSecretScanner {
    /// Scanner with the built-in rule set.
    pub fn new() -> Result<Self> {
        Self::with_rules(BUILTIN_RULES)
    }

    pub fn with_rules(rules: &[(&str, &str)]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|(name, pattern)| {
                Ok(SecretRule {
                    name: name.to_string(),
                    pattern: Regex::new(pattern)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RegexSecretScanner { rules })
    }
}

impl SecretScanner for RegexSecretScanner {
    fn scan(&self, path: &str, content: &str) -> Option<SuspiciousFile> {
        let messages: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| rule.pattern.is_match(content))
            .map(|rule| rule.name.clone())
            .collect();
        if messages.is_empty() {
            return None;
        }
        log::trace!("{} matched {} secret rule(s)", path, messages.len());
        Some(SuspiciousFile {
            path: path.to_string(),
            messages,
        })
    }
}

/// Scans every file in parallel and returns the flagged ones in display order.
pub fn run_security_check(files: &[FileRecord], scanner: &dyn SecretScanner) -> Vec<SuspiciousFile> {
    log::debug!("Running security check on {} files", files.len());
    let mut suspicious: Vec<SuspiciousFile> = files
        .par_iter()
        .filter_map(|file| scanner.scan(&file.path, &file.content))
        .collect();
    suspicious.sort_by_cached_key(|file| ParsedPath::parse(&file.path));
    log::info!("Security check flagged {} files", suspicious.len());
    suspicious
}

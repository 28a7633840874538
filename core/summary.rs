use crate::error::{AppError, Result};
use crate::output_formats::FileRecord;
use crate::sorting::ParsedPath;
use tiktoken_rs::CoreBPE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub path: String,
    pub chars: usize,
    pub tokens: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSummary {
    pub total_files: usize,
    pub total_chars: usize,
    pub total_tokens: usize,
    pub output_chars: usize,
    pub output_tokens: usize,
    /// Largest files by token count.
    pub top_files: Vec<FileStats>,
}

/// Counts tokens with the `cl100k_base` encoding, or estimates them at four
/// characters per token when the encoding is unavailable.
pub struct TokenCounter {
    bpe: Option<CoreBPE>,
}

impl TokenCounter {
    pub fn try_new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| AppError::TikToken(e.to_string()))?;
        Ok(TokenCounter { bpe: Some(bpe) })
    }

    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|e| {
            log::warn!("{}; falling back to estimated token counts", e);
            Self::estimating()
        })
    }

    pub fn estimating() -> Self {
        TokenCounter { bpe: None }
    }

    pub fn count(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => text.chars().count().div_ceil(4),
        }
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn summarize(
    files: &[FileRecord],
    output: &str,
    counter: &TokenCounter,
    top_n: usize,
) -> PackSummary {
    let mut stats: Vec<FileStats> = files
        .iter()
        .map(|file| FileStats {
            path: file.path.clone(),
            chars: file.content.chars().count(),
            tokens: counter.count(&file.content),
        })
        .collect();

    let total_chars = stats.iter().map(|s| s.chars).sum();
    let total_tokens = stats.iter().map(|s| s.tokens).sum();

    stats.sort_by(|a, b| {
        b.tokens
            .cmp(&a.tokens)
            .then_with(|| ParsedPath::parse(&a.path).cmp(&ParsedPath::parse(&b.path)))
    });
    stats.truncate(top_n);

    PackSummary {
        total_files: files.len(),
        total_chars,
        total_tokens,
        output_chars: output.chars().count(),
        output_tokens: counter.count(output),
        top_files: stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimating_counter_rounds_up() {
        let counter = TokenCounter::estimating();
        assert_eq!(counter.count(""), 0);
        assert_eq!(counter.count("abc"), 1);
        assert_eq!(counter.count("abcdefghi"), 3);
    }

    #[test]
    fn tiktoken_counts_words() {
        let counter = TokenCounter::new();
        let tokens = counter.count("hello world");
        assert!((1..=3).contains(&tokens));
    }

    #[test]
    fn summary_totals_and_top_files() {
        let files = vec![
            FileRecord::new("small.txt", "abcd"),
            FileRecord::new("big.txt", "a".repeat(40)),
            FileRecord::new("mid.txt", "a".repeat(20)),
        ];
        let summary = summarize(&files, "abcdefgh", &TokenCounter::estimating(), 2);
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.total_chars, 64);
        assert_eq!(summary.total_tokens, 16);
        assert_eq!(summary.output_chars, 8);
        assert_eq!(summary.output_tokens, 2);
        let top: Vec<&str> = summary.top_files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(top, vec!["big.txt", "mid.txt"]);
    }
}

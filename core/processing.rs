use crate::language::{CommentSyntax, comment_syntax};

/// Body transforms applied to every packed file before it is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentTransforms {
    pub remove_comments: bool,
    pub remove_empty_lines: bool,
    pub show_line_numbers: bool,
}

impl ContentTransforms {
    /// Applies the enabled transforms in a fixed order: comments, empty
    /// lines, trailing whitespace, line numbers.
    pub fn apply(&self, path: &str, content: &str) -> String {
        let mut body = content.to_string();
        if self.remove_comments {
            match comment_syntax(path) {
                Some(syntax) => body = strip_comments(&body, &syntax),
                None => log::trace!("No comment syntax known for {}, keeping comments", path),
            }
        }
        if self.remove_empty_lines {
            body = remove_empty_lines(&body);
        }
        body.truncate(body.trim_end().len());
        if self.show_line_numbers {
            body = add_line_numbers(&body);
        }
        body
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    Str(char),
    Block(&'static str),
}

struct Stripper {
    out: String,
    line_start: usize,
    comment_on_line: bool,
}

impl Stripper {
    // Lines that held nothing but a comment are dropped with their newline.
    fn finish_line(&mut self, push_newline: bool) {
        if self.comment_on_line {
            if self.out[self.line_start..].trim().is_empty() {
                self.out.truncate(self.line_start);
                return;
            }
            let kept = self.out.trim_end_matches([' ', '\t']).len();
            self.out.truncate(kept);
        }
        if push_newline {
            self.out.push('\n');
        }
    }
}

// Matches a quoted character literal such as 'x' or '\n' when the quote
// character does not open strings for this language.
fn char_literal_len(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices().skip(1);
    let (_, first) = chars.next()?;
    if first == '\\' {
        chars.next()?;
    }
    match chars.next()? {
        (idx, '\'') => Some(idx + 1),
        _ => None,
    }
}

/// Removes line and block comments, leaving string literals untouched.
pub fn strip_comments(content: &str, syntax: &CommentSyntax) -> String {
    let mut stripper = Stripper {
        out: String::with_capacity(content.len()),
        line_start: 0,
        comment_on_line: false,
    };
    let mut state = ScanState::Code;
    let mut i = 0;

    if syntax.keep_shebang && content.starts_with("#!") {
        let end = content.find('\n').map_or(content.len(), |idx| idx + 1);
        stripper.out.push_str(&content[..end]);
        stripper.line_start = stripper.out.len();
        i = end;
    }

    while i < content.len() {
        let rest = &content[i..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        match state {
            ScanState::Code => {
                if let Some((open, close)) = syntax.block {
                    if rest.starts_with(open) {
                        state = ScanState::Block(close);
                        stripper.comment_on_line = true;
                        i += open.len();
                        continue;
                    }
                }
                if syntax.line.iter().any(|marker| rest.starts_with(marker)) {
                    stripper.comment_on_line = true;
                    i += rest.find('\n').unwrap_or(rest.len());
                    continue;
                }
                if syntax.quotes.contains(&ch) {
                    state = ScanState::Str(ch);
                } else if ch == '\'' {
                    if let Some(len) = char_literal_len(rest) {
                        stripper.out.push_str(&rest[..len]);
                        i += len;
                        continue;
                    }
                } else if ch == '\n' {
                    stripper.finish_line(true);
                    stripper.line_start = stripper.out.len();
                    stripper.comment_on_line = false;
                    i += 1;
                    continue;
                }
                stripper.out.push(ch);
            }
            ScanState::Str(quote) => {
                if ch == '\\' {
                    let escaped_len = rest[1..].chars().next().map_or(0, char::len_utf8);
                    stripper.out.push_str(&rest[..1 + escaped_len]);
                    i += 1 + escaped_len;
                    continue;
                }
                if ch == quote {
                    state = ScanState::Code;
                }
                if ch == '\n' {
                    stripper.line_start = stripper.out.len() + 1;
                }
                stripper.out.push(ch);
            }
            ScanState::Block(close) => {
                if rest.starts_with(close) {
                    state = ScanState::Code;
                    i += close.len();
                    continue;
                }
                if ch == '\n' {
                    stripper.finish_line(true);
                    stripper.line_start = stripper.out.len();
                    stripper.comment_on_line = true;
                }
            }
        }
        i += ch.len_utf8();
    }

    stripper.finish_line(false);
    stripper.out
}

pub fn remove_empty_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefixes each line with its right-aligned number and `: `.
pub fn add_line_numbers(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let width = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| format!("{:>width$}: {}", idx + 1, line, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

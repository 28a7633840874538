use std::path::Path;

/// How comments and string literals are delimited in a source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub line: &'static [&'static str],
    pub block: Option<(&'static str, &'static str)>,
    /// Characters that open (and close) string literals. Comment markers
    /// inside a literal are left alone.
    pub quotes: &'static [char],
    pub keep_shebang: bool,
}

const C_BLOCK: Option<(&str, &str)> = Some(("/*", "*/"));

const RUST: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: C_BLOCK,
    quotes: &['"'],
    keep_shebang: false,
};

const GO: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: C_BLOCK,
    quotes: &['"', '`'],
    keep_shebang: false,
};

const C_LIKE: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: C_BLOCK,
    quotes: &['"', '\''],
    keep_shebang: false,
};

const JS_LIKE: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: C_BLOCK,
    quotes: &['"', '\'', '`'],
    keep_shebang: true,
};

const PHP: CommentSyntax = CommentSyntax {
    line: &["//", "#"],
    block: C_BLOCK,
    quotes: &['"', '\''],
    keep_shebang: true,
};

const HASH: CommentSyntax = CommentSyntax {
    line: &["#"],
    block: None,
    quotes: &['"', '\''],
    keep_shebang: true,
};

const SQL: CommentSyntax = CommentSyntax {
    line: &["--"],
    block: C_BLOCK,
    quotes: &['"', '\''],
    keep_shebang: false,
};

const LUA: CommentSyntax = CommentSyntax {
    line: &["--"],
    block: Some(("--[[", "]]")),
    quotes: &['"', '\''],
    keep_shebang: true,
};

const MARKUP: CommentSyntax = CommentSyntax {
    line: &[],
    block: Some(("<!--", "-->")),
    quotes: &[],
    keep_shebang: false,
};

const CSS: CommentSyntax = CommentSyntax {
    line: &[],
    block: C_BLOCK,
    quotes: &['"', '\''],
    keep_shebang: false,
};

fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Language tag for a fenced code block. Unknown extensions are returned
/// unchanged; a file without an extension gets an empty tag.
pub fn fence_language(path: &str) -> String {
    match file_name_of(path) {
        "Dockerfile" => return "dockerfile".to_string(),
        "Makefile" | "makefile" | "GNUmakefile" => return "makefile".to_string(),
        _ => {}
    }

    let Some(ext) = extension_of(path) else {
        return String::new();
    };
    let language = match ext.as_str() {
        "rs" => "rust",
        "py" | "pyw" | "pyi" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "tsx",
        "go" => "go",
        "c" | "h" => "c",
        "cpp" | "cxx" | "cc" | "hpp" | "hxx" | "hh" => "cpp",
        "cs" => "csharp",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "swift" => "swift",
        "rb" => "ruby",
        "php" => "php",
        "sh" | "bash" | "zsh" | "fish" => "bash",
        "ps1" => "powershell",
        "lua" => "lua",
        "sql" => "sql",
        "md" | "markdown" => "markdown",
        "json" => "json",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        "xml" | "svg" => "xml",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "vue" => "vue",
        "dart" => "dart",
        "scala" => "scala",
        "r" => "r",
        _ => return ext,
    };
    language.to_string()
}

/// Comment syntax for a path, or `None` when comments cannot be stripped safely.
pub fn comment_syntax(path: &str) -> Option<CommentSyntax> {
    match file_name_of(path) {
        "Dockerfile" | "Makefile" | "makefile" | "GNUmakefile" => return Some(HASH),
        _ => {}
    }

    let syntax = match extension_of(path)?.as_str() {
        "rs" => RUST,
        "go" => GO,
        "c" | "h" | "cpp" | "cxx" | "cc" | "hpp" | "hxx" | "hh" | "cs" | "java" | "kt"
        | "kts" | "swift" | "dart" | "scala" | "scss" => C_LIKE,
        "js" | "mjs" | "cjs" | "jsx" | "ts" | "mts" | "cts" | "tsx" => JS_LIKE,
        "php" => PHP,
        "py" | "pyw" | "pyi" | "rb" | "sh" | "bash" | "zsh" | "fish" | "yml" | "yaml"
        | "toml" | "r" | "pl" | "ps1" => HASH,
        "sql" => SQL,
        "lua" => LUA,
        "html" | "htm" | "xml" | "svg" | "vue" | "md" | "markdown" => MARKUP,
        "css" => CSS,
        _ => return None,
    };
    Some(syntax)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_languages() {
        assert_eq!(fence_language("src/main.rs"), "rust");
        assert_eq!(fence_language("app/VIEW.TSX"), "tsx");
        assert_eq!(fence_language("config.yml"), "yaml");
        assert_eq!(fence_language("docker/Dockerfile"), "dockerfile");
    }

    #[test]
    fn unknown_extension_passes_through() {
        assert_eq!(fence_language("data.xyz"), "xyz");
        assert_eq!(fence_language("LICENSE"), "");
        assert_eq!(fence_language(".gitignore"), "");
    }

    #[test]
    fn comment_syntax_by_family() {
        assert_eq!(comment_syntax("lib.rs"), Some(RUST));
        assert_eq!(comment_syntax("run.sh").map(|s| s.line), Some(&["#"][..]));
        assert_eq!(comment_syntax("q.sql").map(|s| s.line), Some(&["--"][..]));
        assert_eq!(
            comment_syntax("index.html").and_then(|s| s.block),
            Some(("<!--", "-->"))
        );
        assert_eq!(comment_syntax("notes.txt"), None);
        assert_eq!(comment_syntax("LICENSE"), None);
    }
}

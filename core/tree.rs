use crate::sorting::comparator::compare_names;
use crate::sorting::{normalize_separators, sort_paths};
use std::cmp::Ordering;

/// Name of the synthetic root node. It never appears in rendered output.
pub const ROOT_NODE_NAME: &str = ".";

/// Entries that lead their kind at the top level of the tree, in this order.
pub const ROOT_PRIORITY_FILES: &[&str] = &[
    "README.md",
    "package.json",
    "Cargo.toml",
    "pyproject.toml",
    "go.mod",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub children: Vec<TreeNode>,
    pub is_directory: bool,
    pub is_root: bool,
}

impl TreeNode {
    pub fn root() -> Self {
        TreeNode {
            name: ROOT_NODE_NAME.to_string(),
            children: Vec::new(),
            is_directory: true,
            is_root: true,
        }
    }

    fn new(name: &str, is_directory: bool) -> Self {
        TreeNode {
            name: name.to_string(),
            children: Vec::new(),
            is_directory,
            is_root: false,
        }
    }

    /// Number of file nodes below this node.
    pub fn file_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| {
                if child.is_directory {
                    child.file_count()
                } else {
                    1
                }
            })
            .sum()
    }
}

fn root_rank(name: &str) -> Option<usize> {
    ROOT_PRIORITY_FILES.iter().position(|p| *p == name)
}

fn root_order(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| {
            root_rank(&a.name)
                .unwrap_or(usize::MAX)
                .cmp(&root_rank(&b.name).unwrap_or(usize::MAX))
        })
        .then_with(|| compare_names(&a.name, &b.name))
}

// Directories first also places an `index` file after a `components` sibling.
fn nested_order(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| compare_names(&a.name, &b.name))
}

fn sort_level(level: &mut [TreeNode], at_root: bool) {
    if at_root {
        level.sort_by(root_order);
    } else {
        level.sort_by(nested_order);
    }
}

// A node keeps the classification of the last path that named it, unless it
// already holds children, in which case it stays a directory.
fn insert_node(level: &mut Vec<TreeNode>, components: &[&str], is_dir_at_end: bool, at_root: bool) {
    let Some((name, remaining)) = components.split_first() else {
        return;
    };
    let is_last_component = remaining.is_empty();

    let index = match level.iter().position(|node| node.name == *name) {
        Some(index) => index,
        None => {
            level.push(TreeNode::new(name, !is_last_component || is_dir_at_end));
            level.len() - 1
        }
    };

    let node = &mut level[index];
    if is_last_component {
        node.is_directory = is_dir_at_end || !node.children.is_empty();
    } else {
        if !node.is_directory {
            log::trace!("Promoting '{}' to a directory", node.name);
        }
        node.is_directory = true;
        insert_node(&mut node.children, remaining, is_dir_at_end, false);
    }

    sort_level(level, at_root);
}

/// Builds the directory tree for a flat list of relative paths.
pub fn build_tree<S: AsRef<str>>(paths: &[S]) -> TreeNode {
    log::debug!("Building tree from {} paths", paths.len());
    let mut root = TreeNode::root();

    for path in sort_paths(paths) {
        let is_dir = path.ends_with('/');
        let components: Vec<&str> = path
            .split('/')
            .filter(|seg| !seg.is_empty() && *seg != ".")
            .collect();
        if components.is_empty() {
            log::trace!("Skipping path without segments: '{}'", path);
            continue;
        }
        insert_node(&mut root.children, &components, is_dir, true);
    }

    root
}

fn render_node(node: &TreeNode, depth: usize, lines: &mut Vec<String>) {
    let child_depth = if node.is_root {
        0
    } else {
        if node.name.is_empty() {
            return;
        }
        let suffix = if node.is_directory { "/" } else { "" };
        lines.push(format!("{}{}{}", "  ".repeat(depth), node.name, suffix));
        depth + 1
    };

    for child in &node.children {
        render_node(child, child_depth, lines);
    }
}

/// Renders a tree as indented text, two spaces per level, without a trailing newline.
pub fn render_tree(root: &TreeNode) -> String {
    let mut lines = Vec::new();
    render_node(root, 0, &mut lines);
    lines.join("\n")
}

/// Renders the tree for a list of paths. A single path is returned as-is.
pub fn render_paths<S: AsRef<str>>(paths: &[S]) -> String {
    match paths {
        [] => String::new(),
        [only] => normalize_separators(only.as_ref()),
        _ => render_tree(&build_tree(paths)),
    }
}

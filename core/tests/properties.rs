use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use xpack_core::{
    FileRecord, OutputStyle, ParsedPath, RenderOptions, TreeNode, build_tree, compare_paths, render,
    render_paths, sort_paths,
};

fn dir_segment() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-zA-Z0-9_]{1,6}",
        1 => Just("tests".to_string()),
        1 => Just("components".to_string()),
        1 => "[#@$]?[a-z]{1,4}",
        1 => "\\.[a-z]{1,4}",
    ]
}

fn file_name() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => "[a-zA-Z0-9_]{1,6}\\.(rs|md|txt)",
        1 => Just("index.ts".to_string()),
        1 => Just("README.md".to_string()),
        1 => "\\.[a-z]{1,5}\\.yml",
        1 => "[a-z]{1,3}[0-9]{1,3}\\.txt",
    ]
}

fn relative_path() -> impl Strategy<Value = String> {
    (prop::collection::vec(dir_segment(), 0..3), file_name()).prop_map(|(mut dirs, file)| {
        dirs.push(file);
        dirs.join("/")
    })
}

fn any_path() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => relative_path(),
        1 => relative_path().prop_map(|p| format!("./{}", p)),
        1 => relative_path().prop_map(|p| format!("../{}", p)),
        1 => relative_path().prop_map(|p| p.replace('/', "\\")),
        1 => prop::collection::vec(dir_segment(), 1..3).prop_map(|d| format!("{}/", d.join("/"))),
    ]
}

// Anything a caller might hand over: control-free unicode, bare separators,
// mixed separators and parent references.
fn malformed_path() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,12}",
        "[/\\\\.]{0,6}",
        "[a-c./\\\\]{0,12}",
        prop::collection::vec(
            prop_oneof![
                Just("..".to_string()),
                Just(".".to_string()),
                Just(String::new()),
                "[a-zA-Z0-9 #@$_-]{1,5}",
            ],
            0..6,
        )
        .prop_flat_map(|segments| {
            prop::sample::select(vec!["/", "\\", "//"]).prop_map(move |sep| segments.join(sep))
        }),
    ]
}

fn assert_directories_lead(node: &TreeNode) -> Result<(), TestCaseError> {
    let first_file = node
        .children
        .iter()
        .position(|child| !child.is_directory)
        .unwrap_or(node.children.len());
    prop_assert!(
        node.children[first_file..].iter().all(|child| !child.is_directory),
        "directory after a file under '{}'",
        node.name
    );
    for child in &node.children {
        prop_assert!(child.is_directory || child.children.is_empty());
        assert_directories_lead(child)?;
    }
    Ok(())
}

fn path_list_and_shuffle() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    prop::collection::vec(any_path(), 0..16)
        .prop_flat_map(|paths| (Just(paths.clone()), Just(paths).prop_shuffle()))
}

proptest! {
    #[test]
    fn sorting_ignores_input_order((paths, shuffled) in path_list_and_shuffle()) {
        prop_assert_eq!(sort_paths(&paths), sort_paths(&shuffled));
    }

    #[test]
    fn sorting_is_idempotent(paths in prop::collection::vec(any_path(), 0..16)) {
        let once = sort_paths(&paths);
        prop_assert_eq!(once.len(), paths.len());
        prop_assert_eq!(sort_paths(&once), once);
    }

    #[test]
    fn comparison_is_antisymmetric(a in any_path(), b in any_path()) {
        let pa = ParsedPath::parse(&a);
        let pb = ParsedPath::parse(&b);
        let forward = compare_paths(&pa, &pb);
        prop_assert_eq!(forward, compare_paths(&pb, &pa).reverse());
        prop_assert_eq!(forward == Ordering::Equal, pa.normalized == pb.normalized);
    }

    #[test]
    fn comparison_is_transitive(a in any_path(), b in any_path(), c in any_path()) {
        let mut parsed = [ParsedPath::parse(&a), ParsedPath::parse(&b), ParsedPath::parse(&c)];
        parsed.sort();
        prop_assert!(compare_paths(&parsed[0], &parsed[1]) != Ordering::Greater);
        prop_assert!(compare_paths(&parsed[1], &parsed[2]) != Ordering::Greater);
        prop_assert!(compare_paths(&parsed[0], &parsed[2]) != Ordering::Greater);
    }

    #[test]
    fn directories_precede_sibling_files(
        dir in "[a-zA-Z0-9_]{1,6}",
        inner in "[a-zA-Z0-9_]{1,6}\\.txt",
        file in "[a-zA-Z0-9_]{1,6}\\.(rs|md|txt)",
    ) {
        let nested = format!("{}/{}", dir, inner);
        let sorted = sort_paths(&[file.clone(), nested.clone()]);
        prop_assert_eq!(sorted, vec![nested, file]);
    }

    #[test]
    fn tree_is_independent_of_input_order((paths, shuffled) in path_list_and_shuffle()) {
        prop_assert_eq!(render_paths(&paths), render_paths(&shuffled));
    }

    #[test]
    fn tree_keeps_every_distinct_file(paths in prop::collection::vec(relative_path(), 0..16)) {
        let distinct: BTreeSet<&String> = paths.iter().collect();
        let tree = build_tree(&paths);
        prop_assert_eq!(tree.file_count(), distinct.len());
    }

    #[test]
    fn malformed_input_never_breaks_the_engine(paths in prop::collection::vec(malformed_path(), 0..12)) {
        let once = sort_paths(&paths);
        prop_assert_eq!(once.len(), paths.len());
        prop_assert_eq!(sort_paths(&once), once);

        let tree = build_tree(&paths);
        prop_assert!(tree.is_root);
        let _ = render_paths(&paths);

        let files: Vec<FileRecord> = paths
            .iter()
            .map(|p| FileRecord::new(p.as_str(), p.as_str()))
            .collect();
        for style in [OutputStyle::Plain, OutputStyle::Markdown, OutputStyle::Xml] {
            let out = render(&files, style, &RenderOptions::default());
            prop_assert!(out.ends_with('\n'));
        }
    }

    #[test]
    fn directories_lead_every_tree_level(paths in prop::collection::vec(
        prop_oneof![3 => any_path(), 1 => malformed_path()],
        0..16,
    )) {
        assert_directories_lead(&build_tree(&paths))?;
    }
}

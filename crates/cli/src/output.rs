//! Output file naming and stale-file diffs.

use std::path::PathBuf;

use similar::{ChangeTag, TextDiff};
use typemux_common::Format;
use typemux_core::Rendered;

use crate::project::OutputConfig;

/// A rendered file and its path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile<'r> {
    pub rel_path: PathBuf,
    pub contents: &'r str,
}

/// Name every file of one backend's output.
///
/// A single file takes the configured or conventional name. A backend that
/// split its output per namespace gets one `a/b/c.<ext>` file per namespace.
pub fn output_files<'r>(
    format: Format,
    rendered: &'r Rendered,
    config: &OutputConfig,
) -> Vec<OutputFile<'r>> {
    if let [file] = rendered.files.as_slice() {
        let name = config
            .filenames
            .get(&format)
            .map_or(format.default_file_name(), String::as_str);
        return vec![OutputFile {
            rel_path: PathBuf::from(name),
            contents: &file.contents,
        }];
    }

    let extension = PathBuf::from(format.default_file_name())
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    rendered
        .files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let stem = file
                .namespace
                .as_deref()
                .map_or_else(|| format!("part{i}"), |ns| ns.replace('.', "/"));
            OutputFile {
                rel_path: PathBuf::from(format!("{stem}.{extension}")),
                contents: &file.contents,
            }
        })
        .collect()
}

/// Colored unified diff between the file on disk and the fresh render.
pub fn unified_diff(rel_path: &str, existing: &str, new_content: &str) -> Option<String> {
    if existing == new_content {
        return None;
    }

    let diff = TextDiff::from_lines(existing, new_content);
    let mut output = String::new();

    output.push_str(&format!("\x1b[1m--- {rel_path} (on disk)\x1b[0m\n"));
    output.push_str(&format!("\x1b[1m+++ {rel_path} (generated)\x1b[0m\n"));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, color) = match change.tag() {
                    ChangeTag::Delete => ("-", "\x1b[31m"),
                    ChangeTag::Insert => ("+", "\x1b[32m"),
                    ChangeTag::Equal => (" ", ""),
                };
                output.push_str(color);
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
                if !color.is_empty() {
                    output.push_str("\x1b[0m");
                }
            }
        }
    }

    Some(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use typemux_core::RenderedFile;

    fn file(namespace: Option<&str>, contents: &str) -> RenderedFile {
        RenderedFile {
            namespace: namespace.map(str::to_string),
            contents: contents.to_string(),
        }
    }

    #[test]
    fn test_single_file_names() {
        let rendered = Rendered {
            files: vec![file(Some("api"), "syntax")],
        };
        let files = output_files(Format::Protobuf, &rendered, &OutputConfig::default());
        assert_eq!(files[0].rel_path, PathBuf::from("schema.proto"));

        let mut config = OutputConfig::default();
        config.filenames.insert(Format::Go, "models.go".to_string());
        let go = Rendered::single("package api".to_string());
        assert_eq!(
            output_files(Format::Go, &go, &config)[0].rel_path,
            PathBuf::from("models.go")
        );
    }

    #[test]
    fn test_one_file_per_namespace() {
        let rendered = Rendered {
            files: vec![
                file(Some("com.example.common"), "a"),
                file(Some("com.example.users"), "b"),
            ],
        };
        let files = output_files(Format::Protobuf, &rendered, &OutputConfig::default());
        let paths: Vec<_> = files.iter().map(|f| f.rel_path.clone()).collect();
        assert_eq!(
            paths,
            [
                PathBuf::from("com/example/common.proto"),
                PathBuf::from("com/example/users.proto"),
            ]
        );
        assert_eq!(files[1].contents, "b");
    }

    #[test]
    fn test_diff_marks_changes() {
        assert!(unified_diff("types.go", "a\n", "a\n").is_none());
        let diff = unified_diff("types.go", "a\nb\n", "a\nc\n").unwrap();
        assert!(diff.contains("--- types.go (on disk)"));
        assert!(diff.contains("\x1b[31m-b\n"));
        assert!(diff.contains("\x1b[32m+c\n"));
    }
}

//! Path resolution for the terminal's working directory.
//!
//! Paths are plain `/`-separated strings. A normalized path starts with `/`, has no empty,
//! `.` or `..` segments and no trailing slash except for the root itself.

/// Resolve `input` against the absolute directory `base`.
///
/// Absolute input replaces the base. `..` never climbs above the root.
pub fn resolve(base: &str, input: &str) -> String {
    if input.starts_with('/') {
        return normalize(input);
    }
    let mut parts = segments(base);
    push_segments(&mut parts, input);
    join(&parts)
}

/// Normalize an absolute path. Relative input is treated as relative to `/`.
pub fn normalize(path: &str) -> String {
    let mut parts = Vec::new();
    push_segments(&mut parts, path);
    join(&parts)
}

fn segments(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    push_segments(&mut parts, path);
    parts
}

fn push_segments<'a>(parts: &mut Vec<&'a str>, path: &'a str) {
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
}

fn join(parts: &[&str]) -> String {
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_segments() {
        assert_eq!(resolve("/a/b", ".."), "/a");
        assert_eq!(resolve("/a/b", "../.."), "/");
        assert_eq!(resolve("/a/b", "../../.."), "/");
    }

    #[test]
    fn test_absolute_overrides_base() {
        assert_eq!(resolve("/a", "/x/y"), "/x/y");
        assert_eq!(resolve("/a", "//x///y/"), "/x/y");
        assert_eq!(resolve("/a", "/x/./y/../z"), "/x/z");
    }

    #[test]
    fn test_relative_segments() {
        assert_eq!(resolve("/", "docs"), "/docs");
        assert_eq!(resolve("/docs", "./notes.txt"), "/docs/notes.txt");
        assert_eq!(resolve("/a/b", "../c/./d"), "/a/c/d");
        assert_eq!(resolve("/a/b/", "c"), "/a/b/c");
    }

    #[test]
    fn test_empty_input_is_noop() {
        assert_eq!(resolve("/a/b", ""), "/a/b");
        assert_eq!(resolve("/", ""), "/");
        assert_eq!(resolve("/a", "."), "/a");
    }
}

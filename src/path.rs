//! Path-string manipulation.
//!
//! Works on plain strings and accepts both `/` and `\` as separators, so asset
//! paths written on one platform can be handled on another. Nothing here
//! touches the filesystem.

/// Check for either path separator.
#[must_use]
pub const fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Strip trailing separators, keeping a lone root separator.
fn trim_trailing(path: &str) -> &str {
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() && !path.is_empty() {
        &path[..1]
    } else {
        trimmed
    }
}

/// Split off the last path element.
///
/// Returns `(parent, name)`. Trailing separators are ignored.
///
/// ```
/// use cutekit::path::pop;
///
/// assert_eq!(pop("assets/sprites/hero.png"), ("assets/sprites", "hero.png"));
/// assert_eq!(pop("assets/sprites/"), ("assets", "sprites"));
/// assert_eq!(pop("hero.png"), ("", "hero.png"));
/// assert_eq!(pop("/hero.png"), ("/", "hero.png"));
/// ```
#[must_use]
pub fn pop(path: &str) -> (&str, &str) {
    let trimmed = trim_trailing(path);
    match trimmed.rfind(is_separator) {
        Some(i) => {
            let parent = trim_trailing(&trimmed[..i]);
            let parent = if parent.is_empty() {
                &trimmed[..1]
            } else {
                parent
            };
            (parent, &trimmed[i + 1..])
        }
        None => ("", trimmed),
    }
}

/// The last path element.
#[must_use]
pub fn file_name(path: &str) -> &str {
    pop(path).1
}

/// Name of the folder containing the last path element.
///
/// ```
/// use cutekit::path::folder_name;
///
/// assert_eq!(folder_name("assets/sprites/hero.png"), "sprites");
/// assert_eq!(folder_name("hero.png"), "");
/// ```
#[must_use]
pub fn folder_name(path: &str) -> &str {
    file_name(pop(path).0)
}

/// Byte index of the extension dot in the last element, if any.
///
/// A leading dot (`.gitignore`) does not start an extension.
fn ext_dot(path: &str) -> Option<usize> {
    let trimmed = trim_trailing(path);
    let name_start = trimmed.rfind(is_separator).map_or(0, |i| i + 1);
    let name = &trimmed[name_start..];
    match name.rfind('.') {
        Some(0) | None => None,
        Some(dot) => Some(name_start + dot),
    }
}

/// Split off the extension of the last element.
///
/// Returns `(path_without_ext, ext)`; the dot belongs to neither.
///
/// ```
/// use cutekit::path::pop_ext;
///
/// assert_eq!(pop_ext("music/theme.tar.gz"), ("music/theme.tar", "gz"));
/// assert_eq!(pop_ext("music.d/theme"), ("music.d/theme", ""));
/// ```
#[must_use]
pub fn pop_ext(path: &str) -> (&str, &str) {
    let trimmed = trim_trailing(path);
    match ext_dot(trimmed) {
        Some(dot) => (&trimmed[..dot], &trimmed[dot + 1..]),
        None => (trimmed, ""),
    }
}

/// Extension of the last element, without the dot.
#[must_use]
pub fn ext(path: &str) -> &str {
    pop_ext(path).1
}

/// Case-insensitive extension check. `ext` may include the leading dot.
#[must_use]
pub fn has_ext(path: &str, ext: &str) -> bool {
    let want = ext.strip_prefix('.').unwrap_or(ext);
    self::ext(path).eq_ignore_ascii_case(want)
}

/// Join two paths with a single `/`.
#[must_use]
pub fn concat(base: &str, rest: &str) -> String {
    if base.is_empty() {
        return rest.to_string();
    }
    if rest.is_empty() {
        return base.to_string();
    }
    let base = trim_trailing(base);
    let rest = rest.trim_start_matches(is_separator);
    if base.ends_with(is_separator) {
        format!("{base}{rest}")
    } else {
        format!("{base}/{rest}")
    }
}

/// Canonical form of a path string.
///
/// Separators become `/`, repeated separators collapse, `.` elements are
/// dropped and `..` removes the previous element. A relative path may keep
/// leading `..` elements; an absolute path cannot climb above its root.
///
/// ```
/// use cutekit::path::normalize;
///
/// assert_eq!(normalize("a\\b//./c/../d/"), "a/b/d");
/// assert_eq!(normalize("/../x"), "/x");
/// assert_eq!(normalize("../x/.."), "..");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let absolute = path.starts_with(is_separator);
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split(is_separator) {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Shorten a path to at most `max_chars` characters for display.
///
/// The middle is replaced by `...`, keeping the start and the end (which
/// usually holds the file name). Limits under 4 characters leave no room for
/// the ellipsis, so the path is simply truncated.
///
/// ```
/// use cutekit::path::compact;
///
/// assert_eq!(compact("assets/sprites/hero.png", 14), "asset...ro.png");
/// assert_eq!(compact("short.png", 20), "short.png");
/// ```
#[must_use]
pub fn compact(path: &str, max_chars: usize) -> String {
    let count = path.chars().count();
    if count <= max_chars {
        return path.to_string();
    }
    if max_chars < 4 {
        return path.chars().take(max_chars).collect();
    }
    let keep = max_chars - 3;
    let head = keep / 2;
    let tail = keep - head;
    let mut out: String = path.chars().take(head).collect();
    out.push_str("...");
    out.extend(path.chars().skip(count - tail));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_variants() {
        assert_eq!(pop("a/b/c"), ("a/b", "c"));
        assert_eq!(pop("a\\b\\c"), ("a\\b", "c"));
        assert_eq!(pop("a//b"), ("a", "b"));
        assert_eq!(pop("//b"), ("/", "b"));
        assert_eq!(pop("/"), ("/", ""));
        assert_eq!(pop(""), ("", ""));
        assert_eq!(pop("C:\\games\\save.dat"), ("C:\\games", "save.dat"));
    }

    #[test]
    fn test_file_and_folder_name() {
        assert_eq!(file_name("x/y/z.txt"), "z.txt");
        assert_eq!(folder_name("x/y/z.txt"), "y");
        assert_eq!(folder_name("y/z.txt"), "y");
        assert_eq!(folder_name("/z.txt"), "");
    }

    #[test]
    fn test_pop_ext() {
        assert_eq!(pop_ext("a/b.png"), ("a/b", "png"));
        assert_eq!(pop_ext("a/.hidden"), ("a/.hidden", ""));
        assert_eq!(pop_ext("a/b."), ("a/b", ""));
        assert_eq!(pop_ext("noext"), ("noext", ""));
        assert_eq!(pop_ext("dir.v2/"), ("dir", "v2"));
    }

    #[test]
    fn test_has_ext() {
        assert!(has_ext("hero.PNG", "png"));
        assert!(has_ext("hero.png", ".png"));
        assert!(!has_ext("hero.png", "jpg"));
        assert!(!has_ext("hero", "png"));
        assert!(has_ext("hero", ""));
    }

    #[test]
    fn test_concat() {
        assert_eq!(concat("a", "b"), "a/b");
        assert_eq!(concat("a/", "/b"), "a/b");
        assert_eq!(concat("a\\", "b"), "a/b");
        assert_eq!(concat("/", "b"), "/b");
        assert_eq!(concat("", "b"), "b");
        assert_eq!(concat("a", ""), "a");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("."), ".");
        assert_eq!(normalize("a/.."), ".");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("a/b/../../.."), "..");
        assert_eq!(normalize("../../a"), "../../a");
        assert_eq!(normalize("\\\\server\\share"), "/server/share");
    }

    #[test]
    fn test_compact_exact_length() {
        let path = "assets/levels/world_one/stage_three.map";
        for n in 4..path.len() {
            let out = compact(path, n);
            assert_eq!(out.chars().count(), n, "limit {n} produced {out}");
            assert!(out.contains("..."));
            assert!(out.ends_with('p'));
        }
    }

    #[test]
    fn test_compact_small_limits() {
        assert_eq!(compact("abcdef", 3), "abc");
        assert_eq!(compact("abcdef", 0), "");
        assert_eq!(compact("abcdef", 4), "...f");
    }

    #[test]
    fn test_compact_multibyte() {
        let out = compact("données/été/fichier.txt", 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.starts_with("don"));
    }
}

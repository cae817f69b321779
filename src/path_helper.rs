//! Path helpers for the component loader.
//!
//! Everything here is lexical: no function touches the file system. Output paths end up as
//! string literals inside generated modules, so they are always rendered with `/`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Script extensions a component import may carry.
const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs"];

// ═══════════════════════════════════════════════════════════════════════════════
// STRING PATHS
// ═══════════════════════════════════════════════════════════════════════════════

/// Remove the final extension of `path`. With a platform type tag, a trailing
/// `.<platform>` infix is removed as well (`index.wechat.js` -> `index`).
pub fn strip_extension(path: &str, platform_type: Option<&str>) -> String {
    let name_start = path.rfind(|c: char| c == '/' || c == '\\').map_or(0, |i| i + 1);
    let mut stem = match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    };

    if let Some(platform) = platform_type {
        let infix = format!(".{}", platform);
        if stem.len() - name_start > infix.len() && stem.ends_with(&infix) {
            stem = &stem[..stem.len() - infix.len()];
        }
    }

    stem.to_string()
}

/// Remove the extension only when it is a known script extension.
pub fn strip_script_extension(path: &str) -> String {
    let name_start = path.rfind(|c: char| c == '/' || c == '\\').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 && SCRIPT_EXTENSIONS.contains(&&path[name_start + dot + 1..]) => {
            path[..name_start + dot].to_string()
        }
        _ => path.to_string(),
    }
}

pub fn add_relative_path_prefix(path: &str) -> String {
    if path.starts_with('.') {
        path.to_string()
    } else {
        format!("./{}", path)
    }
}

pub fn double_backslash(s: &str) -> String {
    s.replace('\\', "\\\\")
}

/// Canonicalize a path that will be written into generated code.
///
/// Separators become `/`, empty and `.` segments are dropped and `..` is folded where a
/// preceding name exists. Explicitly relative paths keep a `./` or `../` head, bare module
/// specifiers and absolute paths keep theirs.
pub fn normalize_output_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let is_absolute = unified.starts_with('/');
    let is_relative = unified == "."
        || unified == ".."
        || unified.starts_with("./")
        || unified.starts_with("../");

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().map_or(false, |last| *last != "..") {
                    segments.pop();
                } else if !is_absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if is_absolute {
        format!("/{}", joined)
    } else if is_relative {
        if joined.is_empty() {
            ".".to_string()
        } else if segments[0] == ".." {
            joined
        } else {
            format!("./{}", joined)
        }
    } else {
        joined
    }
}

pub fn is_typescript_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts") | Some("tsx")
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEXICAL PATH OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Fold `.` and `..` components without consulting the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(result.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    result.pop();
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Resolve `request` against `base_dir`.
pub fn resolve(base_dir: &Path, request: &str) -> PathBuf {
    normalize_path(&base_dir.join(request))
}

/// Relative path leading from `from_dir` to `to`. Empty when both are the same.
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from = normalize_path(from_dir);
    let to = normalize_path(to);
    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from_parts.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part.as_os_str());
    }
    result
}

pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTANT DIRECTORIES
// ═══════════════════════════════════════════════════════════════════════════════

/// Membership test for the configured constant directories.
///
/// Results are memoized by the exact path queried. One instance lives for one loader
/// invocation.
#[derive(Debug, Default)]
pub struct ConstantDirs {
    dirs: Vec<PathBuf>,
    memo: RefCell<HashMap<PathBuf, bool>>,
    scans: Cell<usize>,
}

impl ConstantDirs {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs: dirs.iter().map(|d| normalize_path(d)).collect(),
            memo: RefCell::new(HashMap::new()),
            scans: Cell::new(0),
        }
    }

    /// Constant directories are configured relative to the project root.
    pub fn under_root(root_context: &Path, dirs: &[String]) -> Self {
        Self::new(dirs.iter().map(|d| root_context.join(d)).collect())
    }

    pub fn contains(&self, path: &Path) -> bool {
        if let Some(hit) = self.memo.borrow().get(path) {
            return *hit;
        }

        self.scans.set(self.scans.get() + 1);
        let normalized = normalize_path(path);
        let found = self.dirs.iter().any(|dir| normalized.starts_with(dir));
        self.memo.borrow_mut().insert(path.to_path_buf(), found);
        found
    }

    /// Number of prefix scans performed so far.
    pub fn scan_count(&self) -> usize {
        self.scans.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("/src/pages/index.jsx", None), "/src/pages/index");
        assert_eq!(strip_extension("./components/Foo", None), "./components/Foo");
        assert_eq!(strip_extension("/a.b/c", None), "/a.b/c");
        assert_eq!(strip_extension("/src/.hidden", None), "/src/.hidden");
    }

    #[test]
    fn test_strip_extension_platform_infix() {
        assert_eq!(strip_extension("/src/index.wechat.js", Some("wechat")), "/src/index");
        assert_eq!(strip_extension("/src/index.js", Some("wechat")), "/src/index");
        assert_eq!(strip_extension("/src/index.ali.js", Some("wechat")), "/src/index.ali");
    }

    #[test]
    fn test_strip_script_extension() {
        assert_eq!(strip_script_extension("./Foo.tsx"), "./Foo");
        assert_eq!(strip_script_extension("./utils.helper"), "./utils.helper");
    }

    #[test]
    fn test_add_relative_path_prefix() {
        assert_eq!(add_relative_path_prefix("components/Repo"), "./components/Repo");
        assert_eq!(add_relative_path_prefix("../Repo"), "../Repo");
    }

    #[test]
    fn test_normalize_output_path() {
        assert_eq!(normalize_output_path(".\\components\\Foo"), "./components/Foo");
        assert_eq!(normalize_output_path("./a//b/./c"), "./a/b/c");
        assert_eq!(normalize_output_path("../x/../y"), "../y");
        assert_eq!(normalize_output_path("mini-ali-ui/es/button"), "mini-ali-ui/es/button");
        assert_eq!(normalize_output_path("/abs/../dir"), "/dir");
    }

    #[test]
    fn test_double_backslash() {
        assert_eq!(double_backslash("C:\\a\\b"), "C:\\\\a\\\\b");
        assert_eq!(double_backslash("/a/b"), "/a/b");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/src/pages"), Path::new("/src/components/Foo.jsx")),
            PathBuf::from("../components/Foo.jsx")
        );
        assert_eq!(
            relative_path(Path::new("/src"), Path::new("/src/a/b")),
            PathBuf::from("a/b")
        );
        assert_eq!(relative_path(Path::new("/src"), Path::new("/src")), PathBuf::new());
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve(Path::new("/src/pages"), "../components/Foo"),
            PathBuf::from("/src/components/Foo")
        );
    }

    #[test]
    fn test_constant_dirs_component_prefix() {
        let dirs = ConstantDirs::under_root(Path::new("/project"), &["src/public".to_string()]);
        assert!(dirs.contains(Path::new("/project/src/public/native/index")));
        assert!(!dirs.contains(Path::new("/project/src/public2/index")));
        assert!(!dirs.contains(Path::new("/project/src/components/Foo")));
    }

    #[test]
    fn test_constant_dirs_memoized() {
        let dirs = ConstantDirs::new(vec![PathBuf::from("/project/src/public")]);
        let path = Path::new("/project/src/public/a");
        assert!(dirs.contains(path));
        assert!(dirs.contains(path));
        assert!(dirs.contains(path));
        assert_eq!(dirs.scan_count(), 1);

        dirs.contains(Path::new("/project/other"));
        assert_eq!(dirs.scan_count(), 2);
    }

    #[test]
    fn test_is_typescript_file() {
        assert!(is_typescript_file(Path::new("/a/b.tsx")));
        assert!(!is_typescript_file(Path::new("/a/b.jsx")));
    }
}

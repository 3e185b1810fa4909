//! Store key normalization.

use std::path::{Component, Path};

/// Returns the store key for `path` relative to the tree rooted at `root`.
///
/// Keys use `/` as separator on every host and drop `.` components, so the
/// same file always maps to the same key regardless of how the walk spelled
/// its path. Paths outside `root` keep their full form.
pub fn normalize_key(root: &Path, path: &Path) -> String {
    let relative = path
        .strip_prefix(root)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path);

    let mut key = String::new();
    for component in relative.components() {
        let part = match component {
            Component::CurDir => continue,
            Component::RootDir => {
                key.push('/');
                continue;
            }
            Component::Prefix(prefix) => prefix.as_os_str().to_string_lossy(),
            Component::ParentDir => "..".into(),
            Component::Normal(name) => name.to_string_lossy(),
        };
        if !key.is_empty() && !key.ends_with('/') {
            key.push('/');
        }
        key.push_str(&part);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_root() {
        assert_eq!(
            normalize_key(Path::new("src"), Path::new("src/sub/a.c")),
            "sub/a.c"
        );
    }

    #[test]
    fn current_dir_root() {
        assert_eq!(normalize_key(Path::new("."), Path::new("./a.c")), "a.c");
        assert_eq!(
            normalize_key(Path::new("."), Path::new("./x/./y.cpp")),
            "x/y.cpp"
        );
    }

    #[test]
    fn same_file_same_key() {
        let a = normalize_key(Path::new("proj"), Path::new("proj/lib/u.c"));
        let b = normalize_key(Path::new("proj/"), Path::new("proj/./lib/u.c"));
        assert_eq!(a, b);
    }

    #[test]
    fn outside_root_keeps_path() {
        assert_eq!(
            normalize_key(Path::new("src"), Path::new("other/a.c")),
            "other/a.c"
        );
    }

    #[cfg(unix)]
    #[test]
    fn absolute_outside_root() {
        assert_eq!(
            normalize_key(Path::new("/src"), Path::new("/opt/inc/a.h")),
            "/opt/inc/a.h"
        );
    }
}

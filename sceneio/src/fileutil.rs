//! File Utility Functions

use std::path::Path;

/// Returns the extension of the file name in lowercase, or an empty string
/// when there is none.
///
/// * `path` - The path.
pub fn file_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

/// Returns the parent directory of the path with a trailing separator, or an
/// empty string when the path has no parent. The result can be prepended
/// directly to relative resource names.
///
/// * `path` - The path.
pub fn parent_path(path: &str) -> String {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => format!("{}/", parent.display()),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions() {
        assert_eq!(file_extension("scenes/room.obj"), "obj");
        assert_eq!(file_extension("room.OBJ"), "obj");
        assert_eq!(file_extension("room"), "");
    }

    #[test]
    fn parent_paths() {
        assert_eq!(parent_path("scenes/room.obj"), "scenes/");
        assert_eq!(parent_path("room.obj"), "");
    }
}

use std::path::{Component, Path, PathBuf};

/// Re-anchor `path` below `root`, the way a chroot would see it.
///
/// Relative paths are joined as-is; absolute paths lose their leading
/// separator first so they cannot escape the root.
pub fn prefix_root(root: Option<&Path>, path: &Path) -> PathBuf {
    let Some(root) = root else {
        return path.to_path_buf();
    };
    let relative: PathBuf = path.components().filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_))).collect();
    root.join(relative)
}

//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob, Pattern};
use walkdir::WalkDir;

/// Recursively copy `src` into `dst`, preserving relative paths.
///
/// Top-level entries of `src` named in `skip` are not copied. Returns the
/// number of files copied.
pub fn copy_tree(src: &Path, dst: &Path, skip: &[&str]) -> Result<usize> {
    fs::create_dir_all(dst)
        .with_context(|| format!("failed to create directory: {}", dst.display()))?;

    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() != 1
                || !skip
                    .iter()
                    .any(|name| entry.file_name().to_str() == Some(*name))
        });

    let mut copied = 0;
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("{} is outside {}", entry.path().display(), src.display()))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create directory: {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            tracing::debug!("copied {}", rel.display());
            copied += 1;
        }
    }

    Ok(copied)
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Find files matching glob patterns relative to a base directory.
///
/// `base` is matched literally, so directory names holding `[`, `?` or `*`
/// are safe. Results are sorted by path and deduplicated.
pub fn glob_files(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    let escaped_base = PathBuf::from(Pattern::escape(&base.to_string_lossy()));

    for pattern in patterns {
        let full_pattern = escaped_base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        for entry in glob(&pattern_str)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        results.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// Relative paths of every file under `root`, sorted.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() {
            if let Ok(rel) = entry.path().strip_prefix(root) {
                files.push(rel.to_path_buf());
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("bin/Release/net9.0-android");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("b.apk"), "apk").unwrap();
        fs::write(out.join("a.apk"), "apk").unwrap();
        fs::write(out.join("a.aab"), "aab").unwrap();

        let files = glob_files(tmp.path(), &["bin/**/*.apk".to_string()]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.apk"));
    }

    #[test]
    fn test_glob_files_base_with_glob_characters() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("Apps [old]");
        fs::create_dir_all(base.join("bin")).unwrap();
        fs::write(base.join("bin/app.apk"), "apk").unwrap();

        let files = glob_files(&base, &["bin/**/*.apk".to_string()]).unwrap();
        assert_eq!(files, vec![base.join("bin/app.apk")]);
    }

    #[test]
    fn test_copy_tree() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");

        fs::create_dir_all(src.join("nested/deeper")).unwrap();
        fs::write(src.join("file.txt"), "content").unwrap();
        fs::write(src.join("nested/deeper/inner.txt"), "inner").unwrap();

        let copied = copy_tree(&src, &dst, &[]).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.join("file.txt")).unwrap(), "content");
        assert_eq!(
            fs::read_to_string(dst.join("nested/deeper/inner.txt")).unwrap(),
            "inner"
        );
    }

    #[test]
    fn test_copy_tree_skips_top_level_names_only() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");

        fs::create_dir_all(src.join("bin")).unwrap();
        fs::create_dir_all(src.join("Resources/bin")).unwrap();
        fs::write(src.join("bin/old.apk"), "stale").unwrap();
        fs::write(src.join("Resources/bin/keep.txt"), "keep").unwrap();

        copy_tree(&src, &dst, &["bin"]).unwrap();

        assert!(!dst.join("bin").exists());
        assert!(dst.join("Resources/bin/keep.txt").exists());
    }

    #[test]
    fn test_remove_dir_all_if_exists() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("gone");
        fs::create_dir_all(dir.join("a")).unwrap();

        remove_dir_all_if_exists(&dir).unwrap();
        assert!(!dir.exists());
        remove_dir_all_if_exists(&dir).unwrap();
    }

    #[test]
    fn test_list_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("x")).unwrap();
        fs::write(tmp.path().join("x/b.txt"), "").unwrap();
        fs::write(tmp.path().join("a.txt"), "").unwrap();

        let files = list_files(tmp.path()).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("x/b.txt")]);
    }
}

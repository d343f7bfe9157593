//! File system walking

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::Path;
use tracing::{debug, warn};

use super::{Document, FileDocument};
use crate::error::{ConfigError, ScanError};

/// Compile exclude globs; patterns are matched against `/` separated relative paths
pub fn build_excludes<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidGlob {
        pattern: patterns.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", "),
        message: e.to_string(),
    })
}

/// Walk `root` and return its files in path order.
///
/// `.gitignore`, `.ignore` and git exclude files are honored, the `.git` directory
/// is skipped, and files whose relative path matches `excludes` are left out.
pub fn walk(root: &Path, excludes: &GlobSet) -> Result<Vec<FileDocument>, ScanError> {
    if !root.exists() {
        return Err(ScanError::Walk {
            path: root.display().to_string(),
            message: "no such file or directory".to_string(),
        });
    }

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .ignore(true)
        .parents(true)
        .require_git(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut documents = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let document = FileDocument::new(root, entry.path());
        if excludes.is_match(document.name()) {
            debug!(document = document.name(), "excluded");
            continue;
        }
        documents.push(document);
    }

    documents.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(documents: &[FileDocument]) -> Vec<&str> {
        documents.iter().map(|d| d.name()).collect()
    }

    #[test]
    fn test_walk_is_sorted_and_recursive() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("src/nested/b.rs"), "").unwrap();
        fs::write(root.join("src/a.rs"), "").unwrap();
        fs::write(root.join("README"), "").unwrap();

        let documents = walk(root, &GlobSet::empty()).unwrap();
        assert_eq!(names(&documents), vec!["README", "src/a.rs", "src/nested/b.rs"]);
    }

    #[test]
    fn test_walk_honors_gitignore_and_skips_git_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/config"), "").unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("target/out.rs"), "").unwrap();
        fs::write(root.join(".gitignore"), "target/\n").unwrap();
        fs::write(root.join("lib.rs"), "").unwrap();

        let documents = walk(root, &GlobSet::empty()).unwrap();
        assert_eq!(names(&documents), vec![".gitignore", "lib.rs"]);
    }

    #[test]
    fn test_walk_applies_excludes() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("vendor/dep")).unwrap();
        fs::write(root.join("vendor/dep/x.c"), "").unwrap();
        fs::write(root.join("main.c"), "").unwrap();
        fs::write(root.join("data.json"), "").unwrap();

        let excludes = build_excludes(&["vendor/**", "*.json"]).unwrap();
        let documents = walk(root, &excludes).unwrap();
        assert_eq!(names(&documents), vec!["main.c"]);
    }

    #[test]
    fn test_invalid_glob() {
        let err = build_excludes(&["a[b"]).unwrap_err();
        assert!(err.to_string().contains("a[b"));
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        assert!(walk(&dir.path().join("nope"), &GlobSet::empty()).is_err());
    }
}

//! Glob resolution over a [`FileStore`]
//!
//! Supports `*` and `?` inside path components, no `**` recursion. The
//! pattern is resolved component-wise: literal components extend candidate
//! paths directly, wildcard components are matched against a directory
//! listing. Results come back in the store's natural listing order.

use landfall_common::wildcard::{compile_wildcard, has_wildcards};
use landfall_common::Result;
use landfall_fs::FileStore;
use std::path::{Component, Path, PathBuf};

pub(crate) async fn expand_glob(store: &dyn FileStore, pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);
    let mut frontier: Vec<PathBuf> = vec![if path.is_absolute() {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    }];

    for component in path.components() {
        let part = match component {
            Component::Normal(part) => part.to_string_lossy().into_owned(),
            // Root was seeded above; `.` changes nothing.
            Component::RootDir | Component::CurDir => continue,
            Component::ParentDir | Component::Prefix(_) => continue,
        };

        if !has_wildcards(&part) {
            frontier = frontier.into_iter().map(|p| p.join(&part)).collect();
            continue;
        }

        let matcher = compile_wildcard(&part)?;
        let mut next = Vec::new();

        for candidate in frontier {
            let dir = if candidate.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                candidate
            };

            match store.stat(&dir).await? {
                Some(stat) if stat.is_dir => {},
                _ => continue,
            }

            for entry in store.list_dir(&dir).await? {
                if matcher.is_match(&entry.name) {
                    next.push(entry.path);
                }
            }
        }

        frontier = next;
    }

    // Literal trailing components were joined blindly; drop anything that
    // does not actually exist.
    let mut resolved = Vec::with_capacity(frontier.len());
    for candidate in frontier {
        if store.stat(&candidate).await?.is_some() {
            resolved.push(candidate);
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use landfall_fs::LocalFileStore;

    #[tokio::test]
    async fn test_expand_glob_wildcard_component() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("batch_01")).unwrap();
        std::fs::create_dir(dir.path().join("batch_02")).unwrap();
        std::fs::create_dir(dir.path().join("other")).unwrap();

        let store = LocalFileStore::default();
        let pattern = format!("{}/batch_*", dir.path().display());
        let mut paths = expand_glob(&store, &pattern).await.unwrap();
        paths.sort();

        assert_eq!(
            paths,
            vec![dir.path().join("batch_01"), dir.path().join("batch_02")]
        );
    }

    #[tokio::test]
    async fn test_expand_glob_literal_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("only")).unwrap();

        let store = LocalFileStore::default();
        let hit = format!("{}/only", dir.path().display());
        let miss = format!("{}/absent", dir.path().display());

        assert_eq!(
            expand_glob(&store, &hit).await.unwrap(),
            vec![dir.path().join("only")]
        );
        assert!(expand_glob(&store, &miss).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expand_glob_wildcard_in_middle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("2014/10")).unwrap();
        std::fs::create_dir_all(dir.path().join("2015/10")).unwrap();
        std::fs::create_dir_all(dir.path().join("2015/11")).unwrap();

        let store = LocalFileStore::default();
        let pattern = format!("{}/201?/10", dir.path().display());
        let mut paths = expand_glob(&store, &pattern).await.unwrap();
        paths.sort();

        assert_eq!(
            paths,
            vec![dir.path().join("2014/10"), dir.path().join("2015/10")]
        );
    }

    #[tokio::test]
    async fn test_expand_glob_matches_files_too() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.dat"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("a_dir")).unwrap();

        let store = LocalFileStore::default();
        let pattern = format!("{}/a*", dir.path().display());
        let paths = expand_glob(&store, &pattern).await.unwrap();

        assert_eq!(paths.len(), 2);
    }
}

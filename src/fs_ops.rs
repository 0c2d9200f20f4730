//! Filesystem mutations used by the explorer: copy with de-duplicated names,
//! delete, rename, mkdir and touch.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// First free name among `path`, `path_0`, `path_1`, ...
pub fn dedup_destination(path: &Path) -> PathBuf {
    if !exists(path) {
        return path.to_path_buf();
    }
    let base = path.as_os_str().to_os_string();
    (0..)
        .map(|n| {
            let mut candidate = base.clone();
            candidate.push(format!("_{}", n));
            PathBuf::from(candidate)
        })
        .find(|candidate| !exists(candidate))
        .unwrap_or_else(|| path.to_path_buf())
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Copy `src` (file or directory tree) into `dest_dir` under its own base
/// name, de-duplicated. Returns the path actually written.
///
/// A directory cannot be copied into itself or any of its descendants.
pub fn copy_into(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| Error::NotFound(src.to_path_buf()))?;
    if fs::metadata(src)?.is_dir() {
        let canonical_src = fs::canonicalize(src)?;
        let canonical_dest = fs::canonicalize(dest_dir)?;
        if canonical_dest.starts_with(&canonical_src) {
            return Err(Error::CopyIntoSelf {
                src: canonical_src,
                dest: canonical_dest,
            });
        }
    }
    let destination = dedup_destination(&dest_dir.join(name));
    copy_recursive(src, &destination)?;
    log::debug!("copied {:?} -> {:?}", src, destination);
    Ok(destination)
}

fn copy_recursive(src: &Path, dst: &Path) -> Result<()> {
    let metadata = fs::metadata(src)?;
    if !metadata.is_dir() {
        fs::copy(src, dst)?;
        return Ok(());
    }

    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::Generic(e.to_string()))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)?;
    Ok(())
}

/// Delete `path`. `forced` removes directories recursively; otherwise only
/// files and empty directories can go.
pub fn delete(path: &Path, forced: bool) -> Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        if forced {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_dir(path)?;
        }
    } else {
        fs::remove_file(path)?;
    }
    log::debug!("deleted {:?} (forced: {})", path, forced);
    Ok(())
}

/// Give `path` a new base name within the same directory. Refuses to
/// replace an existing entry.
pub fn rename_in_place(path: &Path, new_name: &str) -> Result<PathBuf> {
    let parent = path.parent().unwrap_or_else(|| Path::new("/"));
    let target = parent.join(new_name);
    move_entry(path, &target)?;
    Ok(target)
}

/// Move `path` aside to a free hidden sibling name, returning where it went.
pub fn stage_aside(path: &Path) -> Result<PathBuf> {
    let parent = path.parent().unwrap_or_else(|| Path::new("/"));
    let staging = dedup_destination(&parent.join(STAGING_NAME));
    move_entry(path, &staging)?;
    Ok(staging)
}

/// `fs::rename` that fails with `AlreadyExists` instead of clobbering `to`.
pub fn move_entry(from: &Path, to: &Path) -> Result<()> {
    if exists(to) {
        return Err(Error::AlreadyExists(to.to_path_buf()));
    }
    fs::rename(from, to)?;
    log::debug!("renamed {:?} -> {:?}", from, to);
    Ok(())
}

const STAGING_NAME: &str = ".gofileyourself-rename";

pub fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

pub fn touch_file(path: &Path) -> Result<()> {
    fs::OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dedup_destination_counts_up() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.txt");
        assert_eq!(dedup_destination(&target), target);

        fs::write(&target, "x").unwrap();
        assert_eq!(dedup_destination(&target), dir.path().join("a.txt_0"));

        fs::write(dir.path().join("a.txt_0"), "x").unwrap();
        fs::write(dir.path().join("a.txt_1"), "x").unwrap();
        assert_eq!(dedup_destination(&target), dir.path().join("a.txt_2"));
    }

    #[test]
    fn test_copy_file_into_same_directory_dedups() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("note");
        fs::write(&src, "hello").unwrap();

        let written = copy_into(&src, dir.path()).unwrap();
        assert_eq!(written, dir.path().join("note_0"));
        assert_eq!(fs::read_to_string(written).unwrap(), "hello");
    }

    #[test]
    fn test_copy_directory_tree() {
        let src_root = TempDir::new().unwrap();
        let dest_root = TempDir::new().unwrap();
        let tree = src_root.path().join("proj");
        fs::create_dir_all(tree.join("src/nested")).unwrap();
        fs::write(tree.join("src/nested/lib.rs"), "pub fn f() {}").unwrap();
        fs::write(tree.join("README"), "readme").unwrap();

        let written = copy_into(&tree, dest_root.path()).unwrap();
        assert_eq!(written, dest_root.path().join("proj"));
        assert_eq!(
            fs::read_to_string(written.join("src/nested/lib.rs")).unwrap(),
            "pub fn f() {}"
        );
        assert!(written.join("README").is_file());
    }

    #[test]
    fn test_non_forced_delete_refuses_non_empty_directory() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("f"), "x").unwrap();

        assert!(delete(&sub, false).is_err());
        assert!(sub.exists());

        delete(&sub, true).unwrap();
        assert!(!sub.exists());
    }

    #[test]
    fn test_rename_and_touch() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("old");
        touch_file(&file).unwrap();
        let renamed = rename_in_place(&file, "new").unwrap();
        assert_eq!(renamed, dir.path().join("new"));
        assert!(renamed.exists());
        assert!(!file.exists());
    }

    #[test]
    fn test_rename_refuses_existing_target() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "AAA").unwrap();
        fs::write(dir.path().join("b.txt"), "BBB").unwrap();

        let result = rename_in_place(&dir.path().join("a.txt"), "b.txt");
        assert!(matches!(result, Err(Error::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "AAA");
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "BBB");
    }

    #[test]
    fn test_stage_aside_picks_free_hidden_name() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("one");
        let second = dir.path().join("two");
        fs::write(&first, "1").unwrap();
        fs::write(&second, "2").unwrap();

        let staged_first = stage_aside(&first).unwrap();
        let staged_second = stage_aside(&second).unwrap();
        assert_ne!(staged_first, staged_second);
        assert!(!first.exists());
        assert_eq!(fs::read_to_string(staged_second).unwrap(), "2");
    }

    #[test]
    fn test_copy_directory_into_itself_is_refused() {
        let dir = TempDir::new().unwrap();
        let tree = dir.path().join("a");
        fs::create_dir_all(tree.join("sub")).unwrap();
        fs::write(tree.join("f.txt"), "x").unwrap();

        assert!(matches!(
            copy_into(&tree, &tree),
            Err(Error::CopyIntoSelf { .. })
        ));
        assert!(matches!(
            copy_into(&tree, &tree.join("sub")),
            Err(Error::CopyIntoSelf { .. })
        ));
        assert!(!tree.join("a").exists());
        assert!(!tree.join("sub/a").exists());

        // A sibling whose name merely shares the prefix is fine
        fs::create_dir(dir.path().join("ab")).unwrap();
        let written = copy_into(&tree, &dir.path().join("ab")).unwrap();
        assert!(written.join("f.txt").is_file());
    }

    #[test]
    fn test_create_directory_with_parents() {
        let dir = TempDir::new().unwrap();
        create_directory(&dir.path().join("a/b/c")).unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
    }
}

use std::fs;
use std::io;
use std::path::Path;

/// True iff `path` is a directory containing at least one entry. This is
/// the store's "installed" predicate and is also
/// used to decide whether `atomic_install` needs to do any work at all.
pub fn is_nonempty_dir(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    }
}

/// Populates `dest` with the result of `populate`, by first populating a
/// sibling temporary directory under `parent` and then renaming it into
/// place. Idempotent: if `dest` is already a non-empty directory, `populate`
/// is never invoked. If another caller wins the rename race, the finished
/// temporary is discarded and this call still succeeds.
///
/// This is the sole commit point backing the release store's install
/// contract: the entire target directory becomes visible via
/// one atomic rename, so no partially populated directory is ever
/// observable by another caller.
pub fn atomic_install(
    parent: &Path,
    prefix: &str,
    dest: &Path,
    populate: impl FnOnce(&Path) -> io::Result<()>,
) -> io::Result<()> {
    if is_nonempty_dir(dest) {
        return Ok(());
    }
    fs::create_dir_all(parent)?;
    let tmp = tempfile::Builder::new().prefix(prefix).tempdir_in(parent)?;
    populate(tmp.path())?;
    // Disarm the `TempDir`'s own cleanup-on-drop: past this point we own
    // removing the directory, whichever path (renamed away, or left behind
    // after losing a race) it ends up on.
    let tmp_path = tmp.keep();

    match fs::rename(&tmp_path, dest) {
        Ok(()) => Ok(()),
        Err(e) => {
            if is_nonempty_dir(dest) {
                // Another caller's install already landed; ours is surplus.
                let _ = fs::remove_dir_all(&tmp_path);
                Ok(())
            } else {
                let _ = fs::remove_dir_all(&tmp_path);
                Err(e)
            }
        }
    }
}

/// Reads `path` to a string, returning `Ok(None)` if it does not exist
/// rather than erroring, for the registry generator's "read current
/// contents (if any)" step.
pub fn read_if_exists(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Writes `contents` to `path` only if the current contents differ,
/// creating parent directories as needed. Returns whether a write
/// happened, backing the registry generator's write-on-diff discipline
/// and the "count of files actually written" it reports.
pub fn write_if_different(path: &Path, contents: &str) -> io::Result<bool> {
    if read_if_exists(path)?.as_deref() == Some(contents) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonempty_dir_detection() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_nonempty_dir(dir.path()));
        fs::write(dir.path().join("f"), b"x").unwrap();
        assert!(is_nonempty_dir(dir.path()));
        assert!(!is_nonempty_dir(&dir.path().join("does-not-exist")));
    }

    #[test]
    fn atomic_install_populates_once() {
        let root = tempfile::tempdir().unwrap();
        let dest = root.path().join("pkg/1.0.0/src");
        let mut calls = 0;
        atomic_install(&root.path().join("pkg"), "tmp-", &dest, |p| {
            calls += 1;
            fs::create_dir_all(p)?;
            fs::write(p.join("main.src"), b"hi")
        })
        .unwrap();
        assert_eq!(calls, 1);
        assert!(dest.join("main.src").exists());

        // Second call is a no-op: populate is never invoked again.
        atomic_install(&root.path().join("pkg"), "tmp-", &dest, |_| {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn write_if_different_reports_change() {
        let dir = tempfile::tempdir().unwrap();
        let f = dir.path().join("sub/entry");
        assert!(write_if_different(&f, "a").unwrap());
        assert!(!write_if_different(&f, "a").unwrap());
        assert!(write_if_different(&f, "b").unwrap());
        assert_eq!(fs::read_to_string(&f).unwrap(), "b");
    }
}

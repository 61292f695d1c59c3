//! Local filesystem listing for path-like references

use std::fs;
use std::path::Path;

use super::candidate::{Candidate, Completions, Style};
use super::parts::split_parts;

/// Extensions the tarball fetcher unpacks
const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".tar", ".tar.gz", ".tgz", ".tar.xz", ".txz", ".tar.bz2", ".tbz2", ".tar.zst", ".zip",
];

/// List directories next to the partially typed `value`.
///
/// With `archives` set, files the tarball fetcher can unpack are listed too.
/// Hidden entries only show once a `.` has been typed. Unreadable
/// directories yield nothing.
pub fn list_local(value: &str, archives: bool) -> Completions {
    let split = split_parts(value, "/");
    let dir = match split.head {
        "" => Path::new("."),
        head => Path::new(head),
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "cannot list directory");
            return Completions::new();
        }
    };

    let show_hidden = split.current.starts_with('.');
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') && !show_hidden {
            continue;
        }
        // Follows symlinks
        let is_dir = entry.path().is_dir();
        if is_dir {
            dirs.push(name);
        } else if archives && is_archive(&name) {
            files.push(name);
        }
    }

    dirs.sort();
    files.sort();

    let mut set = Completions::new();
    for name in dirs {
        let mut c = Candidate::new(format!("{name}/"), "directory");
        c.style = Style::Local;
        c.no_space = true;
        set.candidates.push(c);
    }
    for name in files {
        let mut c = Candidate::new(name, "archive");
        c.style = Style::Local;
        set.candidates.push(c);
    }

    set.prefix(split.head)
}

fn is_archive(name: &str) -> bool {
    ARCHIVE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("flake-a")).unwrap();
        fs::create_dir(dir.path().join("flake-b")).unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        fs::write(dir.path().join("src.tar.gz"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        dir
    }

    #[test]
    fn test_lists_directories_only() {
        let dir = fixture();
        let head = format!("{}/", dir.path().display());

        let set = list_local(&head, false);
        assert_eq!(
            set.values(),
            vec![format!("{head}flake-a/"), format!("{head}flake-b/")]
        );
        assert!(set.candidates.iter().all(|c| c.no_space));
    }

    #[test]
    fn test_archives() {
        let dir = fixture();
        let head = format!("{}/", dir.path().display());

        let set = list_local(&head, true);
        assert_eq!(set.values().last(), Some(&format!("{head}src.tar.gz").as_str()));
        assert!(!set.values().iter().any(|v| v.ends_with("notes.txt")));
    }

    #[test]
    fn test_hidden_after_dot() {
        let dir = fixture();
        let value = format!("{}/.", dir.path().display());

        let set = list_local(&value, false);
        assert!(set.values().iter().any(|v| v.ends_with(".hidden/")));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let value = format!("{}/missing/", dir.path().display());
        assert!(list_local(&value, false).is_empty());
    }
}

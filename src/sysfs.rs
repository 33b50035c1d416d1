use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::trace;

// Typed sysfs attribute readers. Every function here absorbs its own
// failures and reports absence through Option, the collector substitutes
// a default at each call site.

// Read a sysfs attribute file as a whitespace-trimmed string
pub fn read_trimmed(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(raw) => Some(raw.trim().to_string()),
        Err(err) => {
            trace!("Unreadable attribute {}: {err}", path.display());
            None
        }
    }
}

// Read a sysfs attribute holding an unsigned decimal integer.
// Anything other than a plain run of ASCII digits counts as unreadable.
pub fn read_u64(path: &Path) -> Option<u64> {
    let raw = read_trimmed(path)?;

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        trace!("Non-numeric attribute {}: {raw:?}", path.display());
        return None;
    }

    raw.parse().ok()
}

// List the subdirectories of `dir` whose name starts with `prefix`,
// sorted by name so traversal order is stable across runs
pub fn subdirs_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    entries_matching(dir, prefix, "", |path| path.is_dir())
}

// List the files in `dir` whose name starts with `prefix` and ends
// with `suffix`, sorted by name
pub fn files_matching(dir: &Path, prefix: &str, suffix: &str) -> Vec<PathBuf> {
    entries_matching(dir, prefix, suffix, |path| path.is_file())
}

fn entries_matching(
    dir: &Path,
    prefix: &str,
    suffix: &str,
    keep: impl Fn(&Path) -> bool,
) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            trace!("Unreadable directory {}: {err}", dir.display());
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(prefix) && name.ends_with(suffix)
        })
        .map(|entry| entry.path())
        .filter(|path| keep(path))
        .collect();

    paths.sort();
    paths
}

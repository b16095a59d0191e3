use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect every `.json` file under `root`, recursively, in traversal
/// order. A missing or empty root yields an empty list.
pub fn discover_json_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_json_files_in_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2018").join("11");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(nested.join("b.json"), "{}").unwrap();
        fs::write(nested.join("notes.txt"), "skip me").unwrap();

        let mut found = discover_json_files(dir.path());
        found.sort();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("a.json"));
        assert!(found[1].ends_with("b.json"));
    }

    #[test]
    fn empty_root_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_json_files(dir.path()).is_empty());
    }

    #[test]
    fn missing_root_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(discover_json_files(&missing).is_empty());
    }
}

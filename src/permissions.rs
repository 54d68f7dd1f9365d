use anyhow::{Result, anyhow};
use std::path::{Component, Path, PathBuf};

/// Resolves `path` through its nearest existing ancestor, so paths of files
/// and directories that are about to be created can be checked too.
pub(crate) fn resolve(path: &Path) -> Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    while !existing.exists() {
        let name = existing.file_name().ok_or_else(|| {
            anyhow!(
                "Cannot resolve '{}' because none of its parent directories exist.",
                path.display()
            )
        })?;
        missing.push(name);
        existing = match existing.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => {
                return Err(anyhow!(
                    "Cannot resolve '{}' because it has no parent directory.",
                    path.display()
                ));
            }
        };
    }

    let mut resolved = existing.canonicalize().map_err(|e| {
        anyhow!(
            "Failed to resolve path '{}': {}. It might not exist or there's a permission issue.",
            existing.display(),
            e
        )
    })?;
    for name in missing.into_iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

/// Checks that an operation on `path` stays inside `root`.
///
/// `root` must exist. `path` may not exist yet; then the check is done on the
/// nearest existing ancestor plus the remaining components. `..` components
/// are rejected outright.
pub fn ensure_within(path: &Path, root: &Path) -> Result<()> {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(anyhow!(
            "Operation on path '{}' is not allowed. Paths may not contain '..'.",
            path.display()
        ));
    }

    let canonical_root = root.canonicalize().map_err(|e| {
        anyhow!(
            "Failed to resolve data directory '{}': {}. Is the project root correct?",
            root.display(),
            e
        )
    })?;
    let canonical_path = resolve(path)?;

    if !canonical_path.starts_with(&canonical_root) {
        return Err(anyhow!(
            "Operation on path '{}' is not allowed. It's not within the data directory '{}'.",
            path.display(),
            root.display()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::Builder;

    fn setup_test_dirs() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let tmp_dir = Builder::new().prefix("perm-test-").tempdir().unwrap();
        let data_dir = tmp_dir.path().join("src/data");
        let outside_dir = tmp_dir.path().join("secrets");

        fs::create_dir_all(&data_dir).unwrap();
        fs::create_dir_all(&outside_dir).unwrap();
        fs::write(data_dir.join("register.ts"), "export const register = {};").unwrap();
        fs::write(outside_dir.join("secret.txt"), "secret").unwrap();

        (tmp_dir, data_dir, outside_dir)
    }

    #[test]
    fn test_existing_file_inside_root() {
        let (_tmp_dir, data_dir, _outside) = setup_test_dirs();
        assert!(ensure_within(&data_dir.join("register.ts"), &data_dir).is_ok());
    }

    #[test]
    fn test_existing_file_outside_root() {
        let (_tmp_dir, data_dir, outside) = setup_test_dirs();
        let result = ensure_within(&outside.join("secret.txt"), &data_dir);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("is not allowed"));
    }

    #[test]
    fn test_new_file_in_missing_directories_inside_root() {
        let (_tmp_dir, data_dir, _outside) = setup_test_dirs();
        let path = data_dir.join("events/village/annie.passages/intro.screen.ts");
        assert!(ensure_within(&path, &data_dir).is_ok());
    }

    #[test]
    fn test_new_file_outside_root() {
        let (_tmp_dir, data_dir, outside) = setup_test_dirs();
        let result = ensure_within(&outside.join("new/file.ts"), &data_dir);
        assert!(result.is_err());
    }

    #[test]
    fn test_parent_dir_components_are_rejected() {
        let (_tmp_dir, data_dir, _outside) = setup_test_dirs();
        let path = data_dir.join("characters/../../../secrets/secret.txt");
        let result = ensure_within(&path, &data_dir);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("'..'"));
    }

    #[test]
    fn test_missing_root_is_reported() {
        let (tmp_dir, data_dir, _outside) = setup_test_dirs();
        let result = ensure_within(&data_dir.join("register.ts"), &tmp_dir.path().join("nope"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to resolve data directory"));
    }
}

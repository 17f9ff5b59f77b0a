//! JSON File Helpers
//!
//! Load/save helpers shared by the stores. Files are written pretty-printed;
//! a missing file loads as the type's default.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::utils::error::AppResult;
use crate::utils::paths::ensure_dir;

/// Read `path`, or return `T::default()` when it does not exist.
pub fn load_or_default<T>(path: &Path) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&content)?)
}

/// Write `value` to `path`, creating the parent directory if needed.
pub fn save<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AppError;
    use std::collections::BTreeMap;

    #[test]
    fn test_missing_file_loads_default() {
        let temp = tempfile::tempdir().unwrap();
        let loaded: Vec<String> = load_or_default(&temp.path().join("none.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("sub").join("data.json");
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1);

        save(&path, &map).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n"));

        let loaded: BTreeMap<String, i32> = load_or_default(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let result: AppResult<Vec<String>> = load_or_default(&path);
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }
}

use crate::utils::error::Result;
use std::collections::HashMap;
use std::path::Path;

/// Homophone table compiled into the binary.
const BUNDLED_HOMOPHONES: &str = include_str!("../../homophones.json");

/// Character → interchangeable characters with the same pronunciation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomophoneMap {
    entries: HashMap<char, Vec<String>>,
}

impl HomophoneMap {
    /// Parse a JSON object of `"字": ["同", "音"]` entries. Keys longer than one
    /// character are ignored.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(content)?;
        let mut entries = HashMap::with_capacity(raw.len());

        for (key, values) in raw {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => {
                    let values: Vec<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
                    entries.insert(ch, values);
                }
                _ => tracing::warn!("Ignoring homophone key '{}': not a single character", key),
            }
        }

        Ok(Self { entries })
    }

    pub fn bundled() -> Self {
        // 內建檔案在編譯期已確定為合法 JSON
        Self::from_json_str(BUNDLED_HOMOPHONES).unwrap_or_default()
    }

    /// Load from `path`, falling back to the bundled table when the file is
    /// missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_json_str(&content) {
                Ok(map) => {
                    tracing::info!("Loaded {} homophone entries from {}", map.len(), path.display());
                    map
                }
                Err(e) => {
                    tracing::warn!(
                        "Homophone file {} is invalid, using bundled table: {}",
                        path.display(),
                        e
                    );
                    Self::bundled()
                }
            },
            Err(e) => {
                tracing::debug!(
                    "Homophone file {} not readable, using bundled table: {}",
                    path.display(),
                    e
                );
                Self::bundled()
            }
        }
    }

    pub fn get(&self, ch: char) -> &[String] {
        self.entries.get(&ch).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_table() {
        let map = HomophoneMap::bundled();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get('楠'), &["南".to_string(), "男".to_string()]);
        assert!(map.get('王').is_empty());
    }

    #[test]
    fn test_multi_char_keys_are_ignored() {
        let map = HomophoneMap::from_json_str(r#"{"张三": ["章三"], "王": ["汪"]}"#).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get('王'), &["汪".to_string()]);
    }

    #[test]
    fn test_load_falls_back_on_missing_or_bad_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = HomophoneMap::load(&dir.path().join("nope.json"));
        assert_eq!(missing, HomophoneMap::bundled());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "not json").unwrap();
        assert_eq!(HomophoneMap::load(&bad), HomophoneMap::bundled());
    }

    #[test]
    fn test_load_custom_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("homophones.json");
        std::fs::write(&path, r#"{"刘": ["流", "留"]}"#).unwrap();
        let map = HomophoneMap::load(&path);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get('刘').len(), 2);
    }
}

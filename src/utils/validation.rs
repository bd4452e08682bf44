use crate::utils::error::{Result, SearchError};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Every entry, ignoring case and a leading dot, must be one of `allowed`.
pub fn validate_extensions(field_name: &str, extensions: &[String], allowed: &[&str]) -> Result<()> {
    if extensions.is_empty() {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one file extension is required".to_string(),
        });
    }

    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();
    for ext in extensions {
        let normalized = ext.trim_start_matches('.').to_lowercase();
        if !allowed_set.contains(normalized.as_str()) {
            return Err(SearchError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: ext.clone(),
                reason: format!(
                    "Unsupported file extension. Allowed extensions: {}",
                    allowed.join(", ")
                ),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 與任何值比較皆為 false，需以正向條件判斷
    if !(value >= min && value <= max) {
        return Err(SearchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data_dir", "./data").is_ok());
        assert!(validate_path("data_dir", "").is_err());
        assert!(validate_path("data_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("concurrent_files", 4, 1).is_ok());
        assert!(validate_positive_number("concurrent_files", 0, 1).is_err());
    }

    #[test]
    fn test_validate_extensions() {
        let allowed = ["csv", "xlsx"];
        assert!(validate_extensions("extensions", &["csv".to_string(), ".XLSX".to_string()], &allowed).is_ok());
        assert!(validate_extensions("extensions", &["txt".to_string()], &allowed).is_err());
        assert!(validate_extensions("extensions", &[], &allowed).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("threshold", 0.7, 0.0, 1.0).is_ok());
        assert!(validate_range("threshold", 1.2, 0.0, 1.0).is_err());
        assert!(validate_range("threshold", f64::NAN, 0.0, 1.0).is_err());
        assert!(validate_range("concurrent_files", usize::MAX, 1, 256).is_err());
    }
}

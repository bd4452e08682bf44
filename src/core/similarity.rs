/// Default threshold for whole-row matching.
pub const DEFAULT_ROW_THRESHOLD: f64 = 0.7;

/// Jaro-Winkler similarity in `[0, 1]`. Case-sensitive; callers lowercase.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    strsim::jaro_winkler(a, b)
}

/// Threshold scaled by keyword length: short keywords must match almost
/// exactly, long ones may drift further.
pub fn auto_threshold(keyword: &str) -> f64 {
    let length = keyword.chars().count();
    match length {
        0..=2 => 0.95,
        3..=5 => 0.85,
        _ => (1.0 - length as f64 * 0.03).max(0.7),
    }
}

/// Column importance for cell matching; name-like columns rank highest.
pub fn field_weight(header: &str) -> f64 {
    match header.trim() {
        "姓名" | "name" => 1.0,
        "用户名" | "user" => 0.9,
        "工号" | "员工编号" => 0.8,
        "电话" | "手机" => 0.7,
        "部门" | "职务" => 0.6,
        _ => 0.5,
    }
}

/// Similarity boosted by column weight. May exceed 1 for weighted columns.
pub fn weighted_score(similarity: f64, header: &str) -> f64 {
    similarity * (1.0 + field_weight(header) * 0.2)
}

/// Score as a whole percentage, capped at 100%.
pub fn format_percent(similarity: f64) -> String {
    format!("{:.0}%", similarity.min(1.0) * 100.0)
}

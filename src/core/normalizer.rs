use crate::domain::model::{Cell, Table};
use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Cell values treated as null after trimming.
const NULL_TOKENS: [&str; 4] = ["", "NA", "N/A", "NaN"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
    "%Y年%m月%d日 %H:%M:%S",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日", "%Y%m%d"];

/// Ordered mapping from a standard column name to the header fragments that
/// identify it. Earlier entries win when a header matches several.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAliases {
    entries: Vec<(String, Vec<String>)>,
}

impl ColumnAliases {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Standard name for `header`, if any variant occurs in it (case-insensitive).
    pub fn resolve(&self, header: &str) -> Option<&str> {
        let lowered = header.to_lowercase();
        self.entries
            .iter()
            .find(|(_, variants)| {
                variants
                    .iter()
                    .any(|variant| lowered.contains(&variant.to_lowercase()))
            })
            .map(|(standard, _)| standard.as_str())
    }
}

impl Default for ColumnAliases {
    fn default() -> Self {
        let entry = |standard: &str, variants: &[&str]| {
            (
                standard.to_string(),
                variants.iter().map(|v| v.to_string()).collect(),
            )
        };
        Self::new(vec![
            entry("姓名", &["名字", "姓名", "name"]),
            entry("电话", &["手机", "电话", "联系方式", "phone"]),
            entry("部门", &["部门", "单位", "department"]),
        ])
    }
}

/// Rename headers to their standard names.
pub fn normalize_columns(table: &mut Table, aliases: &ColumnAliases) {
    for header in table.headers.iter_mut() {
        if let Some(standard) = aliases.resolve(header) {
            if standard != header.as_str() {
                tracing::debug!("Column '{}' -> '{}'", header, standard);
                *header = standard.to_string();
            }
        }
    }
}

/// Trim cells, null out placeholder values and unify date columns.
pub fn normalize_data(table: &mut Table) {
    let date_columns: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| is_date_column(header))
        .map(|(idx, _)| idx)
        .collect();

    for row in table.rows.iter_mut() {
        for (idx, cell) in row.cells.iter_mut().enumerate() {
            let cleaned = clean_cell(cell.take());
            *cell = if date_columns.contains(&idx) {
                cleaned.and_then(|value| normalize_date(&value))
            } else {
                cleaned
            };
        }
    }
}

fn clean_cell(cell: Cell) -> Cell {
    let value = cell?;
    let trimmed = value.trim();
    if NULL_TOKENS.contains(&trimmed) {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

pub fn is_date_column(header: &str) -> bool {
    header.contains("日期") || header.to_lowercase().contains("date")
}

/// Render a date as `YYYY-MM-DD`, or `YYYY-MM-DD HH:MM:SS` when it carries a
/// non-midnight time. Unparseable values yield `None`.
pub fn normalize_date(value: &str) -> Option<String> {
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(if datetime.num_seconds_from_midnight() == 0 {
                datetime.date().format("%Y-%m-%d").to_string()
            } else {
                datetime.format("%Y-%m-%d %H:%M:%S").to_string()
            });
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Row;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_normalize_columns_uses_aliases() {
        let mut table = Table::new(
            "t.csv",
            vec![
                "员工名字".to_string(),
                "Phone Number".to_string(),
                "所属单位".to_string(),
                "备注".to_string(),
            ],
        );
        normalize_columns(&mut table, &ColumnAliases::default());
        assert_eq!(table.headers, vec!["姓名", "电话", "部门", "备注"]);
    }

    #[test]
    fn test_first_alias_wins() {
        // 同時命中多組時取第一組
        let aliases = ColumnAliases::default();
        assert_eq!(aliases.resolve("部门名字"), Some("姓名"));
        assert_eq!(aliases.resolve("地址"), None);
    }

    #[test]
    fn test_normalize_data_trims_and_nulls() {
        let mut table = Table::new("t.csv", vec!["姓名".to_string(), "备注".to_string()]);
        table.rows.push(Row::new(cells(&["  张三 ", "N/A"])));
        table.rows.push(Row::new(cells(&["李四", "  "])));
        table.rows.push(Row::new(vec![None, Some("NaN".to_string())]));

        normalize_data(&mut table);

        assert_eq!(table.rows[0].cells, vec![Some("张三".to_string()), None]);
        assert_eq!(table.rows[1].cells, vec![Some("李四".to_string()), None]);
        assert_eq!(table.rows[2].cells, vec![None, None]);
    }

    #[test]
    fn test_normalize_data_unifies_dates() {
        let mut table = Table::new("t.csv", vec!["入职日期".to_string(), "Birth Date".to_string()]);
        table.rows.push(Row::new(cells(&["2021年3月1日", "1990/07/15"])));
        table.rows.push(Row::new(cells(&["2021-03-01 08:30:00", "not a date"])));

        normalize_data(&mut table);

        assert_eq!(
            table.rows[0].cells,
            vec![Some("2021-03-01".to_string()), Some("1990-07-15".to_string())]
        );
        assert_eq!(
            table.rows[1].cells,
            vec![Some("2021-03-01 08:30:00".to_string()), None]
        );
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(normalize_date("20210301").as_deref(), Some("2021-03-01"));
        assert_eq!(normalize_date("2021.3.1").as_deref(), Some("2021-03-01"));
        assert_eq!(
            normalize_date("2021-03-01 00:00:00").as_deref(),
            Some("2021-03-01")
        );
        assert_eq!(normalize_date("yesterday"), None);
    }
}

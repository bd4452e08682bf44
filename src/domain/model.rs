use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A table cell; `None` is a null value.
pub type Cell = Option<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Csv,
    Workbook,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(FileKind::Csv),
            "xls" | "xlsx" | "et" | "ods" => Some(FileKind::Workbook),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

impl SourceFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub sheet: Option<String>,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { sheet: None, cells }
    }
}

/// A loaded file. Workbooks contribute all of their sheets as one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub source: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(source: impl Into<PathBuf>, headers: Vec<String>) -> Self {
        Self {
            source: source.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header/value pairs of a row with null cells left out.
    pub fn row_content(&self, row: &Row) -> Vec<(String, String)> {
        self.headers
            .iter()
            .zip(row.cells.iter())
            .filter_map(|(header, cell)| cell.as_ref().map(|v| (header.clone(), v.clone())))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Compare each variant against the whole row text.
    #[default]
    Row,
    /// Compare each variant against every cell, weighted by column.
    Cell,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "row" => Ok(MatchMode::Row),
            "cell" | "field" => Ok(MatchMode::Cell),
            other => Err(format!("unknown match mode '{}', expected row or cell", other)),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Row => write!(f, "row"),
            MatchMode::Cell => write!(f, "cell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
    Xlsx,
    Zip,
}

impl ExportFormat {
    pub const ALL: [&'static str; 5] = ["csv", "tsv", "json", "xlsx", "zip"];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Zip => "zip",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "zip" => Ok(ExportFormat::Zip),
            other => Err(format!(
                "unknown export format '{}', expected one of {}",
                other,
                Self::ALL.join(", ")
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub file: String,
    #[serde(skip)]
    pub path: PathBuf,
    pub sheet: Option<String>,
    /// 1-based data row number within its table
    pub row: usize,
    #[serde(serialize_with = "serialize_content")]
    pub content: Vec<(String, String)>,
    pub similarity: f64,
    pub pattern: String,
    pub field: Option<String>,
}

const DISPLAY_LIMIT: usize = 300;

impl SearchHit {
    /// `k:v, k:v` rendering of the whole row.
    pub fn content_text(&self) -> String {
        self.content
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `content_text` cut at 300 characters.
    pub fn display_content(&self) -> String {
        let joined = self.content_text();
        if joined.chars().count() > DISPLAY_LIMIT {
            let truncated: String = joined.chars().take(DISPLAY_LIMIT).collect();
            format!("{}...", truncated)
        } else {
            joined
        }
    }
}

fn serialize_content<S>(content: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;
    let mut map = serializer.serialize_map(Some(content.len()))?;
    for (k, v) in content {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    pub keyword: String,
    pub hits: Vec<SearchHit>,
    pub files_scanned: usize,
    pub files_failed: usize,
    pub cancelled: bool,
}

/// Result of a full run: the report plus where it was exported.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub report: SearchReport,
    pub exported: String,
}

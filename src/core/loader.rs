use crate::core::encoding::decode_text;
use crate::core::normalizer::{normalize_columns, normalize_data, ColumnAliases};
use crate::domain::model::{Cell, FileKind, Row, Table};
use crate::utils::error::{Result, SearchError};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::Timelike;
use std::io::Cursor;
use std::path::Path;

/// Loads CSV files and workbooks into normalized tables.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    aliases: ColumnAliases,
}

impl FileLoader {
    pub fn new(aliases: ColumnAliases) -> Self {
        Self { aliases }
    }

    pub fn load(&self, path: &Path) -> Result<Table> {
        tracing::debug!("Loading {}", path.display());

        let kind = FileKind::from_path(path).ok_or_else(|| SearchError::UnsupportedFormatError {
            path: path.display().to_string(),
        })?;

        let bytes = std::fs::read(path)?;
        let mut table = match kind {
            FileKind::Csv => load_csv(path, &bytes)?,
            FileKind::Workbook => load_workbook(path, bytes)?,
        };

        normalize_columns(&mut table, &self.aliases);
        normalize_data(&mut table);

        tracing::debug!(
            "Loaded {} rows x {} columns from {}",
            table.rows.len(),
            table.headers.len(),
            path.display()
        );
        Ok(table)
    }
}

fn header_name(raw: &str, position: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{}", position + 1)
    } else {
        trimmed.to_string()
    }
}

/// Parse CSV bytes in whatever encoding they arrive in. Malformed records are
/// skipped with a warning; ragged rows are padded or cut to the header width.
pub fn load_csv(path: &Path, bytes: &[u8]) -> Result<Table> {
    let (text, encoding) = decode_text(bytes);
    tracing::debug!("Using encoding {} for {}", encoding.name(), path.display());

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| header_name(h, idx))
        .collect();
    let width = headers.len();
    let mut table = Table::new(path, headers);

    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                if record.len() > width {
                    tracing::warn!(
                        "{}: record {} has {} fields, expected {}; extra fields dropped",
                        path.display(),
                        line + 1,
                        record.len(),
                        width
                    );
                }
                let mut cells: Vec<Cell> = record
                    .iter()
                    .take(width)
                    .map(|field| Some(field.to_string()))
                    .collect();
                cells.resize(width, None);
                table.rows.push(Row::new(cells));
            }
            Err(e) => {
                tracing::warn!("{}: skipping bad record {}: {}", path.display(), line + 1, e);
            }
        }
    }

    Ok(table)
}

/// Read every sheet of a workbook into one table. The first non-empty row of
/// each sheet is its header; sheets are joined on header names.
pub fn load_workbook(path: &Path, bytes: Vec<u8>) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut table = Table::new(path, Vec::new());

    for sheet_name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range
            .rows()
            .filter(|cells| cells.iter().any(|cell| cell_text(cell).is_some()));

        let Some(header_row) = rows.next() else {
            tracing::debug!("{}: sheet '{}' is empty", path.display(), sheet_name);
            continue;
        };

        let column_map = merge_headers(&mut table.headers, header_row);
        let mut count = 0usize;

        for cells in rows {
            let mut row_cells: Vec<Cell> = vec![None; table.headers.len()];
            for (source_idx, cell) in cells.iter().enumerate() {
                if let Some(&target_idx) = column_map.get(source_idx) {
                    row_cells[target_idx] = cell_text(cell);
                }
            }
            table.rows.push(Row {
                sheet: Some(sheet_name.clone()),
                cells: row_cells,
            });
            count += 1;
        }

        tracing::debug!("{}: sheet '{}' has {} rows", path.display(), sheet_name, count);
    }

    let width = table.headers.len();
    for row in table.rows.iter_mut() {
        row.cells.resize(width, None);
    }

    Ok(table)
}

/// Map each column of a sheet header onto the table's headers, appending new
/// ones. Repeated names within one sheet get separate columns.
fn merge_headers(headers: &mut Vec<String>, header_row: &[Data]) -> Vec<usize> {
    let mut used = Vec::with_capacity(header_row.len());

    for (idx, cell) in header_row.iter().enumerate() {
        let name = header_name(&cell_text(cell).unwrap_or_default(), idx);
        let existing = (0..headers.len()).find(|&pos| headers[pos] == name && !used.contains(&pos));

        let target = match existing {
            Some(pos) => pos,
            None => {
                headers.push(name);
                headers.len() - 1
            }
        };
        used.push(target);
    }

    used
}

/// Cell content as text; empty and error cells are null.
fn cell_text(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(datetime) if datetime.num_seconds_from_midnight() == 0 => {
                datetime.format("%Y-%m-%d").to_string()
            }
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_float(dt.as_f64()),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Whole floats print without a fraction so phone numbers and IDs stay intact.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
